use crate::cli::{CheckArgs, CorpusSize, RunArgs};
use crate::data::{DataManager, LARGE_CORPUS, VERY_LARGE_CORPUS};
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use structparity::engine::config::{
    BatchConfig, BatchConfigBuilder, ComparisonConfig, ComparisonConfigBuilder, FailurePolicy,
};
use structparity::engine::exceptions::ExceptionTable;
use tracing::{debug, info};

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialCorpusConfig {
    large: Option<PathBuf>,
    #[serde(rename = "very-large")]
    very_large: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialComparisonConfig {
    #[serde(rename = "resolution-tolerance")]
    resolution_tolerance: Option<f64>,
    #[serde(rename = "cell-tolerance")]
    cell_tolerance: Option<f64>,
    exceptions: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialBatchConfig {
    #[serde(rename = "failure-policy")]
    failure_policy: Option<FailurePolicy>,
    #[serde(rename = "parallel-fetch")]
    parallel_fetch: Option<bool>,
    #[serde(rename = "dots-per-line")]
    dots_per_line: Option<usize>,
}

/// The configuration file, with every value optional.
///
/// Precedence, highest first: command-line flags (and `PDB_DIR` for the
/// storage root), `-S key=value` overrides, the file, built-in defaults.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    #[serde(rename = "storage-root")]
    storage_root: Option<PathBuf>,
    corpus: Option<PartialCorpusConfig>,
    comparison: Option<PartialComparisonConfig>,
    batch: Option<PartialBatchConfig>,
}

/// Everything a batch run needs, fully resolved.
#[derive(Debug)]
pub struct RunSettings {
    pub storage_root: PathBuf,
    pub corpus_path: PathBuf,
    pub comparison: ComparisonConfig,
    pub batch: BatchConfig,
}

#[derive(Debug)]
pub struct CheckSettings {
    pub storage_root: PathBuf,
    pub comparison: ComparisonConfig,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads `explicit` if given, else the default configuration file if it
    /// exists, else an empty configuration.
    pub fn load(explicit: Option<&Path>, data_manager: &DataManager) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let default_path = data_manager.default_config_file();
        if default_path.is_file() {
            info!("Using configuration file {:?}", default_path);
            return Self::from_file(&default_path);
        }
        debug!("No configuration file found, using built-in defaults.");
        Ok(Self::default())
    }

    pub fn merge_with_cli(
        mut self,
        args: &RunArgs,
        size: CorpusSize,
        cli_storage_root: Option<&Path>,
        data_manager: &DataManager,
    ) -> Result<RunSettings> {
        self.apply_set_values(&args.set_values)?;

        let corpus_config = self.corpus.take().unwrap_or_default();
        let corpus = match (&args.corpus, size) {
            (Some(path), _) => path.clone(),
            (None, CorpusSize::Large) => corpus_config
                .large
                .unwrap_or_else(|| PathBuf::from(LARGE_CORPUS)),
            (None, CorpusSize::VeryLarge) => corpus_config
                .very_large
                .unwrap_or_else(|| PathBuf::from(VERY_LARGE_CORPUS)),
        };
        let corpus_path = data_manager.resolve_corpus(&corpus);

        let batch_config = self.batch.take().unwrap_or_default();
        let failure_policy = if args.keep_going {
            FailurePolicy::Collect
        } else {
            batch_config.failure_policy.unwrap_or_default()
        };
        let mut builder = BatchConfigBuilder::new()
            .failure_policy(failure_policy)
            .parallel_fetch(args.parallel_fetch || batch_config.parallel_fetch.unwrap_or(false));
        if let Some(n) = batch_config.dots_per_line {
            builder = builder.dots_per_line(n);
        }
        let batch = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(RunSettings {
            storage_root: self.resolve_storage_root(cli_storage_root),
            corpus_path,
            comparison: self.comparison_config(args.exceptions.as_deref())?,
            batch,
        })
    }

    pub fn merge_with_check(
        mut self,
        args: &CheckArgs,
        cli_storage_root: Option<&Path>,
    ) -> Result<CheckSettings> {
        self.apply_set_values(&args.set_values)?;
        Ok(CheckSettings {
            storage_root: self.resolve_storage_root(cli_storage_root),
            comparison: self.comparison_config(args.exceptions.as_deref())?,
        })
    }

    /// Falls back to the system temporary directory, which the snapshot cache
    /// then refuses with a dedicated error.
    fn resolve_storage_root(&self, cli_value: Option<&Path>) -> PathBuf {
        cli_value
            .map(Path::to_path_buf)
            .or_else(|| self.storage_root.clone())
            .unwrap_or_else(std::env::temp_dir)
    }

    fn comparison_config(&self, exceptions_override: Option<&Path>) -> Result<ComparisonConfig> {
        let partial = self.comparison.clone().unwrap_or_default();
        let mut builder = ComparisonConfigBuilder::new();
        if let Some(tolerance) = partial.resolution_tolerance {
            builder = builder.resolution_tolerance(tolerance);
        }
        if let Some(tolerance) = partial.cell_tolerance {
            builder = builder.cell_tolerance(tolerance);
        }
        if let Some(path) = exceptions_override.or(partial.exceptions.as_deref()) {
            let table = ExceptionTable::load(path).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })?;
            info!("Loaded {} known exceptions from {:?}", table.len(), path);
            builder = builder.exceptions(table);
        }
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "storage-root" => self.storage_root = Some(PathBuf::from(value_str)),
                "corpus.large" => {
                    self.corpus.get_or_insert_with(Default::default).large =
                        Some(PathBuf::from(value_str));
                }
                "corpus.very-large" => {
                    self.corpus.get_or_insert_with(Default::default).very_large =
                        Some(PathBuf::from(value_str));
                }
                "comparison.resolution-tolerance" => {
                    self.comparison
                        .get_or_insert_with(Default::default)
                        .resolution_tolerance = Some(parse_value(key, value_str)?);
                }
                "comparison.cell-tolerance" => {
                    self.comparison
                        .get_or_insert_with(Default::default)
                        .cell_tolerance = Some(parse_value(key, value_str)?);
                }
                "comparison.exceptions" => {
                    self.comparison
                        .get_or_insert_with(Default::default)
                        .exceptions = Some(PathBuf::from(value_str));
                }
                "batch.failure-policy" => {
                    self.batch
                        .get_or_insert_with(Default::default)
                        .failure_policy = Some(parse_value(key, value_str)?);
                }
                "batch.parallel-fetch" => {
                    self.batch
                        .get_or_insert_with(Default::default)
                        .parallel_fetch = Some(parse_value(key, value_str)?);
                }
                "batch.dots-per-line" => {
                    self.batch
                        .get_or_insert_with(Default::default)
                        .dots_per_line = Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}
