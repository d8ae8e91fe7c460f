use crate::error::{CliError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.toml";
const CORPUS_DIR_NAME: &str = "corpora";

pub const LARGE_CORPUS: &str = "random_1000_set.list";
pub const VERY_LARGE_CORPUS: &str = "random_10000_set.list";

/// Locates the files the CLI reads by default: the configuration file and
/// the bundled corpus lists.
#[derive(Debug, Clone)]
pub struct DataManager {
    data_dir: PathBuf,
    config_dir: PathBuf,
}

impl DataManager {
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("org", "structparity", "structparity").ok_or_else(|| {
            CliError::Config("Could not determine the platform data directories.".to_string())
        })?;
        let manager = Self {
            data_dir: dirs.data_dir().to_path_buf(),
            config_dir: dirs.config_dir().to_path_buf(),
        };
        debug!(
            "DataManager initialized with data dir {:?} and config dir {:?}",
            manager.data_dir, manager.config_dir
        );
        Ok(manager)
    }

    pub fn with_paths(data_dir: PathBuf, config_dir: PathBuf) -> Self {
        Self {
            data_dir,
            config_dir,
        }
    }

    pub fn default_config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Resolves a corpus given either as a path or as a bare file name.
    ///
    /// Bare names are looked up in the `corpora` directory of the data dir.
    pub fn resolve_corpus(&self, name_or_path: &Path) -> PathBuf {
        if name_or_path.is_absolute() || name_or_path.components().count() > 1 {
            return name_or_path.to_path_buf();
        }
        self.data_dir.join(CORPUS_DIR_NAME).join(name_or_path)
    }
}
