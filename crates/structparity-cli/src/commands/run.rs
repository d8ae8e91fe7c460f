use crate::cli::{CorpusSize, RunArgs};
use crate::config::PartialConfig;
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use crate::utils::report::write_report_to_path;
use std::path::Path;
use structparity::{
    core::io::{corpus::Corpus, snapshot::SnapshotCache},
    engine::{
        equivalence::EquivalenceEngine,
        progress::{Progress, ProgressReporter},
    },
    workflows,
};
use tracing::{info, warn};

pub async fn run(
    args: RunArgs,
    size: CorpusSize,
    config: PartialConfig,
    storage_root: Option<&Path>,
    data_manager: &DataManager,
) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let settings = config.merge_with_cli(&args, size, storage_root, data_manager)?;

    let cache = SnapshotCache::open(&settings.storage_root)?;
    info!("Loading corpus from {:?}", &settings.corpus_path);
    let corpus = Corpus::from_path(&settings.corpus_path)?;
    if corpus.is_empty() {
        warn!("Corpus '{}' lists no entries.", corpus.resource());
    }

    let engine = EquivalenceEngine::new(settings.comparison);
    let progress_handler = CliProgressHandler::new(args.progress, settings.batch.dots_per_line);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    reporter.report(Progress::Message(format!(
        "Reading records from {}",
        cache.root().display()
    )));
    info!("Invoking the batch comparison workflow...");

    let report = tokio::task::block_in_place(|| {
        workflows::batch::run(&corpus, &cache, &engine, &settings.batch, &reporter)
    })?;

    if let Some(path) = &args.report {
        write_report_to_path(&report, path).map_err(|source| CliError::Report {
            path: path.clone(),
            source,
        })?;
        println!("Report written to: {}", path.display());
    }

    println!(
        "{} of {} entries passed ({} known exceptions waived).",
        report.passed,
        report.total,
        report.waived.len()
    );

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::Failures {
            failed: report.failures.len(),
            total: report.total,
        })
    }
}
