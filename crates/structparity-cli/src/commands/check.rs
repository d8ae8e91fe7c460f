use crate::cli::{CheckArgs, ProgressMode};
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use std::path::Path;
use structparity::{
    core::io::{
        snapshot::SnapshotCache,
        source::{RecordFormat, RecordSource},
    },
    core::models::pdb_id::PdbId,
    engine::{
        equivalence::EquivalenceEngine,
        error::BatchError,
        outcome::ComparisonOutcome,
        progress::{Progress, ProgressReporter},
    },
};
use tracing::info;

/// Compares a single entry and prints the verdict, including any waived
/// mismatches.
pub async fn run(
    args: CheckArgs,
    config: PartialConfig,
    storage_root: Option<&Path>,
) -> Result<()> {
    let id: PdbId = args
        .id
        .parse()
        .map_err(|e| CliError::Argument(format!("{}", e)))?;

    let settings = config.merge_with_check(&args, storage_root)?;
    let cache = SnapshotCache::open(&settings.storage_root)?;
    let engine = EquivalenceEngine::new(settings.comparison);

    let progress_handler = CliProgressHandler::new(ProgressMode::Dots, 1);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Fetching both records of {}...", id);
    let fetch = |format: RecordFormat| {
        cache
            .fetch(&id, format)
            .map_err(|source| BatchError::Fetch {
                id: id.clone(),
                format,
                source,
            })
    };
    let a = fetch(RecordFormat::Pdb)?;
    let b = fetch(RecordFormat::MmCif)?;

    let verdict = tokio::task::block_in_place(|| engine.compare(&id, &a, &b));

    for waived in verdict.waived {
        reporter.report(Progress::Waived {
            id: id.clone(),
            mismatch: waived.mismatch,
            reason: waived.reason,
        });
    }

    match verdict.outcome {
        ComparisonOutcome::Pass => {
            println!("{}: the PDB and mmCIF records are equivalent.", id);
            Ok(())
        }
        ComparisonOutcome::Fail(mismatch) => {
            reporter.report(Progress::Mismatch {
                id: id.clone(),
                mismatch: mismatch.clone(),
            });
            Err(BatchError::Mismatch {
                id,
                mismatch: Box::new(mismatch),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::commands::test_support::{SNAPSHOT, write_entry, write_snapshot};
    use clap::Parser;
    use std::fs;
    use structparity::core::io::source::FetchError;
    use structparity::engine::outcome::Field;
    use tempfile::tempdir;

    fn check_args(argv: &[&str]) -> CheckArgs {
        let mut full = vec!["structparity", "check"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Check(args) => args,
            other => panic!("Expected 'check' subcommand, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn equivalent_entry_passes() {
        let dir = tempdir().unwrap();
        write_entry(dir.path(), "1abc");
        let result = run(
            check_args(&["1ABC"]),
            PartialConfig::default(),
            Some(dir.path()),
        )
        .await;
        assert!(result.is_ok(), "{:?}", result);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn invalid_identifier_is_an_argument_error() {
        let dir = tempdir().unwrap();
        let result = run(
            check_args(&["abcd"]),
            PartialConfig::default(),
            Some(dir.path()),
        )
        .await;
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_record_names_the_format() {
        let dir = tempdir().unwrap();
        write_snapshot(dir.path(), "1abc", RecordFormat::Pdb, SNAPSHOT);
        let result = run(
            check_args(&["1abc"]),
            PartialConfig::default(),
            Some(dir.path()),
        )
        .await;
        assert!(matches!(
            result,
            Err(CliError::Batch(BatchError::Fetch {
                format: RecordFormat::MmCif,
                source: FetchError::NotFound { .. },
                ..
            }))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn known_exception_turns_mismatch_into_pass() {
        let dir = tempdir().unwrap();
        write_snapshot(dir.path(), "1abc", RecordFormat::Pdb, SNAPSHOT);
        write_snapshot(
            dir.path(),
            "1abc",
            RecordFormat::MmCif,
            &SNAPSHOT.replace("1999-01-15", "1999-01-16"),
        );

        let result = run(
            check_args(&["1abc"]),
            PartialConfig::default(),
            Some(dir.path()),
        )
        .await;
        match result {
            Err(CliError::Batch(BatchError::Mismatch { mismatch, .. })) => {
                assert_eq!(mismatch.field, Field::DepDate)
            }
            other => panic!("Expected a deposition date mismatch, got {:?}", other),
        }

        let table = dir.path().join("exceptions.csv");
        fs::write(
            &table,
            "pdb_id,field,chain,reason\n1abc,dep-date,,date corrected in the mmCIF release\n",
        )
        .unwrap();
        let args = check_args(&["1abc", "--exceptions", table.to_str().unwrap()]);
        let result = run(args, PartialConfig::default(), Some(dir.path())).await;
        assert!(result.is_ok(), "{:?}", result);
    }
}
