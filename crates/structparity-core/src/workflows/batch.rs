use crate::core::io::corpus::Corpus;
use crate::core::io::source::{FetchError, RecordFormat, RecordSource};
use crate::core::models::pdb_id::PdbId;
use crate::core::models::structure::Structure;
use crate::engine::config::{BatchConfig, FailurePolicy};
use crate::engine::equivalence::EquivalenceEngine;
use crate::engine::error::BatchError;
use crate::engine::outcome::{ComparisonOutcome, Mismatch, WaivedMismatch};
use crate::engine::progress::{Progress, ProgressReporter};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
    Fetch { format: RecordFormat, message: String },
    Mismatch(Mismatch),
}

/// An entry that failed under the collect policy.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFailure {
    pub id: PdbId,
    pub kind: FailureKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaivedEntry {
    pub id: PdbId,
    pub waived: WaivedMismatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub total: usize,
    pub passed: usize,
    pub failures: Vec<EntryFailure>,
    pub waived: Vec<WaivedEntry>,
    pub elapsed: Duration,
    pub last_attempted: Option<PdbId>,
}

impl BatchReport {
    fn new(total: usize) -> Self {
        Self {
            total,
            passed: 0,
            failures: Vec::new(),
            waived: Vec::new(),
            elapsed: Duration::ZERO,
            last_attempted: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compares every entry of `corpus`, in order, reading both records of an
/// entry from `source`.
///
/// Under [`FailurePolicy::Abort`] the first entry that cannot be fetched or
/// does not match ends the run with an error. The last attempted identifier is
/// reported through `reporter` either way.
#[instrument(skip_all, name = "batch_workflow", fields(corpus = corpus.resource()))]
pub fn run<S>(
    corpus: &Corpus,
    source: &S,
    engine: &EquivalenceEngine,
    config: &BatchConfig,
    reporter: &ProgressReporter,
) -> Result<BatchReport, BatchError>
where
    S: RecordSource + Sync + ?Sized,
{
    let start = Instant::now();
    let mut report = BatchReport::new(corpus.len());

    reporter.report(Progress::BatchStart {
        total: corpus.len() as u64,
    });
    reporter.report(Progress::Message(format!(
        "Comparing {} entries from {}",
        corpus.len(),
        corpus.resource()
    )));
    info!(
        "Comparing {} entries from '{}' (policy: {}).",
        corpus.len(),
        corpus.resource(),
        config.failure_policy
    );

    let result = run_entries(corpus, source, engine, config, reporter, &mut report);
    report.elapsed = start.elapsed();

    reporter.report(Progress::LastAttempted {
        id: report.last_attempted.clone(),
    });
    if let Some(id) = &report.last_attempted {
        info!("Last tested PDB entry was: {}", id);
    }

    match result {
        Ok(()) => {
            reporter.report(Progress::BatchFinish {
                elapsed: report.elapsed,
            });
            info!(
                "Batch finished: {}/{} passed, {} failed, {} waived.",
                report.passed,
                report.total,
                report.failures.len(),
                report.waived.len()
            );
            Ok(report)
        }
        Err(e) => {
            warn!("Batch aborted: {}", e);
            Err(e)
        }
    }
}

fn run_entries<S>(
    corpus: &Corpus,
    source: &S,
    engine: &EquivalenceEngine,
    config: &BatchConfig,
    reporter: &ProgressReporter,
    report: &mut BatchReport,
) -> Result<(), BatchError>
where
    S: RecordSource + Sync + ?Sized,
{
    for id in corpus.ids() {
        report.last_attempted = Some(id.clone());
        reporter.report(Progress::EntryStart { id: id.clone() });

        let (a, b) = match fetch_pair(source, id, config.parallel_fetch) {
            Ok(pair) => pair,
            Err((format, source_err)) => {
                reporter.report(Progress::FetchFailed {
                    id: id.clone(),
                    format,
                    message: source_err.to_string(),
                });
                match config.failure_policy {
                    FailurePolicy::Abort => {
                        reporter.report(Progress::EntryFinish);
                        return Err(BatchError::Fetch {
                            id: id.clone(),
                            format,
                            source: source_err,
                        });
                    }
                    FailurePolicy::Collect => {
                        report.failures.push(EntryFailure {
                            id: id.clone(),
                            kind: FailureKind::Fetch {
                                format,
                                message: source_err.to_string(),
                            },
                        });
                        reporter.report(Progress::EntryFinish);
                        continue;
                    }
                }
            }
        };

        let verdict = engine.compare(id, &a, &b);
        for waived in verdict.waived {
            reporter.report(Progress::Waived {
                id: id.clone(),
                mismatch: waived.mismatch.clone(),
                reason: waived.reason.clone(),
            });
            report.waived.push(WaivedEntry {
                id: id.clone(),
                waived,
            });
        }

        match verdict.outcome {
            ComparisonOutcome::Pass => report.passed += 1,
            ComparisonOutcome::Fail(mismatch) => {
                reporter.report(Progress::Mismatch {
                    id: id.clone(),
                    mismatch: mismatch.clone(),
                });
                match config.failure_policy {
                    FailurePolicy::Abort => {
                        reporter.report(Progress::EntryFinish);
                        return Err(BatchError::Mismatch {
                            id: id.clone(),
                            mismatch: Box::new(mismatch),
                        });
                    }
                    FailurePolicy::Collect => report.failures.push(EntryFailure {
                        id: id.clone(),
                        kind: FailureKind::Mismatch(mismatch),
                    }),
                }
            }
        }
        reporter.report(Progress::EntryFinish);
    }
    Ok(())
}

/// Fetches the PDB record, then the mmCIF record, of one entry. When
/// `parallel` is set both are read at once; an error on the PDB side still
/// takes precedence.
fn fetch_pair<S>(
    source: &S,
    id: &PdbId,
    parallel: bool,
) -> Result<(Structure, Structure), (RecordFormat, FetchError)>
where
    S: RecordSource + Sync + ?Sized,
{
    let fetch = |format: RecordFormat| source.fetch(id, format).map_err(|e| (format, e));

    if parallel {
        let (a, b) = rayon::join(|| fetch(RecordFormat::Pdb), || fetch(RecordFormat::MmCif));
        Ok((a?, b?))
    } else {
        let a = fetch(RecordFormat::Pdb)?;
        let b = fetch(RecordFormat::MmCif)?;
        Ok((a, b))
    }
}
