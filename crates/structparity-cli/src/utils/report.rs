use serde::Serialize;
use std::io::Write;
use std::path::Path;
use structparity::engine::outcome::{Discrepancy, Mismatch, Representation};
use structparity::workflows::batch::{BatchReport, FailureKind};

const HEADER: [&str; 7] = [
    "pdb_id",
    "status",
    "field",
    "chain",
    "representation_a",
    "representation_b",
    "note",
];

#[derive(Debug, Serialize, PartialEq)]
struct ReportRow<'a> {
    pdb_id: &'a str,
    status: &'static str,
    field: String,
    chain: String,
    representation_a: String,
    representation_b: String,
    note: String,
}

impl<'a> ReportRow<'a> {
    fn from_mismatch(
        pdb_id: &'a str,
        status: &'static str,
        mismatch: &Mismatch,
        note: String,
    ) -> Self {
        let (representation_a, representation_b) = match &mismatch.discrepancy {
            Discrepancy::Differs { a, b } => (a.to_string(), b.to_string()),
            Discrepancy::Violates {
                representation,
                actual,
                expected,
            } => {
                let cell = format!("{} (expected {})", actual, expected);
                match representation {
                    Representation::A => (cell, String::new()),
                    Representation::B => (String::new(), cell),
                }
            }
        };
        Self {
            pdb_id,
            status,
            field: mismatch.field.to_string(),
            chain: mismatch.chain_id.clone().unwrap_or_default(),
            representation_a,
            representation_b,
            note,
        }
    }
}

/// Writes one CSV row per failed or waived entry of `report`.
pub fn write_report<W: Write>(report: &BatchReport, writer: W) -> csv::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for failure in &report.failures {
        let row = match &failure.kind {
            FailureKind::Mismatch(mismatch) => {
                ReportRow::from_mismatch(failure.id.as_str(), "mismatch", mismatch, String::new())
            }
            FailureKind::Fetch { format, message } => ReportRow {
                pdb_id: failure.id.as_str(),
                status: "fetch-error",
                field: String::new(),
                chain: String::new(),
                representation_a: String::new(),
                representation_b: String::new(),
                note: format!("{}: {}", format, message),
            },
        };
        csv_writer.serialize(row)?;
    }

    for entry in &report.waived {
        csv_writer.serialize(ReportRow::from_mismatch(
            entry.id.as_str(),
            "waived",
            &entry.waived.mismatch,
            entry.waived.reason.clone(),
        ))?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_report_to_path(report: &BatchReport, path: &Path) -> csv::Result<()> {
    let file = std::fs::File::create(path)?;
    write_report(report, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use structparity::core::io::source::RecordFormat;
    use structparity::engine::outcome::{Field, Value, WaivedMismatch};
    use structparity::workflows::batch::{EntryFailure, WaivedEntry};

    fn report() -> BatchReport {
        BatchReport {
            total: 4,
            passed: 1,
            failures: vec![
                EntryFailure {
                    id: "2bad".parse().unwrap(),
                    kind: FailureKind::Mismatch(Mismatch {
                        field: Field::Resolution,
                        chain_id: None,
                        discrepancy: Discrepancy::Differs {
                            a: Value::Float(2.0),
                            b: Value::Float(2.5),
                        },
                    }),
                },
                EntryFailure {
                    id: "3mis".parse().unwrap(),
                    kind: FailureKind::Fetch {
                        format: RecordFormat::MmCif,
                        message: "missing".to_string(),
                    },
                },
            ],
            waived: vec![WaivedEntry {
                id: "4wav".parse().unwrap(),
                waived: WaivedMismatch {
                    mismatch: Mismatch {
                        field: Field::ChainIdLength,
                        chain_id: Some("AB".to_string()),
                        discrepancy: Discrepancy::Violates {
                            representation: Representation::A,
                            actual: Value::Int(2),
                            expected: Value::Int(1),
                        },
                    },
                    reason: "two-letter chain".to_string(),
                },
            }],
            elapsed: Duration::from_secs(1),
            last_attempted: "4wav".parse().ok(),
        }
    }

    #[test]
    fn report_lists_failures_then_waivers() {
        let mut buffer = Vec::new();
        write_report(&report(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "pdb_id,status,field,chain,representation_a,representation_b,note",
                "2bad,mismatch,resolution,,2,2.5,",
                "3mis,fetch-error,,,,,mmcif: missing",
                "4wav,waived,chain-id-length,AB,2 (expected 1),,two-letter chain",
            ]
        );
    }

    #[test]
    fn successful_run_writes_header_only() {
        let mut empty = report();
        empty.failures.clear();
        empty.waived.clear();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_report_to_path(&empty, &path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "pdb_id,status,field,chain,representation_a,representation_b,note\n"
        );
    }
}
