//! Equivalence rules, grouped by the part of the record they inspect.
//!
//! Every rule funnels its result through a [`Checker`], which offers a
//! failing rule to the exception table before turning it into a mismatch.

pub mod chain;
pub mod header;
pub mod structure;

use super::exceptions::ExceptionTable;
use super::outcome::{Discrepancy, Field, Mismatch, Representation, Value, WaivedMismatch};
use crate::core::models::pdb_id::PdbId;
use tracing::info;

pub type RuleResult = Result<(), Mismatch>;

pub struct Checker<'a> {
    id: &'a PdbId,
    exceptions: &'a ExceptionTable,
    chain_id: Option<String>,
    waived: Vec<WaivedMismatch>,
}

impl<'a> Checker<'a> {
    pub fn new(id: &'a PdbId, exceptions: &'a ExceptionTable) -> Self {
        Self {
            id,
            exceptions,
            chain_id: None,
            waived: Vec::new(),
        }
    }

    pub fn id(&self) -> &PdbId {
        self.id
    }

    /// Scopes subsequent mismatches to `chain_id`, returning the previous scope.
    pub fn set_chain(&mut self, chain_id: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.chain_id, chain_id)
    }

    pub fn into_waived(self) -> Vec<WaivedMismatch> {
        self.waived
    }

    fn fail(&mut self, field: Field, discrepancy: Discrepancy) -> RuleResult {
        let mismatch = Mismatch {
            field,
            chain_id: self.chain_id.clone(),
            discrepancy,
        };

        match self
            .exceptions
            .lookup(self.id, field, self.chain_id.as_deref())
        {
            Some(exception) => {
                info!(
                    "Waived known exception for {} ({}): {}",
                    self.id, mismatch, exception.reason
                );
                self.waived.push(WaivedMismatch {
                    mismatch,
                    reason: exception.reason.clone(),
                });
                Ok(())
            }
            None => Err(mismatch),
        }
    }

    /// Both representations must report the same value.
    pub fn equal<T>(&mut self, field: Field, a: T, b: T) -> RuleResult
    where
        T: PartialEq + Into<Value>,
    {
        if a == b {
            return Ok(());
        }
        self.fail(
            field,
            Discrepancy::Differs {
                a: a.into(),
                b: b.into(),
            },
        )
    }

    /// Both representations must agree within an absolute tolerance.
    pub fn within(&mut self, field: Field, a: f64, b: f64, tolerance: f64) -> RuleResult {
        if (a - b).abs() <= tolerance {
            return Ok(());
        }
        self.fail(
            field,
            Discrepancy::Differs {
                a: Value::Float(a),
                b: Value::Float(b),
            },
        )
    }

    /// A single representation must carry a value.
    pub fn present<T>(&mut self, field: Field, rep: Representation, value: Option<T>) -> RuleResult {
        if value.is_some() {
            return Ok(());
        }
        self.violation(field, rep, Value::Absent, Value::Present)
    }

    /// Like [`Checker::present`], but blank text counts as absent.
    pub fn present_text(
        &mut self,
        field: Field,
        rep: Representation,
        value: Option<&str>,
    ) -> RuleResult {
        self.present(field, rep, value.filter(|s| !s.trim().is_empty()))
    }

    pub fn at_least(
        &mut self,
        field: Field,
        rep: Representation,
        actual: usize,
        minimum: usize,
    ) -> RuleResult {
        if actual >= minimum {
            return Ok(());
        }
        self.violation(field, rep, actual.into(), Value::AtLeast(as_i64(minimum)))
    }

    pub fn at_most(
        &mut self,
        field: Field,
        rep: Representation,
        actual: usize,
        maximum: usize,
    ) -> RuleResult {
        if actual <= maximum {
            return Ok(());
        }
        self.violation(field, rep, actual.into(), Value::AtMost(as_i64(maximum)))
    }

    /// A single-side constraint described by the observed and required values.
    pub fn holds(
        &mut self,
        field: Field,
        rep: Representation,
        condition: bool,
        actual: Value,
        expected: Value,
    ) -> RuleResult {
        if condition {
            return Ok(());
        }
        self.violation(field, rep, actual, expected)
    }

    fn violation(
        &mut self,
        field: Field,
        representation: Representation,
        actual: Value,
        expected: Value,
    ) -> RuleResult {
        self.fail(
            field,
            Discrepancy::Violates {
                representation,
                actual,
                expected,
            },
        )
    }
}

fn as_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::exceptions::KnownException;

    fn id() -> PdbId {
        "1abc".parse().unwrap()
    }

    #[test]
    fn within_accepts_values_inside_tolerance() {
        let id = id();
        let table = ExceptionTable::new();
        let mut checker = Checker::new(&id, &table);
        assert!(checker.within(Field::Resolution, 2.00, 2.01, 0.01).is_ok());
        let err = checker
            .within(Field::Resolution, 2.00, 2.50, 0.01)
            .unwrap_err();
        assert_eq!(
            err.discrepancy,
            Discrepancy::Differs {
                a: Value::Float(2.00),
                b: Value::Float(2.50)
            }
        );
    }

    #[test]
    fn at_least_reports_actual_and_bound() {
        let id = id();
        let table = ExceptionTable::new();
        let mut checker = Checker::new(&id, &table);
        let err = checker
            .at_least(Field::SeqResLength, Representation::A, 0, 1)
            .unwrap_err();
        assert_eq!(
            err.discrepancy,
            Discrepancy::Violates {
                representation: Representation::A,
                actual: Value::Int(0),
                expected: Value::AtLeast(1),
            }
        );
    }

    #[test]
    fn blank_text_is_not_present() {
        let id = id();
        let table = ExceptionTable::new();
        let mut checker = Checker::new(&id, &table);
        let rep = Representation::B;
        assert!(checker.present_text(Field::Title, rep, Some("Lysozyme")).is_ok());
        for blank in [Some(""), Some("   "), None] {
            let err = checker.present_text(Field::Title, rep, blank).unwrap_err();
            assert_eq!(
                err.discrepancy,
                Discrepancy::Violates {
                    representation: rep,
                    actual: Value::Absent,
                    expected: Value::Present,
                }
            );
        }
    }

    #[test]
    fn mismatches_carry_the_current_chain_scope() {
        let id = id();
        let table = ExceptionTable::new();
        let mut checker = Checker::new(&id, &table);
        assert_eq!(checker.set_chain(Some("B".to_string())), None);
        let err = checker.equal(Field::AtomLength, 3usize, 4usize).unwrap_err();
        assert_eq!(err.chain_id.as_deref(), Some("B"));
        assert_eq!(checker.set_chain(None), Some("B".to_string()));
    }

    #[test]
    fn known_exceptions_waive_failures_and_are_recorded() {
        let id = id();
        let mut table = ExceptionTable::new();
        table.insert(KnownException {
            pdb_id: id.clone(),
            field: Field::Classification,
            chain_id: None,
            reason: "classification missing in PDB header".to_string(),
        });
        let mut checker = Checker::new(&id, &table);

        assert!(
            checker
                .present(Field::Classification, Representation::A, None::<&str>)
                .is_ok()
        );
        assert!(
            checker
                .present(Field::Authors, Representation::A, None::<&str>)
                .is_err()
        );

        let waived = checker.into_waived();
        assert_eq!(waived.len(), 1);
        assert_eq!(waived[0].mismatch.field, Field::Classification);
        assert_eq!(waived[0].reason, "classification missing in PDB header");
    }
}
