use super::config::ComparisonConfig;
use super::outcome::Verdict;
use super::rules::{self, Checker, RuleResult};
use crate::core::models::pdb_id::PdbId;
use crate::core::models::structure::{ChainView, Structure};
use tracing::{debug, instrument};

/// Decides whether two structures describe the same entry.
///
/// Rules run in a fixed order (structure predicates, header, chains) and the
/// first failure that no known exception waives ends the comparison.
#[derive(Debug, Clone, Default)]
pub struct EquivalenceEngine {
    config: ComparisonConfig,
}

impl EquivalenceEngine {
    pub fn new(config: ComparisonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    #[instrument(skip_all, fields(id = %id))]
    pub fn compare(&self, id: &PdbId, a: &Structure, b: &Structure) -> Verdict {
        self.evaluate(id, |checker| {
            rules::structure::check(checker, a, b)?;
            rules::header::check(checker, a.header(), b.header(), &self.config.tolerances)?;
            rules::chain::check(checker, a, b)
        })
    }

    /// Compares a single pair of chains taken from the two records of `id`.
    pub fn compare_chain(&self, id: &PdbId, a: ChainView<'_>, b: ChainView<'_>) -> Verdict {
        self.evaluate(id, |checker| rules::chain::check_pair(checker, a, b))
    }

    fn evaluate<F>(&self, id: &PdbId, run_rules: F) -> Verdict
    where
        F: FnOnce(&mut Checker) -> RuleResult,
    {
        let mut checker = Checker::new(id, &self.config.exceptions);
        let result = run_rules(&mut checker);
        if let Err(mismatch) = &result {
            debug!("{} {}", id, mismatch);
        }
        Verdict {
            outcome: result.into(),
            waived: checker.into_waived(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ComparisonConfigBuilder;
    use crate::engine::exceptions::{ExceptionTable, KnownException};
    use crate::engine::fixtures::EntryFixture;
    use crate::engine::outcome::{ComparisonOutcome, Discrepancy, Field, Representation, Value};

    fn id() -> PdbId {
        "1abc".parse().unwrap()
    }

    fn engine() -> EquivalenceEngine {
        EquivalenceEngine::default()
    }

    #[test]
    fn equivalent_records_pass_within_resolution_tolerance() {
        let a = EntryFixture::xray();
        let mut b = EntryFixture::xray();
        b.header.resolution = 2.01;

        let verdict = engine().compare(&id(), &a.build(), &b.build());
        assert_eq!(verdict.outcome, ComparisonOutcome::Pass);
        assert!(verdict.waived.is_empty());
    }

    #[test]
    fn resolution_outside_tolerance_fails() {
        let a = EntryFixture::xray();
        let mut b = EntryFixture::xray();
        b.header.resolution = 2.50;

        let verdict = engine().compare(&id(), &a.build(), &b.build());
        let mismatch = verdict.outcome.mismatch().unwrap();
        assert_eq!(mismatch.field, Field::Resolution);
        assert_eq!(
            mismatch.discrepancy,
            Discrepancy::Differs {
                a: Value::Float(2.00),
                b: Value::Float(2.50)
            }
        );
    }

    #[test]
    fn structure_predicates_run_before_header_rules() {
        let a = EntryFixture::xray();
        let mut b = EntryFixture::xray();
        b.nr_models = 2;
        b.header.resolution = 2.50;

        let verdict = engine().compare(&id(), &a.build(), &b.build());
        assert_eq!(verdict.outcome.mismatch().unwrap().field, Field::NrModels);
    }

    #[test]
    fn polymer_chain_with_empty_sequence_fails_for_that_chain() {
        let mut a = EntryFixture::xray();
        a.chain_mut("A").seqres = 0;
        let b = a.clone();

        let verdict = engine().compare(&id(), &a.build(), &b.build());
        let mismatch = verdict.outcome.mismatch().unwrap();
        assert_eq!(mismatch.field, Field::SeqResLength);
        assert_eq!(mismatch.chain_id.as_deref(), Some("A"));
        assert_eq!(
            mismatch.discrepancy,
            Discrepancy::Violates {
                representation: Representation::A,
                actual: Value::Int(0),
                expected: Value::AtLeast(1),
            }
        );
    }

    #[test]
    fn nmr_ensembles_compare_equal() {
        let entry = EntryFixture::nmr();
        let verdict = engine().compare(&id(), &entry.build(), &entry.build());
        assert!(verdict.is_pass());
    }

    #[test]
    fn waived_mismatches_are_recorded_and_evaluation_continues() {
        let a = EntryFixture::xray();
        let mut b = EntryFixture::xray();
        b.header.resolution = 2.50;
        b.chain_mut("W").hetatm = 3;

        let mut exceptions = ExceptionTable::new();
        exceptions.insert(KnownException {
            pdb_id: id(),
            field: Field::Resolution,
            chain_id: None,
            reason: "resolution rounded in PDB header".to_string(),
        });
        let config = ComparisonConfigBuilder::new()
            .exceptions(exceptions)
            .build()
            .unwrap();

        let verdict = EquivalenceEngine::new(config).compare(&id(), &a.build(), &b.build());
        assert_eq!(verdict.waived.len(), 1);
        assert_eq!(verdict.waived[0].mismatch.field, Field::Resolution);

        let mismatch = verdict.outcome.mismatch().unwrap();
        assert_eq!(mismatch.field, Field::AtomLength);
        assert_eq!(mismatch.chain_id.as_deref(), Some("W"));
    }

    #[test]
    fn exceptions_for_other_entries_do_not_apply() {
        let a = EntryFixture::xray();
        let mut b = EntryFixture::xray();
        b.header.resolution = 2.50;

        let mut exceptions = ExceptionTable::new();
        exceptions.insert(KnownException {
            pdb_id: "9xyz".parse().unwrap(),
            field: Field::Resolution,
            chain_id: None,
            reason: "unrelated".to_string(),
        });
        let config = ComparisonConfigBuilder::new()
            .exceptions(exceptions)
            .build()
            .unwrap();

        let verdict = EquivalenceEngine::new(config).compare(&id(), &a.build(), &b.build());
        assert!(!verdict.is_pass());
        assert!(verdict.waived.is_empty());
    }

    #[test]
    fn compare_chain_checks_a_single_pair() {
        let a = EntryFixture::xray().build();
        let mut fixture = EntryFixture::xray();
        fixture.chain_mut("W").hetatm = 1;
        let b = fixture.build();

        let engine = engine();
        let chain_a = |id: &str| a.chain_by_pdb_id(id).unwrap();
        let chain_b = |id: &str| b.chain_by_pdb_id(id).unwrap();

        assert!(engine.compare_chain(&id(), chain_a("A"), chain_b("A")).is_pass());
        let verdict = engine.compare_chain(&id(), chain_a("W"), chain_b("W"));
        let mismatch = verdict.outcome.mismatch().unwrap();
        assert_eq!(mismatch.field, Field::AtomLength);
        assert_eq!(mismatch.chain_id.as_deref(), Some("W"));
    }
}
