use super::{Checker, RuleResult};
use crate::core::models::structure::Structure;
use crate::engine::outcome::{Field, Representation, Value};

/// Whole-record predicates. Both records must describe the asymmetric unit.
pub fn check(checker: &mut Checker, a: &Structure, b: &Structure) -> RuleResult {
    checker.equal(Field::IsNmr, a.is_nmr(), b.is_nmr())?;
    checker.equal(
        Field::IsCrystallographic,
        a.is_crystallographic(),
        b.is_crystallographic(),
    )?;
    checker.equal(Field::NrModels, a.nr_models(), b.nr_models())?;
    checker.equal(Field::PdbCode, a.pdb_code(), b.pdb_code())?;

    for (rep, structure) in [(Representation::A, a), (Representation::B, b)] {
        let is_assembly = structure.is_biological_assembly();
        checker.holds(
            Field::BiologicalAssembly,
            rep,
            !is_assembly,
            Value::Bool(is_assembly),
            Value::Bool(false),
        )?;
    }
    Ok(())
}
