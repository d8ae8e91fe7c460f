use super::{Checker, RuleResult};
use crate::core::models::header::{DEFAULT_RESOLUTION, PdbHeader};
use crate::engine::config::Tolerances;
use crate::engine::outcome::{Field, Representation, Value};
use tracing::debug;

const MIN_AUTHORS_LENGTH: usize = 2;

pub fn check(
    checker: &mut Checker,
    a: &PdbHeader,
    b: &PdbHeader,
    tolerances: &Tolerances,
) -> RuleResult {
    use Representation::{A, B};

    checker.equal(Field::IdCode, a.id_code.as_deref(), b.id_code.as_deref())?;

    // Author lists are punctuated differently by the two formats.
    for (rep, authors) in [(A, a.authors.as_deref()), (B, b.authors.as_deref())] {
        checker.present_text(Field::Authors, rep, authors)?;
        if let Some(authors) = authors {
            checker.at_least(
                Field::Authors,
                rep,
                authors.chars().count(),
                MIN_AUTHORS_LENGTH,
            )?;
        }
    }

    checker.present_text(Field::Classification, A, a.classification.as_deref())?;
    checker.present_text(Field::Classification, B, b.classification.as_deref())?;
    checker.present_text(Field::Description, B, b.description.as_deref())?;

    checker.equal(Field::DepDate, a.dep_date, b.dep_date)?;
    checker.equal(Field::ModDate, a.mod_date, b.mod_date)?;

    checker.at_least(
        Field::ExperimentalTechniques,
        A,
        a.experimental_techniques.len(),
        1,
    )?;
    checker.equal(
        Field::ExperimentalTechniques,
        a.experimental_techniques.clone(),
        b.experimental_techniques.clone(),
    )?;

    if a.is_electron_based() {
        debug!(
            "Skipping resolution check for {}: electron-based technique.",
            checker.id()
        );
    } else {
        checker.within(
            Field::Resolution,
            a.resolution,
            b.resolution,
            tolerances.resolution,
        )?;
    }

    checker.present_text(Field::Title, A, a.title.as_deref())?;
    checker.present_text(Field::Title, B, b.title.as_deref())?;
    if let (Some(title_a), Some(title_b)) = (&a.title, &b.title) {
        if normalize_title(title_a) != normalize_title(title_b) {
            checker.equal(Field::Title, title_a.as_str(), title_b.as_str())?;
        }
    }

    if a.is_nmr() {
        let within = (a.resolution - DEFAULT_RESOLUTION).abs() <= tolerances.resolution;
        checker.holds(
            Field::NmrResolution,
            A,
            within,
            Value::Float(a.resolution),
            Value::Float(DEFAULT_RESOLUTION),
        )?;
    }

    if a.is_crystallographic() {
        check_crystallographic_info(checker, a, b, tolerances)?;
    }
    Ok(())
}

fn check_crystallographic_info(
    checker: &mut Checker,
    a: &PdbHeader,
    b: &PdbHeader,
    tolerances: &Tolerances,
) -> RuleResult {
    use Representation::{A, B};

    let info_a = a.crystallographic_info.as_ref();
    let info_b = b.crystallographic_info.as_ref();
    checker.present(Field::CrystallographicInfo, A, info_a)?;
    checker.present(Field::CrystallographicInfo, B, info_b)?;

    let space_group_a = info_a.and_then(|i| i.space_group.as_ref());
    let space_group_b = info_b.and_then(|i| i.space_group.as_ref());
    checker.present(Field::SpaceGroup, A, space_group_a)?;
    checker.present(Field::SpaceGroup, B, space_group_b)?;

    let cell_a = info_a.and_then(|i| i.cell.as_ref());
    let cell_b = info_b.and_then(|i| i.cell.as_ref());
    checker.present(Field::CrystalCell, A, cell_a)?;
    checker.present(Field::CrystalCell, B, cell_b)?;

    // Only reachable without both cells when the missing ones were waived.
    let (Some(cell_a), Some(cell_b)) = (cell_a, cell_b) else {
        return Ok(());
    };
    let tol = tolerances.cell;
    checker.within(Field::CellA, cell_a.a, cell_b.a, tol)?;
    checker.within(Field::CellB, cell_a.b, cell_b.b, tol)?;
    checker.within(Field::CellC, cell_a.c, cell_b.c, tol)?;
    checker.within(Field::CellAlpha, cell_a.alpha, cell_b.alpha, tol)?;
    checker.within(Field::CellBeta, cell_a.beta, cell_b.beta, tol)?;
    checker.within(Field::CellGamma, cell_a.gamma, cell_b.gamma, tol)
}

/// Lower-cases a title and drops its spaces; PDB line wrapping does not
/// preserve them.
fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}
