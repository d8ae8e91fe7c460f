use super::{Checker, RuleResult};
use crate::core::models::group::GroupType;
use crate::core::models::structure::{ChainView, Structure};
use crate::engine::outcome::{Discrepancy, Field, Representation, Value};

const MAX_INTERNAL_CHAIN_ID_LENGTH: usize = 4;

/// Pairs the chains of both records by author chain id, in the order of the
/// first representation, and checks every pair.
pub fn check(checker: &mut Checker, a: &Structure, b: &Structure) -> RuleResult {
    checker.equal(Field::ChainCount, a.chain_count(), b.chain_count())?;

    for chain_a in a.chains() {
        let Some(chain_b) = b.chain_by_pdb_id(chain_a.chain_id()) else {
            let previous = checker.set_chain(Some(chain_a.chain_id().to_string()));
            let result = checker.fail(
                Field::ChainPresence,
                Discrepancy::Differs {
                    a: Value::Present,
                    b: Value::Absent,
                },
            );
            checker.set_chain(previous);
            result?;
            continue;
        };
        check_pair(checker, chain_a, chain_b)?;
    }
    Ok(())
}

/// Checks a single pair of chains, scoping any mismatch to the chain id of
/// the first representation.
pub fn check_pair(checker: &mut Checker, a: ChainView<'_>, b: ChainView<'_>) -> RuleResult {
    let previous = checker.set_chain(Some(a.chain_id().to_string()));
    let result = check_pair_rules(checker, a, b);
    checker.set_chain(previous);
    result
}

fn check_pair_rules(checker: &mut Checker, a: ChainView<'_>, b: ChainView<'_>) -> RuleResult {
    use Representation::{A, B};

    checker.equal(Field::ChainId, a.chain_id(), b.chain_id())?;
    for (rep, chain) in [(A, a), (B, b)] {
        let length = chain.chain_id().chars().count();
        checker.holds(
            Field::ChainIdLength,
            rep,
            length == 1,
            length.into(),
            Value::Int(1),
        )?;
    }

    let internal_id = b.chain().internal_chain_id.as_deref();
    checker.present(Field::InternalChainId, B, internal_id)?;
    if let Some(internal_id) = internal_id {
        checker.at_most(
            Field::InternalChainId,
            B,
            internal_id.chars().count(),
            MAX_INTERNAL_CHAIN_ID_LENGTH,
        )?;
    }

    // The mmCIF side may lack compound metadata for polymers.
    let is_polymer = a.is_polymer();
    if is_polymer {
        checker.present(Field::Compound, A, a.chain().compound.as_ref())?;
    }

    for (rep, chain) in [(A, a), (B, b)] {
        let linked = chain.groups_reference_chain();
        checker.holds(
            Field::Parent,
            rep,
            linked,
            Value::Bool(linked),
            Value::Bool(true),
        )?;
    }

    checker.equal(Field::AtomLength, a.atom_length(), b.atom_length())?;
    checker.equal(
        Field::AminoAcidCount,
        a.count_atom_groups(GroupType::AminoAcid),
        b.count_atom_groups(GroupType::AminoAcid),
    )?;
    checker.at_least(Field::AtomLengthMin, A, a.atom_length(), 1)?;
    if is_polymer {
        checker.at_least(Field::SeqResLength, A, a.seqres_length(), 1)?;
    }

    for (rep, chain) in [(A, a), (B, b)] {
        let resolved = chain.atom_groups().count();
        checker.holds(
            Field::AtomGroupsSize,
            rep,
            resolved == chain.atom_length(),
            resolved.into(),
            chain.atom_length().into(),
        )?;
    }

    let sum_a = group_type_sum(a);
    let sum_b = group_type_sum(b);
    checker.equal(Field::GroupTypeSum, sum_a, sum_b)?;
    checker.holds(
        Field::GroupTypeSumVsAtomLength,
        A,
        sum_a == a.atom_length(),
        sum_a.into(),
        a.atom_length().into(),
    )
}

fn group_type_sum(chain: ChainView<'_>) -> usize {
    chain.count_atom_groups(GroupType::AminoAcid)
        + chain.count_atom_groups(GroupType::Hetatm)
        + chain.count_atom_groups(GroupType::Nucleotide)
}
