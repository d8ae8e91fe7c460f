use super::chain::Chain;
use super::group::{Group, GroupType};
use super::header::PdbHeader;
use super::ids::{ChainId, GroupId};
use slotmap::SlotMap;
use std::collections::HashMap;

/// An in-memory macromolecular structure as produced by one file-format parser.
///
/// Chains and groups are stored in slot maps and referenced by stable keys.
/// Chains keep the order in which they appeared in the source file, and can
/// also be looked up by their author chain identifier.
#[derive(Debug, Clone)]
pub struct Structure {
    pub(crate) header: PdbHeader,
    pub(crate) nr_models: usize,
    pub(crate) biological_assembly: bool,
    pub(crate) chains: SlotMap<ChainId, Chain>,
    pub(crate) groups: SlotMap<GroupId, Group>,
    /// Chains in source-file order.
    pub(crate) chain_order: Vec<ChainId>,
    /// Lookup map from author chain identifier to chain key.
    pub(crate) chain_id_map: HashMap<String, ChainId>,
}

impl Structure {
    pub(crate) fn new(header: PdbHeader) -> Self {
        Self {
            header,
            nr_models: 1,
            biological_assembly: false,
            chains: SlotMap::with_key(),
            groups: SlotMap::with_key(),
            chain_order: Vec::new(),
            chain_id_map: HashMap::new(),
        }
    }

    pub fn header(&self) -> &PdbHeader {
        &self.header
    }

    /// The id code reported in the header, if any.
    pub fn pdb_code(&self) -> Option<&str> {
        self.header.id_code.as_deref()
    }

    pub fn nr_models(&self) -> usize {
        self.nr_models
    }

    pub fn is_nmr(&self) -> bool {
        self.header.is_nmr()
    }

    pub fn is_crystallographic(&self) -> bool {
        self.header.is_crystallographic()
    }

    pub fn is_biological_assembly(&self) -> bool {
        self.biological_assembly
    }

    pub fn chain_count(&self) -> usize {
        self.chain_order.len()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Iterates over the chains in source-file order.
    pub fn chains(&self) -> impl Iterator<Item = ChainView<'_>> {
        self.chain_order
            .iter()
            .filter_map(move |&key| self.chain_view(key))
    }

    /// Looks up a chain by its author chain identifier.
    pub fn chain_by_pdb_id(&self, chain_id: &str) -> Option<ChainView<'_>> {
        self.chain_id_map
            .get(chain_id)
            .and_then(|&key| self.chain_view(key))
    }

    fn chain_view(&self, key: ChainId) -> Option<ChainView<'_>> {
        self.chains.get(key).map(|chain| ChainView {
            parent: self,
            key,
            chain,
        })
    }
}

/// A chain borrowed together with its owning structure.
///
/// The structure reference is the chain's non-owning parent link; it is what
/// allows group keys to be resolved into groups.
#[derive(Debug, Clone, Copy)]
pub struct ChainView<'a> {
    parent: &'a Structure,
    key: ChainId,
    chain: &'a Chain,
}

impl<'a> ChainView<'a> {
    pub fn key(&self) -> ChainId {
        self.key
    }

    pub fn chain(&self) -> &'a Chain {
        self.chain
    }

    pub fn parent(&self) -> &'a Structure {
        self.parent
    }

    pub fn chain_id(&self) -> &'a str {
        &self.chain.chain_id
    }

    pub fn atom_length(&self) -> usize {
        self.chain.atom_length()
    }

    pub fn seqres_length(&self) -> usize {
        self.chain.seqres_length()
    }

    /// Observed groups that resolve in the parent structure.
    pub fn atom_groups(&self) -> impl Iterator<Item = &'a Group> + use<'a> {
        let parent = self.parent;
        self.chain
            .atom_groups
            .iter()
            .filter_map(move |&id| parent.group(id))
    }

    /// Sequence-derived groups that resolve in the parent structure.
    pub fn seqres_groups(&self) -> impl Iterator<Item = &'a Group> + use<'a> {
        let parent = self.parent;
        self.chain
            .seqres_groups
            .iter()
            .filter_map(move |&id| parent.group(id))
    }

    pub fn count_atom_groups(&self, group_type: GroupType) -> usize {
        self.atom_groups()
            .filter(|g| g.group_type == group_type)
            .count()
    }

    /// A chain is a polymer if its sequence contains at least one amino acid
    /// or nucleotide. Chains without any sequence fall back to their observed
    /// groups.
    pub fn is_polymer(&self) -> bool {
        if self.chain.seqres_groups.is_empty() {
            return self.atom_groups().any(|g| g.group_type.is_polymeric());
        }
        self.seqres_groups().any(|g| g.group_type.is_polymeric())
    }

    /// Returns `true` if every observed group points back at this chain.
    pub fn groups_reference_chain(&self) -> bool {
        self.atom_groups().all(|g| g.chain == self.key)
    }
}
