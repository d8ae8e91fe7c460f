use super::ids::GroupId;
use serde::Deserialize;

/// Header-level description of the macromolecule a chain belongs to
/// (the PDB `COMPND` record, or the mmCIF `entity` category).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Compound {
    pub mol_id: u32,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub chain_id: String,                  // Author chain identifier (e.g., "A")
    pub internal_chain_id: Option<String>, // Format-specific label (mmCIF `label_asym_id`)
    pub compound: Option<Compound>,        // Compound metadata, if the parser produced it
    pub(crate) atom_groups: Vec<GroupId>,  // Observed groups, in file order
    pub(crate) seqres_groups: Vec<GroupId>, // Sequence-derived groups, in sequence order
}

impl Chain {
    pub(crate) fn new(
        chain_id: &str,
        internal_chain_id: Option<&str>,
        compound: Option<Compound>,
    ) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            internal_chain_id: internal_chain_id.map(str::to_string),
            compound,
            atom_groups: Vec::new(),
            seqres_groups: Vec::new(),
        }
    }

    pub fn atom_groups(&self) -> &[GroupId] {
        &self.atom_groups
    }

    pub fn seqres_groups(&self) -> &[GroupId] {
        &self.seqres_groups
    }

    /// Number of observed groups declared by this chain.
    pub fn atom_length(&self) -> usize {
        self.atom_groups.len()
    }

    /// Number of sequence-derived groups declared by this chain.
    pub fn seqres_length(&self) -> usize {
        self.seqres_groups.len()
    }
}
