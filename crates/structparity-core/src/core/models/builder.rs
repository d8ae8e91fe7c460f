use super::chain::{Chain, Compound};
use super::group::{Group, GroupType};
use super::header::PdbHeader;
use super::ids::{ChainId, GroupId};
use super::structure::Structure;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Duplicate chain identifier: '{0}'")]
    DuplicateChain(String),
}

pub struct StructureBuilder {
    structure: Structure,
}

impl StructureBuilder {
    pub fn new(header: PdbHeader) -> Self {
        Self {
            structure: Structure::new(header),
        }
    }

    pub fn nr_models(&mut self, nr_models: usize) -> &mut Self {
        self.structure.nr_models = nr_models;
        self
    }

    pub fn biological_assembly(&mut self, is_assembly: bool) -> &mut Self {
        self.structure.biological_assembly = is_assembly;
        self
    }

    pub fn start_chain(
        &mut self,
        chain_id: &str,
        internal_chain_id: Option<&str>,
        compound: Option<Compound>,
    ) -> Result<ChainId, BuildError> {
        if self.structure.chain_id_map.contains_key(chain_id) {
            return Err(BuildError::DuplicateChain(chain_id.to_string()));
        }
        let key = self
            .structure
            .chains
            .insert(Chain::new(chain_id, internal_chain_id, compound));
        self.structure.chain_order.push(key);
        self.structure
            .chain_id_map
            .insert(chain_id.to_string(), key);
        Ok(key)
    }

    pub fn add_atom_group(
        &mut self,
        chain: ChainId,
        name: &str,
        number: isize,
        insertion_code: Option<char>,
        group_type: GroupType,
    ) -> Option<GroupId> {
        let group = Group::new(name, number, insertion_code, group_type, chain);
        let id = self.insert_group(chain, group)?;
        self.structure.chains.get_mut(chain)?.atom_groups.push(id);
        Some(id)
    }

    pub fn add_seqres_group(
        &mut self,
        chain: ChainId,
        name: &str,
        number: isize,
        group_type: GroupType,
    ) -> Option<GroupId> {
        let group = Group::new(name, number, None, group_type, chain);
        let id = self.insert_group(chain, group)?;
        self.structure.chains.get_mut(chain)?.seqres_groups.push(id);
        Some(id)
    }

    fn insert_group(&mut self, chain: ChainId, group: Group) -> Option<GroupId> {
        if !self.structure.chains.contains_key(chain) {
            return None;
        }
        Some(self.structure.groups.insert(group))
    }

    pub fn build(self) -> Structure {
        self.structure
    }
}
