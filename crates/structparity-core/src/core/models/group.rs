use super::ids::ChainId;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupType {
    AminoAcid,
    Nucleotide,
    Hetatm,
    Other,
}

impl GroupType {
    /// Amino acids and nucleotides are the building blocks of polymer chains.
    pub fn is_polymeric(&self) -> bool {
        matches!(self, GroupType::AminoAcid | GroupType::Nucleotide)
    }
}

#[derive(Debug, Error)]
#[error("Invalid group type string: '{0}'")]
pub struct ParseGroupTypeError(String);

impl FromStr for GroupType {
    type Err = ParseGroupTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "amino-acid" | "amino" | "aminos" => Ok(GroupType::AminoAcid),
            "nucleotide" => Ok(GroupType::Nucleotide),
            "hetatm" => Ok(GroupType::Hetatm),
            "other" => Ok(GroupType::Other),
            _ => Err(ParseGroupTypeError(s.to_string())),
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                GroupType::AminoAcid => "amino-acid",
                GroupType::Nucleotide => "nucleotide",
                GroupType::Hetatm => "hetatm",
                GroupType::Other => "other",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,                 // Residue or ligand name (e.g., "ALA", "HOH")
    pub number: isize,                // Residue sequence number from the source file
    pub insertion_code: Option<char>, // PDB insertion code, if any
    pub group_type: GroupType,        // Classification of the group
    pub chain: ChainId,               // Back-reference to the owning chain
}

impl Group {
    pub(crate) fn new(
        name: &str,
        number: isize,
        insertion_code: Option<char>,
        group_type: GroupType,
        chain: ChainId,
    ) -> Self {
        Self {
            name: name.to_string(),
            number,
            insertion_code,
            group_type,
            chain,
        }
    }
}
