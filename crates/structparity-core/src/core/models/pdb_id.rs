use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const PDB_ID_LENGTH: usize = 4;

/// A four-character PDB entry identifier, e.g. `1abc` or `4HHB`.
///
/// The first character is an ASCII digit and the remaining three are ASCII
/// alphanumerics. The identifier is validated once, at construction, and the
/// original casing is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PdbId(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error(
    "Invalid PDB identifier '{0}'. Expected a digit followed by three alphanumeric characters (e.g., '1abc')."
)]
pub struct ParsePdbIdError(pub String);

impl PdbId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `token` has the shape of a PDB identifier.
    pub fn is_valid(token: &str) -> bool {
        let mut chars = token.chars();
        token.len() == PDB_ID_LENGTH
            && chars.next().is_some_and(|c| c.is_ascii_digit())
            && chars.all(|c| c.is_ascii_alphanumeric())
    }
}

impl FromStr for PdbId {
    type Err = ParsePdbIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ParsePdbIdError(s.to_string()))
        }
    }
}

impl fmt::Display for PdbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PdbId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
