use crate::core::models::builder::BuildError;
use crate::core::models::pdb_id::PdbId;
use crate::core::models::structure::Structure;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The file format a structure was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordFormat {
    Pdb,
    MmCif,
}

impl RecordFormat {
    pub const ALL: [RecordFormat; 2] = [RecordFormat::Pdb, RecordFormat::MmCif];

    /// Directory name used for this format inside a snapshot cache.
    pub fn dir_name(&self) -> &'static str {
        match self {
            RecordFormat::Pdb => "pdb",
            RecordFormat::MmCif => "mmcif",
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No {format} record available for {id}")]
    NotFound { id: PdbId, format: RecordFormat },

    #[error("I/O error reading '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse '{path}': {source}", path = path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Inconsistent {format} record for {id}: {source}")]
    Inconsistency {
        id: PdbId,
        format: RecordFormat,
        #[source]
        source: BuildError,
    },
}

/// Supplies parsed structures by identifier and file format.
///
/// The format is an explicit argument of every call, so a source never holds
/// a shared "current format" and concurrent fetches cannot interfere.
pub trait RecordSource {
    fn fetch(&self, id: &PdbId, format: RecordFormat) -> Result<Structure, FetchError>;
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn fetch(&self, id: &PdbId, format: RecordFormat) -> Result<Structure, FetchError> {
        (**self).fetch(id, format)
    }
}

/// A record source backed by structures already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: HashMap<(PdbId, RecordFormat), Structure>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: PdbId, format: RecordFormat, structure: Structure) -> &mut Self {
        self.records.insert((id, format), structure);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for InMemorySource {
    fn fetch(&self, id: &PdbId, format: RecordFormat) -> Result<Structure, FetchError> {
        self.records
            .get(&(id.clone(), format))
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                id: id.clone(),
                format,
            })
    }
}
