use super::outcome::Field;
use crate::core::models::pdb_id::PdbId;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExceptionTableError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid exception in '{path}' at record {record}: {message}")]
    InvalidRecord {
        path: String,
        record: usize,
        message: String,
    },
}

/// A documented, expected disagreement between the two formats for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownException {
    pub pdb_id: PdbId,
    pub field: Field,
    /// Restricts the exception to one chain; `None` applies to every chain.
    pub chain_id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
struct ExceptionRecord {
    pdb_id: String,
    field: String,
    chain: Option<String>,
    reason: String,
}

/// Known exceptions keyed by entry and field.
///
/// Loaded from a CSV file with the header `pdb_id,field,chain,reason`; the
/// `chain` column may be left empty. Identifiers match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ExceptionTable {
    entries: HashMap<(String, Field), Vec<KnownException>>,
}

impl ExceptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ExceptionTableError> {
        let display = path.to_string_lossy().to_string();
        let reader = csv::Reader::from_path(path).map_err(|e| ExceptionTableError::Csv {
            path: display.clone(),
            source: e,
        })?;
        Self::from_csv(reader, &display)
    }

    pub fn from_reader(reader: impl Read, name: &str) -> Result<Self, ExceptionTableError> {
        Self::from_csv(csv::Reader::from_reader(reader), name)
    }

    fn from_csv<R: Read>(
        mut reader: csv::Reader<R>,
        path: &str,
    ) -> Result<Self, ExceptionTableError> {
        let mut table = Self::new();
        for (index, result) in reader.deserialize::<ExceptionRecord>().enumerate() {
            let record = result.map_err(|e| ExceptionTableError::Csv {
                path: path.to_string(),
                source: e,
            })?;
            let invalid = |message: String| ExceptionTableError::InvalidRecord {
                path: path.to_string(),
                record: index + 1,
                message,
            };

            let pdb_id = record
                .pdb_id
                .trim()
                .parse::<PdbId>()
                .map_err(|e| invalid(e.to_string()))?;
            let field = record
                .field
                .parse::<Field>()
                .map_err(|e| invalid(e.to_string()))?;
            let chain_id = record
                .chain
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty());

            table.insert(KnownException {
                pdb_id,
                field,
                chain_id,
                reason: record.reason.trim().to_string(),
            });
        }
        debug!("Loaded {} known exceptions from '{}'.", table.len(), path);
        Ok(table)
    }

    pub fn insert(&mut self, exception: KnownException) -> &mut Self {
        let key = (exception.pdb_id.as_str().to_lowercase(), exception.field);
        self.entries.entry(key).or_default().push(exception);
        self
    }

    /// Finds the exception covering `field` of entry `id`, optionally within
    /// chain `chain_id`.
    pub fn lookup(&self, id: &PdbId, field: Field, chain_id: Option<&str>) -> Option<&KnownException> {
        self.entries
            .get(&(id.as_str().to_lowercase(), field))?
            .iter()
            .find(|e| match (&e.chain_id, chain_id) {
                (None, _) => true,
                (Some(expected), Some(actual)) => expected == actual,
                (Some(_), None) => false,
            })
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
