use crate::core::models::pdb_id::PdbId;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const COMMENT_PREFIX: char = '#';

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("I/O error reading corpus '{resource}': {source}")]
    Io {
        resource: String,
        #[source]
        source: io::Error,
    },
    #[error("The corpus '{resource}' contains an invalid PDB code on line {line}: '{content}'")]
    InvalidIdentifier {
        resource: String,
        line: usize,
        content: String,
    },
}

/// An ordered list of PDB identifiers to compare.
///
/// Read from a line-oriented text resource: lines starting with `#` are
/// comments, the first empty line ends the list (anything after it is
/// ignored), and every other line must be a valid [`PdbId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    resource: String,
    ids: Vec<PdbId>,
}

impl Corpus {
    pub fn new(resource: impl Into<String>, ids: Vec<PdbId>) -> Self {
        Self {
            resource: resource.into(),
            ids,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let resource = path.display().to_string();
        let file = File::open(path).map_err(|source| CorpusError::Io {
            resource: resource.clone(),
            source,
        })?;
        Self::from_reader(&mut BufReader::new(file), &resource)
    }

    pub fn from_reader(reader: &mut impl BufRead, resource: &str) -> Result<Self, CorpusError> {
        let mut ids = Vec::new();

        for (index, line_res) in reader.lines().enumerate() {
            let raw = line_res.map_err(|source| CorpusError::Io {
                resource: resource.to_string(),
                source,
            })?;
            let line = raw.strip_suffix('\r').unwrap_or(raw.as_str());

            if line.starts_with(COMMENT_PREFIX) {
                continue;
            }
            if line.is_empty() {
                debug!(
                    "Empty line {} in corpus '{}', ignoring the remainder.",
                    index + 1,
                    resource
                );
                break;
            }

            let id = line
                .parse::<PdbId>()
                .map_err(|_| CorpusError::InvalidIdentifier {
                    resource: resource.to_string(),
                    line: index + 1,
                    content: line.to_string(),
                })?;
            ids.push(id);
        }

        debug!("Loaded {} identifiers from corpus '{}'.", ids.len(), resource);
        Ok(Self {
            resource: resource.to_string(),
            ids,
        })
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn ids(&self) -> &[PdbId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
