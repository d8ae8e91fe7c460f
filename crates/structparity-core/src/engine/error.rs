use thiserror::Error;

use super::outcome::Mismatch;
use crate::core::io::source::{FetchError, RecordFormat};
use crate::core::models::pdb_id::PdbId;

/// Terminates a batch run under the abort policy.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Could not obtain the {format} record of {id}: {source}")]
    Fetch {
        id: PdbId,
        format: RecordFormat,
        #[source]
        source: FetchError,
    },

    #[error("Comparison of {id} {mismatch}")]
    Mismatch { id: PdbId, mismatch: Box<Mismatch> },
}

impl BatchError {
    pub fn id(&self) -> &PdbId {
        match self {
            BatchError::Fetch { id, .. } | BatchError::Mismatch { id, .. } => id,
        }
    }
}
