use super::outcome::Mismatch;
use crate::core::io::source::RecordFormat;
use crate::core::models::pdb_id::PdbId;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Progress {
    BatchStart { total: u64 },
    EntryStart { id: PdbId },
    EntryFinish,

    Mismatch { id: PdbId, mismatch: Mismatch },
    FetchFailed {
        id: PdbId,
        format: RecordFormat,
        message: String,
    },
    Waived {
        id: PdbId,
        mismatch: Mismatch,
        reason: String,
    },

    /// Emitted once per run, whether it completed or stopped early.
    LastAttempted { id: Option<PdbId> },
    BatchFinish { elapsed: Duration },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
