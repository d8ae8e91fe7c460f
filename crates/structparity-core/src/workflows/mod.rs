//! # Workflows Module
//!
//! High-level entry points that tie the record sources in [`crate::core`] to
//! the equivalence engine in [`crate::engine`].
//!
//! - **Batch Workflow** ([`batch`]) - Compares every entry of a corpus in order,
//!   under an abort or collect failure policy, reporting progress as it goes.

pub mod batch;
