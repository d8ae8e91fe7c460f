//! # Engine Module
//!
//! The equivalence oracle: given the PDB-derived and the mmCIF-derived
//! structure of one entry, decide whether they describe the same thing.
//!
//! ## Architecture
//!
//! - **Outcomes** ([`outcome`]) - Fields, observed values, mismatches and verdicts
//! - **Rules** ([`rules`]) - Structure, header and chain checks, run in a fixed order
//! - **Known Exceptions** ([`exceptions`]) - Documented per-entry disagreements that are waived
//! - **Configuration** ([`config`]) - Tolerances, failure policy and their builders
//! - **Progress Monitoring** ([`progress`]) - Events emitted while a batch runs
//! - **Error Handling** ([`error`]) - Errors that stop a batch
//!
//! The entry point is [`equivalence::EquivalenceEngine`]. Comparison is a pure
//! function of the two structures and the configuration; fetching records and
//! iterating over a corpus live in [`crate::workflows`].

pub mod config;
pub mod equivalence;
pub mod error;
pub mod exceptions;
pub mod outcome;
pub mod progress;
pub mod rules;

#[cfg(test)]
pub(crate) mod fixtures;
