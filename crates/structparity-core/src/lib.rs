//! # structparity Core Library
//!
//! A differential-equivalence oracle for macromolecular structure records: the
//! same PDB entry is read from its legacy PDB file and from its mmCIF file, and
//! the two resulting structures must agree field by field.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** The structure data model (`Structure`, chains,
//!   groups and the header), corpus lists, and record sources that supply a
//!   parsed structure for an identifier and a format.
//!
//! - **[`engine`]: The Oracle.** Equivalence rules with their tolerances, the
//!   known-exception table, and typed comparison outcomes that name the failing
//!   field and the values seen on each side.
//!
//! - **[`workflows`]: The Public API.** Runs the oracle across a whole corpus,
//!   with progress reporting and a configurable failure policy.

pub mod core;
pub mod engine;
pub mod workflows;
