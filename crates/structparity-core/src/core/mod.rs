//! # Core Module
//!
//! Stateless building blocks of the oracle: the structure data model and the
//! input side (corpus lists and record sources).
//!
//! - **Structure Representation** ([`models`]) - Entries, headers, chains, and groups
//! - **Inputs** ([`io`]) - Corpus loading, the record source trait, and the snapshot cache

pub mod io;
pub mod models;
