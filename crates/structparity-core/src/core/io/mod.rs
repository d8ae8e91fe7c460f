//! Input side of the oracle: corpus lists and record sources.
//!
//! The corpus loader turns a line-oriented identifier list into a validated
//! [`corpus::Corpus`]. Structures are obtained through the
//! [`source::RecordSource`] trait, which takes the file format as an explicit
//! argument on every call. [`snapshot::SnapshotCache`] serves pre-parsed
//! structures from a directory tree.

pub mod corpus;
pub mod snapshot;
pub mod source;
