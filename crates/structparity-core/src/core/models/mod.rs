//! # Core Models Module
//!
//! Data structures describing one parsed macromolecular structure entry, as
//! produced by either file-format parser.
//!
//! ## Key Components
//!
//! - [`pdb_id`] - Validated four-character entry identifiers
//! - [`header`] - Entry metadata: dates, techniques, resolution, crystal cell
//! - [`structure`] - The complete entry with its chains and groups
//! - [`chain`] - Chain metadata and ordered group keys
//! - [`group`] - Residues and ligands with their classification
//! - [`builder`] - Incremental construction of a [`structure::Structure`]
//! - [`ids`] - Slot map keys for chains and groups
//!
//! ## Usage
//!
//! ```ignore
//! use structparity::core::models::{builder::StructureBuilder, group::GroupType, header::PdbHeader};
//!
//! let mut builder = StructureBuilder::new(PdbHeader::default());
//! let chain = builder.start_chain("A", Some("A"), None)?;
//! builder.add_atom_group(chain, "ALA", 1, None, GroupType::AminoAcid);
//! let structure = builder.build();
//! ```

pub mod builder;
pub mod chain;
pub mod group;
pub mod header;
pub mod ids;
pub mod pdb_id;
pub mod structure;
