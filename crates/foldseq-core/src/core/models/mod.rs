//! # Core Models Module
//!
//! Data structures that represent one frame of a molecular structure.
//!
//! - [`atom`] - Individual atom with coordinates and PDB record fields
//! - [`residue`] - Residue identity and its member atoms
//! - [`chain`] - Ordered residues sharing a chain identifier
//! - [`system`] - Complete frame with arena storage and file-order traversal
//! - [`builder`] - Incremental construction used by file readers
//! - [`ids`] - Stable identifier types for atoms, residues, and chains
//!
//! ```ignore
//! use foldseq::core::models::builder::MolecularSystemBuilder;
//!
//! let mut builder = MolecularSystemBuilder::new();
//! builder.start_chain('A').start_residue(1, None, "ALA", false);
//! builder.add_atom(1, "CA", Point3::new(0.0, 0.0, 0.0), |_| {});
//! let system = builder.build();
//! ```

pub mod atom;
pub mod builder;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod system;
