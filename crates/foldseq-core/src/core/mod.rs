//! # Core Module
//!
//! Fundamental building blocks for frame alignment.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains and systems
//! - **File I/O** ([`io`]) - PDB reading/writing and alignment reports
//! - **Geometry** ([`utils`]) - Centroids, RMSD and least-squares superposition

pub mod io;
pub mod models;
pub mod utils;
