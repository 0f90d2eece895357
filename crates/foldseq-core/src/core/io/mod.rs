//! Provides input/output functionality for molecular file formats.
//!
//! The [`traits::MolecularFile`] interface is implemented by the PDB format; the
//! [`report`] module serialises per-frame alignment results.

pub mod pdb;
pub mod report;
pub mod traits;
