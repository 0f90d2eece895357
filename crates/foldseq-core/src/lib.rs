//! # foldseq Core Library
//!
//! Rigid-body superposition of numbered molecular structure frames, where each
//! frame is fitted onto the previous, already-aligned one.
//!
//! ## Layout
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularSystem`), PDB and
//!   report I/O, and the geometry used for least-squares fitting.
//!
//! - **[`engine`]: Shared Machinery.** Alignment configuration, progress reporting and
//!   the error taxonomy used by every workflow.
//!
//! - **[`workflows`]: The Public API.** The sequential alignment procedure that ties the
//!   other layers together.

pub mod core;
pub mod engine;
pub mod workflows;
