//! # Workflows Module
//!
//! Top-level entry points of the library. Each workflow handles file loading,
//! progress reporting and result collection so callers only provide a
//! validated configuration.
//!
//! - **Sequential Alignment** ([`align`]) - Fits every frame of a numbered series
//!   onto the previous, already aligned frame and writes the result.

pub mod align;
