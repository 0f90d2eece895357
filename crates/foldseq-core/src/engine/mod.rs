//! # Engine Module
//!
//! Shared machinery for alignment workflows: validated configuration
//! ([`config`]), progress events ([`progress`]) and the error taxonomy
//! ([`error`]).

pub mod config;
pub mod error;
pub mod progress;
