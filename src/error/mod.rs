//! Error handling module
//!
//! Defines the validation error taxonomy with per-class exit codes

pub mod types;

pub use types::*;
