//! Operations module
//!
//! Coordinates deployment resolution and environment config validation

pub mod environment;
pub mod resolve;

pub use environment::*;
pub use resolve::*;
