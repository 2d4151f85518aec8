//! Configuration management module
//!
//! Handles Foggfile and environment config parsing, JSON schema validation,
//! placeholder expansion and section validation

pub mod deployment;
pub mod environment;
pub mod foggfile;
pub mod json;
pub mod placeholder;
pub mod presence;
pub mod schema;
pub mod validation;

pub use deployment::{Credential, Deployment, remove_rg_tag};
pub use environment::{EnvironmentConfig, OsSection, OsType, VmSection};
pub use foggfile::Foggfile;
