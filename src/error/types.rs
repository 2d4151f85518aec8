//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for fogg configuration resolution
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FoggError {
    /// Parse Error - a Foggfile or config file is unreadable or not valid JSON
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Path Error - a Foggfile, config file or DSC script does not exist
    #[error("Path not found: {message}")]
    PathNotFound { message: String },

    /// Missing Field Error - a required value is absent or blank
    #[error("Missing field: {message}")]
    MissingField { message: String },

    /// Range Error - a VM count or off-count is out of bounds
    #[error("Range error: {message}")]
    Range { message: String },

    /// Referential Integrity Error - a VM tag has no subnet address
    #[error("Referential integrity error: {message}")]
    ReferentialIntegrity { message: String },

    /// Invalid Enum Error - a value is not one of the allowed choices
    #[error("Invalid value: {message}")]
    InvalidEnum { message: String },

    /// Discovery Error - no Foggfile found and no parameters given
    #[error("Configuration discovery error: {message}")]
    ConfigDiscovery { message: String },
}

impl FoggError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Parse { .. } => 1,
            Self::PathNotFound { .. } => 2,
            Self::MissingField { .. } => 3,
            Self::Range { .. } => 4,
            Self::ReferentialIntegrity { .. } => 5,
            Self::InvalidEnum { .. } => 6,
            Self::ConfigDiscovery { .. } => 7,
        }
    }

    /// Create a parse error
    #[inline]
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a path-not-found error
    #[inline]
    pub fn path_not_found<S: Into<String>>(message: S) -> Self {
        Self::PathNotFound {
            message: message.into(),
        }
    }

    /// Create a missing field error
    #[inline]
    pub fn missing_field<S: Into<String>>(message: S) -> Self {
        Self::MissingField {
            message: message.into(),
        }
    }

    /// Create a range error
    #[inline]
    pub fn range<S: Into<String>>(message: S) -> Self {
        Self::Range {
            message: message.into(),
        }
    }

    /// Create a referential integrity error
    #[inline]
    pub fn referential_integrity<S: Into<String>>(message: S) -> Self {
        Self::ReferentialIntegrity {
            message: message.into(),
        }
    }

    /// Create an invalid enum error
    #[inline]
    pub fn invalid_enum<S: Into<String>>(message: S) -> Self {
        Self::InvalidEnum {
            message: message.into(),
        }
    }

    /// Create a configuration discovery error
    #[inline]
    pub fn config_discovery<S: Into<String>>(message: S) -> Self {
        Self::ConfigDiscovery {
            message: message.into(),
        }
    }
}
