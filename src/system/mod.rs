//! System abstraction for filesystem and terminal interactions
//!
//! This module provides a unified trait for all external system interactions
//! the resolver needs, allowing for easy testing with mock implementations.

use std::io;
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Unified trait for system operations (filesystem + interactive prompts)
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::fs` and `dialoguer`
/// - `MockSystem`: Test implementation using in-memory storage and scripted answers
pub trait System: Send + Sync {
    // ==================== Environment Operations ====================

    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    // ==================== Filesystem Operations ====================

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if a path points to an existing regular file
    ///
    /// A missing path is `Ok(false)`; other I/O failures are errors.
    fn is_file(&self, path: &Path) -> io::Result<bool>;

    // ==================== Terminal Operations ====================

    /// Ask the user for a string value
    fn prompt(&self, label: &str) -> io::Result<String>;
}
