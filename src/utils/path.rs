//! Path manipulation and resolution utilities

use crate::error::FoggError;
use crate::system::System;
use anyhow::{Context as _, Result};
use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {
                // Skip '.' components
            }
            Component::ParentDir => {
                // Keep leading '..' components
                if matches!(components.last(), None | Some(Component::ParentDir)) {
                    components.push(component);
                } else if !matches!(components.last(), Some(Component::RootDir)) {
                    components.pop();
                }
            }
            _ => {
                components.push(component);
            }
        }
    }

    components.iter().collect()
}

/// Convert backslashes to forward slashes (Foggfiles are often written on Windows)
#[must_use]
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Join `path` onto `base` unless it is already absolute, then normalize
#[must_use]
pub fn absolutize(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(normalize_separators(path.trim()));
    if path.is_absolute() {
        normalize_path(&path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Resolve `relative` against `base`, returning the path only if it is a file
///
/// # Errors
///
/// Returns an error if:
/// - The file check itself fails
#[inline]
pub fn find_file(system: &dyn System, base: &Path, relative: &str) -> Result<Option<PathBuf>> {
    let resolved = absolutize(base, relative);

    let is_file = system
        .is_file(&resolved)
        .with_context(|| format!("Failed to check path: {}", resolved.display()))?;

    Ok(is_file.then_some(resolved))
}

/// Resolve `relative` against `base` into the absolute path of an existing file
///
/// # Errors
///
/// Returns an error if:
/// - The resolved path is not an existing file
/// - The file check itself fails
#[inline]
pub fn resolve_relative(system: &dyn System, base: &Path, relative: &str) -> Result<PathBuf> {
    find_file(system, base, relative)?.ok_or_else(|| {
        FoggError::path_not_found(format!(
            "{relative} (resolved to {})",
            absolutize(base, relative).display()
        ))
        .into()
    })
}
