//! Path string helpers.
//!
//! Paths handed to the editor host are compared as strings, so they always
//! use forward slashes regardless of platform.

use std::path::Path;

/// Replaces every backslash with a forward slash.
pub fn sanitize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Returns `full` relative to `project_root`, with forward slashes.
///
/// Returns `None` if `full` is not inside `project_root`.
pub fn to_project_relative(full: &Path, project_root: &Path) -> Option<String> {
    full.strip_prefix(project_root)
        .ok()
        .map(|relative| sanitize_path(&relative.to_string_lossy()))
}
