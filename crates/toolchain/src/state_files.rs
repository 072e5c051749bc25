//! Saved story state files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::templates::unique_path;
use crate::FileError;

/// File stem used when the caller has no better name.
pub const DEFAULT_STATE_STEM: &str = "storyState";

/// Writes `state_json` to `<dir>/<stem>.json`, or the next free
/// `<stem> N.json`, creating `dir` if needed. Returns the written path.
///
/// # Errors
///
/// Returns [`FileError::Io`] if the directory cannot be created or the file
/// cannot be written.
pub fn save_state_file(dir: &Path, stem: &str, state_json: &str) -> Result<PathBuf, FileError> {
    fs::create_dir_all(dir).map_err(|e| FileError::io(dir, e))?;
    let path = unique_path(dir, stem, "json");
    fs::write(&path, state_json).map_err(|e| FileError::io(&path, e))?;
    info!(path = %path.display(), "Saved story state");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn saves_under_unique_names() {
        let dir = TempDir::new().unwrap();
        let states = dir.path().join("Ink").join("States");

        let first = save_state_file(&states, DEFAULT_STATE_STEM, "{}").unwrap();
        let second = save_state_file(&states, DEFAULT_STATE_STEM, "{\"a\":1}").unwrap();

        assert_eq!(first, states.join("storyState.json"));
        assert_eq!(second, states.join("storyState 1.json"));
        assert_eq!(fs::read_to_string(second).unwrap(), "{\"a\":1}");
    }
}
