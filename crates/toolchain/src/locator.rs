//! Compiler binary resolution.
//!
//! Resolution runs in three steps, each idempotent:
//!
//! 1. **Search** — walk the root recursively for files whose name equals the
//!    configured executable name. Matches already in a hidden directory sort
//!    first, then by path, so the choice is deterministic.
//! 2. **Hide** — if the executable's directory lacks the hidden-marker suffix,
//!    rename the whole directory to `<name><suffix>` in a single call.
//! 3. **Companion** — if `<companion><pending suffix>` sits next to the
//!    executable, rename it to `<companion>`.
//!
//! A second resolution on the same tree finds the hidden directory, performs
//! no relocation, and returns the same path.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use integration::types::is_hidden_directory;
use integration::{
    CompanionState, ExecutableDescriptor, LocatorConfig, LocatorError, Relocation,
    RelocationKind, ResolvedExecutable,
};
use tracing::{debug, info, warn};

/// Resolves the compiler executable under a project tree.
#[derive(Debug, Clone)]
pub struct BinaryLocator {
    config: LocatorConfig,
}

impl BinaryLocator {
    /// Creates a locator for `config`.
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this locator resolves with.
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Finds, relocates, and returns the compiler executable.
    ///
    /// # Errors
    ///
    /// - [`LocatorError::ConfigurationError`] if the root is not an existing
    ///   directory or the configured suffixes are empty.
    /// - [`LocatorError::NotFound`] if no file with the executable name exists
    ///   under the root.
    /// - [`LocatorError::Search`] if a directory cannot be read.
    /// - [`LocatorError::RelocationError`] if a rename fails or its destination
    ///   is already taken.
    pub fn resolve(&self) -> Result<ResolvedExecutable, LocatorError> {
        self.config.validate()?;
        let root = self.canonical_root()?;
        let name = &self.config.executable_name;
        let suffix = self.config.hidden_suffix.as_str();

        let mut matches = find_files_named(&root, name.as_str())?;
        if matches.is_empty() {
            return Err(LocatorError::NotFound {
                name: name.to_string(),
                root,
            });
        }
        sort_candidates(&mut matches, suffix);
        if matches.len() > 1 {
            warn!(
                executable = %name,
                chosen = %matches[0].display(),
                ignored = ?&matches[1..],
                "Multiple compiler executables found; using the first"
            );
        }

        let found = &matches[0];
        let mut directory = found
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| LocatorError::configuration("executable has no parent directory"))?;
        let mut relocations = Vec::new();

        if !is_hidden_directory(&directory, suffix) {
            let hidden = hidden_sibling(&directory, suffix)?;
            move_path(&directory, &hidden, RelocationKind::HideDirectory, &mut relocations)?;
            directory = hidden;
        } else {
            debug!(directory = %directory.display(), "Compiler directory already hidden");
        }

        let companion = self.normalize_companion(&directory, &mut relocations)?;
        let descriptor = ExecutableDescriptor::new(name.clone(), directory, suffix);

        Ok(ResolvedExecutable {
            path: descriptor.executable_path(),
            descriptor,
            companion,
            relocations,
        })
    }

    fn canonical_root(&self) -> Result<PathBuf, LocatorError> {
        let root = &self.config.root_directory;
        if !root.is_dir() {
            return Err(LocatorError::configuration(format!(
                "search root {} is not an existing directory",
                root.display()
            )));
        }
        fs::canonicalize(root).map_err(|source| LocatorError::Search {
            path: root.clone(),
            source,
        })
    }

    /// Renames a pending companion library to its final name.
    ///
    /// After this returns, at most one of the pending and final files exists.
    fn normalize_companion(
        &self,
        directory: &Path,
        relocations: &mut Vec<Relocation>,
    ) -> Result<CompanionState, LocatorError> {
        let companion = &self.config.companion_name;
        let final_path = directory.join(companion.as_str());
        let pending_path = directory.join(companion.pending_name(&self.config.pending_suffix));

        if pending_path.is_file() {
            if final_path.exists() {
                if !same_contents(&pending_path, &final_path)? {
                    return Err(LocatorError::relocation_refused(
                        &pending_path,
                        &final_path,
                        "a different companion library already exists at the destination",
                    ));
                }
                fs::remove_file(&pending_path)
                    .map_err(|e| LocatorError::relocation_io(&pending_path, &final_path, e))?;
                info!(path = %pending_path.display(), "Removed duplicate pending companion library");
                relocations.push(Relocation {
                    kind: RelocationKind::DiscardDuplicateCompanion,
                    from: pending_path,
                    to: final_path.clone(),
                });
            } else {
                move_path(
                    &pending_path,
                    &final_path,
                    RelocationKind::RenameCompanion,
                    relocations,
                )?;
            }
        }

        if final_path.is_file() {
            Ok(CompanionState::Installed {
                name: companion.clone(),
            })
        } else {
            Ok(CompanionState::Absent)
        }
    }
}

/// Recursively collects every regular file named `name` under `root`.
///
/// Directory symlinks are not followed.
fn find_files_named(root: &Path, name: &str) -> Result<Vec<PathBuf>, LocatorError> {
    let mut matches = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let search_err = |source: std::io::Error| LocatorError::Search {
            path: dir.clone(),
            source,
        };
        for entry in fs::read_dir(&dir).map_err(search_err)? {
            let entry = entry.map_err(search_err)?;
            let file_type = entry.file_type().map_err(search_err)?;
            let path = entry.path();
            if file_type.is_dir() {
                pending.push(path);
            } else if entry.file_name().to_str() == Some(name) && path.is_file() {
                debug!(path = %path.display(), "Found compiler candidate");
                matches.push(path);
            }
        }
    }

    Ok(matches)
}

/// Orders candidates: already-hidden directories first, then by path.
fn sort_candidates(matches: &mut [PathBuf], suffix: &str) {
    matches.sort_by_cached_key(|p| (!parent_is_hidden(p, suffix), p.clone()));
}

fn parent_is_hidden(path: &Path, suffix: &str) -> bool {
    path.parent()
        .is_some_and(|parent| is_hidden_directory(parent, suffix))
}

fn hidden_sibling(directory: &Path, suffix: &str) -> Result<PathBuf, LocatorError> {
    let mut name: OsString = directory
        .file_name()
        .ok_or_else(|| {
            LocatorError::relocation_refused(directory, directory, "directory has no name to mark")
        })?
        .to_os_string();
    name.push(suffix);
    Ok(directory.with_file_name(name))
}

/// Renames `from` to `to` in one call, refusing to overwrite.
fn move_path(
    from: &Path,
    to: &Path,
    kind: RelocationKind,
    relocations: &mut Vec<Relocation>,
) -> Result<(), LocatorError> {
    if to.exists() {
        return Err(LocatorError::relocation_refused(
            from,
            to,
            "destination already exists",
        ));
    }
    fs::rename(from, to).map_err(|e| LocatorError::relocation_io(from, to, e))?;
    info!(from = %from.display(), to = %to.display(), ?kind, "Relocated");
    relocations.push(Relocation {
        kind,
        from: from.to_path_buf(),
        to: to.to_path_buf(),
    });
    Ok(())
}

fn same_contents(a: &Path, b: &Path) -> Result<bool, LocatorError> {
    let read = |p: &Path| fs::read(p).map_err(|e| LocatorError::relocation_io(a, b, e));
    let (a_meta, b_meta) = (
        fs::metadata(a).map_err(|e| LocatorError::relocation_io(a, b, e))?,
        fs::metadata(b).map_err(|e| LocatorError::relocation_io(a, b, e))?,
    );
    if a_meta.len() != b_meta.len() {
        return Ok(false);
    }
    Ok(read(a)? == read(b)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_sibling_appends_suffix() {
        let hidden = hidden_sibling(Path::new("/p/Assets/Ink"), "~").unwrap();
        assert_eq!(hidden, PathBuf::from("/p/Assets/Ink~"));
    }

    #[test]
    fn hidden_matches_sort_before_visible_ones() {
        let mut paths = vec![
            PathBuf::from("/p/A/inklecate"),
            PathBuf::from("/p/B~/inklecate"),
        ];
        sort_candidates(&mut paths, "~");
        assert_eq!(paths[0], PathBuf::from("/p/B~/inklecate"));
    }
}
