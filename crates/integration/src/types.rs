//! Shared value types for binary resolution and artifact validation.
//!
//! Descriptors are discovered fresh on every resolution call; nothing here is
//! cached. The directory layout on disk is the only persisted fact.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CompanionName, EngineError, ExecutableName};

// ---------------------------------------------------------------------------
// User-facing notice level
// ---------------------------------------------------------------------------

/// How prominently a failure should be shown to the user by the editor layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// Halts the current workflow until the user acknowledges it
    /// (missing compiler, failed relocation).
    Blocking,
    /// Shown as an indicator next to the artifact; work may continue.
    NonBlocking,
}

// ---------------------------------------------------------------------------
// Binary resolution
// ---------------------------------------------------------------------------

/// Where the compiler executable lives and whether its directory is already
/// excluded from asset indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableDescriptor {
    /// File name of the executable.
    pub name: ExecutableName,

    /// Absolute path of the directory holding the executable.
    pub containing_directory: PathBuf,

    /// `true` once the directory name carries the hidden-marker suffix.
    pub is_hidden: bool,
}

impl ExecutableDescriptor {
    /// Creates a descriptor for `name` inside `containing_directory`,
    /// deriving `is_hidden` from the directory name.
    pub fn new(name: ExecutableName, containing_directory: PathBuf, hidden_suffix: &str) -> Self {
        let is_hidden = is_hidden_directory(&containing_directory, hidden_suffix);
        Self {
            name,
            containing_directory,
            is_hidden,
        }
    }

    /// Absolute path of the executable.
    pub fn executable_path(&self) -> PathBuf {
        self.containing_directory.join(self.name.as_str())
    }
}

/// Returns `true` if the final component of `directory` ends with `hidden_suffix`.
pub fn is_hidden_directory(directory: &Path, hidden_suffix: &str) -> bool {
    directory
        .file_name()
        .is_some_and(|n| n.as_encoded_bytes().ends_with(hidden_suffix.as_bytes()))
}

/// State of the companion runtime library after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CompanionState {
    /// The library sits next to the executable under its final name.
    Installed {
        /// Final library name.
        name: CompanionName,
    },
    /// Neither the pending nor the final library file exists.
    Absent,
}

/// The kind of filesystem mutation performed during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelocationKind {
    /// The executable's directory was renamed to carry the hidden-marker suffix.
    HideDirectory,
    /// The pending companion library was renamed to its final name.
    RenameCompanion,
    /// A pending companion identical to the installed one was removed.
    DiscardDuplicateCompanion,
}

/// A single move, rename, or removal performed by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    pub kind: RelocationKind,
    pub from: PathBuf,
    /// For [`RelocationKind::DiscardDuplicateCompanion`] this is the kept file.
    pub to: PathBuf,
}

/// Result of a successful binary resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedExecutable {
    /// Absolute, stable path of the executable.
    pub path: PathBuf,

    /// Descriptor of the executable's final location.
    pub descriptor: ExecutableDescriptor,

    /// Companion library state after normalisation.
    pub companion: CompanionState,

    /// Mutations performed by this call, in order. Empty when the tree was
    /// already normalised.
    pub relocations: Vec<Relocation>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Result of validating a compiled story and, optionally, a saved state.
///
/// The cause is always carried; callers that only need a yes/no answer use
/// [`ValidationOutcome::is_valid`] and drop it.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Everything that was checked loaded successfully.
    Valid,
    /// The story JSON could not be parsed into a story.
    InvalidStory(EngineError),
    /// The story parsed, but the state JSON could not be loaded into it.
    InvalidState(EngineError),
}

impl ValidationOutcome {
    /// Returns `true` for [`ValidationOutcome::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the engine failure, if any.
    pub fn cause(&self) -> Option<&EngineError> {
        match self {
            Self::Valid => None,
            Self::InvalidStory(e) | Self::InvalidState(e) => Some(e),
        }
    }

    /// Consumes the outcome and returns the engine failure, if any.
    pub fn into_cause(self) -> Option<EngineError> {
        match self {
            Self::Valid => None,
            Self::InvalidStory(e) | Self::InvalidState(e) => Some(e),
        }
    }

    /// Data-level failures are never blocking.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Valid => None,
            Self::InvalidStory(_) | Self::InvalidState(_) => Some(Notice::NonBlocking),
        }
    }
}

impl std::fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::InvalidStory(e) => write!(f, "invalid story: {e}"),
            Self::InvalidState(e) => write!(f, "invalid story state: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_directory_detection_uses_last_component() {
        assert!(is_hidden_directory(Path::new("/project/Assets/Ink~"), "~"));
        assert!(!is_hidden_directory(Path::new("/project/Assets~/Ink"), "~"));
    }

    #[cfg(unix)]
    #[test]
    fn hidden_directory_detection_accepts_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let parent = Path::new("/project/Assets");
        assert!(is_hidden_directory(&parent.join(OsStr::from_bytes(b"Ink\xFF~")), "~"));
        assert!(!is_hidden_directory(&parent.join(OsStr::from_bytes(b"Ink\xFF")), "~"));
    }

    #[test]
    fn descriptor_derives_hidden_flag_and_path() {
        let name = ExecutableName::new("inklecate").unwrap();
        let descriptor = ExecutableDescriptor::new(name, PathBuf::from("/p/Tools~"), "~");
        assert!(descriptor.is_hidden);
        assert_eq!(descriptor.executable_path(), PathBuf::from("/p/Tools~/inklecate"));
    }

    #[test]
    fn outcome_exposes_cause_and_notice() {
        let outcome = ValidationOutcome::InvalidState(EngineError::Invariant {
            message: "unknown variable 'x'".to_string(),
        });
        assert!(!outcome.is_valid());
        assert_eq!(outcome.notice(), Some(Notice::NonBlocking));
        assert!(outcome.cause().is_some());
        assert_eq!(ValidationOutcome::Valid.cause(), None);
    }
}
