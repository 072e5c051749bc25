//! Error taxonomy for compiler binary resolution.
//!
//! [`LocatorError`] is surfaced to the caller unchanged; resolution never
//! recovers silently because a wrong compiler path changes program behaviour.
//! Data-level validation failures are not errors at all; they are reported as
//! [`crate::ValidationOutcome`] values.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Notice;

/// Errors produced while resolving the compiler executable.
///
/// None of these are retried automatically: configuration errors are caller
/// bugs, absence needs an install, and relocation failures are almost always
/// permission problems a human has to fix.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// The search root or executable name is unusable.
    ///
    /// Produced before any filesystem mutation takes place.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// No file with the requested name exists under the search root.
    #[error("Executable '{name}' not found under {}", root.display())]
    NotFound {
        /// The file name that was searched for.
        name: String,
        /// The search root.
        root: PathBuf,
    },

    /// A directory under the search root could not be read.
    #[error("Failed to search {}: {source}", path.display())]
    Search {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A move or rename failed.
    ///
    /// Each relocation is a single rename call, so a failure leaves the tree
    /// in its pre-call state for that step.
    #[error("Failed to relocate {} to {}: {reason}", from.display(), to.display())]
    RelocationError {
        /// Path being moved.
        from: PathBuf,
        /// Intended destination.
        to: PathBuf,
        /// Human-readable failure description.
        reason: String,
        /// Underlying I/O error, when the failure came from the OS.
        #[source]
        source: Option<std::io::Error>,
    },
}

impl LocatorError {
    /// Creates a [`LocatorError::ConfigurationError`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Creates a [`LocatorError::RelocationError`] from an I/O failure.
    pub fn relocation_io(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::RelocationError {
            from: from.into(),
            to: to.into(),
            reason: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a [`LocatorError::RelocationError`] for a refused move.
    pub fn relocation_refused(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::RelocationError {
            from: from.into(),
            to: to.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// How the editor layer should present this error.
    ///
    /// Compilation cannot proceed without a resolved executable, so every
    /// variant blocks.
    pub fn notice(&self) -> Notice {
        Notice::Blocking
    }
}
