//! Error types for compiler invocation and story file creation.
//!
//! Binary resolution errors are [`integration::LocatorError`]; they belong to
//! the domain taxonomy and are re-used here rather than redefined.

use std::path::PathBuf;

use integration::Notice;
use thiserror::Error;

/// Errors produced while running the compiler.
///
/// A compile that runs but reports errors is not a [`CompileError`]; it is a
/// [`crate::CompileReport`] whose `succeeded()` is `false`.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The source file does not exist.
    #[error("Story source {} does not exist", path.display())]
    MissingSource { path: PathBuf },

    /// The compiler process could not be started.
    #[error("Failed to start compiler {}: {source}", executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    pub fn notice(&self) -> Notice {
        Notice::Blocking
    }
}

/// Errors produced while writing story or state files.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template exists but is not UTF-8 text.
    #[error("Template {} is not valid UTF-8", path.display())]
    TemplateEncoding { path: PathBuf },
}

impl FileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
