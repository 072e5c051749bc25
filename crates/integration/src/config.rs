//! Configuration values consumed by binary resolution.
//!
//! Nothing here is ambient: the caller builds a [`LocatorConfig`] once
//! (typically from the project file plus command-line overrides) and passes it
//! into the locator explicitly.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{CompanionName, ExecutableName, LocatorError};

/// Suffix that excludes a directory from the host's asset indexing.
pub const DEFAULT_HIDDEN_SUFFIX: &str = "~";

/// Suffix carried by the companion library until it is moved out of the index.
pub const DEFAULT_PENDING_SUFFIX: &str = ".temp";

/// Final name of the runtime library shipped next to the compiler.
pub const DEFAULT_COMPANION_NAME: &str = "ink-engine-runtime.dll";

// ---------------------------------------------------------------------------
// Platform lookup
// ---------------------------------------------------------------------------

/// Host platform, used to pick the default compiler executable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Returns the platform this process is running on.
    ///
    /// Unrecognised Unix-likes map to [`Platform::Linux`].
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps an `std::env::consts::OS` value to a platform.
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            _ => Self::Linux,
        }
    }

    /// Default compiler executable name shipped for this platform.
    pub fn default_executable_name(self) -> &'static str {
        match self {
            Self::Windows => "inklecate_win.exe",
            Self::MacOs => "inklecate_mac",
            Self::Linux => "inklecate",
        }
    }
}

// ---------------------------------------------------------------------------
// Locator configuration
// ---------------------------------------------------------------------------

/// Inputs to a single binary resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Directory searched recursively for the executable. Must exist.
    pub root_directory: PathBuf,

    /// Effective executable file name (after applying any override).
    pub executable_name: ExecutableName,

    /// Final name of the companion runtime library.
    pub companion_name: CompanionName,

    /// Suffix marking a directory as hidden from asset indexing.
    pub hidden_suffix: String,

    /// Suffix the companion library carries before normalisation.
    pub pending_suffix: String,
}

impl LocatorConfig {
    /// Builds a configuration for `platform`.
    ///
    /// `override_name`, when present and non-empty, replaces the platform's
    /// default executable name.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::ConfigurationError`] if the override is not a
    /// plain file name.
    pub fn for_platform(
        root_directory: impl Into<PathBuf>,
        platform: Platform,
        override_name: Option<&str>,
    ) -> Result<Self, LocatorError> {
        let name = match override_name {
            Some(custom) if !custom.is_empty() => custom,
            _ => platform.default_executable_name(),
        };
        let executable_name = ExecutableName::new(name).ok_or_else(|| {
            LocatorError::configuration(format!("'{name}' is not a valid executable file name"))
        })?;
        Ok(Self::new(root_directory, executable_name))
    }

    /// Builds a configuration with an explicit executable name and default
    /// companion and suffix conventions.
    pub fn new(root_directory: impl Into<PathBuf>, executable_name: ExecutableName) -> Self {
        Self {
            root_directory: root_directory.into(),
            executable_name,
            companion_name: CompanionName(DEFAULT_COMPANION_NAME.to_string()),
            hidden_suffix: DEFAULT_HIDDEN_SUFFIX.to_string(),
            pending_suffix: DEFAULT_PENDING_SUFFIX.to_string(),
        }
    }

    /// Replaces the companion library name.
    #[must_use]
    pub fn with_companion_name(mut self, companion_name: CompanionName) -> Self {
        self.companion_name = companion_name;
        self
    }

    /// Replaces the hidden-marker suffix.
    #[must_use]
    pub fn with_hidden_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.hidden_suffix = suffix.into();
        self
    }

    /// Checks the invariants resolution relies on.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::ConfigurationError`] if either suffix is empty.
    pub fn validate(&self) -> Result<(), LocatorError> {
        if self.hidden_suffix.is_empty() {
            return Err(LocatorError::configuration("hidden suffix must not be empty"));
        }
        if self.pending_suffix.is_empty() {
            return Err(LocatorError::configuration("pending suffix must not be empty"));
        }
        Ok(())
    }
}
