//! Project configuration file (`inkbridge.toml`).
//!
//! Every key is optional; a missing file yields the defaults. Relative paths
//! are resolved against the project directory.
//!
//! ```toml
//! [compiler]
//! search_root = "Assets"
//! custom_name = "inklecate_custom"
//!
//! [templates]
//! path = "Assets/Plugins/Ink/Template/template.ink"
//!
//! [state]
//! directory = "Assets/Ink"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "inkbridge.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub compiler: CompilerSection,
    pub templates: TemplateSection,
    pub state: StateSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerSection {
    /// Directory searched for the compiler executable.
    pub search_root: PathBuf,
    /// Replaces the platform's default executable name when non-empty.
    pub custom_name: Option<String>,
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            search_root: PathBuf::from("Assets"),
            custom_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateSection {
    pub path: PathBuf,
}

impl Default for TemplateSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Assets/Plugins/Ink/Template/template.ink"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateSection {
    pub directory: PathBuf,
}

impl Default for StateSection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("Assets/Ink"),
        }
    }
}

impl ProjectConfig {
    /// Loads `inkbridge.toml` from `project_dir`, or the defaults if absent.
    pub fn load(project_dir: &Path) -> anyhow::Result<Self> {
        let path = project_dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "No project config; using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(ProjectConfig::parse("").unwrap(), ProjectConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ProjectConfig::parse(
            r#"
            [compiler]
            custom_name = "inklecate_custom"
            "#,
        )
        .unwrap();
        assert_eq!(config.compiler.custom_name.as_deref(), Some("inklecate_custom"));
        assert_eq!(config.compiler.search_root, PathBuf::from("Assets"));
        assert_eq!(config.state, StateSection::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ProjectConfig::parse("[compiler]\nsearch_rot = \"x\"").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(ProjectConfig::load(dir.path()).unwrap(), ProjectConfig::default());
    }
}
