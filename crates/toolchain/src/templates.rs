//! New story files created from a template.
//!
//! The template text is copied verbatim; no placeholders are expanded.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::FileError;

/// Extension of ink story source files, without the dot.
pub const INK_FILE_EXTENSION: &str = "ink";

/// File stem used for new story files.
pub const DEFAULT_STORY_STEM: &str = "New Ink";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// What [`create_from_template`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedFile {
    pub path: PathBuf,
    /// `false` when the template was missing and the file was left empty.
    pub from_template: bool,
}

/// Returns the first path in `dir` named `<stem>.<extension>`,
/// `<stem> 1.<extension>`, `<stem> 2.<extension>`, … that does not exist.
pub fn unique_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let candidate = dir.join(format!("{stem}.{extension}"));
    if !candidate.exists() {
        return candidate;
    }
    (1u32..)
        .map(|n| dir.join(format!("{stem} {n}.{extension}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Writes the contents of `template` to `target` as UTF-8 with a byte-order
/// mark, overwriting any existing file.
///
/// A missing template is not an error: a warning is logged and `target` is
/// created empty.
///
/// # Errors
///
/// Returns [`FileError`] if the template cannot be read or `target` cannot be
/// written.
pub fn create_from_template(target: &Path, template: &Path) -> Result<CreatedFile, FileError> {
    let (text, from_template) = if template.is_file() {
        let bytes = fs::read(template).map_err(|e| FileError::io(template, e))?;
        let text = String::from_utf8(bytes).map_err(|_| FileError::TemplateEncoding {
            path: template.to_path_buf(),
        })?;
        (text, true)
    } else {
        warn!(
            template = %template.display(),
            "Could not find story template; new file will be empty"
        );
        (String::new(), false)
    };

    let body = text.strip_prefix('\u{feff}').unwrap_or(&text);
    let mut contents = Vec::with_capacity(UTF8_BOM.len() + body.len());
    contents.extend_from_slice(UTF8_BOM);
    contents.extend_from_slice(body.as_bytes());
    fs::write(target, contents).map_err(|e| FileError::io(target, e))?;

    info!(path = %target.display(), from_template, "Created story file");
    Ok(CreatedFile {
        path: target.to_path_buf(),
        from_template,
    })
}

/// Creates `New Ink.ink` (or the next free variant) in `dir` from `template`.
///
/// # Errors
///
/// See [`create_from_template`].
pub fn create_story_file(dir: &Path, template: &Path) -> Result<CreatedFile, FileError> {
    let target = unique_path(dir, DEFAULT_STORY_STEM, INK_FILE_EXTENSION);
    create_from_template(&target, template)
}
