//! Compiler invocation.
//!
//! Runs the resolved compiler as `<exe> -o <output> <source>` and turns its
//! console output into structured messages. The compiler prints one message
//! per line, prefixed with `ERROR:`, `WARNING:`, or `TODO:`; anything else is
//! kept as raw output.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::CompileError;

/// Category of a compiler message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Error,
    Warning,
    Todo,
}

impl MessageKind {
    const PREFIXES: [(&'static str, MessageKind); 3] = [
        ("ERROR:", MessageKind::Error),
        ("WARNING:", MessageKind::Warning),
        ("TODO:", MessageKind::Todo),
    ];
}

/// A single diagnostic line reported by the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerMessage {
    pub kind: MessageKind,
    /// Message text with the prefix removed (e.g. `'main.ink' line 3: ...`).
    pub text: String,
}

/// Everything observed from one compiler run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileReport {
    /// Where the compiled JSON was requested to be written.
    pub output_path: PathBuf,

    /// Process exit code; `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,

    /// Parsed diagnostics, in output order.
    pub messages: Vec<CompilerMessage>,

    /// Output lines that carried no recognised prefix.
    pub other_output: Vec<String>,
}

impl CompileReport {
    /// `true` when the process exited with 0 and reported no errors.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &CompilerMessage> {
        self.of_kind(MessageKind::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CompilerMessage> {
        self.of_kind(MessageKind::Warning)
    }

    fn of_kind(&self, kind: MessageKind) -> impl Iterator<Item = &CompilerMessage> {
        self.messages.iter().filter(move |m| m.kind == kind)
    }
}

/// Handle on a resolved compiler executable.
#[derive(Debug, Clone)]
pub struct Compiler {
    executable: PathBuf,
}

impl Compiler {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Compiles `source` into JSON at `output`.
    ///
    /// Blocks until the compiler exits.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::MissingSource`] if `source` is not a file and
    /// [`CompileError::Spawn`] if the process cannot be started. Compilation
    /// errors are reported through the returned [`CompileReport`].
    pub fn compile(&self, source: &Path, output: &Path) -> Result<CompileReport, CompileError> {
        if !source.is_file() {
            return Err(CompileError::MissingSource {
                path: source.to_path_buf(),
            });
        }

        debug!(
            executable = %self.executable.display(),
            source = %source.display(),
            output = %output.display(),
            "Running compiler"
        );
        let result = Command::new(&self.executable)
            .arg("-o")
            .arg(output)
            .arg(source)
            .output()
            .map_err(|source| CompileError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&result.stdout);
        let stderr = String::from_utf8_lossy(&result.stderr);
        let (mut messages, mut other_output) = parse_compiler_output(&stdout);
        let (err_messages, err_other) = parse_compiler_output(&stderr);
        messages.extend(err_messages);
        other_output.extend(err_other);

        let report = CompileReport {
            output_path: output.to_path_buf(),
            exit_code: result.status.code(),
            messages,
            other_output,
        };
        if report.succeeded() {
            info!(source = %source.display(), warnings = report.warnings().count(), "Compiled story");
        } else {
            warn!(
                source = %source.display(),
                exit_code = ?report.exit_code,
                errors = report.errors().count(),
                "Story compilation failed"
            );
        }
        Ok(report)
    }
}

/// Splits compiler output into prefixed messages and other non-empty lines.
pub fn parse_compiler_output(output: &str) -> (Vec<CompilerMessage>, Vec<String>) {
    let mut messages = Vec::new();
    let mut other = Vec::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let parsed = MessageKind::PREFIXES.iter().find_map(|(prefix, kind)| {
            line.strip_prefix(*prefix).map(|text| CompilerMessage {
                kind: *kind,
                text: text.trim().to_string(),
            })
        });
        match parsed {
            Some(message) => messages.push(message),
            None => other.push(line.to_string()),
        }
    }

    (messages, other)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_prefixed_lines() {
        let output = "ERROR: 'main.ink' line 3: Unexpected token\n\
                      WARNING: 'main.ink' line 9: Apparent loose end\n\
                      TODO: 'main.ink' line 12: write ending\n\
                      Compiled in 12ms\n\n";
        let (messages, other) = parse_compiler_output(output);

        assert_eq!(
            messages.iter().map(|m| m.kind).collect::<Vec<_>>(),
            vec![MessageKind::Error, MessageKind::Warning, MessageKind::Todo]
        );
        assert_eq!(messages[0].text, "'main.ink' line 3: Unexpected token");
        assert_eq!(other, vec!["Compiled in 12ms".to_string()]);
    }

    #[test]
    fn report_with_error_message_did_not_succeed() {
        let report = CompileReport {
            output_path: PathBuf::from("out.json"),
            exit_code: Some(0),
            messages: vec![CompilerMessage {
                kind: MessageKind::Error,
                text: "boom".to_string(),
            }],
            other_output: Vec::new(),
        };
        assert!(!report.succeeded());
    }

    #[test]
    fn missing_source_is_rejected_before_spawning() {
        let compiler = Compiler::new("/nonexistent/inklecate");
        let err = compiler
            .compile(Path::new("/nonexistent/story.ink"), Path::new("out.json"))
            .unwrap_err();
        assert!(matches!(err, CompileError::MissingSource { .. }));
    }
}
