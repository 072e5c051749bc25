//! inkbridge filesystem and process infrastructure.
//!
//! Everything in this crate touches the disk or spawns a process:
//!
//! - [`BinaryLocator`] — finds the ink compiler under a project tree, moves its
//!   directory out of the host's asset index, and normalises the companion
//!   runtime library name.
//! - [`Compiler`] — runs the resolved compiler on a `.ink` source file and
//!   collects its diagnostics.
//! - [`templates`] — creates new story files from a template file.
//! - [`state_files`] — writes serialised story states under unique names.
//! - [`paths`] — separator normalisation and project-relative paths.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Domain types, the error taxonomy, and the validation
//! harness live in the [`integration`] crate; this crate only supplies the
//! side effects.
//!
//! ## Concurrency
//!
//! All operations are synchronous and blocking. Resolution mutates the tree it
//! searches and is not safe to run concurrently on the same project; callers
//! serialise it (once per compile session is enough).

pub mod compiler;
pub mod error;
pub mod locator;
pub mod paths;
pub mod state_files;
pub mod templates;

pub use compiler::{CompileReport, Compiler, CompilerMessage, MessageKind};
pub use error::{CompileError, FileError};
pub use locator::BinaryLocator;
