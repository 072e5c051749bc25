//! Core integration domain for inkbridge.
//!
//! This crate contains the domain concepts shared by the editor-integration
//! layer: the names of the compiler binary and its companion runtime library,
//! the descriptors produced by binary resolution, the validation taxonomy, and
//! the port traits an ink story engine must implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! Filesystem relocation and process invocation live in the `toolchain` crate;
//! a concrete story engine lives in `story-json`.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype names (`ExecutableName`, `CompanionName`) |
//! | [`types`] | Value types (`ExecutableDescriptor`, `ValidationOutcome`, `Notice`, etc.) |
//! | [`config`] | `LocatorConfig` and per-platform executable naming |
//! | [`engine`] | `StoryEngine` / `StoryArtifact` ports and `EngineError` |
//! | [`validator`] | `ArtifactValidator`, the total validation harness |
//! | [`errors`] | `LocatorError` taxonomy for binary resolution |

pub mod config;
pub mod engine;
pub mod errors;
pub mod identifiers;
pub mod types;
pub mod validator;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{LocatorConfig, Platform};
pub use engine::{EngineError, StoryArtifact, StoryEngine};
pub use errors::LocatorError;
pub use identifiers::{CompanionName, ExecutableName};
pub use types::{
    CompanionState, ExecutableDescriptor, Notice, Relocation, RelocationKind, ResolvedExecutable,
    ValidationOutcome,
};
pub use validator::ArtifactValidator;
