//! Port traits for the story engine collaborator.
//!
//! The interpreter that turns compiled JSON into a runnable story is an
//! external library. The integration layer only needs two capabilities from
//! it: parse a compiled story, and load a saved state into a parsed story.
//! Adapters (e.g. the `story-json` crate) implement these traits; the
//! [`crate::ArtifactValidator`] consumes them.

use thiserror::Error;

/// Failures reported by a story engine.
///
/// The validator treats every variant uniformly as "invalid"; the variants
/// exist so callers that ask for the cause can tell the user what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The text is not valid JSON or does not have the expected shape.
    #[error("Malformed {format} JSON: {message}")]
    Syntax {
        /// `"story"` or `"state"`.
        format: &'static str,
        /// Parser message, including position where available.
        message: String,
    },

    /// The artifact was written by an incompatible engine version.
    #[error("Unsupported {format} version {found} (supported {min}..={max})")]
    IncompatibleVersion {
        format: &'static str,
        found: i64,
        min: i64,
        max: i64,
    },

    /// The artifact parsed but violates an engine invariant
    /// (e.g. state references a variable the story never declares).
    #[error("Invariant violation: {message}")]
    Invariant {
        /// Description of the violated invariant.
        message: String,
    },

    /// The engine panicked while handling the artifact.
    #[error("Story engine panicked: {message}")]
    Panicked {
        /// Panic payload, when it was a string.
        message: String,
    },
}

/// A parsed, runnable story owned by the caller.
pub trait StoryArtifact {
    /// Replaces the story's runtime state with the serialised `state_json`.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the state is malformed, was saved by an
    /// incompatible engine version, or does not fit this story.
    fn load_state(&mut self, state_json: &str) -> Result<(), EngineError>;

    /// Serialises the story's current runtime state.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the state cannot be serialised.
    fn save_state(&self) -> Result<String, EngineError>;

    /// Returns `true` if the story declares at least one global variable.
    fn has_variables(&self) -> bool;
}

/// Factory for [`StoryArtifact`]s.
pub trait StoryEngine {
    /// The artifact type produced by [`StoryEngine::parse`].
    type Story: StoryArtifact;

    /// Parses compiled story JSON into a story.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] on malformed JSON, an unsupported format
    /// version, or an internally inconsistent story.
    fn parse(&self, story_json: &str) -> Result<Self::Story, EngineError>;
}

impl<E: StoryEngine + ?Sized> StoryEngine for &E {
    type Story = E::Story;

    fn parse(&self, story_json: &str) -> Result<Self::Story, EngineError> {
        (**self).parse(story_json)
    }
}
