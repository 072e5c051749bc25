//! Total validation of compiled stories and saved story states.
//!
//! Every public method on [`ArtifactValidator`] returns a value; no engine
//! error or engine panic escapes. Parsed stories are owned by the caller of
//! [`ArtifactValidator::load_story`] and dropped at the end of every other
//! call.
//!
//! Panic containment relies on unwinding. A binary built with
//! `panic = "abort"` still aborts on an engine panic.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::{EngineError, StoryArtifact, StoryEngine, ValidationOutcome};

/// Validation harness over an injected [`StoryEngine`].
///
/// Holds no state besides the engine, so independent calls may run
/// concurrently when the engine is `Sync`.
#[derive(Debug, Clone, Default)]
pub struct ArtifactValidator<E> {
    engine: E,
}

impl<E: StoryEngine> ArtifactValidator<E> {
    /// Creates a validator over `engine`.
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Returns the wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Checks whether `story_json` parses into a story.
    ///
    /// The parsed story is discarded. The outcome always carries the cause of
    /// a failure; callers that only need a flag call
    /// [`ValidationOutcome::is_valid`].
    pub fn validate_story(&self, story_json: &str) -> ValidationOutcome {
        match self.load_story(story_json) {
            Ok(_) => ValidationOutcome::Valid,
            Err(e) => ValidationOutcome::InvalidStory(e),
        }
    }

    /// Parses `story_json` and hands the story to the caller.
    ///
    /// # Errors
    ///
    /// Returns the engine's failure, or [`EngineError::Panicked`] if the
    /// engine panicked. No story is returned on failure.
    pub fn load_story(&self, story_json: &str) -> Result<E::Story, EngineError> {
        contain(|| self.engine.parse(story_json)).inspect_err(|e| {
            debug!(error = %e, "Story failed to parse");
        })
    }

    /// Checks whether `state_json` loads into the story parsed from
    /// `story_json`.
    ///
    /// Returns [`ValidationOutcome::InvalidStory`] when the story itself does
    /// not parse; the state is not examined in that case.
    pub fn check_story_state(&self, story_json: &str, state_json: &str) -> ValidationOutcome {
        let mut story = match self.load_story(story_json) {
            Ok(story) => story,
            Err(e) => return ValidationOutcome::InvalidStory(e),
        };
        match contain(|| story.load_state(state_json)) {
            Ok(()) => ValidationOutcome::Valid,
            Err(e) => {
                debug!(error = %e, "Story state failed to load");
                ValidationOutcome::InvalidState(e)
            }
        }
    }

    /// Returns `false` only when the story is valid and the state fails to
    /// load into it.
    ///
    /// State validity is only meaningful relative to a valid story, so an
    /// invalid story yields `true`. Use [`Self::check_story_state`] to tell
    /// the two cases apart.
    pub fn validate_story_state(&self, story_json: &str, state_json: &str) -> bool {
        !matches!(
            self.check_story_state(story_json, state_json),
            ValidationOutcome::InvalidState(_)
        )
    }

    /// Returns `true` if `story_json` is a valid story declaring at least one
    /// global variable.
    pub fn story_contains_variables(&self, story_json: &str) -> bool {
        self.load_story(story_json)
            .ok()
            .and_then(|story| contain(|| Ok(story.has_variables())).ok())
            .unwrap_or(false)
    }
}

/// Runs an engine call, converting a panic into [`EngineError::Panicked`].
fn contain<T>(op: impl FnOnce() -> Result<T, EngineError>) -> Result<T, EngineError> {
    panic::catch_unwind(AssertUnwindSafe(op)).unwrap_or_else(|payload| {
        Err(EngineError::Panicked {
            message: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Accepts `"story"`/`"story+vars"`; loads state `"ok"`; panics on `"boom"`.
    struct FakeEngine;

    struct FakeStory {
        vars: bool,
    }

    impl StoryArtifact for FakeStory {
        fn load_state(&mut self, state_json: &str) -> Result<(), EngineError> {
            match state_json {
                "ok" => Ok(()),
                "boom" => panic!("state exploded"),
                other => Err(EngineError::Invariant {
                    message: format!("bad state {other}"),
                }),
            }
        }

        fn save_state(&self) -> Result<String, EngineError> {
            Ok("ok".to_string())
        }

        fn has_variables(&self) -> bool {
            self.vars
        }
    }

    impl StoryEngine for FakeEngine {
        type Story = FakeStory;

        fn parse(&self, story_json: &str) -> Result<FakeStory, EngineError> {
            match story_json {
                "story" => Ok(FakeStory { vars: false }),
                "story+vars" => Ok(FakeStory { vars: true }),
                "boom" => panic!("parser exploded"),
                _ => Err(EngineError::Syntax {
                    format: "story",
                    message: "expected value".to_string(),
                }),
            }
        }
    }

    fn validator() -> ArtifactValidator<FakeEngine> {
        ArtifactValidator::new(FakeEngine)
    }

    #[test]
    fn valid_story_is_valid() {
        assert_eq!(validator().validate_story("story"), ValidationOutcome::Valid);
    }

    #[test]
    fn invalid_story_carries_cause() {
        let outcome = validator().validate_story("not json");
        assert!(!outcome.is_valid());
        assert!(matches!(outcome.cause(), Some(EngineError::Syntax { .. })));
    }

    #[test]
    fn engine_panic_is_contained() {
        let outcome = validator().validate_story("boom");
        assert_eq!(
            outcome,
            ValidationOutcome::InvalidStory(EngineError::Panicked {
                message: "parser exploded".to_string()
            })
        );
    }

    #[test]
    fn load_story_returns_artifact_on_success_only() {
        assert!(validator().load_story("story").is_ok());
        assert!(validator().load_story("nope").is_err());
    }

    #[test]
    fn state_checks() {
        let v = validator();
        assert!(v.validate_story_state("story", "ok"));
        assert!(!v.validate_story_state("story", "garbage"));
        assert!(!v.validate_story_state("story", "boom"));
    }

    #[test]
    fn invalid_story_short_circuits_state_check_to_true() {
        let v = validator();
        assert!(v.validate_story_state("nope", "garbage"));
        assert!(matches!(
            v.check_story_state("nope", "garbage"),
            ValidationOutcome::InvalidStory(_)
        ));
    }

    #[test]
    fn variables_are_reported_for_valid_stories_only() {
        let v = validator();
        assert!(v.story_contains_variables("story+vars"));
        assert!(!v.story_contains_variables("story"));
        assert!(!v.story_contains_variables("nope"));
    }
}
