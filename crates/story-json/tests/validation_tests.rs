//! Artifact validation against the JSON story engine.

use integration::{ArtifactValidator, EngineError, StoryArtifact, ValidationOutcome};
use pretty_assertions::assert_eq;
use story_json::{JsonStory, JsonStoryEngine};

const STORY: &str = r##"{
    "inkVersion": 21,
    "root": [
        ["^Hello.", "\n", ["done", {"#n": "g-0"}], null],
        "done",
        {
            "global decl": ["ev", 5, {"VAR=": "health"}, "str", "^Ann", "/str", {"VAR=": "name"}, "/ev", "end", null],
            "#f": 1
        }
    ],
    "listDefs": {}
}"##;

const STORY_WITHOUT_GLOBALS: &str = r#"{"inkVersion": 20, "root": [["^Hi.", "\n", "done", null], "done", null]}"#;

fn validator() -> ArtifactValidator<JsonStoryEngine> {
    ArtifactValidator::new(JsonStoryEngine)
}

#[test]
fn test_compiled_story_is_valid() {
    assert_eq!(validator().validate_story(STORY), ValidationOutcome::Valid);
    assert_eq!(
        validator().validate_story(STORY_WITHOUT_GLOBALS),
        ValidationOutcome::Valid
    );
}

#[test]
fn test_non_json_is_invalid_with_cause() {
    for text in ["", "not json", "{\"inkVersion\": 21,", "[1, 2"] {
        let outcome = validator().validate_story(text);
        assert!(!outcome.is_valid(), "{text:?} should be invalid");
        assert!(
            matches!(outcome.cause(), Some(EngineError::Syntax { .. })),
            "{text:?} should carry a syntax error"
        );
    }
}

#[test]
fn test_unsupported_ink_version_is_reported() {
    let outcome = validator().validate_story(r#"{"inkVersion": 17, "root": []}"#);
    assert_eq!(
        outcome.into_cause(),
        Some(EngineError::IncompatibleVersion {
            format: "story",
            found: 17,
            min: 18,
            max: 21,
        })
    );
}

#[test]
fn test_missing_root_is_a_syntax_error() {
    let outcome = validator().validate_story(r#"{"inkVersion": 21}"#);
    assert!(matches!(outcome, ValidationOutcome::InvalidStory(EngineError::Syntax { .. })));
}

#[test]
fn test_non_object_list_definitions_are_a_syntax_error() {
    let outcome = validator().validate_story(r#"{"inkVersion": 21, "root": [], "listDefs": []}"#);
    assert!(matches!(outcome, ValidationOutcome::InvalidStory(EngineError::Syntax { .. })));
}

#[test]
fn test_saved_state_of_same_story_is_valid() {
    let story = validator().load_story(STORY).unwrap();
    let state = story.save_state().unwrap();

    assert!(validator().validate_story_state(STORY, &state));
    assert_eq!(validator().check_story_state(STORY, &state), ValidationOutcome::Valid);
}

#[test]
fn test_unrelated_state_is_invalid() {
    let state = r#"{
        "inkSaveVersion": 10,
        "flows": {"DEFAULT_FLOW": {"callstack": {"threads": [], "threadCounter": 0}}},
        "currentFlowName": "DEFAULT_FLOW",
        "variablesState": {"gold": 10}
    }"#;
    assert!(!validator().validate_story_state(STORY, state));
    assert!(matches!(
        validator().check_story_state(STORY, state),
        ValidationOutcome::InvalidState(EngineError::Invariant { .. })
    ));
}

#[test]
fn test_malformed_state_is_invalid() {
    for state in ["", "{}", "{\"inkSaveVersion\": 3}", "[]"] {
        assert!(
            !validator().validate_story_state(STORY, state),
            "{state:?} should be rejected"
        );
    }
}

#[test]
fn test_flow_without_call_stack_is_invalid() {
    let state = r#"{
        "inkSaveVersion": 10,
        "flows": {"DEFAULT_FLOW": 5},
        "currentFlowName": "DEFAULT_FLOW",
        "variablesState": {}
    }"#;
    assert!(!validator().validate_story_state(STORY, state));
    assert!(matches!(
        validator().check_story_state(STORY, state),
        ValidationOutcome::InvalidState(EngineError::Syntax { .. })
    ));
}

#[test]
fn test_invalid_story_makes_any_state_valid() {
    assert!(validator().validate_story_state("not json", "also not json"));
    assert!(validator().validate_story_state("{}", "{}"));
}

#[test]
fn test_loaded_state_overrides_variable_defaults() {
    let mut story: JsonStory = validator().load_story(STORY).unwrap();
    assert_eq!(story.variable("health"), Some(&serde_json::json!(5)));

    let state = r#"{
        "inkSaveVersion": 10,
        "flows": {"DEFAULT_FLOW": {"callstack": {"threads": [], "threadCounter": 0}}},
        "currentFlowName": "DEFAULT_FLOW",
        "variablesState": {"health": 2}
    }"#;
    story.load_state(state).unwrap();

    assert_eq!(story.variable("health"), Some(&serde_json::json!(2)));
    assert_eq!(story.variable("name"), Some(&serde_json::json!("Ann")));
}

#[test]
fn test_failed_state_load_leaves_story_unchanged() {
    let mut story = validator().load_story(STORY).unwrap();
    let before = story.clone();

    assert!(story.load_state(r#"{"inkSaveVersion": 10, "flows": {}, "variablesState": {"x": 1}}"#).is_err());
    assert_eq!(story, before);
}

#[test]
fn test_story_variables() {
    assert!(validator().story_contains_variables(STORY));
    assert!(!validator().story_contains_variables(STORY_WITHOUT_GLOBALS));
    assert!(!validator().story_contains_variables("oops"));
}
