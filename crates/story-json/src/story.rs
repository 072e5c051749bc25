//! Compiled story parsing and the [`StoryEngine`] implementation.

use std::collections::BTreeMap;

use integration::{EngineError, StoryArtifact, StoryEngine};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::state::SaveState;
use crate::{INK_VERSION_CURRENT, INK_VERSION_MINIMUM_COMPATIBLE};

/// Name of the container holding global variable declarations.
const GLOBAL_DECL: &str = "global decl";

/// Stateless engine producing [`JsonStory`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStoryEngine;

impl StoryEngine for JsonStoryEngine {
    type Story = JsonStory;

    fn parse(&self, story_json: &str) -> Result<JsonStory, EngineError> {
        JsonStory::parse(story_json)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoryDocument {
    ink_version: i64,
    root: Vec<Value>,
    #[serde(default)]
    list_defs: Option<Map<String, Value>>,
}

/// A compiled story with its declared globals and current state.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonStory {
    /// Declared globals and their initial values.
    globals: BTreeMap<String, Value>,
    state: SaveState,
}

fn syntax(message: impl Into<String>) -> EngineError {
    EngineError::Syntax {
        format: "story",
        message: message.into(),
    }
}

impl JsonStory {
    /// Parses compiled story JSON.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Syntax`] for invalid JSON, a missing `root` array, or a
    ///   `listDefs` value that is not an object.
    /// - [`EngineError::IncompatibleVersion`] for an unsupported `inkVersion`.
    /// - [`EngineError::Invariant`] if a global is declared twice.
    pub fn parse(story_json: &str) -> Result<Self, EngineError> {
        let value: Value = serde_json::from_str(story_json).map_err(|e| syntax(e.to_string()))?;
        let version = value
            .as_object()
            .ok_or_else(|| syntax("expected a JSON object"))?
            .get("inkVersion")
            .and_then(Value::as_i64)
            .ok_or_else(|| syntax("missing integer 'inkVersion'"))?;
        if !(INK_VERSION_MINIMUM_COMPATIBLE..=INK_VERSION_CURRENT).contains(&version) {
            return Err(EngineError::IncompatibleVersion {
                format: "story",
                found: version,
                min: INK_VERSION_MINIMUM_COMPATIBLE,
                max: INK_VERSION_CURRENT,
            });
        }

        let document: StoryDocument =
            serde_json::from_value(value).map_err(|e| syntax(e.to_string()))?;
        let globals = declared_globals(&document.root)?;
        debug!(
            ink_version = document.ink_version,
            globals = globals.len(),
            lists = document.list_defs.as_ref().map_or(0, Map::len),
            "Parsed compiled story"
        );

        Ok(Self {
            state: SaveState::initial(globals.clone()),
            globals,
        })
    }

    /// Current value of a global variable.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.state.variables_state.get(name)
    }
}

impl StoryArtifact for JsonStory {
    /// Replaces the current state. The story is unchanged on error.
    fn load_state(&mut self, state_json: &str) -> Result<(), EngineError> {
        let mut state = SaveState::decode(state_json)?;
        if let Some(unknown) = state
            .variables_state
            .keys()
            .find(|name| !self.globals.contains_key(*name))
        {
            return Err(EngineError::Invariant {
                message: format!("state sets variable '{unknown}' which the story never declares"),
            });
        }

        let mut variables = self.globals.clone();
        variables.append(&mut state.variables_state);
        state.variables_state = variables;
        self.state = state;
        Ok(())
    }

    fn save_state(&self) -> Result<String, EngineError> {
        serde_json::to_string(&self.state).map_err(|e| EngineError::Invariant {
            message: format!("state could not be serialised: {e}"),
        })
    }

    fn has_variables(&self) -> bool {
        !self.globals.is_empty()
    }
}

/// Reads `{"VAR=": name}` declarations from the `global decl` container in
/// the last element of `root`.
///
/// The initial value is the literal pushed just before the declaration; for
/// strings that is the `^text` element before the closing `/str`.
fn declared_globals(root: &[Value]) -> Result<BTreeMap<String, Value>, EngineError> {
    let mut globals = BTreeMap::new();
    let Some(decl) = root
        .last()
        .and_then(Value::as_object)
        .and_then(|named| named.get(GLOBAL_DECL))
    else {
        return Ok(globals);
    };
    let items = decl
        .as_array()
        .ok_or_else(|| syntax("'global decl' must be an array"))?;

    for (index, item) in items.iter().enumerate() {
        let Some(declaration) = item.as_object() else {
            continue;
        };
        let Some(name) = declaration.get("VAR=").and_then(Value::as_str) else {
            continue;
        };
        if declaration.contains_key("re") {
            continue;
        }
        let initial = initial_value(&items[..index]);
        if globals.insert(name.to_string(), initial).is_some() {
            return Err(EngineError::Invariant {
                message: format!("global variable '{name}' is declared twice"),
            });
        }
    }
    Ok(globals)
}

fn initial_value(preceding: &[Value]) -> Value {
    match preceding {
        [.., text, Value::String(end)] if end == "/str" => match text.as_str() {
            Some(s) => Value::String(s.strip_prefix('^').unwrap_or(s).to_string()),
            None => Value::Null,
        },
        [.., Value::String(s)] if s == "ev" || s.starts_with('/') => Value::Null,
        [.., last] => last.clone(),
        [] => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_numeric_and_string_globals() {
        let root = vec![
            json!("done"),
            json!({
                "global decl": ["ev", 5, {"VAR=": "health"}, "str", "^Ann", "/str", {"VAR=": "name"}, "/ev", "end", null]
            }),
        ];
        let globals = declared_globals(&root).unwrap();
        assert_eq!(globals.get("health"), Some(&json!(5)));
        assert_eq!(globals.get("name"), Some(&json!("Ann")));
    }

    #[test]
    fn story_without_global_decl_has_no_variables() {
        let globals = declared_globals(&[json!("done"), json!(null)]).unwrap();
        assert!(globals.is_empty());
    }

    #[test]
    fn duplicate_declaration_is_an_invariant_violation() {
        let root = vec![json!({
            "global decl": ["ev", 1, {"VAR=": "x"}, 2, {"VAR=": "x"}, "/ev", "end", null]
        })];
        assert!(matches!(
            declared_globals(&root),
            Err(EngineError::Invariant { .. })
        ));
    }

    #[test]
    fn reassignment_is_not_a_declaration() {
        let root = vec![json!({
            "global decl": ["ev", 1, {"VAR=": "x"}, 2, {"VAR=": "x", "re": true}, "/ev", "end", null]
        })];
        assert_eq!(declared_globals(&root).unwrap().len(), 1);
    }
}
