//! Saved story state document.

use std::collections::BTreeMap;

use integration::EngineError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{SAVE_VERSION_CURRENT, SAVE_VERSION_MINIMUM_COMPATIBLE};

pub(crate) const DEFAULT_FLOW_NAME: &str = "DEFAULT_FLOW";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SaveState {
    pub ink_save_version: i64,

    /// Named flows (save version 10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flows: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_flow_name: Option<String>,

    /// Single-flow call stack (save versions before 10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callstack_threads: Option<Value>,

    pub variables_state: BTreeMap<String, Value>,

    #[serde(default)]
    pub eval_stack: Vec<Value>,

    #[serde(default)]
    pub visit_counts: BTreeMap<String, Value>,

    #[serde(default)]
    pub turn_indices: BTreeMap<String, Value>,

    #[serde(default = "initial_turn_index")]
    pub turn_idx: i64,

    #[serde(default)]
    pub story_seed: i64,

    #[serde(default)]
    pub previous_random: i64,
}

fn initial_turn_index() -> i64 {
    -1
}

fn syntax(message: impl Into<String>) -> EngineError {
    EngineError::Syntax {
        format: "state",
        message: message.into(),
    }
}

impl SaveState {
    /// A fresh state at the start of the default flow.
    pub fn initial(variables: BTreeMap<String, Value>) -> Self {
        let mut flows = Map::new();
        flows.insert(
            DEFAULT_FLOW_NAME.to_string(),
            json!({
                "callstack": {
                    "threads": [{
                        "callstack": [{ "cPath": "", "idx": 0, "exp": false, "type": 0 }],
                        "threadIndex": 0
                    }],
                    "threadCounter": 0
                },
                "outputStream": [],
                "choiceThreads": {},
                "currentChoices": []
            }),
        );
        Self {
            ink_save_version: SAVE_VERSION_CURRENT,
            flows: Some(flows),
            current_flow_name: Some(DEFAULT_FLOW_NAME.to_string()),
            callstack_threads: None,
            variables_state: variables,
            eval_stack: Vec::new(),
            visit_counts: BTreeMap::new(),
            turn_indices: BTreeMap::new(),
            turn_idx: initial_turn_index(),
            story_seed: 0,
            previous_random: 0,
        }
    }

    /// Decodes and structurally checks a saved state.
    ///
    /// Version compatibility is checked before the rest of the shape, so an
    /// old or future save reports the version rather than a missing field.
    pub fn decode(state_json: &str) -> Result<Self, EngineError> {
        let value: Value = serde_json::from_str(state_json).map_err(|e| syntax(e.to_string()))?;
        let version = value
            .as_object()
            .ok_or_else(|| syntax("expected a JSON object"))?
            .get("inkSaveVersion")
            .and_then(Value::as_i64)
            .ok_or_else(|| syntax("missing integer 'inkSaveVersion'"))?;
        if !(SAVE_VERSION_MINIMUM_COMPATIBLE..=SAVE_VERSION_CURRENT).contains(&version) {
            return Err(EngineError::IncompatibleVersion {
                format: "state",
                found: version,
                min: SAVE_VERSION_MINIMUM_COMPATIBLE,
                max: SAVE_VERSION_CURRENT,
            });
        }

        let state: SaveState = serde_json::from_value(value).map_err(|e| syntax(e.to_string()))?;
        match (&state.flows, &state.callstack_threads) {
            (None, None) => {
                return Err(syntax("state has neither 'flows' nor 'callstackThreads'"));
            }
            (Some(flows), _) => {
                if let Some((name, _)) = flows
                    .iter()
                    .find(|(_, flow)| !flow.as_object().is_some_and(|f| f.contains_key("callstack")))
                {
                    return Err(syntax(format!("flow '{name}' has no 'callstack' object")));
                }
                if let Some(current) = &state.current_flow_name {
                    if !flows.contains_key(current) {
                        return Err(EngineError::Invariant {
                            message: format!("current flow '{current}' is not among saved flows"),
                        });
                    }
                }
            }
            (None, Some(_)) => {}
        }
        Ok(state)
    }
}
