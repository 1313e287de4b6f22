//! Tool input metadata normalization
//!
//! Tool records carry their call-time parameters as an encoded string. Local
//! tools store proper JSON, MCP tools were historically stored in a
//! single-quoted literal style (`{'city': {'type': 'string', 'default': None}}`).
//! Both are accepted here; anything else becomes an empty mapping.

use std::sync::LazyLock;

use log::{debug, warn};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter name -> descriptor, in the order the encoded string lists them
pub type InputsMap = Map<String, Value>;

static LITERAL_KEYWORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)(True|False|None)(?-u:\b)").expect("keyword pattern is valid"));

/// Parse an encoded inputs string into a parameter mapping.
///
/// Never fails: `None`, an empty string, or text that is valid neither as
/// JSON nor as the single-quoted literal form yields an empty mapping.
pub fn normalize_inputs(raw: Option<&str>) -> InputsMap {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return InputsMap::new(),
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => into_mapping(value),
        Err(_) => {
            let rewritten = rewrite_literal_syntax(raw);
            match serde_json::from_str::<Value>(&rewritten) {
                Ok(value) => into_mapping(value),
                Err(e) => {
                    warn!("Failed to parse tool inputs {:?}: {}", raw, e);
                    InputsMap::new()
                }
            }
        }
    }
}

/// Same as [`normalize_inputs`] for a raw JSON field; non-strings give an empty mapping.
pub fn normalize_inputs_value(raw: &Value) -> InputsMap {
    match raw {
        Value::String(s) => normalize_inputs(Some(s)),
        _ => InputsMap::new(),
    }
}

/// Parameter names in mapping order
pub fn param_names(inputs: &InputsMap) -> Vec<String> {
    inputs.keys().cloned().collect()
}

/// Blunt textual rewrite from the single-quoted literal style to JSON.
///
/// Double quotes become backticks first so they cannot collide with the
/// quotes introduced for single-quoted strings. A double quote inside a
/// single-quoted value therefore comes out as a backtick.
pub fn rewrite_literal_syntax(raw: &str) -> String {
    let requoted = raw.replace('"', "`").replace('\'', "\"");
    LITERAL_KEYWORDS
        .replace_all(&requoted, |caps: &Captures| match &caps[1] {
            "True" => "true",
            "False" => "false",
            _ => "null",
        })
        .into_owned()
}

fn into_mapping(value: Value) -> InputsMap {
    match value {
        Value::Object(map) => map,
        other => {
            debug!("Tool inputs parsed to a non-object value: {}", other);
            InputsMap::new()
        }
    }
}

/// Typed view of one parameter descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputParam {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Descriptors as typed values; entries that are not objects are skipped
pub fn typed_params(inputs: &InputsMap) -> Vec<InputParam> {
    inputs
        .iter()
        .filter_map(|(name, descriptor)| {
            let obj = descriptor.as_object()?;
            Some(InputParam {
                name: name.clone(),
                param_type: obj.get("type").and_then(Value::as_str).map(str::to_string),
                description: obj.get("description").and_then(Value::as_str).map(str::to_string),
                default: obj.get("default").cloned(),
            })
        })
        .collect()
}
