//! Per-agent tool configuration and validation requests

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::tool::ToolSource;

/// Saved configuration of one tool for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInstance {
    pub tool_instance_id: i64,
    pub tool_id: i64,
    pub agent_id: i64,
    pub params: Map<String, Value>,
    pub enabled: bool,
    pub tenant_id: String,
    pub user_id: String,
    pub create_time: String,
    pub update_time: String,
}

/// Create-or-update request for a tool instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInstanceRequest {
    pub tool_id: i64,
    pub agent_id: i64,
    #[serde(default)]
    pub params: Map<String, Value>,
    pub enabled: bool,
}

/// Result of looking up an agent's configuration for a tool.
///
/// `params` is `None` when the agent never configured the tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceLookup {
    pub params: Option<Map<String, Value>>,
    pub enabled: bool,
}

impl InstanceLookup {
    pub fn missing() -> Self {
        Self {
            params: None,
            enabled: false,
        }
    }
}

impl From<ToolInstance> for InstanceLookup {
    fn from(instance: ToolInstance) -> Self {
        Self {
            params: Some(instance.params),
            enabled: instance.enabled,
        }
    }
}

/// Request to try a tool out with concrete inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolValidateRequest {
    pub name: String,
    pub source: ToolSource,
    #[serde(default)]
    pub usage: Option<String>,
    /// Call-time arguments
    #[serde(default)]
    pub inputs: Option<Map<String, Value>>,
    /// Init-time parameters (local tools only)
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_missing() {
        let lookup = InstanceLookup::missing();
        assert!(lookup.params.is_none());
        assert!(!lookup.enabled);
    }

    #[test]
    fn test_instance_request_defaults_params() {
        let req: ToolInstanceRequest =
            serde_json::from_str(r#"{"tool_id": 1, "agent_id": 2, "enabled": true}"#).unwrap();
        assert!(req.params.is_empty());
        assert!(req.enabled);
    }

    #[test]
    fn test_validate_request_deserialization() {
        let json = r#"{
            "name": "get_weather",
            "source": "mcp",
            "usage": "weather",
            "inputs": {"city": "Berlin"}
        }"#;
        let req: ToolValidateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.source, ToolSource::Mcp);
        assert_eq!(req.usage.as_deref(), Some("weather"));
        assert_eq!(req.inputs.unwrap()["city"], "Berlin");
        assert!(req.params.is_none());
    }
}
