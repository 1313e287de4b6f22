//! Tool records
//!
//! `ToolDescriptor` is the record handed to callers by the tool listing;
//! `ToolInfo` is what a scan produces before it is stored.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Where a tool comes from. Unknown sources are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolSource {
    /// Built-in tool shipped with the backend
    Local,
    /// Tool discovered on an MCP server
    Mcp,
    /// LangChain-decorated function
    Langchain,
    /// Anything else, including the empty string
    Other(String),
}

impl ToolSource {
    /// Canonical string form
    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Mcp => "mcp",
            Self::Langchain => "langchain",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for ToolSource {
    fn from(s: &str) -> Self {
        match s {
            "local" => Self::Local,
            "mcp" => Self::Mcp,
            "langchain" => Self::Langchain,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ToolSource {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<ToolSource> for String {
    fn from(source: ToolSource) -> Self {
        source.as_str().to_string()
    }
}

impl fmt::Display for ToolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Init-time parameter of a tool (`params` list entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParam {
    pub name: String,
    #[serde(rename = "type", default = "default_param_type")]
    pub param_type: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub description: String,
}

fn default_param_type() -> String {
    "string".to_string()
}

/// A tool as listed for one tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// String form of the integer tool id
    #[serde(alias = "tool_id", deserialize_with = "string_or_int")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub origin_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub source: ToolSource,
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Encoded parameter mapping, see [`crate::inputs::normalize_inputs`]
    #[serde(default)]
    pub inputs: Option<String>,
    #[serde(default)]
    pub params: Vec<ToolParam>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub create_time: Option<String>,
}

fn default_true() -> bool {
    true
}

fn string_or_int<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or integer id, got {}",
            other
        ))),
    }
}

impl ToolDescriptor {
    /// Create a descriptor with only the identifying fields set
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: ToolSource) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            origin_name: None,
            description: None,
            source,
            usage: None,
            category: None,
            inputs: None,
            params: Vec::new(),
            is_available: true,
            create_time: None,
        }
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_inputs(mut self, inputs: impl Into<String>) -> Self {
        self.inputs = Some(inputs.into());
        self
    }

    pub fn with_create_time(mut self, create_time: impl Into<String>) -> Self {
        self.create_time = Some(create_time.into());
        self
    }
}

/// A tool as produced by a scan, before it gets a tenant-scoped id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub params: Vec<ToolParam>,
    pub source: ToolSource,
    pub inputs: String,
    pub output_type: String,
    pub class_name: String,
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(default)]
    pub origin_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}
