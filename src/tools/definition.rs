//! Catalog tool definitions
//!
//! A `CatalogTool` describes a local or LangChain tool the way it is written
//! in the catalog file, and converts into the `ToolInfo` a scan stores.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{ToolInfo, ToolParam, ToolSource};
use crate::schema::json_schema_type;

/// Description given to LangChain inputs that lack one
pub const DEFAULT_LANGCHAIN_DESCRIPTION: &str = "see the description";

/// Init-time parameter as written in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogParam {
    pub name: String,
    /// Host type name (`str`, `int`, `List`, ...)
    #[serde(rename = "type", default)]
    pub param_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default: Option<Value>,
    /// Defaults to whether a default value is given
    #[serde(default)]
    pub optional: Option<bool>,
}

impl CatalogParam {
    fn to_tool_param(&self) -> ToolParam {
        ToolParam {
            name: self.name.clone(),
            param_type: json_schema_type(&self.param_type),
            optional: self.optional.unwrap_or(self.default.is_some()),
            default: self.default.clone(),
            description: self.description.clone(),
        }
    }
}

/// A tool definition with execution metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_source")]
    pub source: ToolSource,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_output_type")]
    pub output_type: String,
    /// Call-time inputs: name -> `{type, description, default}`
    #[serde(default)]
    pub inputs: Map<String, Value>,
    /// Init-time parameters
    #[serde(default)]
    pub params: Vec<CatalogParam>,
    /// Implementation class name; defaults to the tool name
    #[serde(default)]
    pub class_name: Option<String>,
    /// Shell command used to run the tool
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_source() -> ToolSource {
    ToolSource::Local
}

fn default_output_type() -> String {
    "string".to_string()
}

impl CatalogTool {
    /// Create a new local tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            source: ToolSource::Local,
            category: None,
            output_type: default_output_type(),
            inputs: Map::new(),
            params: Vec::new(),
            class_name: None,
            command: None,
            timeout_ms: None,
        }
    }

    pub fn with_source(mut self, source: ToolSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_input(mut self, name: impl Into<String>, descriptor: Value) -> Self {
        self.inputs.insert(name.into(), descriptor);
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Scan record for this tool.
    ///
    /// Inputs are encoded as JSON text. LangChain inputs missing a description
    /// get a placeholder, and LangChain tools carry no category or params.
    pub fn to_tool_info(&self) -> ToolInfo {
        let mut inputs = self.inputs.clone();
        let (params, category) = match self.source {
            ToolSource::Langchain => {
                for descriptor in inputs.values_mut() {
                    if let Value::Object(obj) = descriptor {
                        obj.entry("description")
                            .or_insert_with(|| Value::String(DEFAULT_LANGCHAIN_DESCRIPTION.to_string()));
                    }
                }
                (Vec::new(), None)
            }
            _ => (
                self.params.iter().map(CatalogParam::to_tool_param).collect(),
                self.category.clone(),
            ),
        };

        ToolInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            params,
            source: self.source.clone(),
            inputs: Value::Object(inputs).to_string(),
            output_type: self.output_type.clone(),
            class_name: self.class_name.clone().unwrap_or_else(|| self.name.clone()),
            usage: None,
            origin_name: Some(self.name.clone()),
            category,
        }
    }
}
