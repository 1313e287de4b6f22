//! Converting MCP tool listings into scan records

use serde_json::{Map, Value};

use crate::domain::{ToolInfo, ToolSource};
use crate::schema::{fill_property_defaults, resolve_refs, sanitize_tool_name, to_literal_repr};

use super::client::McpTool;

/// Scan records for the tools one MCP server advertised.
///
/// `usage` is the server name. Inputs are stored in the literal style
/// produced by [`to_literal_repr`].
pub fn tool_infos_from_listing(server_name: &str, tools: &[McpTool]) -> Vec<ToolInfo> {
    tools.iter().map(|tool| tool_info_from_mcp(server_name, tool)).collect()
}

fn tool_info_from_mcp(server_name: &str, tool: &McpTool) -> ToolInfo {
    let schema = resolve_refs(&tool.input_schema);
    let mut properties = match schema.get("properties") {
        Some(Value::Object(props)) => props.clone(),
        _ => Map::new(),
    };
    fill_property_defaults(&mut properties);

    ToolInfo {
        name: sanitize_tool_name(&tool.name),
        description: tool.description.clone().unwrap_or_default(),
        params: Vec::new(),
        source: ToolSource::Mcp,
        inputs: to_literal_repr(&Value::Object(properties)),
        output_type: "string".to_string(),
        class_name: tool.name.clone(),
        usage: Some(server_name.to_string()),
        origin_name: Some(tool.name.clone()),
        category: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{normalize_inputs, param_names};
    use serde_json::json;

    fn mcp_tool(name: &str, schema: Value) -> McpTool {
        McpTool {
            name: name.to_string(),
            description: Some(format!("{} tool", name)),
            input_schema: schema,
        }
    }

    #[test]
    fn test_listing_basic_fields() {
        let tools = vec![mcp_tool(
            "get-weather",
            json!({"type": "object", "properties": {"city": {"type": "string", "description": "City"}}}),
        )];
        let infos = tool_infos_from_listing("weather", &tools);
        assert_eq!(infos.len(), 1);
        let info = &infos[0];
        assert_eq!(info.name, "get_weather");
        assert_eq!(info.origin_name.as_deref(), Some("get-weather"));
        assert_eq!(info.usage.as_deref(), Some("weather"));
        assert_eq!(info.source, ToolSource::Mcp);
        assert_eq!(info.output_type, "string");
        assert_eq!(info.inputs, "{'city': {'type': 'string', 'description': 'City'}}");
    }

    #[test]
    fn test_listing_fills_defaults_and_resolves_refs() {
        let tools = vec![mcp_tool(
            "lookup",
            json!({
                "type": "object",
                "properties": {
                    "filter": {"$ref": "#/$defs/Filter"},
                    "limit": {"default": null}
                },
                "$defs": {"Filter": {"type": "object", "description": "Filter options"}}
            }),
        )];
        let info = &tool_infos_from_listing("nexent", &tools)[0];
        let inputs = normalize_inputs(Some(&info.inputs));
        assert_eq!(param_names(&inputs), vec!["filter", "limit"]);
        assert_eq!(inputs["filter"]["type"], "object");
        assert_eq!(inputs["limit"]["type"], "string");
        assert_eq!(inputs["limit"]["description"], "see tool description");
        assert_eq!(inputs["limit"]["default"], Value::Null);
    }

    #[test]
    fn test_listing_without_properties() {
        let tools = vec![mcp_tool("ping", json!({"type": "object"}))];
        let info = &tool_infos_from_listing("s", &tools)[0];
        assert_eq!(info.inputs, "{}");
        assert!(normalize_inputs(Some(&info.inputs)).is_empty());
    }
}
