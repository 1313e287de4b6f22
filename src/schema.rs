//! Schema helpers used when scanning tools
//!
//! Type-name mapping for catalog parameters, MCP input schema cleanup, and
//! the single-quoted literal encoding that MCP tool inputs are stored in.

use serde_json::{Map, Value};

/// Description given to MCP properties that lack one
pub const DEFAULT_PROPERTY_DESCRIPTION: &str = "see tool description";
/// Type given to MCP properties that lack one
pub const DEFAULT_PROPERTY_TYPE: &str = "string";

const MAX_REF_DEPTH: usize = 32;

/// Map a host-language type name onto a JSON schema type name.
///
/// Unknown names pass through unchanged; an empty name means "string".
pub fn json_schema_type(type_name: &str) -> String {
    let mapped = match type_name.trim() {
        "" => "string",
        "str" => "string",
        "int" => "integer",
        "float" => "float",
        "bool" => "boolean",
        "list" | "List" | "tuple" | "Tuple" => "array",
        "dict" | "Dict" => "object",
        "Any" => "any",
        other => other,
    };
    mapped.to_string()
}

/// Make an MCP tool name usable as a function identifier
pub fn sanitize_tool_name(name: &str) -> String {
    let mut sanitized: String = name
        .replace('-', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if sanitized.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        sanitized.insert(0, '_');
    }
    sanitized
}

/// Inline local `$ref`s (`#/$defs/..`, `#/definitions/..`) and drop `$defs`.
///
/// Unresolvable or too deeply nested references are left as they are.
pub fn resolve_refs(schema: &Value) -> Value {
    let defs = collect_defs(schema);
    let mut resolved = inline(schema, &defs, 0);
    if let Value::Object(map) = &mut resolved {
        map.remove("$defs");
    }
    resolved
}

fn collect_defs(schema: &Value) -> Map<String, Value> {
    let mut defs = Map::new();
    for section in ["definitions", "$defs"] {
        if let Some(Value::Object(entries)) = schema.get(section) {
            for (name, def) in entries {
                defs.insert(format!("#/{}/{}", section, name), def.clone());
            }
        }
    }
    defs
}

fn inline(value: &Value, defs: &Map<String, Value>, depth: usize) -> Value {
    match value {
        Value::Object(map) => {
            if let Some(target) = map.get("$ref").and_then(Value::as_str)
                && depth < MAX_REF_DEPTH
                && let Some(def) = defs.get(target)
            {
                return inline(def, defs, depth + 1);
            }
            Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), inline(v, defs, depth)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(|v| inline(v, defs, depth)).collect()),
        other => other.clone(),
    }
}

/// Give every property a `description` and a `type`
pub fn fill_property_defaults(properties: &mut Map<String, Value>) {
    for property in properties.values_mut() {
        if let Value::Object(prop) = property {
            prop.entry("description")
                .or_insert_with(|| Value::String(DEFAULT_PROPERTY_DESCRIPTION.to_string()));
            prop.entry("type")
                .or_insert_with(|| Value::String(DEFAULT_PROPERTY_TYPE.to_string()));
        }
    }
}

/// Encode a value in the single-quoted literal style
/// (`{'a': {'type': 'string', 'default': None}}`).
pub fn to_literal_repr(value: &Value) -> String {
    let mut out = String::new();
    write_literal(value, &mut out);
    out
}

fn write_literal(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_literal_str(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_literal(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_literal_str(key, out);
                out.push_str(": ");
                write_literal(item, out);
            }
            out.push('}');
        }
    }
}

// Single quotes unless the text has a single quote and no double quote.
fn write_literal_str(s: &str, out: &mut String) {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_schema_type_basic_types() {
        assert_eq!(json_schema_type("str"), "string");
        assert_eq!(json_schema_type("int"), "integer");
        assert_eq!(json_schema_type("float"), "float");
        assert_eq!(json_schema_type("bool"), "boolean");
        assert_eq!(json_schema_type("list"), "array");
        assert_eq!(json_schema_type("Tuple"), "array");
        assert_eq!(json_schema_type("Dict"), "object");
        assert_eq!(json_schema_type("Any"), "any");
    }

    #[test]
    fn test_json_schema_type_empty_and_unknown() {
        assert_eq!(json_schema_type(""), "string");
        assert_eq!(json_schema_type("CustomType"), "CustomType");
    }

    #[test]
    fn test_sanitize_tool_name() {
        assert_eq!(sanitize_tool_name("get-weather"), "get_weather");
        assert_eq!(sanitize_tool_name("search.web!"), "searchweb");
        assert_eq!(sanitize_tool_name("3d_render"), "_3d_render");
        assert_eq!(sanitize_tool_name("plain"), "plain");
    }

    #[test]
    fn test_resolve_refs_inlines_defs() {
        let schema = json!({
            "type": "object",
            "properties": {
                "location": {"$ref": "#/$defs/Location"},
                "units": {"type": "string"}
            },
            "$defs": {
                "Location": {"type": "object", "properties": {"city": {"type": "string"}}}
            }
        });
        let resolved = resolve_refs(&schema);
        assert!(resolved.get("$defs").is_none());
        assert_eq!(resolved["properties"]["location"]["type"], "object");
        assert_eq!(resolved["properties"]["location"]["properties"]["city"]["type"], "string");
    }

    #[test]
    fn test_resolve_refs_stops_on_cycles() {
        let schema = json!({
            "properties": {"node": {"$ref": "#/$defs/Node"}},
            "$defs": {"Node": {"properties": {"next": {"$ref": "#/$defs/Node"}}}}
        });
        let resolved = resolve_refs(&schema);
        assert!(resolved["properties"]["node"]["properties"]["next"].is_object());
    }

    #[test]
    fn test_resolve_refs_keeps_unknown_refs() {
        let schema = json!({"properties": {"x": {"$ref": "https://example.com/schema"}}});
        assert_eq!(resolve_refs(&schema), schema);
    }

    #[test]
    fn test_fill_property_defaults() {
        let mut props = json!({
            "city": {},
            "days": {"type": "integer", "description": "Forecast days"}
        })
        .as_object()
        .cloned()
        .unwrap();
        fill_property_defaults(&mut props);
        assert_eq!(props["city"]["description"], DEFAULT_PROPERTY_DESCRIPTION);
        assert_eq!(props["city"]["type"], "string");
        assert_eq!(props["days"]["type"], "integer");
        assert_eq!(props["days"]["description"], "Forecast days");
    }

    #[test]
    fn test_to_literal_repr() {
        let value = json!({"a": {"type": "string", "default": null}, "b": [true, false, 1.5]});
        assert_eq!(
            to_literal_repr(&value),
            "{'a': {'type': 'string', 'default': None}, 'b': [True, False, 1.5]}"
        );
    }

    #[test]
    fn test_to_literal_repr_quoting() {
        assert_eq!(to_literal_repr(&json!("it's")), r#""it's""#);
        assert_eq!(to_literal_repr(&json!("say \"hi\"")), r#"'say "hi"'"#);
        assert_eq!(to_literal_repr(&json!("a'b\"c")), r#"'a\'b"c'"#);
        assert_eq!(to_literal_repr(&json!("line\nbreak")), r"'line\nbreak'");
    }
}
