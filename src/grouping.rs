//! Tool grouping for the configuration view
//!
//! Splits a flat tool list into source groups (`local`, `langchain`, one
//! group per MCP server, then anything else) and splits the `local` group
//! further by category. Pure function of its inputs: callers recompute it
//! whenever the tool list or the labels change.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{ToolDescriptor, ToolSource};
use crate::i18n::Labels;

/// Key of the group holding built-in tools
pub const LOCAL_GROUP: &str = "local";
/// Key of the group holding LangChain tools
pub const LANGCHAIN_GROUP: &str = "langchain";
/// Prefix of per-MCP-server group keys
pub const MCP_GROUP_PREFIX: &str = "mcp-";
/// Sentinel used when a grouping field is blank
pub const OTHER_KEY: &str = "other";

/// One top-level group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolGroup {
    pub key: String,
    pub label: String,
    /// Tools ordered by `create_time`, tools without one last
    pub tools: Vec<ToolDescriptor>,
    /// Category sub-groups; only set for the local group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryGroup>>,
}

/// One category inside the local group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub key: String,
    pub label: String,
    /// Tools ordered by name
    pub tools: Vec<ToolDescriptor>,
}

/// Group key and display label for a tool
pub fn group_key(tool: &ToolDescriptor, labels: &Labels) -> (String, String) {
    match &tool.source {
        ToolSource::Mcp => {
            let usage = non_blank(tool.usage.as_deref()).unwrap_or(OTHER_KEY);
            (format!("{}{}", MCP_GROUP_PREFIX, usage), usage.to_string())
        }
        ToolSource::Local => (LOCAL_GROUP.to_string(), labels.local.clone()),
        ToolSource::Langchain => (LANGCHAIN_GROUP.to_string(), labels.langchain.clone()),
        ToolSource::Other(source) => match non_blank(Some(source.as_str())) {
            Some(source) => (source.to_string(), source.to_string()),
            None => (OTHER_KEY.to_string(), labels.other.clone()),
        },
    }
}

/// Build the grouped view of `tools`
pub fn group_tools(tools: &[ToolDescriptor], labels: &Labels) -> Vec<ToolGroup> {
    let mut groups: Vec<ToolGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for tool in tools {
        let (key, label) = group_key(tool, labels);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(ToolGroup {
                key,
                label,
                tools: Vec::new(),
                categories: None,
            });
            groups.len() - 1
        });
        groups[slot].tools.push(tool.clone());
    }

    for group in &mut groups {
        group.tools.sort_by(|a, b| compare_create_time(a.create_time.as_deref(), b.create_time.as_deref()));
        if group.key == LOCAL_GROUP {
            group.categories = Some(group_categories(&group.tools, labels));
        }
    }

    // Stable: mcp groups and leftovers keep first-seen order.
    groups.sort_by_key(|g| group_rank(&g.key));
    groups
}

/// Category sub-groups of the local tools
pub fn group_categories(tools: &[ToolDescriptor], labels: &Labels) -> Vec<CategoryGroup> {
    let mut categories: Vec<CategoryGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for tool in tools {
        let key = non_blank(tool.category.as_deref())
            .unwrap_or(labels.other.as_str())
            .to_string();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            categories.push(CategoryGroup {
                label: key.clone(),
                key,
                tools: Vec::new(),
            });
            categories.len() - 1
        });
        categories[slot].tools.push(tool.clone());
    }

    for category in &mut categories {
        category.tools.sort_by(|a, b| locale_cmp(&a.name, &b.name));
    }

    let other = labels.other.as_str();
    categories.sort_by(|a, b| match (a.key == other, b.key == other) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => locale_cmp(&a.label, &b.label),
    });
    categories
}

/// Lexicographic on the raw strings; a missing timestamp sorts last
pub fn compare_create_time(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case-insensitive comparison, lowercase ahead of uppercase on ties
/// (`alpha` < `Zeta`, `abc` < `ABC`). Punctuation and symbols sort ahead
/// of digits, digits ahead of letters (`tool_1` < `tool1` < `toola`).
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase).map(collation_key);
    let folded_b = b.chars().flat_map(char::to_lowercase).map(collation_key);
    folded_a
        .cmp(folded_b)
        .then_with(|| {
            let case_a = a.chars().map(char::is_uppercase);
            let case_b = b.chars().map(char::is_uppercase);
            case_a.cmp(case_b)
        })
        .then_with(|| a.cmp(b))
}

fn collation_key(c: char) -> (u8, char) {
    let class = if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    };
    (class, c)
}

fn group_rank(key: &str) -> u8 {
    if key == LOCAL_GROUP {
        0
    } else if key == LANGCHAIN_GROUP {
        1
    } else if key.starts_with(MCP_GROUP_PREFIX) {
        2
    } else {
        3
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
