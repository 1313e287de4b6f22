//! Tool catalog loading from YAML
//!
//! Loads local and LangChain tool definitions from one or more YAML files
//! and provides lookup methods.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{ToolInfo, ToolSource};
use crate::error::{Result, ToolconfError};

use super::definition::CatalogTool;

/// YAML file structure
#[derive(Debug, Deserialize)]
struct YamlCatalog {
    #[serde(default)]
    tools: Vec<CatalogTool>,
}

/// Catalog of tool definitions, in file order
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<CatalogTool>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load catalog from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.load_file(path.as_ref())?;
        Ok(catalog)
    }

    /// Load every file matching a glob pattern, later files overriding earlier ones
    pub fn from_glob(pattern: &str) -> Result<Self> {
        let paths = glob::glob(pattern)
            .map_err(|e| ToolconfError::Catalog(format!("Invalid catalog pattern '{}': {}", pattern, e)))?;

        let mut catalog = Self::new();
        for entry in paths {
            let path = entry.map_err(|e| ToolconfError::Catalog(e.to_string()))?;
            catalog.load_file(&path)?;
        }
        Ok(catalog)
    }

    /// Load catalog from YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.merge_yaml(content)?;
        Ok(catalog)
    }

    fn load_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ToolconfError::Catalog(format!("Failed to read catalog file {}: {}", path.display(), e))
        })?;
        self.merge_yaml(&content)?;
        log::debug!("Loaded tool catalog from {}", path.display());
        Ok(())
    }

    fn merge_yaml(&mut self, content: &str) -> Result<()> {
        let parsed: YamlCatalog = serde_yaml::from_str(content)
            .map_err(|e| ToolconfError::Catalog(format!("Failed to parse YAML: {}", e)))?;

        for tool in parsed.tools {
            if !matches!(tool.source, ToolSource::Local | ToolSource::Langchain) {
                return Err(ToolconfError::Catalog(format!(
                    "Invalid source '{}' for tool '{}': catalog tools must be local or langchain",
                    tool.source, tool.name
                )));
            }
            self.add(tool);
        }
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&CatalogTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Get a tool by name and source
    pub fn find(&self, name: &str, source: &ToolSource) -> Option<&CatalogTool> {
        self.get(name).filter(|t| &t.source == source)
    }

    /// Scan records for every tool
    pub fn tool_infos(&self) -> Vec<ToolInfo> {
        self.tools.iter().map(CatalogTool::to_tool_info).collect()
    }

    /// Get number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Add a tool, replacing any tool with the same name
    pub fn add(&mut self, tool: CatalogTool) {
        match self.index.get(&tool.name) {
            Some(&i) => self.tools[i] = tool,
            None => {
                self.index.insert(tool.name.clone(), self.tools.len());
                self.tools.push(tool);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_YAML: &str = r#"
tools:
  - name: exa_web_search
    description: Search the web with EXA
    category: search
    inputs:
      query:
        type: string
        description: Search query
      max_results:
        type: integer
        default: 5
    params:
      - name: exa_api_key
        type: str
        description: EXA API key
      - name: top_k
        type: int
        default: 5
    command: "echo '{\"results\": []}'"

  - name: send_email
    description: Send an email
    category: email
    inputs:
      to:
        type: string
      subject:
        type: string

  - name: word_count
    description: Count words in text
    source: langchain
    inputs:
      text:
        type: string
"#;

    #[test]
    fn test_catalog_new_empty() {
        let catalog = ToolCatalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_catalog_from_yaml() {
        let catalog = ToolCatalog::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(catalog.len(), 3);
        let names: Vec<String> = catalog.tool_infos().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["exa_web_search", "send_email", "word_count"]);
        assert!(catalog.get("send_email").is_some());
    }

    #[test]
    fn test_catalog_get() {
        let catalog = ToolCatalog::from_yaml(SAMPLE_YAML).unwrap();
        let tool = catalog.get("exa_web_search").unwrap();
        assert_eq!(tool.category.as_deref(), Some("search"));
        assert_eq!(tool.params.len(), 2);
        assert!(tool.command.is_some());
        assert!(catalog.get("nonexistent").is_none());
    }

    #[test]
    fn test_catalog_find_checks_source() {
        let catalog = ToolCatalog::from_yaml(SAMPLE_YAML).unwrap();
        assert!(catalog.find("word_count", &ToolSource::Langchain).is_some());
        assert!(catalog.find("word_count", &ToolSource::Local).is_none());
    }

    #[test]
    fn test_catalog_preserves_input_order() {
        let catalog = ToolCatalog::from_yaml(SAMPLE_YAML).unwrap();
        let keys: Vec<&String> = catalog.get("exa_web_search").unwrap().inputs.keys().collect();
        assert_eq!(keys, vec!["query", "max_results"]);
    }

    #[test]
    fn test_catalog_tool_infos() {
        let catalog = ToolCatalog::from_yaml(SAMPLE_YAML).unwrap();
        let infos = catalog.tool_infos();
        assert_eq!(infos.len(), 3);
        assert_eq!(infos[2].source, ToolSource::Langchain);
        assert!(infos[0].inputs.starts_with('{'));
    }

    #[test]
    fn test_catalog_rejects_mcp_source() {
        let yaml = "tools:\n  - name: remote\n    source: mcp\n";
        let err = ToolCatalog::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ToolconfError::Catalog(_)));
    }

    #[test]
    fn test_catalog_invalid_yaml() {
        assert!(ToolCatalog::from_yaml("tools: [").is_err());
    }

    #[test]
    fn test_catalog_add_replaces() {
        let mut catalog = ToolCatalog::from_yaml(SAMPLE_YAML).unwrap();
        catalog.add(CatalogTool::new("send_email", "Replaced"));
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("send_email").unwrap().description, "Replaced");
    }

    #[test]
    fn test_catalog_from_glob_merges_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = std::fs::File::create(dir.path().join("a.yml")).unwrap();
        writeln!(first, "tools:\n  - name: one\n    description: first").unwrap();
        let mut second = std::fs::File::create(dir.path().join("b.yml")).unwrap();
        writeln!(second, "tools:\n  - name: one\n    description: second\n  - name: two").unwrap();

        let pattern = format!("{}/*.yml", dir.path().display());
        let catalog = ToolCatalog::from_glob(&pattern).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("one").unwrap().description, "second");
    }

    #[test]
    fn test_catalog_from_missing_file() {
        let err = ToolCatalog::from_file("/nonexistent/catalog.yml").unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog file"));
    }
}
