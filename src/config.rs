use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::i18n::{DEFAULT_LOCALE, LabelOverrides, Labels};

/// Usage name under which tools of the built-in MCP server are stored
pub const DEFAULT_MCP_NAME: &str = "nexent";

/// User recorded on scans that run without a requesting user
pub const DEFAULT_USER_ID: &str = "system";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub locale: String,
    pub labels: LabelOverrides,
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
    pub mcp: McpConfig,
    pub scan: ScanConfig,
    pub runner: RunnerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            locale: DEFAULT_LOCALE.to_string(),
            labels: LabelOverrides::default(),
            storage: StorageConfig::default(),
            catalog: CatalogConfig::default(),
            mcp: McpConfig::default(),
            scan: ScanConfig::default(),
            runner: RunnerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(env!("CARGO_PKG_NAME"))
                .join(format!("{}.db", env!("CARGO_PKG_NAME"))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// File or glob pattern of catalog YAML files
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct McpConfig {
    /// URL of the built-in MCP server
    pub default_server: Option<String>,
    pub default_name: String,
    pub timeout_ms: u64,
    pub servers: Vec<McpServerConfig>,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            default_server: None,
            default_name: DEFAULT_MCP_NAME.to_string(),
            timeout_ms: 10000,
            servers: Vec::new(),
        }
    }
}

impl McpConfig {
    /// Enabled servers visible to a tenant
    pub fn servers_for(&self, tenant_id: &str) -> Vec<&McpServerConfig> {
        self.servers
            .iter()
            .filter(|s| s.enabled && s.tenant.as_deref().is_none_or(|t| t == tenant_id))
            .collect()
    }

    /// Enabled server with this name for a tenant
    pub fn find_server(&self, tenant_id: &str, name: &str) -> Option<&McpServerConfig> {
        self.servers_for(tenant_id).into_iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerConfig {
    pub name: String,
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Restrict the server to one tenant; shared when unset
    #[serde(default)]
    pub tenant: Option<String>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub tenant_timeout_ms: u64,
    /// Tenants scanned by `scan --all` in addition to those already stored
    pub tenants: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tenant_timeout_ms: 60000,
            tenants: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub timeout_ms: u64,
    pub max_output_bytes: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            max_output_bytes: 100000,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Group labels for the configured locale, with overrides applied
    pub fn labels(&self) -> Labels {
        self.labels_for(&self.locale)
    }

    /// Group labels for another locale, with the configured overrides applied
    pub fn labels_for(&self, locale: &str) -> Labels {
        Labels::for_locale(locale).with_overrides(&self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.locale, "en");
        assert_eq!(config.mcp.default_name, "nexent");
        assert_eq!(config.mcp.timeout_ms, 10000);
        assert_eq!(config.scan.tenant_timeout_ms, 60000);
        assert!(config.storage.db_path.ends_with("toolconf/toolconf.db"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str(
            r#"
locale: zh-CN
mcp:
  default_server: http://localhost:5011/mcp
  servers:
    - name: weather
      url: http://weather.local/mcp
    - name: private
      url: http://private.local/mcp
      tenant: tenant-b
    - name: off
      url: http://off.local/mcp
      enabled: false
"#,
        )
        .unwrap();
        assert_eq!(config.mcp.default_name, "nexent");
        assert_eq!(config.mcp.timeout_ms, 10000);
        assert_eq!(config.runner.timeout_ms, 30000);
        assert_eq!(config.labels().local, "本地工具");

        let names: Vec<&str> = config.mcp.servers_for("tenant-a").iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["weather"]);
        assert!(config.mcp.find_server("tenant-b", "private").is_some());
        assert!(config.mcp.find_server("tenant-a", "private").is_none());
        assert!(config.mcp.find_server("tenant-a", "off").is_none());
    }

    #[test]
    fn test_label_overrides() {
        let config: Config = serde_yaml::from_str("labels:\n  local: Built-in\n").unwrap();
        let labels = config.labels();
        assert_eq!(labels.local, "Built-in");
        assert_eq!(labels.other, "Other");
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level: debug\nscan:\n  tenants: [a, b]").unwrap();
        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.scan.tenants, vec!["a", "b"]);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/toolconf.yml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
