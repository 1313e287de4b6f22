//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - params: normalize a stored inputs string
//! - group: group a JSON file of tool descriptors
//! - list / scan: stored tools of a tenant
//! - config: per-agent tool configuration
//! - validate: run a tool once

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Tenant used when none is given
pub const DEFAULT_TENANT: &str = "default";

/// toolconf - tool catalog and per-agent tool configuration
#[derive(Parser, Debug)]
#[command(name = "toolconf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize an encoded inputs mapping and print its parameter names
    Params {
        /// Inputs as stored (JSON or single-quoted literal)
        inputs: String,
    },

    /// Group a JSON array of tool descriptors for display
    Group {
        /// File holding the tool list
        file: PathBuf,

        /// Label locale (defaults to the configured locale)
        #[arg(short, long)]
        locale: Option<String>,
    },

    /// List stored tools of a tenant
    List {
        #[arg(short, long, default_value = DEFAULT_TENANT)]
        tenant: String,

        /// Show tools grouped by source and category
        #[arg(short, long)]
        grouped: bool,

        /// Label locale for grouped output
        #[arg(short, long)]
        locale: Option<String>,
    },

    /// Scan catalog and MCP tools and store them
    Scan {
        #[arg(short, long, default_value = DEFAULT_TENANT)]
        tenant: String,

        #[arg(short, long, default_value = toolconf::config::DEFAULT_USER_ID)]
        user: String,

        /// Scan every known tenant instead of one
        #[arg(short, long, conflicts_with = "tenant")]
        all: bool,
    },

    /// Per-agent tool configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Run a tool once with the given inputs
    Validate {
        /// Tool name
        name: String,

        /// Tool source (local, mcp, langchain)
        #[arg(short, long)]
        source: String,

        /// MCP server name for mcp tools
        #[arg(short = 'U', long)]
        usage: Option<String>,

        /// Call-time inputs as a JSON object
        #[arg(short, long)]
        inputs: Option<String>,

        /// Init-time params as a JSON object
        #[arg(short, long)]
        params: Option<String>,

        #[arg(short, long, default_value = DEFAULT_TENANT)]
        tenant: String,
    },
}

/// Tool configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show an agent's configuration of a tool
    Get {
        tool_id: i64,
        agent_id: i64,

        #[arg(short, long, default_value = DEFAULT_TENANT)]
        tenant: String,
    },

    /// Save an agent's configuration of a tool
    Set {
        tool_id: i64,
        agent_id: i64,

        /// Params as a JSON object
        #[arg(short, long, default_value = "{}")]
        params: String,

        #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
        enabled: bool,

        #[arg(short, long, default_value = DEFAULT_TENANT)]
        tenant: String,

        #[arg(short, long, default_value = toolconf::config::DEFAULT_USER_ID)]
        user: String,
    },

    /// Show the most recently saved params of a tool
    Last {
        tool_id: i64,

        #[arg(short, long, default_value = DEFAULT_TENANT)]
        tenant: String,

        #[arg(short, long, default_value = toolconf::config::DEFAULT_USER_ID)]
        user: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["toolconf"]).is_err());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["toolconf", "-v", "params", "{}"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["toolconf", "list", "-c", "/path/to/toolconf.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/toolconf.yml")));
    }

    #[test]
    fn test_params_command() {
        let cli = Cli::try_parse_from(["toolconf", "params", "{'q': {'type': 'string'}}"]).unwrap();
        match cli.command {
            Commands::Params { inputs } => assert_eq!(inputs, "{'q': {'type': 'string'}}"),
            _ => panic!("Expected params command"),
        }
    }

    #[test]
    fn test_group_command_with_locale() {
        let cli = Cli::try_parse_from(["toolconf", "group", "tools.json", "--locale", "zh"]).unwrap();
        match cli.command {
            Commands::Group { file, locale } => {
                assert_eq!(file, PathBuf::from("tools.json"));
                assert_eq!(locale.as_deref(), Some("zh"));
            }
            _ => panic!("Expected group command"),
        }
    }

    #[test]
    fn test_list_defaults() {
        let cli = Cli::try_parse_from(["toolconf", "list"]).unwrap();
        match cli.command {
            Commands::List { tenant, grouped, locale } => {
                assert_eq!(tenant, DEFAULT_TENANT);
                assert!(!grouped);
                assert!(locale.is_none());
            }
            _ => panic!("Expected list command"),
        }
    }

    #[test]
    fn test_scan_all_conflicts_with_tenant() {
        assert!(Cli::try_parse_from(["toolconf", "scan", "--all", "--tenant", "t1"]).is_err());
        let cli = Cli::try_parse_from(["toolconf", "scan", "--all"]).unwrap();
        assert!(matches!(cli.command, Commands::Scan { all: true, .. }));
    }

    #[test]
    fn test_config_set() {
        let cli = Cli::try_parse_from([
            "toolconf", "config", "set", "7", "1", "--params", r#"{"top_k": 3}"#, "--enabled", "false",
        ])
        .unwrap();
        match cli.command {
            Commands::Config {
                command: ConfigCommands::Set {
                    tool_id,
                    agent_id,
                    params,
                    enabled,
                    ..
                },
            } => {
                assert_eq!(tool_id, 7);
                assert_eq!(agent_id, 1);
                assert_eq!(params, r#"{"top_k": 3}"#);
                assert!(!enabled);
            }
            _ => panic!("Expected config set command"),
        }
    }

    #[test]
    fn test_config_last() {
        let cli = Cli::try_parse_from(["toolconf", "config", "last", "7", "-t", "acme"]).unwrap();
        match cli.command {
            Commands::Config {
                command: ConfigCommands::Last { tool_id, tenant, user },
            } => {
                assert_eq!(tool_id, 7);
                assert_eq!(tenant, "acme");
                assert_eq!(user, toolconf::config::DEFAULT_USER_ID);
            }
            _ => panic!("Expected config last command"),
        }
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::try_parse_from([
            "toolconf", "validate", "get_weather", "--source", "mcp", "-U", "weather", "-i", r#"{"city": "Oslo"}"#,
        ])
        .unwrap();
        match cli.command {
            Commands::Validate {
                name,
                source,
                usage,
                inputs,
                params,
                ..
            } => {
                assert_eq!(name, "get_weather");
                assert_eq!(source, "mcp");
                assert_eq!(usage.as_deref(), Some("weather"));
                assert!(inputs.is_some());
                assert!(params.is_none());
            }
            _ => panic!("Expected validate command"),
        }
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
