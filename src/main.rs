use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

mod cli;

use cli::Cli;
use cli::commands::{Commands, ConfigCommands};
use toolconf::config::Config;
use toolconf::domain::{ToolDescriptor, ToolInstanceRequest, ToolSource, ToolValidateRequest};
use toolconf::grouping::{ToolGroup, group_tools};
use toolconf::inputs::{normalize_inputs, param_names};
use toolconf::service::{self, ServiceContext};
use toolconf::store::ToolStore;

fn setup_logging(log_level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolconf")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("toolconf.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the configured level
    let mut builder = env_logger::Builder::new();
    if let Some(level) = log_level {
        builder.parse_filters(level);
    }
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Params { inputs } => handle_params_command(inputs),
        Commands::Group { file, locale } => handle_group_command(file, locale.as_deref(), config),
        Commands::List {
            tenant,
            grouped,
            locale,
        } => handle_list_command(tenant, *grouped, locale.as_deref(), config),
        Commands::Scan { tenant, user, all } => handle_scan_command(tenant, user, *all, config).await,
        Commands::Config { command } => handle_config_command(command, config),
        Commands::Validate {
            name,
            source,
            usage,
            inputs,
            params,
            tenant,
        } => {
            let request = ToolValidateRequest {
                name: name.clone(),
                source: ToolSource::from(source.as_str()),
                usage: usage.clone(),
                inputs: inputs.as_deref().map(|s| parse_json_object(s, "inputs")).transpose()?,
                params: params.as_deref().map(|s| parse_json_object(s, "params")).transpose()?,
            };
            handle_validate_command(&request, tenant, config).await
        }
    }
}

fn handle_params_command(raw: &str) -> Result<()> {
    let inputs = normalize_inputs(Some(raw));
    let names = param_names(&inputs);
    if names.is_empty() {
        println!("{}", "No parameters".yellow());
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(inputs))?);
    println!("{} {}", "Parameters:".green(), names.join(", "));
    Ok(())
}

fn handle_group_command(file: &Path, locale: Option<&str>, config: &Config) -> Result<()> {
    info!("Grouping tools from {}", file.display());
    let content = fs::read_to_string(file).context(format!("Failed to read {}", file.display()))?;
    let tools: Vec<ToolDescriptor> =
        serde_json::from_str(&content).context(format!("Failed to parse tool list in {}", file.display()))?;

    let labels = locale.map(|l| config.labels_for(l)).unwrap_or_else(|| config.labels());
    print_groups(&group_tools(&tools, &labels));
    Ok(())
}

fn handle_list_command(tenant: &str, grouped: bool, locale: Option<&str>, config: &Config) -> Result<()> {
    info!("Listing tools for tenant {}", tenant);
    let store = open_store(config)?;
    let tools = store.list_tools(tenant)?;

    if tools.is_empty() {
        println!("{} {}", "No tools stored for tenant".yellow(), tenant);
        return Ok(());
    }

    if grouped {
        let labels = locale.map(|l| config.labels_for(l)).unwrap_or_else(|| config.labels());
        print_groups(&group_tools(&tools, &labels));
    } else {
        for tool in &tools {
            print_tool(tool, "");
        }
    }
    Ok(())
}

async fn handle_scan_command(tenant: &str, user: &str, all: bool, config: &Config) -> Result<()> {
    let ctx = ServiceContext::from_config(config.clone())?;

    if all {
        let summary = service::initialize_all(&ctx).await?;
        println!(
            "{} {} tools, {}/{} tenants",
            "Scan complete:".green(),
            summary.total_tools,
            summary.succeeded,
            summary.tenants
        );
        for failure in &summary.failed {
            println!("  {} {}", "failed".red(), failure);
        }
        return Ok(());
    }

    let count = service::scan_tools(&ctx, tenant, user).await?;
    println!("{} {} tools stored for tenant {}", "Scan complete:".green(), count, tenant);
    Ok(())
}

fn handle_config_command(command: &ConfigCommands, config: &Config) -> Result<()> {
    let store = open_store(config)?;

    match command {
        ConfigCommands::Get {
            tool_id,
            agent_id,
            tenant,
        } => {
            let lookup = store.search_instance(*agent_id, *tool_id, tenant)?;
            println!("{}", serde_json::to_string_pretty(&lookup)?);
        }
        ConfigCommands::Set {
            tool_id,
            agent_id,
            params,
            enabled,
            tenant,
            user,
        } => {
            let request = ToolInstanceRequest {
                tool_id: *tool_id,
                agent_id: *agent_id,
                params: parse_json_object(params, "params")?,
                enabled: *enabled,
            };
            let instance = store.upsert_instance(&request, tenant, user)?;
            println!("{} tool {} for agent {}", "Saved:".green(), instance.tool_id, instance.agent_id);
        }
        ConfigCommands::Last { tool_id, tenant, user } => {
            let params = store.last_config(*tool_id, tenant, user)?;
            println!("{}", serde_json::to_string_pretty(&Value::Object(params))?);
        }
    }
    Ok(())
}

async fn handle_validate_command(request: &ToolValidateRequest, tenant: &str, config: &Config) -> Result<()> {
    let ctx = ServiceContext::from_config(config.clone())?;
    let result = service::validate_tool(&ctx, request, tenant).await?;

    match result {
        Value::String(text) => println!("{}", text),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }
    Ok(())
}

fn open_store(config: &Config) -> Result<ToolStore> {
    ToolStore::open(&config.storage.db_path)
        .context(format!("Failed to open tool store at {}", config.storage.db_path.display()))
}

fn parse_json_object(raw: &str, what: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(raw).context(format!("Invalid JSON for {}", what))? {
        Value::Object(map) => Ok(map),
        _ => Err(eyre::eyre!("{} must be a JSON object", what)),
    }
}

fn print_groups(groups: &[ToolGroup]) {
    for group in groups {
        println!("{} {}", group.label.bold(), format!("({})", group.tools.len()).dimmed());
        match &group.categories {
            Some(categories) => {
                for category in categories {
                    println!("  {}", category.label.cyan());
                    for tool in &category.tools {
                        print_tool(tool, "    ");
                    }
                }
            }
            None => {
                for tool in &group.tools {
                    print_tool(tool, "  ");
                }
            }
        }
    }
}

fn print_tool(tool: &ToolDescriptor, indent: &str) {
    let params = param_names(&normalize_inputs(tool.inputs.as_deref()));
    let name = if tool.is_available {
        tool.name.normal()
    } else {
        tool.name.dimmed()
    };
    println!("{}{} {} {}", indent, tool.id.dimmed(), name, format!("[{}]", params.join(", ")).dimmed());
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
