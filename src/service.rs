//! Tool scanning and trial runs
//!
//! `ServiceContext` bundles what the operations need: configuration, the
//! store, the catalog, an MCP client and a tool runner. The MCP client and
//! runner are trait objects so tests can substitute them.

use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{Config, DEFAULT_USER_ID};
use crate::domain::{ToolInfo, ToolSource, ToolValidateRequest};
use crate::error::{Result, ToolconfError};
use crate::mcp::{HttpMcpClient, McpClient, tool_infos_from_listing};
use crate::store::ToolStore;
use crate::tools::{CommandToolRunner, ToolCatalog, ToolRunner};

/// Everything the service operations run against
pub struct ServiceContext {
    pub config: Config,
    pub store: ToolStore,
    pub catalog: ToolCatalog,
    mcp: Box<dyn McpClient>,
    runner: Box<dyn ToolRunner>,
}

impl ServiceContext {
    pub fn new(
        config: Config,
        store: ToolStore,
        catalog: ToolCatalog,
        mcp: Box<dyn McpClient>,
        runner: Box<dyn ToolRunner>,
    ) -> Self {
        Self {
            config,
            store,
            catalog,
            mcp,
            runner,
        }
    }

    /// Build the production context: on-disk store, catalog files from
    /// `catalog.path`, HTTP MCP client and command runner.
    pub fn from_config(config: Config) -> Result<Self> {
        let store = ToolStore::open(&config.storage.db_path)?;
        let catalog = match config.catalog.path.as_deref() {
            Some(pattern) => ToolCatalog::from_glob(pattern)?,
            None => ToolCatalog::new(),
        };
        log::debug!("Catalog has {} tools", catalog.len());

        let mcp = HttpMcpClient::new(config.mcp.timeout_ms)?;
        let runner = CommandToolRunner::new(catalog.clone())
            .with_timeout(config.runner.timeout_ms)
            .with_max_output(config.runner.max_output_bytes);

        Ok(Self::new(config, store, catalog, Box::new(mcp), Box::new(runner)))
    }
}

/// Outcome of scanning every tenant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Tools stored across the tenants that succeeded
    pub total_tools: usize,
    pub tenants: usize,
    pub succeeded: usize,
    /// `tenant (reason)` per failed tenant
    pub failed: Vec<String>,
}

/// Scan catalog and MCP tools for a tenant and store the result.
///
/// Configured servers that fail are logged and skipped. A failure of the
/// default server aborts the scan. Returns the number of tools stored.
pub async fn scan_tools(ctx: &ServiceContext, tenant_id: &str, user_id: &str) -> Result<usize> {
    let mut tools = ctx.catalog.tool_infos();

    let servers = ctx.config.mcp.servers_for(tenant_id);
    let listings = join_all(servers.iter().map(|server| async move {
        (server, ctx.mcp.list_tools(&server.url).await)
    }))
    .await;

    for (server, listing) in listings {
        match listing {
            Ok(remote) => {
                log::debug!("MCP server {} offers {} tools", server.name, remote.len());
                tools.extend(tool_infos_from_listing(&server.name, &remote));
            }
            Err(e) => log::error!("Failed to list tools of MCP server {} ({}): {}", server.name, server.url, e),
        }
    }

    if let Some(url) = ctx.config.mcp.default_server.as_deref() {
        tools.extend(default_server_tools(ctx, url).await?);
    }

    ctx.store.apply_scan(tenant_id, user_id, &tools)
}

async fn default_server_tools(ctx: &ServiceContext, url: &str) -> Result<Vec<ToolInfo>> {
    let remote = ctx.mcp.list_tools(url).await.map_err(|e| match e {
        ToolconfError::McpConnection(_) => e,
        other => ToolconfError::McpConnection(other.to_string()),
    })?;
    Ok(tool_infos_from_listing(&ctx.config.mcp.default_name, &remote))
}

/// Scan every known tenant, each under its own deadline.
///
/// Tenants come from `scan.tenants` followed by those already stored. A
/// failed or timed-out tenant is recorded in the summary and the rest
/// still run.
pub async fn initialize_all(ctx: &ServiceContext) -> Result<ScanSummary> {
    let mut tenants = ctx.config.scan.tenants.clone();
    for tenant in ctx.store.tenant_ids()? {
        if !tenants.contains(&tenant) {
            tenants.push(tenant);
        }
    }

    let mut summary = ScanSummary {
        tenants: tenants.len(),
        ..ScanSummary::default()
    };
    if tenants.is_empty() {
        log::warn!("No tenants found, skipping tool initialization");
        return Ok(summary);
    }
    log::info!("Initializing tools for {} tenants", tenants.len());

    let timeout_ms = ctx.config.scan.tenant_timeout_ms;
    for tenant in &tenants {
        let scan = scan_tools(ctx, tenant, DEFAULT_USER_ID);
        match tokio::time::timeout(Duration::from_millis(timeout_ms), scan).await {
            Ok(Ok(_)) => match ctx.store.list_tools(tenant) {
                Ok(stored) => {
                    log::info!("Tenant {}: {} tools initialized", tenant, stored.len());
                    summary.total_tools += stored.len();
                    summary.succeeded += 1;
                }
                Err(e) => {
                    log::error!("Failed to count tools for tenant {}: {}", tenant, e);
                    summary.failed.push(format!("{} (error: {})", tenant, e));
                }
            },
            Ok(Err(e)) => {
                log::error!("Tool initialization failed for tenant {}: {}", tenant, e);
                summary.failed.push(format!("{} (error: {})", tenant, e));
            }
            Err(_) => {
                log::error!("Tool initialization timed out for tenant {}", tenant);
                summary.failed.push(format!("{} (timeout)", tenant));
            }
        }
    }

    log::info!(
        "Tool initialization completed: {} tools, {}/{} tenants",
        summary.total_tools,
        summary.succeeded,
        summary.tenants
    );
    if !summary.failed.is_empty() {
        log::warn!("Failed tenants: {}", summary.failed.join(", "));
    }
    Ok(summary)
}

/// Run a tool once with the given inputs and return its raw result.
pub async fn validate_tool(ctx: &ServiceContext, request: &ToolValidateRequest, tenant_id: &str) -> Result<Value> {
    log::info!("Validating {} tool '{}'", request.source, request.name);
    let inputs = request.inputs.clone().unwrap_or_default();

    match &request.source {
        ToolSource::Mcp => {
            let usage = request.usage.as_deref().unwrap_or_default();
            let url = if usage == ctx.config.mcp.default_name {
                ctx.config
                    .mcp
                    .default_server
                    .clone()
                    .ok_or_else(|| ToolconfError::McpConnection("No default MCP server configured".to_string()))?
            } else {
                ctx.config
                    .mcp
                    .find_server(tenant_id, usage)
                    .map(|server| server.url.clone())
                    .ok_or_else(|| ToolconfError::ToolNotFound(format!("MCP server not found for name: {}", usage)))?
            };
            ctx.mcp.call_tool(&url, &request.name, Some(inputs)).await
        }
        ToolSource::Local => {
            let params = request.params.clone().unwrap_or_default();
            ctx.runner.run(&request.name, &request.source, &inputs, &params).await
        }
        ToolSource::Langchain => ctx.runner.run(&request.name, &request.source, &inputs, &Map::new()).await,
        ToolSource::Other(source) => Err(ToolconfError::UnsupportedSource(source.clone())),
    }
}
