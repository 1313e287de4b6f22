//! Tool execution for trial runs
//!
//! Defines the ToolRunner trait and CommandToolRunner, which runs catalog
//! tools through their configured shell command.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::process::Command;

use crate::domain::ToolSource;
use crate::error::{Result, ToolconfError};

use super::catalog::ToolCatalog;

/// Environment variable holding the call-time inputs as JSON
pub const INPUTS_ENV: &str = "TOOL_INPUTS";
/// Environment variable holding the init-time params as JSON
pub const PARAMS_ENV: &str = "TOOL_PARAMS";

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_MAX_OUTPUT_BYTES: usize = 100_000;

/// Trait for running local and LangChain tools
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run a tool once and return its result
    async fn run(
        &self,
        name: &str,
        source: &ToolSource,
        inputs: &Map<String, Value>,
        params: &Map<String, Value>,
    ) -> Result<Value>;
}

/// Runs catalog tools via `bash -c <command>`
pub struct CommandToolRunner {
    catalog: ToolCatalog,
    timeout_ms: u64,
    max_output_bytes: usize,
}

impl CommandToolRunner {
    /// Create a new runner over the given catalog
    pub fn new(catalog: ToolCatalog) -> Self {
        Self {
            catalog,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }

    /// Set the timeout used when a tool does not define one
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set maximum output size in bytes
    pub fn with_max_output(mut self, max_bytes: usize) -> Self {
        self.max_output_bytes = max_bytes;
        self
    }

    async fn execute_bash(&self, command: &str, inputs: &str, params: &str, timeout_ms: u64) -> Result<(String, bool)> {
        let child = Command::new("bash")
            .arg("-c")
            .arg(command)
            .env(INPUTS_ENV, inputs)
            .env(PARAMS_ENV, params)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ToolconfError::ToolExecution(format!("Failed to spawn bash: {}", e)))?;

        let timeout = Duration::from_millis(timeout_ms);

        // On timeout the child is dropped and killed.
        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(out)) => {
                let success = out.status.success();
                let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&out.stderr).into_owned();
                let mut output = if success || stderr.is_empty() { stdout } else { stderr };

                if output.len() > self.max_output_bytes {
                    let mut cut = self.max_output_bytes;
                    while !output.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    output.truncate(cut);
                    output.push_str("\n... [output truncated]");
                }

                Ok((output, success))
            }
            Ok(Err(e)) => Err(ToolconfError::ToolExecution(format!("IO error: {}", e))),
            Err(_) => Err(ToolconfError::Timeout(timeout_ms)),
        }
    }
}

#[async_trait]
impl ToolRunner for CommandToolRunner {
    async fn run(
        &self,
        name: &str,
        source: &ToolSource,
        inputs: &Map<String, Value>,
        params: &Map<String, Value>,
    ) -> Result<Value> {
        let tool = self
            .catalog
            .find(name, source)
            .ok_or_else(|| ToolconfError::ToolNotFound(format!("{} tool '{}' is not in the catalog", source, name)))?;

        let command = tool
            .command
            .as_deref()
            .ok_or_else(|| ToolconfError::ToolExecution(format!("Tool '{}' has no command configured", name)))?;

        let timeout_ms = tool.timeout_ms.unwrap_or(self.timeout_ms);
        let inputs_json = Value::Object(inputs.clone()).to_string();
        let params_json = Value::Object(params.clone()).to_string();

        log::debug!("Running tool '{}' with timeout {}ms", name, timeout_ms);
        let (output, success) = self.execute_bash(command, &inputs_json, &params_json, timeout_ms).await?;

        if !success {
            return Err(ToolconfError::ToolExecution(format!(
                "Tool '{}' failed: {}",
                name,
                output.trim()
            )));
        }

        let trimmed = output.trim();
        Ok(serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string())))
    }
}
