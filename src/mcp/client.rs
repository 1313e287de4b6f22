//! MCP client over HTTP
//!
//! Minimal JSON-RPC 2.0 client for the streamable HTTP transport: one
//! `initialize` handshake per call, then `tools/list` or `tools/call`.
//! Responses may come back as plain JSON or as an SSE stream.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{Result, ToolconfError};

/// Protocol version sent in `initialize`
pub const PROTOCOL_VERSION: &str = "2025-03-26";

const SESSION_HEADER: &str = "mcp-session-id";

/// Tool as advertised by an MCP server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "empty_schema")]
    pub input_schema: Value,
}

fn empty_schema() -> Value {
    json!({"type": "object", "properties": {}})
}

/// Access to MCP servers by URL
#[async_trait]
pub trait McpClient: Send + Sync {
    /// List the tools a server offers
    async fn list_tools(&self, url: &str) -> Result<Vec<McpTool>>;

    /// Call a tool and return the text of its first content item
    async fn call_tool(&self, url: &str, name: &str, arguments: Option<Map<String, Value>>) -> Result<Value>;
}

/// reqwest-backed MCP client
pub struct HttpMcpClient {
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpMcpClient {
    pub fn new(timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ToolconfError::McpConnection(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            next_id: AtomicU64::new(1),
        })
    }

    fn request_body(&self, method: &str, params: Value) -> Value {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
    }

    async fn post(&self, url: &str, session: Option<&str>, body: &Value) -> Result<(Option<String>, Option<Value>)> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/event-stream"));
        if let Some(session) = session
            && let Ok(value) = HeaderValue::from_str(session)
        {
            headers.insert(SESSION_HEADER, value);
        }

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| ToolconfError::McpConnection(format!("HTTP request to {} failed: {}", url, e)))?;

        let session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ToolconfError::McpConnection(format!("HTTP {} from {}: {}", status.as_u16(), url, text)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let text = response
            .text()
            .await
            .map_err(|e| ToolconfError::McpConnection(format!("Failed to read response body: {}", e)))?;

        if text.trim().is_empty() {
            return Ok((session_id, None));
        }
        let message = if content_type.starts_with("text/event-stream") {
            parse_sse_message(&text)?
        } else {
            serde_json::from_str(&text)?
        };
        Ok((session_id, Some(message)))
    }

    /// Run the handshake, then one request; returns its `result`
    async fn request(&self, url: &str, method: &str, params: Value) -> Result<Value> {
        let init = self.request_body(
            "initialize",
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {"name": env!("CARGO_PKG_NAME"), "version": env!("CARGO_PKG_VERSION")}
            }),
        );
        let (session, init_response) = self.post(url, None, &init).await?;
        if let Some(response) = init_response {
            rpc_result(response)?;
        }

        let initialized = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        self.post(url, session.as_deref(), &initialized).await?;

        let body = self.request_body(method, params);
        let (_, response) = self.post(url, session.as_deref(), &body).await?;
        let response =
            response.ok_or_else(|| ToolconfError::McpConnection(format!("Empty response to {}", method)))?;
        rpc_result(response)
    }
}

#[async_trait]
impl McpClient for HttpMcpClient {
    async fn list_tools(&self, url: &str) -> Result<Vec<McpTool>> {
        let result = self.request(url, "tools/list", json!({})).await?;
        let tools = result.get("tools").cloned().unwrap_or_else(|| json!([]));
        Ok(serde_json::from_value(tools)?)
    }

    async fn call_tool(&self, url: &str, name: &str, arguments: Option<Map<String, Value>>) -> Result<Value> {
        let params = json!({
            "name": name,
            "arguments": Value::Object(arguments.unwrap_or_default()),
        });
        let result = self.request(url, "tools/call", params).await?;
        Ok(first_content_text(&result))
    }
}

/// Last JSON-RPC message carried in an SSE body
pub fn parse_sse_message(body: &str) -> Result<Value> {
    let mut last = None;
    let mut data = String::new();
    for line in body.lines().chain(std::iter::once("")) {
        if let Some(rest) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(rest.trim_start());
        } else if line.trim().is_empty() && !data.is_empty() {
            last = Some(serde_json::from_str::<Value>(&data)?);
            data.clear();
        }
    }
    last.ok_or_else(|| ToolconfError::McpConnection("SSE response carried no data".to_string()))
}

/// `result` of a JSON-RPC response, or its `error` as an MCP connection error
pub fn rpc_result(response: Value) -> Result<Value> {
    if let Some(error) = response.get("error") {
        let message = error.get("message").and_then(Value::as_str).unwrap_or("unknown error");
        let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
        return Err(ToolconfError::McpConnection(format!("RPC error {}: {}", code, message)));
    }
    Ok(response.get("result").cloned().unwrap_or_else(|| json!({})))
}

/// Text of the first content item of a `tools/call` result
pub fn first_content_text(result: &Value) -> Value {
    result
        .get("content")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .map(|item| match item.get("text") {
            Some(text) => text.clone(),
            None => item.clone(),
        })
        .unwrap_or(Value::Null)
}
