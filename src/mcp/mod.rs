//! MCP (Model Context Protocol) tool servers
//!
//! - `client`: JSON-RPC over HTTP, listing and calling tools
//! - `listing`: turning a server's tool list into scan records

mod client;
mod listing;

pub use client::{
    HttpMcpClient, McpClient, McpTool, PROTOCOL_VERSION, first_content_text, parse_sse_message, rpc_result,
};
pub use listing::tool_infos_from_listing;
