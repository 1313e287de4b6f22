//! Domain types for toolconf
//!
//! - ToolDescriptor / ToolInfo: tool records as listed and as scanned
//! - ToolSource: local, mcp, langchain or anything else
//! - ToolInstance: per-agent tool configuration
//! - ToolValidateRequest: input to a tool trial run

pub mod instance;
pub mod tool;

pub use instance::{InstanceLookup, ToolInstance, ToolInstanceRequest, ToolValidateRequest};
pub use tool::{ToolDescriptor, ToolInfo, ToolParam, ToolSource};
