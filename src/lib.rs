//! toolconf - tool catalog and per-agent tool configuration
//!
//! Normalizes the parameter mappings tools are stored with, groups tools for
//! display by source and category, and keeps a tenant-scoped catalog of
//! local, LangChain and MCP tools together with each agent's configuration.

pub mod config;
pub mod domain;
pub mod error;
pub mod grouping;
pub mod i18n;
pub mod inputs;
pub mod mcp;
pub mod schema;
pub mod service;
pub mod store;
pub mod tools;

pub use error::{Result, ToolconfError};
