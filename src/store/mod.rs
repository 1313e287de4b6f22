//! Persistence for scanned tools and per-agent tool configuration.
//!
//! A single SQLite database holds two tables:
//! - **tool_info**: every tool a scan found, scoped by tenant
//! - **tool_instance**: the params an agent configured for a tool
//!
//! # Example
//!
//! ```ignore
//! use toolconf::store::ToolStore;
//!
//! let store = ToolStore::open(Path::new("/tmp/toolconf.db"))?;
//! store.apply_scan("tenant-a", "user-1", &catalog.tool_infos())?;
//! let tools = store.list_tools("tenant-a")?;
//! ```

mod tool_store;

pub use tool_store::{ToolStore, now_timestamp};
