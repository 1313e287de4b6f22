//! Error types for toolconf
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in toolconf
#[derive(Debug, Error)]
pub enum ToolconfError {
    /// Tool (or the server hosting it) could not be found
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// No saved configuration exists for a tool
    #[error("Tool configuration not found for tool ID: {0}")]
    ConfigNotFound(i64),

    /// MCP server unreachable or returned a protocol error
    #[error("MCP connection error: {0}")]
    McpConnection(String),

    /// Tool ran but failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Tool source is not one of local, mcp, langchain
    #[error("Unsupported tool source: {0}")]
    UnsupportedSource(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Tool catalog file could not be loaded
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Operation exceeded its deadline
    #[error("Timed out after {0}ms")]
    Timeout(u64),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type alias for toolconf operations
pub type Result<T> = std::result::Result<T, ToolconfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_not_found_error() {
        let err = ToolconfError::ToolNotFound("get_email".to_string());
        assert_eq!(err.to_string(), "Tool not found: get_email");
    }

    #[test]
    fn test_config_not_found_error() {
        let err = ToolconfError::ConfigNotFound(42);
        assert_eq!(err.to_string(), "Tool configuration not found for tool ID: 42");
    }

    #[test]
    fn test_unsupported_source_error() {
        let err = ToolconfError::UnsupportedSource("plugin".to_string());
        assert_eq!(err.to_string(), "Unsupported tool source: plugin");
    }

    #[test]
    fn test_timeout_error() {
        let err = ToolconfError::Timeout(60_000);
        assert_eq!(err.to_string(), "Timed out after 60000ms");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ToolconfError = io_err.into();
        assert!(matches!(err, ToolconfError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: ToolconfError = json_err.into();
        assert!(matches!(err, ToolconfError::Json(_)));
    }

    #[test]
    fn test_sqlite_error_conversion() {
        let err: ToolconfError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, ToolconfError::Sqlite(_)));
    }
}
