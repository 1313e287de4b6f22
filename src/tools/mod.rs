//! Tool catalog - local and LangChain tool definitions and trial runs

mod catalog;
mod definition;
mod runner;

pub use catalog::ToolCatalog;
pub use definition::{CatalogParam, CatalogTool, DEFAULT_LANGCHAIN_DESCRIPTION};
pub use runner::{CommandToolRunner, INPUTS_ENV, PARAMS_ENV, ToolRunner};
