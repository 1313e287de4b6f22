//! CLI module for toolconf - command-line interface and subcommands.
//!
//! Offline helpers (`params`, `group`) work on their arguments alone; the
//! remaining subcommands go through the tool store.

pub mod commands;

pub use commands::Cli;
