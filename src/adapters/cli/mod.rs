//! CLI Adapter
//!
//! Command-line interface for the gradscan screener.
//! Uses clap derive macros for argument parsing.

mod commands;
pub mod format;

pub use commands::{execute, load_app_config, CliApp, Command, ServeCmd, SnapshotCmd};
pub use format::{format_currency, format_percent, format_relative_time, truncate};
