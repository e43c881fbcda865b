//! CLI command implementations for affinity-tuner.
//!
//! This module provides implementations for all CLI subcommands:
//! - `shell`: Interactive prompt on stdin (default)
//! - `exec`: Run shell command lines non-interactively
//! - `check`: Runtime requirement validation
//! - `config`: Configuration file generation

pub mod check;
pub mod config;
pub mod shell;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use shell::{build_binder, build_procfs, command_exec, command_shell, exec_lines};
