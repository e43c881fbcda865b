//! CLI arguments and subcommands for affinity-tuner.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "affinity-tuner",
    about = "Interactive shell for pinning processes and threads to CPU cores",
    long_about = "Interactive shell for pinning processes and threads to CPU cores.\n\n\
                  Lists processes from /proc with their current CPU affinity, keeps a \
                  selection of processes between commands, and binds their threads to \
                  CPUs (round-robin or all cores) through taskset.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (overrides config file)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Path to the taskset binary
    #[arg(long)]
    pub taskset: Option<PathBuf>,

    /// procfs mount point
    #[arg(long)]
    pub proc_root: Option<PathBuf>,

    /// Override the detected number of logical CPUs
    #[arg(long)]
    pub cpu_count: Option<usize>,

    /// Print taskset commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Interactive prompt text
    #[arg(long)]
    pub prompt: Option<String>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive shell (default)
    Shell,

    /// Run shell command lines non-interactively, in order
    Exec {
        /// Command lines, e.g. "select nginx" "autobind"
        #[arg(required = true)]
        lines: Vec<String>,
    },

    /// Validate runtime requirements (procfs, taskset, CPU count, privileges)
    Check,

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}
