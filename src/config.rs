//! Configuration management for affinity-tuner.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::binder::DEFAULT_TASKSET_PATH;
use crate::cli::{Args, ConfigFormat, LogLevel};
use crate::process::DEFAULT_PROC_ROOT;
use crate::shell::DEFAULT_PROMPT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Locations searched when no `--config` is given, first hit wins.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "/etc/affinity-tuner/config.yaml",
    "/etc/affinity-tuner/config.yml",
    "/etc/affinity-tuner/config.json",
    "/etc/affinity-tuner/config.toml",
    "./affinity-tuner.yaml",
    "./affinity-tuner.yml",
    "./affinity-tuner.json",
    "./affinity-tuner.toml",
];

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Binary invoked as `<taskset_path> -pc <cpus> <pid>`
    #[serde(alias = "taskset-path")]
    pub taskset_path: Option<PathBuf>,

    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,

    pub prompt: Option<String>,

    /// Fixed CPU count; null = detect online CPUs
    #[serde(alias = "cpu-count")]
    pub cpu_count: Option<usize>,

    #[serde(alias = "dry-run")]
    pub dry_run: Option<bool>,

    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            taskset_path: Some(PathBuf::from(DEFAULT_TASKSET_PATH)),
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            prompt: Some(DEFAULT_PROMPT.to_string()),
            cpu_count: None,
            dry_run: Some(false),
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
        }
    }
}

impl Config {
    pub fn taskset_path(&self) -> PathBuf {
        self.taskset_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TASKSET_PATH))
    }

    pub fn proc_root(&self) -> PathBuf {
        self.proc_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT))
    }

    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.prompt.as_deref() == Some("") {
        return Err("prompt must not be empty".into());
    }

    if let Some(path) = &cfg.taskset_path {
        if path.as_os_str().is_empty() {
            return Err("taskset_path must not be empty".into());
        }
    }

    if let Some(root) = &cfg.proc_root {
        if root.as_os_str().is_empty() {
            return Err("proc_root must not be empty".into());
        }
    }

    if cfg.cpu_count == Some(0) {
        return Err("cpu_count must be at least 1".into());
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}', expected one of {}",
                level,
                LOG_LEVELS.join(", ")
            )
            .into());
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(path) = &args.taskset {
        config.taskset_path = Some(path.clone());
    }
    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }
    if let Some(n) = args.cpu_count {
        config.cpu_count = Some(n);
    }
    if args.dry_run {
        config.dry_run = Some(true);
    }
    if let Some(prompt) = &args.prompt {
        config.prompt = Some(prompt.clone());
    }
    if let Some(level) = &args.log_level {
        config.log_level = Some(log_level_name(level).to_string());
    }

    Ok(config)
}

fn log_level_name(level: &LogLevel) -> &'static str {
    match level {
        LogLevel::Off => "off",
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

/// Loads the given file, or the first existing default location, or defaults.
///
/// An explicitly given path that does not exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => match DEFAULT_CONFIG_PATHS
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
        {
            Some(p) => p.to_path_buf(),
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)?;
    let config = parse_config(&content, &path)?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Parses by file extension, YAML when unknown.
pub fn parse_config(content: &str, path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(content)?,
        Some("toml") => toml::from_str(content)?,
        _ => serde_yaml::from_str(content)?,
    };
    Ok(config)
}

/// Serializes a configuration in the requested format.
pub fn render_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, &format)?);
    Ok(())
}
