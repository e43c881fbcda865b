//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("affinity-tuner.yaml"));

    let mut content = render_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# affinity-tuner Configuration
# ============================
#
# taskset_path: "/usr/bin/taskset" # Binary run as: taskset -pc <cpus> <pid>
# proc_root: "/proc"               # procfs mount point
# prompt: "cmd: "                  # Interactive prompt
# cpu_count: null                  # Fixed CPU count (null = detect online CPUs)
# dry_run: false                   # Print taskset commands instead of running them
# log_level: "warn"                # off, error, warn, info, debug, trace
"#;

    format!("{comments}\n{yaml}")
}
