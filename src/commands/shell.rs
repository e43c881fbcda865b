//! Shell and exec command implementations.
//!
//! Builds a `Shell` from the effective configuration and drives it either
//! from stdin or from lines given on the command line.

use std::io::{self, IsTerminal, Write};

use rustyline::DefaultEditor;
use tracing::{debug, info, warn};

use crate::binder::{Binder, DryRunBinder, TasksetBinder};
use crate::config::Config;
use crate::process::ProcFs;
use crate::shell::{Flow, Shell};
use crate::startup_checks::validate_requirements;

/// Procfs handle honouring `proc_root` and `cpu_count`.
pub fn build_procfs(config: &Config) -> ProcFs {
    ProcFs::new(config.proc_root()).with_cpu_count(config.cpu_count)
}

/// `TasksetBinder`, or `DryRunBinder` when `dry_run` is set.
pub fn build_binder(config: &Config) -> Box<dyn Binder> {
    let path = config.taskset_path();
    if config.dry_run.unwrap_or(false) {
        info!("Dry run: taskset commands will be printed, not executed");
        Box::new(DryRunBinder::new(path))
    } else {
        Box::new(TasksetBinder::new(path))
    }
}

fn build_shell<W: Write>(config: &Config, out: W) -> Shell<Box<dyn Binder>, W> {
    Shell::new(build_procfs(config), build_binder(config), out).with_prompt(config.prompt())
}

/// Runs the interactive prompt until exit or end of input.
pub fn command_shell(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let procfs = build_procfs(config);
    if let Err(e) = validate_requirements(&procfs, &config.taskset_path()) {
        warn!("⚠️  Startup validation failed: {}", e);
        warn!("   The shell will start but some commands may not work");
    }

    let stdin = io::stdin();
    let mut shell = build_shell(config, io::stdout());
    if stdin.is_terminal() {
        match DefaultEditor::new() {
            Ok(mut editor) => {
                shell.run_editor(&mut editor)?;
                return Ok(());
            }
            Err(e) => warn!("Line editing unavailable, reading plain lines: {}", e),
        }
    }
    shell.run(stdin.lock())?;
    Ok(())
}

/// Dispatches each line in order, stopping early on `exit`/`quit`.
///
/// Returns how many lines were executed, the exiting line included.
pub fn exec_lines<B: Binder, W: Write>(
    shell: &mut Shell<B, W>,
    lines: &[String],
) -> io::Result<usize> {
    for (i, line) in lines.iter().enumerate() {
        if shell.execute_line(line)? == Flow::Exit {
            debug!("Exit requested, skipping {} remaining lines", lines.len() - i - 1);
            return Ok(i + 1);
        }
    }
    Ok(lines.len())
}

/// Runs `lines` against a shell writing to stdout.
pub fn command_exec(lines: &[String], config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut shell = build_shell(config, io::stdout());
    exec_lines(&mut shell, lines)?;
    Ok(())
}
