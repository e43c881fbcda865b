//! CPU assignment planning and the `taskset` invocation seam.
//!
//! Planning (which thread goes to which CPUs) is pure and lives in
//! `plan_round_robin` / `plan_all_cores`. Executing a plan goes through the
//! `Binder` trait so the shell can run `taskset`, print what it would run,
//! or record calls in tests.

use crate::process::format_cpu_list;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Default location of the affinity tool.
pub const DEFAULT_TASKSET_PATH: &str = "/usr/bin/taskset";

/// One `bind` call: a target thread/process and the CPUs it may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub target: u32,
    pub cpus: Vec<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("failed to run {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Sets the affinity of one target.
pub trait Binder {
    fn bind(&mut self, target: u32, cpus: &[usize]) -> Result<(), anyhow::Error>;
}

impl<B: Binder + ?Sized> Binder for Box<B> {
    fn bind(&mut self, target: u32, cpus: &[usize]) -> Result<(), anyhow::Error> {
        (**self).bind(target, cpus)
    }
}

/// Runs `taskset -pc <cpus> <pid>` synchronously.
///
/// The child inherits stdout/stderr; its exit status is logged, not checked.
#[derive(Debug, Clone)]
pub struct TasksetBinder {
    path: PathBuf,
}

impl TasksetBinder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TasksetBinder {
    fn default() -> Self {
        Self::new(DEFAULT_TASKSET_PATH)
    }
}

impl Binder for TasksetBinder {
    fn bind(&mut self, target: u32, cpus: &[usize]) -> Result<(), anyhow::Error> {
        let cpu_list = format_cpu_list(cpus);
        debug!(
            "Running {} -pc {} {}",
            self.path.display(),
            cpu_list,
            target
        );
        let status = Command::new(&self.path)
            .arg("-pc")
            .arg(&cpu_list)
            .arg(target.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| BindError::Spawn {
                path: self.path.display().to_string(),
                source,
            })?;
        debug!("{} exited for target {}: {}", self.path.display(), target, status);
        Ok(())
    }
}

/// Writes the command a `TasksetBinder` would run instead of running it.
#[derive(Debug)]
pub struct DryRunBinder<W: Write = io::Stdout> {
    path: PathBuf,
    out: W,
}

impl DryRunBinder<io::Stdout> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_output(path, io::stdout())
    }
}

impl<W: Write> DryRunBinder<W> {
    pub fn with_output(path: impl Into<PathBuf>, out: W) -> Self {
        Self {
            path: path.into(),
            out,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// The `taskset` invocation for `target`, as it would be typed.
    pub fn command_line(&self, target: u32, cpus: &[usize]) -> String {
        format!(
            "{} -pc {} {}",
            self.path.display(),
            format_cpu_list(cpus),
            target
        )
    }
}

impl<W: Write> Binder for DryRunBinder<W> {
    fn bind(&mut self, target: u32, cpus: &[usize]) -> Result<(), anyhow::Error> {
        let line = self.command_line(target, cpus);
        writeln!(self.out, "[dry-run] {}", line)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Round-robin over `[0, cpu_count)` starting at CPU 0, one CPU per target.
pub fn plan_round_robin(targets: &[u32], cpu_count: usize) -> Vec<Assignment> {
    let cpu_count = cpu_count.max(1);
    targets
        .iter()
        .enumerate()
        .map(|(i, &target)| Assignment {
            target,
            cpus: vec![i % cpu_count],
        })
        .collect()
}

/// Every target gets the whole `[0, cpu_count)` range.
pub fn plan_all_cores(targets: &[u32], cpu_count: usize) -> Vec<Assignment> {
    let all: Vec<usize> = (0..cpu_count.max(1)).collect();
    targets
        .iter()
        .map(|&target| Assignment {
            target,
            cpus: all.clone(),
        })
        .collect()
}

/// Executes a plan in order, stopping at the first binder error.
///
/// Returns the number of `bind` calls made.
pub fn apply_plan<B: Binder + ?Sized>(
    binder: &mut B,
    plan: &[Assignment],
) -> Result<usize, anyhow::Error> {
    for (done, a) in plan.iter().enumerate() {
        if let Err(e) = binder.bind(a.target, &a.cpus) {
            debug!("Binding stopped after {} of {} targets", done, plan.len());
            return Err(e);
        }
    }
    Ok(plan.len())
}
