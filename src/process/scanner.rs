//! Process scanning utilities for discovering and reading process entries from /proc.
//!
//! `ProcFs` wraps a procfs mount (normally `/proc`) and provides process
//! listing, keyword search and thread expansion. Entries that vanish or are
//! unreadable mid-scan are skipped, never reported as errors.

use crate::process::cpu::{online_cpu_count, parse_cpu_list};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default procfs mount point.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// A process or thread as seen through procfs.
///
/// Threads share this shape: `pid` then holds the thread ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cmdline: Vec<String>,
    pub affinity: Vec<usize>,
}

impl ProcessInfo {
    /// Command line joined with spaces, as shown by `ps -f`.
    pub fn command_line(&self) -> String {
        self.cmdline.join(" ")
    }

    /// Case-insensitive substring match on the command line, or exact PID match.
    pub fn matches_any(&self, keywords: &[String]) -> bool {
        let pid = self.pid.to_string();
        let cmd = self.command_line().to_uppercase();
        keywords
            .iter()
            .any(|k| *k == pid || cmd.contains(&k.to_uppercase()))
    }
}

/// Handle on a procfs tree.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
    cpu_count: Option<usize>,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cpu_count: None,
        }
    }

    /// Fix the CPU universe instead of asking the OS.
    pub fn with_cpu_count(mut self, cpu_count: Option<usize>) -> Self {
        self.cpu_count = cpu_count;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of logical CPUs, i.e. the size of the `[0, n)` universe.
    pub fn cpu_count(&self) -> usize {
        self.cpu_count.unwrap_or_else(online_cpu_count)
    }

    pub fn exists(&self, pid: u32) -> bool {
        self.root.join(pid.to_string()).is_dir()
    }

    /// Every process visible under the proc root, in ascending PID order.
    pub fn list_all(&self) -> Vec<ProcessInfo> {
        self.pids()
            .into_iter()
            .filter_map(|pid| self.process(pid))
            .collect()
    }

    /// Processes whose PID equals a keyword or whose command line contains one.
    pub fn find_processes(&self, keywords: &[String]) -> Vec<ProcessInfo> {
        if keywords.is_empty() {
            return Vec::new();
        }
        self.list_all()
            .into_iter()
            .filter(|p| p.matches_any(keywords))
            .collect()
    }

    /// Expands processes to their threads, each returned as a process-shaped handle.
    pub fn threads_of(&self, processes: &[ProcessInfo]) -> Vec<ProcessInfo> {
        let mut out = Vec::new();
        for p in processes {
            if !self.exists(p.pid) {
                debug!("Process {} no longer exists, skipping", p.pid);
                continue;
            }
            let task_dir = self.root.join(p.pid.to_string()).join("task");
            for tid in numeric_entries(&task_dir) {
                match read_entry(&task_dir.join(tid.to_string()), tid) {
                    Ok(t) => out.push(t),
                    Err(e) => debug!("Skipping thread {} of {}: {}", tid, p.pid, e),
                }
            }
        }
        out
    }

    /// Reads one process, `None` if it vanished or is unreadable.
    pub fn process(&self, pid: u32) -> Option<ProcessInfo> {
        match read_entry(&self.root.join(pid.to_string()), pid) {
            Ok(p) => Some(p),
            Err(e) => {
                debug!("Skipping PID {}: {}", pid, e);
                None
            }
        }
    }

    fn pids(&self) -> Vec<u32> {
        numeric_entries(&self.root)
    }
}

/// Numeric directory names below `dir`, sorted ascending.
fn numeric_entries(dir: &Path) -> Vec<u32> {
    let mut out = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            debug!("Cannot read {}: {}", dir.display(), e);
            return out;
        }
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = match name.to_str() {
            Some(v) => v,
            None => continue,
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if let Ok(pid) = name.parse() {
            out.push(pid);
        }
    }
    out.sort_unstable();
    out
}

/// Reads name, command line and affinity of a process or task directory.
fn read_entry(path: &Path, pid: u32) -> io::Result<ProcessInfo> {
    let status = fs::read_to_string(path.join("status"))?;
    let affinity = parse_status_affinity(&status)?;
    let cmdline = read_cmdline(path);
    let name = read_process_name(path, &status, &cmdline);
    Ok(ProcessInfo {
        pid,
        name,
        cmdline,
        affinity,
    })
}

/// Extracts `Cpus_allowed_list` from the contents of a status file.
pub fn parse_status_affinity(status: &str) -> io::Result<Vec<usize>> {
    let list = status
        .lines()
        .find_map(|l| l.strip_prefix("Cpus_allowed_list:"))
        .ok_or_else(|| io::Error::other("Cpus_allowed_list missing from status"))?;
    parse_cpu_list(list).map_err(io::Error::other)
}

/// Reads NUL-separated arguments from cmdline; empty for kernel threads.
fn read_cmdline(path: &Path) -> Vec<String> {
    match fs::read(path.join("cmdline")) {
        Ok(content) => content
            .split(|&b| b == 0u8)
            .filter(|s| !s.is_empty())
            .map(|s| String::from_utf8_lossy(s).into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Reads process name from comm, the status `Name:` line, or argv[0].
fn read_process_name(path: &Path, status: &str, cmdline: &[String]) -> String {
    if let Ok(s) = fs::read_to_string(path.join("comm")) {
        let t = s.trim();
        if !t.is_empty() {
            return t.into();
        }
    }

    if let Some(name) = status.lines().find_map(|l| l.strip_prefix("Name:")) {
        let t = name.trim();
        if !t.is_empty() {
            return t.into();
        }
    }

    cmdline
        .first()
        .and_then(|a| Path::new(a).file_name())
        .and_then(|n| n.to_str())
        .map(|s| s.to_string())
        .unwrap_or_default()
}
