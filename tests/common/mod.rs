//! Shared fixtures: a synthetic procfs tree and a recording binder.

#![allow(dead_code)]

use affinity_tuner::binder::Binder;
use affinity_tuner::process::ProcFs;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A temporary directory laid out like /proc.
pub struct FakeProc {
    dir: TempDir,
}

impl FakeProc {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Adds a process whose threads are `pid` itself plus `extra_tids`.
    pub fn add_process(
        &self,
        pid: u32,
        comm: &str,
        cmdline: &[&str],
        cpus_allowed: &str,
        extra_tids: &[u32],
    ) {
        let proc_dir = self.root().join(pid.to_string());
        write_entry(&proc_dir, comm, cmdline, cpus_allowed);
        let mut tids = vec![pid];
        tids.extend_from_slice(extra_tids);
        for tid in tids {
            write_entry(
                &proc_dir.join("task").join(tid.to_string()),
                comm,
                cmdline,
                cpus_allowed,
            );
        }
    }

    pub fn remove_process(&self, pid: u32) {
        fs::remove_dir_all(self.root().join(pid.to_string())).unwrap();
    }

    pub fn procfs(&self, cpu_count: usize) -> ProcFs {
        ProcFs::new(self.root()).with_cpu_count(Some(cpu_count))
    }
}

fn write_entry(dir: &Path, comm: &str, cmdline: &[&str], cpus_allowed: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("comm"), format!("{comm}\n")).unwrap();
    let mut argv = Vec::new();
    for arg in cmdline {
        argv.extend_from_slice(arg.as_bytes());
        argv.push(0);
    }
    fs::write(dir.join("cmdline"), argv).unwrap();
    fs::write(
        dir.join("status"),
        format!("Name:\t{comm}\nState:\tS (sleeping)\nCpus_allowed_list:\t{cpus_allowed}\n"),
    )
    .unwrap();
}

/// Binder that records every call instead of running taskset.
#[derive(Debug, Default)]
pub struct RecordingBinder {
    pub calls: Vec<(u32, Vec<usize>)>,
}

impl Binder for RecordingBinder {
    fn bind(&mut self, target: u32, cpus: &[usize]) -> Result<(), anyhow::Error> {
        self.calls.push((target, cpus.to_vec()));
        Ok(())
    }
}

/// Standard tree: sshd (1 thread), nginx (3 threads), postgres (3 threads),
/// and a kernel thread without a command line.
pub fn standard_tree() -> FakeProc {
    let fake = FakeProc::new();
    fake.add_process(1, "systemd", &["/sbin/init", "splash"], "0-3", &[]);
    fake.add_process(2, "kthreadd", &[], "0-3", &[]);
    fake.add_process(812, "sshd", &["/usr/sbin/sshd", "-D"], "0-3", &[]);
    fake.add_process(
        1200,
        "nginx",
        &["nginx:", "master", "process", "/usr/sbin/nginx"],
        "0-3",
        &[1201, 1202],
    );
    fake.add_process(
        2000,
        "postgres",
        &["/usr/lib/postgresql/16/bin/postgres", "-D", "/var/lib/pg"],
        "1",
        &[2001, 2002],
    );
    fake
}
