//! Selection state carried between shell commands.

use crate::process::ProcessInfo;
use ahash::AHashSet as HashSet;

/// User-curated, ordered set of processes reused by later commands.
#[derive(Debug, Default, Clone)]
pub struct Session {
    selection: Vec<ProcessInfo>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &[ProcessInfo] {
        &self.selection
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub fn pids(&self) -> Vec<u32> {
        self.selection.iter().map(|p| p.pid).collect()
    }

    /// Appends processes not already selected, then drops every entry for
    /// which `exists` is false. Returns the number of entries added.
    pub fn extend<F>(&mut self, processes: &[ProcessInfo], exists: F) -> usize
    where
        F: Fn(u32) -> bool,
    {
        let mut seen: HashSet<u32> = self.selection.iter().map(|p| p.pid).collect();
        let before = self.selection.len();
        for p in processes {
            if seen.insert(p.pid) {
                self.selection.push(p.clone());
            }
        }
        let added = self.selection.len() - before;
        self.prune(exists);
        added
    }

    /// Removes entries whose PID no longer exists.
    pub fn prune<F>(&mut self, exists: F)
    where
        F: Fn(u32) -> bool,
    {
        self.selection.retain(|p| exists(p.pid));
    }

    pub fn reset(&mut self) {
        self.selection.clear();
    }
}
