//! CPU list parsing and CPU universe detection.
//!
//! This module provides functions to parse the kernel's CPU list syntax
//! (as found in `Cpus_allowed_list` of `/proc/<pid>/status` and accepted by
//! `taskset -c`) and to query the number of online logical CPUs.

use std::collections::BTreeSet;

/// Highest CPU count the kernel can be built for (`CONFIG_NR_CPUS` limit).
pub const MAX_CPUS: usize = 8192;

/// Errors produced while parsing a CPU list such as `0-3,6,8-9`.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CpuListError {
    #[error("empty CPU list")]
    Empty,

    #[error("invalid CPU index '{0}'")]
    InvalidIndex(String),

    #[error("invalid CPU range '{0}'")]
    InvalidRange(String),

    #[error("CPU index {0} out of range (limit {MAX_CPUS})")]
    OutOfRange(usize),
}

/// Get the number of online logical CPUs (what `taskset` and the scheduler see).
pub fn online_cpu_count() -> usize {
    // SAFETY: sysconf is safe to call with _SC_NPROCESSORS_ONLN
    // Returns -1 on error, which is handled by the > 0 check
    let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
    if n > 0 {
        n as usize
    } else {
        1
    }
}

/// Parse a kernel-style CPU list into sorted, deduplicated CPU indices.
///
/// Accepts single indices and inclusive ranges separated by commas.
/// Surrounding whitespace is ignored, empty segments are not.
/// Indices at or above `MAX_CPUS` are rejected before any range is expanded.
pub fn parse_cpu_list(s: &str) -> Result<Vec<usize>, CpuListError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(CpuListError::Empty);
    }

    let mut cpus = BTreeSet::new();
    for part in s.split(',') {
        let part = part.trim();
        match part.split_once('-') {
            Some((lo, hi)) => {
                let lo: usize = lo
                    .trim()
                    .parse()
                    .map_err(|_| CpuListError::InvalidRange(part.to_string()))?;
                let hi: usize = hi
                    .trim()
                    .parse()
                    .map_err(|_| CpuListError::InvalidRange(part.to_string()))?;
                if lo > hi {
                    return Err(CpuListError::InvalidRange(part.to_string()));
                }
                check_index(hi)?;
                cpus.extend(lo..=hi);
            }
            None => {
                let cpu: usize = part
                    .parse()
                    .map_err(|_| CpuListError::InvalidIndex(part.to_string()))?;
                check_index(cpu)?;
                cpus.insert(cpu);
            }
        }
    }

    Ok(cpus.into_iter().collect())
}

fn check_index(cpu: usize) -> Result<(), CpuListError> {
    if cpu >= MAX_CPUS {
        return Err(CpuListError::OutOfRange(cpu));
    }
    Ok(())
}

/// Join CPU indices with commas, the form passed to `taskset -pc`.
pub fn format_cpu_list(cpus: &[usize]) -> String {
    cpus.iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Render an affinity set as a bitmap string, most-significant core first.
///
/// Indices outside `[0, cpu_count)` are ignored.
pub fn affinity_bitmap(affinity: &[usize], cpu_count: usize) -> String {
    let mut bits = vec!['0'; cpu_count];
    for &cpu in affinity {
        if cpu < cpu_count {
            bits[cpu] = '1';
        }
    }
    bits.iter().rev().collect()
}
