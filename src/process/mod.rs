//! Process-related modules for enumeration and CPU affinity.
//!
//! This module provides:
//! - `scanner`: Process discovery, keyword search and thread expansion from /proc
//! - `cpu`: CPU list parsing, bitmap rendering and CPU count detection

pub mod cpu;
pub mod scanner;

// Re-export commonly used types
pub use cpu::{
    affinity_bitmap, format_cpu_list, online_cpu_count, parse_cpu_list, CpuListError,
};
pub use scanner::{parse_status_affinity, ProcFs, ProcessInfo, DEFAULT_PROC_ROOT};
