//! affinity-tuner library
//!
//! Interactive shell for inspecting Linux processes and pinning them, or
//! their threads, to CPU cores through `taskset`.
//!
//! # Features
//!
//! - **Process queries**: list, search and expand processes to threads from /proc
//! - **Selection**: keep a set of processes between commands
//! - **Binding**: round-robin or all-core assignment, one `taskset` call per thread
//! - **Prefix commands**: any unambiguous prefix of a command name runs it
//!
//! # Usage
//!
//! ```no_run
//! use affinity_tuner::{binder::DryRunBinder, process::ProcFs, shell::Shell};
//!
//! let procfs = ProcFs::default();
//! let mut shell = Shell::new(procfs, DryRunBinder::new("/usr/bin/taskset"), std::io::stdout());
//!
//! shell.execute_line("select nginx").unwrap();
//! shell.execute_line("autobind").unwrap();
//! ```

pub mod binder;
pub mod cli;
pub mod commands;
pub mod config;
pub mod format;
pub mod process;
pub mod session;
pub mod shell;
pub mod startup_checks;

// Re-export main types for convenience
pub use binder::{Binder, DryRunBinder, TasksetBinder};
pub use process::{ProcFs, ProcessInfo};
pub use session::Session;
pub use shell::{Flow, Shell};
