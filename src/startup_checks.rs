//! Runtime requirement validation for affinity-tuner.
//!
//! Checks that procfs is readable, that the taskset binary exists and is
//! executable, and warns when running unprivileged.

use crate::process::ProcFs;
use nix::unistd::geteuid;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Validate all runtime requirements
pub fn validate_requirements(procfs: &ProcFs, taskset: &Path) -> Result<(), ValidationError> {
    info!("🔍 Validating runtime requirements...");

    check_user_privileges();
    check_proc_access(procfs)?;
    check_taskset(taskset)?;

    debug!("CPU universe: {} logical CPUs", procfs.cpu_count());
    info!("✅ All runtime requirements validated");
    Ok(())
}

/// Check if running with sufficient privileges
fn check_user_privileges() {
    if !geteuid().is_root() {
        warn!("⚠️  Not running as root - binding other users' processes will fail");
    } else {
        info!("✅ Running as root (uid=0)");
    }
}

/// Check that the proc root lists at least one readable process
pub fn check_proc_access(procfs: &ProcFs) -> Result<(), ValidationError> {
    let root = procfs.root();
    if !root.is_dir() {
        error!("❌ {} not found or not a directory", root.display());
        return Err(ValidationError::ProcNotMounted(root.display().to_string()));
    }

    if procfs.list_all().is_empty() {
        error!("❌ Cannot read any process entries from {}", root.display());
        return Err(ValidationError::ProcUnreadable(root.display().to_string()));
    }

    info!("✅ {} readable", root.display());
    Ok(())
}

/// Check that taskset exists and carries an execute bit
pub fn check_taskset(path: &Path) -> Result<(), ValidationError> {
    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            warn!("⚠️  {} not usable: {}", path.display(), e);
            warn!("   Install util-linux or pass --taskset <PATH>");
            return Err(ValidationError::TasksetMissing(path.display().to_string()));
        }
    };

    if !meta.is_file() || meta.permissions().mode() & 0o111 == 0 {
        warn!("⚠️  {} is not an executable file", path.display());
        return Err(ValidationError::TasksetNotExecutable(
            path.display().to_string(),
        ));
    }

    info!("✅ {} found", path.display());
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("procfs not found at {0}")]
    ProcNotMounted(String),

    #[error("no readable process entries under {0}")]
    ProcUnreadable(String),

    #[error("taskset not found at {0}")]
    TasksetMissing(String),

    #[error("taskset at {0} is not executable")]
    TasksetNotExecutable(String),
}
