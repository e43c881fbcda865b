//! Check command implementation.
//!
//! Validates system requirements and configuration.

use crate::config::{validate_effective_config, Config};
use crate::process::parse_status_affinity;
use crate::startup_checks::{check_proc_access, check_taskset};

use super::shell::build_procfs;

/// Validates system requirements and configuration.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 affinity-tuner - System Check");
    println!("================================");

    let mut all_ok = true;
    let procfs = build_procfs(config);

    println!("\n📁 Checking {}...", procfs.root().display());
    match check_proc_access(&procfs) {
        Ok(()) => {
            println!("   ✅ Can read {} process entries", procfs.list_all().len());
            let status = procfs
                .root()
                .join(std::process::id().to_string())
                .join("status");
            match std::fs::read_to_string(&status)
                .map_err(|e| e.to_string())
                .and_then(|s| parse_status_affinity(&s).map_err(|e| e.to_string()))
            {
                Ok(cpus) => println!("   ✅ Own affinity readable: {} CPUs allowed", cpus.len()),
                Err(e) => {
                    println!("   ❌ Cannot read own affinity: {}", e);
                    all_ok = false;
                }
            }
        }
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n🧮 Checking CPUs...");
    println!("   ✅ {} logical CPUs", procfs.cpu_count());

    let taskset = config.taskset_path();
    println!("\n📌 Checking {}...", taskset.display());
    match check_taskset(&taskset) {
        Ok(()) => println!("   ✅ taskset is executable"),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => println!("   ✅ Configuration is valid"),
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}
