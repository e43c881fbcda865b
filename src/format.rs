//! Text rendering for process tables and help output.

use crate::process::{affinity_bitmap, ProcessInfo};
use crate::shell::CommandSpec;
use std::io::{self, Write};

/// Writes the `PID AFNT CMD` table.
///
/// `long` shows the full command line instead of the executable name;
/// kernel threads without a command line fall back to their name.
pub fn write_process_table<W: Write + ?Sized>(
    out: &mut W,
    items: &[ProcessInfo],
    cpu_count: usize,
    long: bool,
) -> io::Result<()> {
    let width = cpu_count.max(4);
    writeln!(out, "{:<6} {:^width$} {}", "PID", "AFNT", "CMD")?;
    for p in items {
        let bitmap = affinity_bitmap(&p.affinity, cpu_count);
        let cmd = if long && !p.cmdline.is_empty() {
            p.command_line()
        } else {
            p.name.clone()
        };
        writeln!(out, "{:<6} {:^width$} {}", p.pid, bitmap, cmd)?;
    }
    Ok(())
}

/// One line per command: name padded to 10 columns, then its summary.
pub fn write_help_overview<W: Write + ?Sized>(
    out: &mut W,
    commands: &[CommandSpec],
) -> io::Result<()> {
    writeln!(out, "Available commands:")?;
    for c in commands {
        writeln!(out, "  {:<10} {}", c.name, c.summary)?;
    }
    Ok(())
}

/// Full help for one command.
pub fn write_help_detail<W: Write + ?Sized>(out: &mut W, spec: &CommandSpec) -> io::Result<()> {
    writeln!(out, "{}: {}", spec.name, spec.summary)?;
    writeln!(out, "  Usage:")?;
    writeln!(out, "    {}", spec.usage)?;
    if !spec.details.is_empty() {
        writeln!(out)?;
        for line in spec.details.lines() {
            writeln!(out, "  {}", line)?;
        }
    }
    Ok(())
}
