//! Interactive read-dispatch-print loop.
//!
//! A `Shell` owns the selection `Session`, a `ProcFs` handle and a `Binder`.
//! Each input line is split with POSIX shell rules, its first word resolved
//! against the static command table by prefix, and the matching handler run
//! to completion before the next prompt.

pub mod commands;
pub mod editor;

use std::io::{self, BufRead, Write};

use rustyline::DefaultEditor;
use tracing::{debug, info};

use crate::binder::{apply_plan, plan_all_cores, plan_round_robin, Assignment, Binder};
use crate::format::{write_help_detail, write_help_overview, write_process_table};
use crate::process::{parse_cpu_list, CpuListError, ProcFs, ProcessInfo};
use crate::session::Session;

pub use commands::{resolve, CommandKind, CommandSpec, Resolution, COMMANDS};
use editor::{classify, remember, Input};

/// Default interactive prompt.
pub const DEFAULT_PROMPT: &str = "cmd: ";

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// User-facing command failures. Everything except `Io` is printed and the
/// loop continues; `Io` means the output itself broke.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("parse error: unbalanced quotes or trailing escape")]
    Tokenize,

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid PID: {0}")]
    InvalidPid(String),

    #[error("invalid CPU list '{arg}': {source}")]
    InvalidCpuList {
        arg: String,
        #[source]
        source: CpuListError,
    },

    #[error("{0}")]
    Bind(anyhow::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct Shell<B: Binder, W: Write> {
    procfs: ProcFs,
    binder: B,
    session: Session,
    out: W,
    prompt: String,
}

impl<B: Binder, W: Write> Shell<B, W> {
    pub fn new(procfs: ProcFs, binder: B, out: W) -> Self {
        Self {
            procfs,
            binder,
            session: Session::new(),
            out,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn binder(&self) -> &B {
        &self.binder
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Reads lines until `exit`/`quit` or end of input, then prints `Bye`.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        let mut line = String::new();
        loop {
            write!(self.out, "{}", self.prompt)?;
            self.out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                debug!("End of input");
                writeln!(self.out)?;
                break;
            }
            if self.execute_line(&line)? == Flow::Exit {
                break;
            }
        }
        writeln!(self.out, "Bye")?;
        self.out.flush()
    }

    /// Same loop as `run`, reading through a line editor with history.
    pub fn run_editor(&mut self, editor: &mut DefaultEditor) -> rustyline::Result<()> {
        loop {
            self.out.flush()?;
            let line = match classify(editor.readline(&self.prompt))? {
                Input::Line(line) => line,
                Input::Eof => {
                    debug!("End of input");
                    writeln!(self.out)?;
                    break;
                }
            };
            remember(editor.history_mut(), &line)?;
            if self.execute_line(&line)? == Flow::Exit {
                break;
            }
        }
        writeln!(self.out, "Bye")?;
        self.out.flush()?;
        Ok(())
    }

    /// Tokenizes and dispatches one line; user errors are printed here.
    pub fn execute_line(&mut self, line: &str) -> io::Result<Flow> {
        let result = match shlex::split(line) {
            None => Err(ShellError::Tokenize),
            Some(words) if words.is_empty() => Ok(Flow::Continue),
            Some(words) => self.dispatch(&words[0], &words[1..]),
        };
        match result {
            Ok(flow) => Ok(flow),
            Err(ShellError::Io(e)) => Err(e),
            Err(e) => {
                writeln!(self.out, "{}", e)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn dispatch(&mut self, word: &str, args: &[String]) -> Result<Flow, ShellError> {
        match resolve(word) {
            Resolution::Found(spec) => {
                debug!("Dispatching '{}' as {} {:?}", word, spec.name, args);
                self.execute(spec.kind, args)
            }
            Resolution::Unknown => {
                writeln!(self.out, "Unknown command")?;
                write_help_overview(&mut self.out, COMMANDS)?;
                Ok(Flow::Continue)
            }
            Resolution::Ambiguous(names) => {
                writeln!(self.out, "Ambiguous commands: {}", names.join(", "))?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Runs one resolved command with its arguments.
    pub fn execute(&mut self, kind: CommandKind, args: &[String]) -> Result<Flow, ShellError> {
        match kind {
            CommandKind::Ps => self.handle_ps(),
            CommandKind::Pgrep => self.handle_pgrep(args),
            CommandKind::Select => self.handle_select(args),
            CommandKind::Reset => self.handle_reset(),
            CommandKind::Threads => self.handle_threads(args),
            CommandKind::Bind => self.handle_bind(args),
            CommandKind::Autobind => self.handle_autobind(args),
            CommandKind::Fullbind => self.handle_fullbind(args),
            CommandKind::Help => self.handle_help(args),
            CommandKind::Exit => Ok(Flow::Exit),
        }
    }

    fn handle_ps(&mut self) -> Result<Flow, ShellError> {
        let all = self.procfs.list_all();
        self.print_table(&all, false)?;
        Ok(Flow::Continue)
    }

    fn handle_pgrep(&mut self, args: &[String]) -> Result<Flow, ShellError> {
        let found = self.procfs.find_processes(args);
        self.print_table(&found, true)?;
        Ok(Flow::Continue)
    }

    fn handle_select(&mut self, args: &[String]) -> Result<Flow, ShellError> {
        if args.is_empty() {
            let current = self.session.selection().to_vec();
            self.print_table(&current, false)?;
            return Ok(Flow::Continue);
        }

        let found = self.procfs.find_processes(args);
        self.print_table(&found, false)?;
        let procfs = &self.procfs;
        let added = self.session.extend(&found, |pid| procfs.exists(pid));
        info!(
            "Selected {} new processes, {} in selection",
            added,
            self.session.selection().len()
        );
        Ok(Flow::Continue)
    }

    fn handle_reset(&mut self) -> Result<Flow, ShellError> {
        self.session.reset();
        Ok(Flow::Continue)
    }

    fn handle_threads(&mut self, args: &[String]) -> Result<Flow, ShellError> {
        let threads = self.resolve_threads(args);
        self.print_table(&threads, false)?;
        Ok(Flow::Continue)
    }

    fn handle_bind(&mut self, args: &[String]) -> Result<Flow, ShellError> {
        let (pid, cpus) = match args {
            [pid, cpus, ..] => (pid, cpus),
            _ => return Err(ShellError::Usage("bind <pid> <cpu,cpu,...>")),
        };
        let pid: u32 = pid
            .parse()
            .map_err(|_| ShellError::InvalidPid(pid.clone()))?;
        let cpus = parse_cpu_list(cpus).map_err(|source| ShellError::InvalidCpuList {
            arg: cpus.clone(),
            source,
        })?;
        self.binder.bind(pid, &cpus).map_err(ShellError::Bind)?;
        Ok(Flow::Continue)
    }

    fn handle_autobind(&mut self, args: &[String]) -> Result<Flow, ShellError> {
        let targets = self.resolve_targets(args);
        let plan = plan_round_robin(&targets, self.procfs.cpu_count());
        self.apply(&plan)
    }

    fn handle_fullbind(&mut self, args: &[String]) -> Result<Flow, ShellError> {
        let targets = self.resolve_targets(args);
        let plan = plan_all_cores(&targets, self.procfs.cpu_count());
        self.apply(&plan)
    }

    fn handle_help(&mut self, args: &[String]) -> Result<Flow, ShellError> {
        if args.is_empty() {
            write_help_overview(&mut self.out, COMMANDS)?;
            return Ok(Flow::Continue);
        }
        let specs = commands::matching(args);
        if specs.is_empty() {
            writeln!(self.out, "No command matches {}", args.join(", "))?;
        }
        for spec in specs {
            write_help_detail(&mut self.out, spec)?;
        }
        Ok(Flow::Continue)
    }

    fn apply(&mut self, plan: &[Assignment]) -> Result<Flow, ShellError> {
        if plan.is_empty() {
            writeln!(self.out, "No threads to bind")?;
            return Ok(Flow::Continue);
        }
        let n = apply_plan(&mut self.binder, plan).map_err(ShellError::Bind)?;
        info!("Issued {} bind calls", n);
        Ok(Flow::Continue)
    }

    /// Keywords select via search, no keywords means the current selection.
    fn resolve_threads(&self, args: &[String]) -> Vec<ProcessInfo> {
        let processes = if args.is_empty() {
            self.session.selection().to_vec()
        } else {
            self.procfs.find_processes(args)
        };
        self.procfs.threads_of(&processes)
    }

    fn resolve_targets(&self, args: &[String]) -> Vec<u32> {
        self.resolve_threads(args).iter().map(|t| t.pid).collect()
    }

    fn print_table(&mut self, items: &[ProcessInfo], long: bool) -> io::Result<()> {
        let cpu_count = self.procfs.cpu_count();
        write_process_table(&mut self.out, items, cpu_count, long)
    }
}
