//! Static command table and prefix resolution.

/// Every command the shell understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Autobind,
    Fullbind,
    Bind,
    Exit,
    Help,
    Pgrep,
    Ps,
    Reset,
    Select,
    Threads,
}

/// Name, help text and handler tag of one command.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub kind: CommandKind,
    pub summary: &'static str,
    pub usage: &'static str,
    pub details: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "autobind",
        kind: CommandKind::Autobind,
        summary: "Bind selected threads to CPUs evenly.",
        usage: "autobind [process...]",
        details: "Threads are assigned CPUs 0, 1, ... in order, wrapping at the CPU count.\n\
                  If no process is given, the current selection is used.",
    },
    CommandSpec {
        name: "fullbind",
        kind: CommandKind::Fullbind,
        summary: "Bind selected threads to all CPUs.",
        usage: "fullbind [process...]",
        details: "If no process is given, the current selection is used.",
    },
    CommandSpec {
        name: "bind",
        kind: CommandKind::Bind,
        summary: "Bind a process to a few CPUs.",
        usage: "bind 12345 0,1,2,3,4",
        details: "CPU lists accept single indices and ranges, e.g. 0-3,6.",
    },
    CommandSpec {
        name: "exit",
        kind: CommandKind::Exit,
        summary: "Exit the program.",
        usage: "exit",
        details: "",
    },
    CommandSpec {
        name: "help",
        kind: CommandKind::Help,
        summary: "Show usage.",
        usage: "help [command...]",
        details: "",
    },
    CommandSpec {
        name: "pgrep",
        kind: CommandKind::Pgrep,
        summary: "Search for processes with given key words.",
        usage: "pgrep [word...]",
        details: "A process matches if its PID equals a word or its command line\n\
                  contains a word, ignoring case.",
    },
    CommandSpec {
        name: "ps",
        kind: CommandKind::Ps,
        summary: "Print all currently running processes.",
        usage: "ps",
        details: "",
    },
    CommandSpec {
        name: "quit",
        kind: CommandKind::Exit,
        summary: "Exit the program.",
        usage: "quit",
        details: "",
    },
    CommandSpec {
        name: "reset",
        kind: CommandKind::Reset,
        summary: "Reset selection.",
        usage: "reset",
        details: "",
    },
    CommandSpec {
        name: "select",
        kind: CommandKind::Select,
        summary: "Add processes to selection.",
        usage: "select [pid...]",
        details: "Arguments match like pgrep. Without arguments the current selection is shown.",
    },
    CommandSpec {
        name: "threads",
        kind: CommandKind::Threads,
        summary: "Print threads in processes.",
        usage: "threads [pid...]",
        details: "If pid is not specified, current selection is used.",
    },
];

/// Outcome of resolving a typed command word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(&'static CommandSpec),
    Unknown,
    Ambiguous(Vec<&'static str>),
}

// Command names are unique within the table.
impl PartialEq for CommandSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for CommandSpec {}

/// Resolves `word` against the table by prefix. An exact name wins outright.
pub fn resolve(word: &str) -> Resolution {
    if let Some(spec) = COMMANDS.iter().find(|c| c.name == word) {
        return Resolution::Found(spec);
    }
    let matches: Vec<&'static CommandSpec> =
        COMMANDS.iter().filter(|c| c.name.starts_with(word)).collect();
    match matches.as_slice() {
        [] => Resolution::Unknown,
        [one] => Resolution::Found(*one),
        many => Resolution::Ambiguous(many.iter().map(|c| c.name).collect()),
    }
}

/// Commands whose name starts with any of `prefixes`, in table order.
pub fn matching(prefixes: &[String]) -> Vec<&'static CommandSpec> {
    COMMANDS
        .iter()
        .filter(|c| prefixes.iter().any(|p| c.name.starts_with(p.as_str())))
        .collect()
}
