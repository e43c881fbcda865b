//! Integration tests for the command shell.
//!
//! Each test drives a `Shell` over a synthetic /proc tree with a recording
//! binder and inspects the captured output and bind calls.

mod common;

use affinity_tuner::commands::exec_lines;
use affinity_tuner::shell::{Flow, Shell};
use common::{standard_tree, FakeProc, RecordingBinder};
use std::io::Cursor;

type TestShell = Shell<RecordingBinder, Vec<u8>>;

fn shell(fake: &FakeProc, cpu_count: usize) -> TestShell {
    Shell::new(fake.procfs(cpu_count), RecordingBinder::default(), Vec::new())
}

fn output(shell: &TestShell) -> String {
    String::from_utf8_lossy(shell.output()).into_owned()
}

// -------------------------------------------------------------------------
// Dispatch
// -------------------------------------------------------------------------

#[test]
fn test_unique_prefix_runs_command() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    assert_eq!(sh.execute_line("pg sshd").unwrap(), Flow::Continue);
    let out = output(&sh);
    assert!(out.starts_with("PID    AFNT CMD\n"));
    assert!(out.contains("812    1111 /usr/sbin/sshd -D"));
}

#[test]
fn test_ambiguous_prefix_runs_nothing() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("p").unwrap();
    let out = output(&sh);
    assert_eq!(out, "Ambiguous commands: pgrep, ps\n");
}

#[test]
fn test_unknown_command_shows_help() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("frobnicate").unwrap();
    let out = output(&sh);
    assert!(out.starts_with("Unknown command\nAvailable commands:\n"));
    assert!(out.contains("  autobind   Bind selected threads to CPUs evenly."));
}

#[test]
fn test_blank_line_is_noop() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    assert_eq!(sh.execute_line("   \n").unwrap(), Flow::Continue);
    assert!(output(&sh).is_empty());
}

#[test]
fn test_unbalanced_quotes_reported() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    assert_eq!(sh.execute_line("pgrep \"nginx").unwrap(), Flow::Continue);
    assert!(output(&sh).starts_with("parse error"));
}

#[test]
fn test_quoted_keyword_is_one_word() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("pgrep 'master process'").unwrap();
    let out = output(&sh);
    assert!(out.contains("1200"));
    assert!(!out.contains("812"));
}

#[test]
fn test_exit_and_quit_prefixes() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    assert_eq!(sh.execute_line("q").unwrap(), Flow::Exit);
    assert_eq!(sh.execute_line("exit").unwrap(), Flow::Exit);
}

// -------------------------------------------------------------------------
// Loop
// -------------------------------------------------------------------------

#[test]
fn test_end_of_input_terminates() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.run(Cursor::new("ps\n")).unwrap();
    let out = output(&sh);
    assert!(out.starts_with("cmd: PID"));
    assert!(out.ends_with("cmd: \nBye\n"));
}

#[test]
fn test_exit_stops_reading() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4).with_prompt("> ");
    sh.run(Cursor::new("exit\nps\n")).unwrap();
    assert_eq!(output(&sh), "> Bye\n");
}

#[test]
fn test_exec_lines_stop_at_quit() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    let lines: Vec<String> = ["select sshd", "quit", "reset"]
        .iter()
        .map(|l| l.to_string())
        .collect();
    assert_eq!(exec_lines(&mut sh, &lines).unwrap(), 2);
    assert_eq!(sh.session().pids(), vec![812]);
}

#[test]
fn test_exec_lines_runs_all_without_exit() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    let lines = vec!["select nginx".to_string(), "auto".to_string()];
    assert_eq!(exec_lines(&mut sh, &lines).unwrap(), 2);
    assert_eq!(sh.binder().calls.len(), 3);
}

#[test]
fn test_empty_input_terminates() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.run(Cursor::new("")).unwrap();
    assert_eq!(output(&sh), "cmd: \nBye\n");
}

// -------------------------------------------------------------------------
// Listing
// -------------------------------------------------------------------------

#[test]
fn test_ps_lists_names() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("ps").unwrap();
    let out = output(&sh);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1], "1      1111 systemd");
    assert_eq!(lines[5], "2000   0010 postgres");
}

#[test]
fn test_threads_with_keywords() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("threads nginx").unwrap();
    let out = output(&sh);
    let pids: Vec<&str> = out
        .lines()
        .skip(1)
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(pids, vec!["1200", "1201", "1202"]);
}

#[test]
fn test_threads_without_keywords_uses_selection() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("select postgres").unwrap();
    assert!(!output(&sh).contains("2001"));
    sh.execute_line("threads").unwrap();
    let out = output(&sh);
    assert!(out.contains("2001   0010 postgres"));
    assert!(out.contains("2002   0010 postgres"));
}

#[test]
fn test_help_with_prefix() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("help th").unwrap();
    let out = output(&sh);
    assert!(out.starts_with("threads: Print threads in processes."));
    assert!(out.contains("threads [pid...]"));
    assert!(!out.contains("autobind"));
}

#[test]
fn test_help_with_several_prefixes() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("help th re").unwrap();
    let out = output(&sh);
    // table order, not argument order
    let reset = out.find("reset: Reset selection.").unwrap();
    let threads = out.find("threads: Print threads in processes.").unwrap();
    assert!(reset < threads);
    assert!(!out.contains("autobind"));
    assert!(!out.contains("select:"));
}

// -------------------------------------------------------------------------
// Selection
// -------------------------------------------------------------------------

#[test]
fn test_select_then_reset_is_empty() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("select nginx sshd").unwrap();
    assert_eq!(sh.session().pids(), vec![812, 1200]);
    sh.execute_line("reset").unwrap();
    assert!(sh.session().is_empty());
}

#[test]
fn test_select_nonexistent_pid_stays_empty() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("select 999999").unwrap();
    assert!(sh.session().is_empty());
    assert_eq!(output(&sh), "PID    AFNT CMD\n");
}

#[test]
fn test_select_prunes_vanished_processes() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("select sshd").unwrap();
    fake.remove_process(812);
    sh.execute_line("select nginx").unwrap();
    assert_eq!(sh.session().pids(), vec![1200]);
}

#[test]
fn test_select_does_not_duplicate() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("select nginx").unwrap();
    sh.execute_line("select 1200").unwrap();
    assert_eq!(sh.session().pids(), vec![1200]);
}

// -------------------------------------------------------------------------
// Binding
// -------------------------------------------------------------------------

#[test]
fn test_autobind_round_robin_over_threads() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("autobind nginx postgres").unwrap();
    let calls = &sh.binder().calls;
    let targets: Vec<u32> = calls.iter().map(|c| c.0).collect();
    let cpus: Vec<Vec<usize>> = calls.iter().map(|c| c.1.clone()).collect();
    assert_eq!(targets, vec![1200, 1201, 1202, 2000, 2001, 2002]);
    assert_eq!(
        cpus,
        vec![vec![0], vec![1], vec![2], vec![3], vec![0], vec![1]]
    );
}

#[test]
fn test_autobind_uses_selection() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 2);
    sh.execute_line("select postgres").unwrap();
    sh.execute_line("auto").unwrap();
    assert_eq!(
        sh.binder().calls,
        vec![(2000, vec![0]), (2001, vec![1]), (2002, vec![0])]
    );
}

#[test]
fn test_autobind_empty_selection_binds_nothing() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("autobind").unwrap();
    assert!(sh.binder().calls.is_empty());
    assert_eq!(output(&sh), "No threads to bind\n");
}

#[test]
fn test_fullbind_binds_every_thread_to_all_cpus() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("fullbind nginx").unwrap();
    assert_eq!(
        sh.binder().calls,
        vec![
            (1200, vec![0, 1, 2, 3]),
            (1201, vec![0, 1, 2, 3]),
            (1202, vec![0, 1, 2, 3]),
        ]
    );
}

#[test]
fn test_fullbind_uses_selection() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 2);
    sh.execute_line("select nginx").unwrap();
    sh.execute_line("fullbind").unwrap();
    assert_eq!(
        sh.binder().calls,
        vec![(1200, vec![0, 1]), (1201, vec![0, 1]), (1202, vec![0, 1])]
    );
}

#[test]
fn test_bind_explicit() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("bind 812 0-1,3").unwrap();
    assert_eq!(sh.binder().calls, vec![(812, vec![0, 1, 3])]);
}

#[test]
fn test_bind_invalid_pid_reports_and_continues() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    assert_eq!(sh.execute_line("bind abc 0,1").unwrap(), Flow::Continue);
    assert_eq!(output(&sh), "invalid PID: abc\n");
    assert!(sh.binder().calls.is_empty());
}

#[test]
fn test_bind_invalid_cpu_list() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("bind 812 x").unwrap();
    assert!(output(&sh).starts_with("invalid CPU list 'x'"));
    assert!(sh.binder().calls.is_empty());
}

#[test]
fn test_bind_huge_cpu_range_rejected() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    assert_eq!(
        sh.execute_line("bind 812 0-99999999999").unwrap(),
        Flow::Continue
    );
    assert!(output(&sh).starts_with("invalid CPU list '0-99999999999'"));
    assert!(sh.binder().calls.is_empty());
}

#[test]
fn test_bind_missing_arguments_prints_usage() {
    let fake = standard_tree();
    let mut sh = shell(&fake, 4);
    sh.execute_line("bind 812").unwrap();
    assert_eq!(output(&sh), "usage: bind <pid> <cpu,cpu,...>\n");
}

#[test]
fn test_missing_taskset_is_reported() {
    let fake = standard_tree();
    let binder = affinity_tuner::TasksetBinder::new("/nonexistent/taskset");
    let mut sh = Shell::new(fake.procfs(4), binder, Vec::new());
    assert_eq!(sh.execute_line("bind 812 0").unwrap(), Flow::Continue);
    let out = String::from_utf8_lossy(sh.output()).into_owned();
    assert!(out.starts_with("failed to run /nonexistent/taskset"));
}

#[test]
fn test_dry_run_prints_taskset_commands() {
    let fake = standard_tree();
    let binder = affinity_tuner::DryRunBinder::with_output("/usr/bin/taskset", Vec::new());
    let mut sh = Shell::new(fake.procfs(4), binder, Vec::new());
    sh.execute_line("autobind postgres").unwrap();
    let printed = String::from_utf8_lossy(sh.binder().output()).into_owned();
    assert_eq!(
        printed,
        "[dry-run] /usr/bin/taskset -pc 0 2000\n\
         [dry-run] /usr/bin/taskset -pc 1 2001\n\
         [dry-run] /usr/bin/taskset -pc 2 2002\n"
    );
    assert!(sh.output().is_empty());
}
