//! The propose / confirm / execute / retry loop.
//!
//! ```text
//! Proposing -> Confirming -> Executing -> Done
//!     ^                          |
//!     +-------- Retrying <-------+   (recursive mode, failed, attempts left)
//! ```
//!
//! The loop blocks in exactly two places: the confirmation read inside
//! [`Interaction::propose`] and the child process inside [`Executor::execute`].

use crate::command::Command;
use crate::error::FixError;
use crate::registry::Registry;
use crate::rules::RuleContext;
use colored::Colorize;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Exit status and combined output of an executed script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub status: i32,
    pub output: String,
}

impl Execution {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Where an executed correction's output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Shown to the user and kept for the next attempt
    Collect,
    /// Attached to our terminal; [`Execution::output`] stays empty
    Inherit,
}

pub trait Executor {
    /// Combined stdout/stderr of `script`.
    fn capture(&mut self, script: &str) -> Result<String, FixError>;

    /// Run `script` for the user, returning its status and, when collected, its combined output.
    fn execute(&mut self, script: &str, mode: OutputMode) -> Result<Execution, FixError>;
}

pub trait Interaction {
    fn nothing_to_fix(&mut self);

    /// Show `suggestion`; when `ask` is set, wait for the user. Returns whether to run it.
    ///
    /// A closed input (EOF) declines.
    fn propose(&mut self, suggestion: &str, ask: bool) -> Result<bool, FixError>;
}

/// Suggestion output and confirmation over a reader/writer pair.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl Terminal<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Interaction for Terminal<R, W> {
    fn nothing_to_fix(&mut self) {
        let _ = writeln!(self.output, "No shit to fix!");
    }

    fn propose(&mut self, suggestion: &str, ask: bool) -> Result<bool, FixError> {
        write!(self.output, "{}", suggestion.green().bold())?;
        if !ask {
            writeln!(self.output)?;
            return Ok(true);
        }

        writeln!(self.output, " [enter/↑/↓/ctrl+c]")?;
        self.output.flush()?;

        // Any line accepts; a closed stdin does not
        let mut answer = String::new();
        let read = self.input.read_line(&mut answer)?;
        Ok(read > 0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoopOptions {
    /// Skip confirmation (`--yeah`)
    pub auto_accept: bool,
    /// Keep correcting while corrections fail (`-r`)
    pub recursive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No rule matched the original command
    NothingToFix,
    /// The user declined the proposed correction
    Declined,
    /// This correction ran successfully
    Fixed(String),
    /// This correction failed and no further attempt was allowed
    Failed(String),
    /// A failed correction that no rule could improve
    Unresolved(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Number of corrections executed
    pub attempts: usize,
    pub outcome: Outcome,
}

#[derive(Debug)]
enum State {
    Proposing(Command),
    Confirming(String),
    Executing(String),
    Retrying(String, Execution),
    Done(Outcome),
}

pub struct CorrectionLoop<'a> {
    registry: &'a Registry,
    ctx: RuleContext<'a>,
    options: LoopOptions,
}

impl<'a> CorrectionLoop<'a> {
    pub fn new(registry: &'a Registry, ctx: RuleContext<'a>, options: LoopOptions) -> Self {
        Self {
            registry,
            ctx,
            options,
        }
    }

    pub fn run(
        &self,
        cmd: Command,
        executor: &mut dyn Executor,
        ui: &mut dyn Interaction,
    ) -> Result<Report, FixError> {
        let max_attempts = self.ctx.settings.attempts_for(self.options.recursive);
        let ask = !self.options.auto_accept && self.ctx.settings.require_confirmation;
        let mut attempts = 0;
        let mut state = State::Proposing(cmd);

        loop {
            debug!("Correction loop: {:?}", state);
            state = match state {
                State::Proposing(cmd) => {
                    let top = self.registry.corrected_commands(&cmd, &self.ctx).into_iter().next();
                    match top {
                        Some(suggestion) => State::Confirming(suggestion),
                        None if attempts == 0 => {
                            ui.nothing_to_fix();
                            State::Done(Outcome::NothingToFix)
                        }
                        None => State::Done(Outcome::Unresolved(cmd.script().to_string())),
                    }
                }
                State::Confirming(script) => {
                    if ui.propose(&script, ask)? {
                        State::Executing(script)
                    } else {
                        State::Done(Outcome::Declined)
                    }
                }
                State::Executing(script) => {
                    attempts += 1;
                    // Output only matters when another attempt can read it
                    let mode = if attempts < max_attempts {
                        OutputMode::Collect
                    } else {
                        OutputMode::Inherit
                    };
                    let execution = executor.execute(&script, mode).unwrap_or_else(|e| {
                        warn!("{}", e);
                        Execution {
                            status: -1,
                            output: String::new(),
                        }
                    });

                    if execution.success() {
                        State::Done(Outcome::Fixed(script))
                    } else if attempts >= max_attempts {
                        State::Done(Outcome::Failed(script))
                    } else {
                        State::Retrying(script, execution)
                    }
                }
                State::Retrying(script, execution) => {
                    State::Proposing(Command::new(script, execution.output))
                }
                State::Done(outcome) => return Ok(Report { attempts, outcome }),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::Fixture;
    use crate::rules::{FnRule, Rule};
    use std::collections::VecDeque;
    use std::io::Cursor;

    #[derive(Default)]
    struct ScriptedExecutor {
        statuses: VecDeque<i32>,
        executed: Vec<String>,
        modes: Vec<OutputMode>,
    }

    impl ScriptedExecutor {
        fn with_statuses(statuses: &[i32]) -> Self {
            Self {
                statuses: statuses.iter().copied().collect(),
                ..Self::default()
            }
        }
    }

    impl Executor for ScriptedExecutor {
        fn capture(&mut self, _: &str) -> Result<String, FixError> {
            Ok(String::new())
        }

        /// Fails with status 1 once the scripted statuses run out
        fn execute(&mut self, script: &str, mode: OutputMode) -> Result<Execution, FixError> {
            self.executed.push(script.to_string());
            self.modes.push(mode);
            let status = self.statuses.pop_front().unwrap_or(1);
            Ok(Execution {
                status,
                output: format!("{script} failed"),
            })
        }
    }

    struct BrokenExecutor;

    impl Executor for BrokenExecutor {
        fn capture(&mut self, script: &str) -> Result<String, FixError> {
            self.execute(script, OutputMode::Collect).map(|e| e.output)
        }

        fn execute(&mut self, script: &str, _: OutputMode) -> Result<Execution, FixError> {
            Err(FixError::Spawn {
                script: script.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no sh"),
            })
        }
    }

    struct Recorder {
        accept: bool,
        proposals: Vec<(String, bool)>,
        nothing_shown: usize,
    }

    impl Recorder {
        fn accepting() -> Self {
            Self {
                accept: true,
                proposals: Vec::new(),
                nothing_shown: 0,
            }
        }
    }

    impl Interaction for Recorder {
        fn nothing_to_fix(&mut self) {
            self.nothing_shown += 1;
        }

        fn propose(&mut self, suggestion: &str, ask: bool) -> Result<bool, FixError> {
            self.proposals.push((suggestion.to_string(), ask));
            Ok(self.accept)
        }
    }

    fn always_make() -> Registry {
        let rule = FnRule::new("always", |_, _| true, |_, _| vec!["make".to_string()]);
        Registry::new(vec![Box::new(rule) as Box<dyn Rule>])
    }

    fn run(
        registry: &Registry,
        fixture: &Fixture,
        options: LoopOptions,
        cmd: Command,
        executor: &mut dyn Executor,
        ui: &mut Recorder,
    ) -> Report {
        CorrectionLoop::new(registry, fixture.ctx(), options)
            .run(cmd, executor, ui)
            .unwrap()
    }

    #[test]
    fn test_nothing_to_fix_is_reported_once() {
        let registry = Registry::builtin();
        let fixture = Fixture::new();
        let mut executor = ScriptedExecutor::default();
        let mut ui = Recorder::accepting();

        let report = run(
            &registry,
            &fixture,
            LoopOptions::default(),
            Command::new("echo hi", "hi\n"),
            &mut executor,
            &mut ui,
        );
        assert_eq!(report, Report { attempts: 0, outcome: Outcome::NothingToFix });
        assert_eq!(ui.nothing_shown, 1);
        assert!(executor.executed.is_empty());
    }

    #[test]
    fn test_single_attempt_without_recursion() {
        let registry = always_make();
        let fixture = Fixture::new();
        let mut executor = ScriptedExecutor::with_statuses(&[2]);
        let mut ui = Recorder::accepting();

        let report = run(
            &registry,
            &fixture,
            LoopOptions::default(),
            Command::new("mkae", ""),
            &mut executor,
            &mut ui,
        );
        assert_eq!(report, Report { attempts: 1, outcome: Outcome::Failed("make".into()) });
        assert_eq!(executor.executed, vec!["make"]);
        assert_eq!(executor.modes, vec![OutputMode::Inherit]);
    }

    #[test]
    fn test_recursive_bound_is_exact() {
        let registry = always_make();
        let fixture = Fixture::new();
        let mut executor = ScriptedExecutor::default();
        let mut ui = Recorder::accepting();
        let options = LoopOptions { auto_accept: true, recursive: true };

        let report = run(&registry, &fixture, options, Command::new("mkae", ""), &mut executor, &mut ui);
        let bound = fixture.settings.attempts_for(true);
        assert_eq!(report.attempts, bound);
        assert_eq!(executor.executed.len(), bound);
        assert_eq!(report.outcome, Outcome::Failed("make".into()));

        // Only the final allowed attempt gets the terminal
        let (last, earlier) = executor.modes.split_last().unwrap();
        assert_eq!(*last, OutputMode::Inherit);
        assert!(earlier.iter().all(|m| *m == OutputMode::Collect));
    }

    #[test]
    fn test_recursive_stops_on_success() {
        let registry = always_make();
        let fixture = Fixture::new();
        let mut executor = ScriptedExecutor::with_statuses(&[1, 0]);
        let mut ui = Recorder::accepting();
        let options = LoopOptions { auto_accept: false, recursive: true };

        let report = run(&registry, &fixture, options, Command::new("mkae", ""), &mut executor, &mut ui);
        assert_eq!(report, Report { attempts: 2, outcome: Outcome::Fixed("make".into()) });
    }

    #[test]
    fn test_retry_builds_record_from_correction_output() {
        let registry = Registry::builtin();
        let fixture = Fixture::new();
        let mut executor = ScriptedExecutor::default();
        let mut ui = Recorder::accepting();
        let options = LoopOptions { auto_accept: true, recursive: true };

        // "ls -A" fails with output "ls -A failed", which no rule handles
        let report = run(&registry, &fixture, options, Command::new("ls", ""), &mut executor, &mut ui);
        assert_eq!(report, Report { attempts: 1, outcome: Outcome::Unresolved("ls -A".into()) });
        assert_eq!(ui.nothing_shown, 0);
    }

    #[test]
    fn test_declined_runs_nothing() {
        let registry = always_make();
        let fixture = Fixture::new();
        let mut executor = ScriptedExecutor::default();
        let mut ui = Recorder { accept: false, ..Recorder::accepting() };

        let report = run(
            &registry,
            &fixture,
            LoopOptions::default(),
            Command::new("mkae", ""),
            &mut executor,
            &mut ui,
        );
        assert_eq!(report.outcome, Outcome::Declined);
        assert!(executor.executed.is_empty());
    }

    #[test]
    fn test_confirmation_requirement() {
        let registry = always_make();
        let mut fixture = Fixture::new();
        let cases = [
            (false, true, true),
            (true, true, false),
            (false, false, false),
        ];
        for (auto_accept, require_confirmation, expect_ask) in cases {
            fixture.settings.require_confirmation = require_confirmation;
            let mut executor = ScriptedExecutor::with_statuses(&[0]);
            let mut ui = Recorder::accepting();
            let options = LoopOptions { auto_accept, recursive: false };
            run(&registry, &fixture, options, Command::new("mkae", ""), &mut executor, &mut ui);
            assert_eq!(ui.proposals, vec![("make".to_string(), expect_ask)]);
        }
    }

    #[test]
    fn test_spawn_failure_counts_as_failed_attempt() {
        let registry = always_make();
        let fixture = Fixture::new();
        let mut ui = Recorder::accepting();
        let options = LoopOptions { auto_accept: true, recursive: true };

        let report = run(&registry, &fixture, options, Command::new("mkae", ""), &mut BrokenExecutor, &mut ui);
        assert_eq!(report.attempts, fixture.settings.attempts_for(true));
    }

    #[test]
    fn test_terminal_confirms_on_any_line() {
        let mut out = Vec::new();
        let mut terminal = Terminal::new(Cursor::new("\n"), &mut out);
        assert!(terminal.propose("git status", true).unwrap());

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("git status"));
        assert!(printed.contains("[enter/↑/↓/ctrl+c]"));
    }

    #[test]
    fn test_terminal_declines_on_closed_input() {
        let mut out = Vec::new();
        let mut terminal = Terminal::new(Cursor::new(""), &mut out);
        assert!(!terminal.propose("git status", true).unwrap());
    }

    #[test]
    fn test_terminal_without_asking_does_not_read() {
        let mut out = Vec::new();
        let mut terminal = Terminal::new(Cursor::new(""), &mut out);
        assert!(terminal.propose("ls -A", false).unwrap());
        terminal.nothing_to_fix();

        let printed = String::from_utf8(out).unwrap();
        assert!(!printed.contains("[enter"));
        assert!(printed.ends_with("No shit to fix!\n"));
    }
}
