//! theshit - corrects your previous console command
//!
//! Re-runs the last command from shell history (or the one given on the
//! command line), matches its output against a priority-ordered catalog of
//! rules and proposes the first matching rule's best correction.
//!
//! # Environment
//! - `THESHIT_REQUIRE_CONFIRMATION`: ask before running a correction (default `true`)
//! - `THESHIT_NO_COLORS`: plain output
//! - `THESHIT_DEBUG`: debug logging to stderr (otherwise `RUST_LOG` applies)

mod command;
mod correction;
mod error;
mod fuzzy;
mod history;
mod registry;
mod rules;
mod settings;
mod shell;

use clap::Parser;
use command::Command;
use correction::{CorrectionLoop, Executor, LoopOptions, Terminal};
use error::FixError;
use fuzzy::ExecutableCache;
use registry::Registry;
use rules::RuleContext;
use serde::Serialize;
use settings::Settings;
use shell::ShellExecutor;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const ALIAS: &str = "alias shit='theshit -- $(fc -ln -1)'";

/// Fixes your previous console command
#[derive(Parser, Debug)]
#[command(name = "theshit", version, about, long_about = None)]
struct Cli {
    /// Run the correction without asking
    #[arg(short = 'y', long = "yeah", visible_alias = "hard")]
    yeah: bool,

    /// Keep correcting while the corrected command fails
    #[arg(short = 'r', long = "recursive")]
    recursive: bool,

    /// Print a shell alias definition and exit
    #[arg(long)]
    alias: bool,

    /// Print the matched rule and suggestions as JSON instead of running anything
    #[arg(long)]
    json: bool,

    /// Command to correct; defaults to the last entry of the shell history
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,
}

/// Machine-readable result for `--json`
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    script: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<&'a str>,
    suggestions: &'a [String],
}

fn init_tracing(settings: &Settings) {
    let filter = if settings.debug {
        EnvFilter::new("theshit=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = Settings::from_env();
    init_tracing(&settings);

    if settings.no_colors {
        colored::control::set_override(false);
    }

    if cli.alias {
        println!("{ALIAS}");
        return ExitCode::SUCCESS;
    }

    match run(&cli, &settings) {
        Ok(code) => code,
        Err(e) if e.is_missing_input() => {
            debug!("{}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, settings: &Settings) -> Result<ExitCode, FixError> {
    if let Ok(json) = serde_json::to_string(settings) {
        debug!("Settings: {}", json);
    }

    let script = if cli.command.is_empty() {
        history::last_command()?
    } else {
        cli.command.join(" ").trim().to_string()
    };
    if script.is_empty() {
        debug!("No previous command found");
        return Ok(ExitCode::FAILURE);
    }
    info!("Correcting: {}", script);

    let mut executor = ShellExecutor;
    let output = executor.capture(&script).unwrap_or_else(|e| {
        warn!("{}", e);
        String::new()
    });
    debug!("Captured output: {:?}", output);

    let executables = ExecutableCache::from_env();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let ctx = RuleContext {
        settings,
        executables: &executables,
        cwd: &cwd,
    };
    let registry = Registry::builtin();
    debug!("Rule order: {:?}", registry.rule_names().collect::<Vec<_>>());

    let cmd = Command::new(script, output);

    if cli.json {
        let correction = registry.dispatch(&cmd, &ctx);
        let report = JsonReport {
            script: cmd.script(),
            rule: correction.as_ref().map(|c| c.rule.as_str()),
            suggestions: correction
                .as_ref()
                .map(|c| c.suggestions.as_slice())
                .unwrap_or_default(),
        };
        println!("{}", serde_json::to_string(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    let options = LoopOptions {
        auto_accept: cli.yeah,
        recursive: cli.recursive,
    };
    let mut terminal = Terminal::stdio();
    let report = CorrectionLoop::new(&registry, ctx, options).run(cmd, &mut executor, &mut terminal)?;
    info!("Finished after {} attempt(s): {:?}", report.attempts, report.outcome);

    Ok(ExitCode::SUCCESS)
}
