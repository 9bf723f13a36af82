//! Rule abstraction and the built-in catalog.
//!
//! Every rule is a leaf: a name, a priority, a pure predicate over the failed
//! [`Command`] and a fix generator. The built-in rules are plain function
//! pairs registered in [`catalog`]; the registration order there is the
//! tie-breaker between equal priorities and is part of the observable behavior.

mod fuzzy;
mod git;
mod shell;
mod toolchain;

use crate::command::Command;
use crate::fuzzy::ExecutableCache;
use crate::settings::Settings;
use std::path::Path;

/// Priority given to rules that do not ask for one
pub const DEFAULT_PRIORITY: i32 = 1000;

/// Read-only collaborators a rule may consult.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub settings: &'a Settings,
    pub executables: &'a ExecutableCache,
    /// Directory relative script paths are resolved against
    pub cwd: &'a Path,
}

pub trait Rule {
    fn name(&self) -> &str;

    /// Lower runs earlier
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    fn matches(&self, cmd: &Command, ctx: &RuleContext<'_>) -> bool;

    /// Candidate scripts, best first. Never empty when `matches` was true.
    fn fix(&self, cmd: &Command, ctx: &RuleContext<'_>) -> Vec<String>;
}

type MatchFn = fn(&Command, &RuleContext<'_>) -> bool;
type FixFn = fn(&Command, &RuleContext<'_>) -> Vec<String>;

/// A rule declared as a predicate/fix function pair.
#[derive(Clone, Copy)]
pub struct FnRule {
    name: &'static str,
    matches: MatchFn,
    fix: FixFn,
}

impl FnRule {
    pub const fn new(name: &'static str, matches: MatchFn, fix: FixFn) -> Self {
        Self { name, matches, fix }
    }
}

impl std::fmt::Debug for FnRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Rule for FnRule {
    fn name(&self) -> &str {
        self.name
    }

    fn matches(&self, cmd: &Command, ctx: &RuleContext<'_>) -> bool {
        (self.matches)(cmd, ctx)
    }

    fn fix(&self, cmd: &Command, ctx: &RuleContext<'_>) -> Vec<String> {
        (self.fix)(cmd, ctx)
    }
}

/// Every built-in rule, in registration order.
pub fn catalog() -> Vec<FnRule> {
    vec![
        FnRule::new("sudo", shell::sudo_matches, shell::sudo_fix),
        FnRule::new("fuzzy_command", fuzzy::matches, fuzzy::fix),
        FnRule::new("git_push", git::push_matches, git::push_fix),
        FnRule::new("no_command", shell::no_command_matches, shell::no_command_fix),
        FnRule::new("git_not_command", git::not_command_matches, git::not_command_fix),
        FnRule::new("cd_mkdir", shell::cd_mkdir_matches, shell::cd_mkdir_fix),
        FnRule::new("cd_parent", shell::cd_parent_matches, shell::cd_parent_fix),
        FnRule::new("cd_cs", shell::cd_cs_matches, shell::cd_cs_fix),
        FnRule::new("cat_dir", shell::cat_dir_matches, shell::cat_dir_fix),
        FnRule::new("chmod_x", shell::chmod_x_matches, shell::chmod_x_fix),
        FnRule::new(
            "cp_omitting_directory",
            shell::cp_omitting_directory_matches,
            shell::cp_omitting_directory_fix,
        ),
        FnRule::new("dry", shell::dry_matches, shell::dry_fix),
        FnRule::new("git_add", git::add_matches, git::add_fix),
        FnRule::new("git_add_force", git::add_force_matches, git::add_force_fix),
        FnRule::new(
            "git_branch_delete",
            git::branch_delete_matches,
            git::branch_delete_fix,
        ),
        FnRule::new("git_commit_add", git::commit_add_matches, git::commit_add_fix),
        FnRule::new(
            "git_commit_amend",
            git::commit_amend_matches,
            git::commit_amend_fix,
        ),
        FnRule::new("git_pull", git::pull_matches, git::pull_fix),
        FnRule::new("git_two_dashes", git::two_dashes_matches, git::two_dashes_fix),
        FnRule::new(
            "grep_recursive",
            shell::grep_recursive_matches,
            shell::grep_recursive_fix,
        ),
        FnRule::new(
            "has_exists_script",
            shell::has_exists_script_matches,
            shell::has_exists_script_fix,
        ),
        FnRule::new("ls_all", shell::ls_all_matches, shell::ls_all_fix),
        FnRule::new("ls_lah", shell::ls_lah_matches, shell::ls_lah_fix),
        FnRule::new("mkdir_p", shell::mkdir_p_matches, shell::mkdir_p_fix),
        FnRule::new("rm_dir", shell::rm_dir_matches, shell::rm_dir_fix),
        FnRule::new("sl_ls", shell::sl_ls_matches, shell::sl_ls_fix),
        FnRule::new(
            "python_command",
            toolchain::python_command_matches,
            toolchain::python_command_fix,
        ),
        FnRule::new(
            "python_execute",
            toolchain::python_execute_matches,
            toolchain::python_execute_fix,
        ),
        FnRule::new("java", toolchain::java_matches, toolchain::java_fix),
        FnRule::new("javac", toolchain::javac_matches, toolchain::javac_fix),
        FnRule::new("go_run", toolchain::go_run_matches, toolchain::go_run_fix),
        FnRule::new("cargo", toolchain::cargo_matches, toolchain::cargo_fix),
        FnRule::new(
            "docker_not_command",
            toolchain::docker_not_command_matches,
            toolchain::docker_not_command_fix,
        ),
        FnRule::new(
            "npm_wrong_command",
            toolchain::npm_wrong_command_matches,
            toolchain::npm_wrong_command_fix,
        ),
        FnRule::new(
            "pip_unknown_command",
            toolchain::pip_unknown_command_matches,
            toolchain::pip_unknown_command_fix,
        ),
        FnRule::new(
            "git_clone_git_clone",
            git::clone_git_clone_matches,
            git::clone_git_clone_fix,
        ),
        FnRule::new(
            "wrong_hyphen_before_subcommand",
            shell::wrong_hyphen_matches,
            shell::wrong_hyphen_fix,
        ),
        FnRule::new(
            "missing_space_before_subcommand",
            shell::missing_space_matches,
            shell::missing_space_fix,
        ),
        FnRule::new(
            "remove_shell_prompt_literal",
            shell::prompt_literal_matches,
            shell::prompt_literal_fix,
        ),
        FnRule::new("touch", shell::touch_matches, shell::touch_fix),
        FnRule::new("unsudo", shell::unsudo_matches, shell::unsudo_fix),
        FnRule::new("ln_s_order", shell::ln_s_order_matches, shell::ln_s_order_fix),
        FnRule::new("cpp11", toolchain::cpp11_matches, toolchain::cpp11_fix),
        FnRule::new("git_main_master", git::main_master_matches, git::main_master_fix),
    ]
}

// ============================================================================
// Shared helpers
// ============================================================================

/// `replacement` followed by the tokens from `from` onward, single-space separated.
pub(crate) fn join_with_tail(replacement: &str, tokens: &[String], from: usize) -> String {
    let mut fixed = replacement.to_string();
    for token in tokens.iter().skip(from) {
        fixed.push(' ');
        fixed.push_str(token);
    }
    fixed
}

/// Replace the token at `index` using a typo table.
///
/// Tokens before and after are kept in order. Falls back to the unchanged
/// script when the token is missing or not a known typo.
pub(crate) fn replace_typo(cmd: &Command, index: usize, typos: &[(&str, &str)]) -> String {
    let Some(token) = cmd.token(index) else {
        return cmd.script().to_string();
    };
    match typos.iter().find(|(typo, _)| *typo == token) {
        Some((_, correct)) => {
            let mut parts: Vec<&str> = cmd.tokens().iter().map(String::as_str).collect();
            parts[index] = *correct;
            parts.join(" ")
        }
        None => cmd.script().to_string(),
    }
}
