//! git rules.

use super::{join_with_tail, RuleContext};
use crate::command::Command;
use lazy_static::lazy_static;
use regex::Regex;

const DEFAULT_BRANCH: &str = "master";

lazy_static! {
    static ref RE_UPSTREAM: Regex =
        Regex::new(r"git push --set-upstream origin ([a-zA-Z0-9_-]+)").unwrap();
    static ref RE_MOST_SIMILAR: Regex =
        Regex::new(r"The most similar command is\s+([a-z]+)").unwrap();
}

pub fn push_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("git push") && cmd.output().contains("has no upstream branch")
}

pub fn push_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    let branch = RE_UPSTREAM
        .captures(cmd.output())
        .and_then(|caps| caps.get(1))
        .map_or(DEFAULT_BRANCH, |m| m.as_str());
    vec![format!("git push --set-upstream origin {branch}")]
}

pub fn not_command_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("git") && cmd.output().contains("is not a git command")
}

pub fn not_command_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    match RE_MOST_SIMILAR.captures(cmd.output()).and_then(|caps| caps.get(1)) {
        Some(similar) => {
            let head = format!("git {}", similar.as_str());
            vec![join_with_tail(&head, cmd.tokens(), 2)]
        }
        None => vec![cmd.script().to_string()],
    }
}

pub fn add_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("git add") && cmd.output().contains("did not match any file")
}

pub fn add_fix(_: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec!["git add -A".to_string()]
}

pub fn add_force_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("git add")
        && (cmd.output().contains(".gitignore") || cmd.output().contains("ignored"))
}

pub fn add_force_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec![format!("{} --force", cmd.script())]
}

pub fn branch_delete_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().contains("git branch -d") && cmd.output().contains("not fully merged")
}

pub fn branch_delete_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec![cmd.script().replacen("-d", "-D", 1)]
}

pub fn commit_add_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("git commit") && cmd.output().contains("no changes added to commit")
}

/// `-a` first, then the interactive `-p` variant.
pub fn commit_add_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    let rest = cmd.script().strip_prefix("git commit").unwrap_or_default();
    vec![format!("git commit -a{rest}"), format!("git commit -p{rest}")]
}

pub fn commit_amend_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("git commit") && !cmd.script().contains("--amend")
}

pub fn commit_amend_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec![format!("{} --amend", cmd.script())]
}

pub fn pull_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("git pull") && cmd.output().contains("no tracking information")
}

pub fn pull_fix(_: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec![format!(
        "git branch --set-upstream-to=origin/{DEFAULT_BRANCH} {DEFAULT_BRANCH} && git pull"
    )]
}

/// Single-dash long flags git users commonly mistype, checked in this order.
const SINGLE_DASH_FLAGS: &[(&str, &str)] = &[
    (" -amend", " --amend"),
    (" -continue", " --continue"),
    (" -abort", " --abort"),
];

pub fn two_dashes_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("git ")
        && SINGLE_DASH_FLAGS
            .iter()
            .any(|(flag, _)| cmd.script().contains(flag))
}

pub fn two_dashes_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    let fixed = SINGLE_DASH_FLAGS
        .iter()
        .find(|(flag, _)| cmd.script().contains(flag))
        .map_or_else(
            || cmd.script().to_string(),
            |(flag, doubled)| cmd.script().replacen(flag, doubled, 1),
        );
    vec![fixed]
}

pub fn clone_git_clone_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("git clone git clone")
}

pub fn clone_git_clone_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    let fixed = cmd
        .script()
        .strip_prefix("git clone ")
        .unwrap_or(cmd.script());
    vec![fixed.to_string()]
}

pub fn main_master_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    (cmd.script().contains("master") && cmd.output().contains("did you mean 'main'"))
        || (cmd.script().contains("main") && cmd.output().contains("did you mean 'master'"))
}

pub fn main_master_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    let fixed = if cmd.script().contains("master") {
        cmd.script().replacen("master", "main", 1)
    } else {
        cmd.script().replacen("main", "master", 1)
    };
    vec![fixed]
}
