//! Interpreter, compiler and package-manager rules.

use super::{replace_typo, RuleContext};
use crate::command::Command;

const DOCKER_TYPOS: &[(&str, &str)] = &[("tags", "images"), ("tag", "image")];

const NPM_TYPOS: &[(&str, &str)] = &[
    ("urgrade", "upgrade"),
    ("isntall", "install"),
    ("instal", "install"),
    ("intsall", "install"),
];

const PIP_TYPOS: &[(&str, &str)] = &[
    ("instatl", "install"),
    ("instal", "install"),
    ("isntall", "install"),
    ("unisntall", "uninstall"),
];

pub fn python_command_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.output().contains("Permission denied") && cmd.token(0).is_some_and(|t| t.ends_with(".py"))
}

pub fn python_command_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec![format!("python {}", cmd.script())]
}

pub fn python_execute_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("python ")
        && cmd.output().contains("No such file")
        && !cmd.script().ends_with(".py")
}

pub fn python_execute_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec![format!("{}.py", cmd.script())]
}

pub fn java_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("java ")
        && cmd.tokens().last().is_some_and(|t| t.ends_with(".java"))
}

pub fn java_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    let fixed = cmd
        .script()
        .trim_end_matches(' ')
        .strip_suffix(".java")
        .unwrap_or(cmd.script());
    vec![fixed.to_string()]
}

pub fn javac_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("javac ")
        && cmd.output().contains("No such file")
        && !cmd.script().ends_with(".java")
}

pub fn javac_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec![format!("{}.java", cmd.script())]
}

pub fn go_run_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("go run ") && !cmd.script().ends_with(".go")
}

pub fn go_run_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec![format!("{}.go", cmd.script())]
}

pub fn cargo_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script() == "cargo"
}

pub fn cargo_fix(_: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec!["cargo build".to_string()]
}

pub fn cpp11_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    (cmd.script().starts_with("g++ ") || cmd.script().starts_with("clang++ "))
        && !cmd.script().contains("-std=")
        && (cmd.output().contains("C++11") || cmd.output().contains("c++11"))
}

pub fn cpp11_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec![format!("{} -std=c++11", cmd.script())]
}

pub fn docker_not_command_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("docker ") && cmd.output().contains("is not a docker command")
}

pub fn docker_not_command_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec![replace_typo(cmd, 1, DOCKER_TYPOS)]
}

pub fn npm_wrong_command_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("npm ") && cmd.output().contains("Unknown command")
}

pub fn npm_wrong_command_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec![replace_typo(cmd, 1, NPM_TYPOS)]
}

pub fn pip_unknown_command_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("pip ") && cmd.output().contains("unknown command")
}

pub fn pip_unknown_command_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    vec![replace_typo(cmd, 1, PIP_TYPOS)]
}
