//! Rules for coreutils and plain shell mistakes.

use super::{join_with_tail, replace_typo, RuleContext};
use crate::command::Command;

const COMMAND_NOT_FOUND: &str = "command not found";
const NO_SUCH_FILE: &str = "No such file or directory";

const COMMAND_TYPOS: &[(&str, &str)] = &[
    ("puthon", "python"),
    ("pytohn", "python"),
    ("gti", "git"),
    ("vom", "vim"),
    ("claer", "clear"),
    ("cd..", "cd .."),
    ("sl", "ls"),
    ("grpe", "grep"),
    ("pyton", "python"),
];

fn single(fixed: impl Into<String>) -> Vec<String> {
    vec![fixed.into()]
}

fn unchanged(cmd: &Command) -> Vec<String> {
    single(cmd.script())
}

/// Text after `prefix`, or the whole script when it does not start with it.
fn after<'a>(cmd: &'a Command, prefix: &str) -> &'a str {
    cmd.script().strip_prefix(prefix).unwrap_or(cmd.script())
}

pub fn sudo_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    let lower = cmd.output_lowercase();
    // The mixed-case check is kept even though the lowercase one subsumes it
    lower.contains("permission denied")
        || cmd.output().contains("Permission denied")
        || cmd.output().contains("EACCES")
        || cmd.output().contains("unless you are root")
}

pub fn sudo_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single(format!("sudo {}", cmd.script()))
}

pub fn unsudo_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("sudo ")
        && (cmd.output().contains("must not be run as root")
            || cmd.output().contains("don't run this as root"))
}

pub fn unsudo_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single(after(cmd, "sudo "))
}

pub fn no_command_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.output().contains(COMMAND_NOT_FOUND) || cmd.output().contains("No command")
}

pub fn no_command_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single(replace_typo(cmd, 0, COMMAND_TYPOS))
}

pub fn cd_mkdir_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("cd ")
        && cmd.token(1).is_some()
        && (cmd.output().contains(NO_SUCH_FILE) || cmd.output().contains("cannot access"))
}

pub fn cd_mkdir_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    match cmd.token(1) {
        Some(dir) => single(format!("mkdir -p {dir} && cd {dir}")),
        None => unchanged(cmd),
    }
}

pub fn cd_parent_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script() == "cd.."
}

pub fn cd_parent_fix(_: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single("cd ..")
}

pub fn cd_cs_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("cs ")
}

pub fn cd_cs_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single(format!("cd {}", after(cmd, "cs ")))
}

pub fn cat_dir_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("cat ")
        && (cmd.output().contains("Is a directory") || cmd.output().contains("is a directory"))
}

pub fn cat_dir_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single(format!("ls {}", after(cmd, "cat ")))
}

pub fn chmod_x_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.output().contains("Permission denied")
        && cmd.token(0).is_some_and(|t| t.starts_with("./"))
}

pub fn chmod_x_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    match cmd.token(0) {
        Some(script) => single(format!("chmod +x {script} && {}", cmd.script())),
        None => unchanged(cmd),
    }
}

pub fn cp_omitting_directory_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("cp ") && cmd.output().contains("omitting directory")
}

pub fn cp_omitting_directory_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single(format!("cp -r {}", after(cmd, "cp ")))
}

pub fn dry_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    match (cmd.token(0), cmd.token(1)) {
        (Some(first), Some(second)) => first == second,
        _ => false,
    }
}

pub fn dry_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    match cmd.token(0) {
        Some(first) => single(join_with_tail(first, cmd.tokens(), 2)),
        None => unchanged(cmd),
    }
}

pub fn grep_recursive_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("grep ") && cmd.output().contains("Is a directory")
}

pub fn grep_recursive_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single(format!("grep -r {}", after(cmd, "grep ")))
}

pub fn has_exists_script_matches(cmd: &Command, ctx: &RuleContext<'_>) -> bool {
    cmd.output().contains(COMMAND_NOT_FOUND)
        && cmd.token(0).is_some_and(|t| ctx.cwd.join(t).exists())
}

pub fn has_exists_script_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single(format!("./{}", cmd.script()))
}

pub fn ls_all_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script() == "ls" && cmd.output().is_empty()
}

pub fn ls_all_fix(_: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single("ls -A")
}

pub fn ls_lah_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script() == "ls" && !cmd.output().is_empty()
}

pub fn ls_lah_fix(_: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single("ls -lah")
}

pub fn mkdir_p_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("mkdir ") && cmd.output().contains(NO_SUCH_FILE)
}

pub fn mkdir_p_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single(format!("mkdir -p {}", after(cmd, "mkdir ")))
}

pub fn rm_dir_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("rm ")
        && (cmd.output().contains("is a directory") || cmd.output().contains("Is a directory"))
}

pub fn rm_dir_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single(format!("rm -rf {}", after(cmd, "rm ")))
}

pub fn sl_ls_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script() == "sl" || cmd.script().starts_with("sl ")
}

pub fn sl_ls_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single(format!("ls{}", after(cmd, "sl")))
}

pub fn touch_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("touch ")
        && after(cmd, "touch ").contains('/')
        && cmd.output().contains(NO_SUCH_FILE)
}

pub fn touch_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    let path = after(cmd, "touch ");
    match path.rfind('/') {
        Some(slash) => single(format!("mkdir -p {} && touch {path}", &path[..slash])),
        None => unchanged(cmd),
    }
}

pub fn ln_s_order_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("ln -s")
        && cmd.token(3).is_some()
        && cmd.output().contains(NO_SUCH_FILE)
}

pub fn ln_s_order_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    match (cmd.token(2), cmd.token(3)) {
        (Some(target), Some(link)) => single(format!("ln -s {link} {target}")),
        _ => unchanged(cmd),
    }
}

pub fn wrong_hyphen_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.output().contains(COMMAND_NOT_FOUND) && cmd.token(0).is_some_and(|t| t.contains('-'))
}

pub fn wrong_hyphen_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single(cmd.script().replacen('-', " ", 1))
}

const MISSING_SPACE_PREFIXES: &[(&str, &str)] = &[
    ("npminstall", "npm install"),
    ("gitcommit", "git commit"),
    ("aptinstall", "apt install"),
];

pub fn missing_space_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.output().contains(COMMAND_NOT_FOUND)
        && ["npm", "git", "apt"]
            .iter()
            .any(|tool| cmd.script().starts_with(tool))
}

pub fn missing_space_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    MISSING_SPACE_PREFIXES
        .iter()
        .find_map(|(glued, spaced)| {
            cmd.script()
                .strip_prefix(glued)
                .map(|rest| format!("{spaced}{rest}"))
        })
        .map(|fixed| vec![fixed])
        .unwrap_or_else(|| unchanged(cmd))
}

pub fn prompt_literal_matches(cmd: &Command, _: &RuleContext<'_>) -> bool {
    cmd.script().starts_with("$ ")
}

pub fn prompt_literal_fix(cmd: &Command, _: &RuleContext<'_>) -> Vec<String> {
    single(after(cmd, "$ "))
}
