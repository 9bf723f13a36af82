//! Finds the last command the user ran from the shell history file.

use crate::error::FixError;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// History lines containing any of these are never offered for correction
const IGNORED: &[&str] = &["shit", "nano"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlavor {
    Bash,
    Zsh,
}

impl ShellFlavor {
    /// Flavor named by a `$SHELL` value; anything but zsh reads bash history.
    pub fn detect(shell: Option<&str>) -> Self {
        match shell {
            Some(shell) if shell.contains("zsh") => ShellFlavor::Zsh,
            _ => ShellFlavor::Bash,
        }
    }

    fn history_file(self) -> &'static str {
        match self {
            ShellFlavor::Bash => ".bash_history",
            ShellFlavor::Zsh => ".zsh_history",
        }
    }
}

/// Last command from the current user's history file.
pub fn last_command() -> Result<String, FixError> {
    let shell = env::var("SHELL").ok();
    let flavor = ShellFlavor::detect(shell.as_deref());
    let home = dirs::home_dir().ok_or(FixError::NoHomeDir)?;
    last_command_in(&history_path(&home, flavor), flavor)
}

pub fn history_path(home: &Path, flavor: ShellFlavor) -> PathBuf {
    home.join(flavor.history_file())
}

pub fn last_command_in(path: &Path, flavor: ShellFlavor) -> Result<String, FixError> {
    debug!("Reading {:?} history from {:?}", flavor, path);
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => FixError::HistoryNotFound(path.to_path_buf()),
        _ => FixError::HistoryRead {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    Ok(parse_last_command(&String::from_utf8_lossy(&bytes), flavor))
}

/// Last usable entry of a history file's contents, or an empty string.
pub fn parse_last_command(contents: &str, flavor: ShellFlavor) -> String {
    contents
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let entry = match flavor {
                // extended history: ": <timestamp>:<elapsed>;<command>"
                ShellFlavor::Zsh => line.rsplit_once(';').map_or(line, |(_, cmd)| cmd),
                ShellFlavor::Bash => line,
            };
            let entry = entry.trim();
            (!entry.is_empty() && !IGNORED.iter().any(|word| entry.contains(word)))
                .then_some(entry)
        })
        .last()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_flavor() {
        assert_eq!(ShellFlavor::detect(Some("/usr/bin/zsh")), ShellFlavor::Zsh);
        assert_eq!(ShellFlavor::detect(Some("/bin/bash")), ShellFlavor::Bash);
        assert_eq!(ShellFlavor::detect(None), ShellFlavor::Bash);
    }

    #[test]
    fn test_bash_last_line_wins() {
        let contents = "ls\ngit status\n  gti push  \n\n";
        assert_eq!(parse_last_command(contents, ShellFlavor::Bash), "gti push");
    }

    #[test]
    fn test_skips_own_invocations() {
        let contents = "gti status\ntheshit\nshit\nnano notes.txt\n";
        assert_eq!(parse_last_command(contents, ShellFlavor::Bash), "gti status");
    }

    #[test]
    fn test_zsh_extended_format() {
        let contents = ": 1700000000:0;cd /tmp\n: 1700000005:0;pyton app.py\n";
        assert_eq!(parse_last_command(contents, ShellFlavor::Zsh), "pyton app.py");
    }

    #[test]
    fn test_zsh_plain_lines() {
        assert_eq!(parse_last_command("cargo\n", ShellFlavor::Zsh), "cargo");
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(parse_last_command("", ShellFlavor::Bash), "");
        assert_eq!(parse_last_command("shit\n   \n", ShellFlavor::Bash), "");
    }

    #[test]
    fn test_reads_file_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = history_path(dir.path(), ShellFlavor::Bash);
        assert!(matches!(
            last_command_in(&path, ShellFlavor::Bash),
            Err(FixError::HistoryNotFound(_))
        ));

        fs::write(&path, b"ls\nmkdir a/b\n").unwrap();
        assert_eq!(last_command_in(&path, ShellFlavor::Bash).unwrap(), "mkdir a/b");
    }
}
