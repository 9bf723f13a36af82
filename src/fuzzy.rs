//! Fuzzy suggestions for unknown executables.
//!
//! The search path is scanned once per process and the discovered names are
//! cached; ranking compares an unresolved token against every cached name by
//! Levenshtein distance.

use std::cell::OnceCell;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Full Levenshtein distance with unit cost for insertion, deletion and substitution.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        dp[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1]
            } else {
                1 + dp[i - 1][j].min(dp[i][j - 1]).min(dp[i - 1][j - 1])
            };
        }
    }

    dp[a.len()][b.len()]
}

/// An executable name and its distance from the token being resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyCandidate {
    pub name: String,
    pub distance: usize,
}

/// Executable names discovered on the search path, populated at most once.
#[derive(Debug, Default)]
pub struct ExecutableCache {
    search_path: Vec<PathBuf>,
    names: OnceCell<Vec<String>>,
}

impl ExecutableCache {
    /// Cache over the directories of `$PATH`; nothing is scanned until first use.
    pub fn from_env() -> Self {
        let search_path = env::var_os("PATH")
            .map(|path| env::split_paths(&path).collect())
            .unwrap_or_default();
        Self::with_search_path(search_path)
    }

    pub fn with_search_path(search_path: Vec<PathBuf>) -> Self {
        Self {
            search_path,
            names: OnceCell::new(),
        }
    }

    /// Cache that is already populated with `names`, in discovery order.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = OnceCell::from(names.into_iter().map(Into::into).collect::<Vec<_>>());
        Self {
            search_path: Vec::new(),
            names,
        }
    }

    pub fn names(&self) -> &[String] {
        self.names.get_or_init(|| {
            let names = scan_search_path(&self.search_path);
            debug!(
                "Loaded {} executables from {} directories",
                names.len(),
                self.search_path.len()
            );
            names
        })
    }

    /// Cached names within `max_distance` of `token`, closest first.
    ///
    /// Ties keep discovery order.
    pub fn rank(&self, token: &str, max_distance: usize) -> Vec<FuzzyCandidate> {
        let mut candidates: Vec<FuzzyCandidate> = self
            .names()
            .iter()
            .filter_map(|name| {
                let distance = levenshtein(token, name);
                (distance <= max_distance).then(|| FuzzyCandidate {
                    name: name.clone(),
                    distance,
                })
            })
            .collect();

        candidates.sort_by_key(|candidate| candidate.distance);
        candidates
    }
}

/// List executables in every directory of `search_path`, first occurrence wins.
pub fn scan_search_path(search_path: &[PathBuf]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for dir in search_path {
        if !dir.is_dir() {
            continue;
        }
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Skipping {:?}: {}", dir, e);
                continue;
            }
        };

        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }

            // Unknown file types are kept and left to the permission check
            if let Ok(file_type) = entry.file_type() {
                if !file_type.is_file() && !file_type.is_symlink() {
                    continue;
                }
            }

            if is_user_executable(&entry.path()) && seen.insert(name.to_string()) {
                names.push(name.to_string());
            }
        }
    }

    names
}

#[cfg(unix)]
fn is_user_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o100 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_user_executable(path: &Path) -> bool {
    path.exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("", "git"), 3);
        assert_eq!(levenshtein("git", ""), 3);
        assert_eq!(levenshtein("gti", "git"), 2);
        assert_eq!(levenshtein("gut", "git"), 1);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn test_levenshtein_symmetric_and_zero_iff_equal() {
        let words = ["", "a", "ls", "sl", "git", "gti", "python", "pyton", "docker"];
        for a in words {
            for b in words {
                assert_eq!(levenshtein(a, b), levenshtein(b, a), "{a} / {b}");
                assert_eq!(levenshtein(a, b) == 0, a == b, "{a} / {b}");
            }
        }
    }

    #[test]
    fn test_levenshtein_triangle_inequality() {
        let words = ["cargo", "carg", "cat", "chmod", "chown", "grep", "grpe", "egrep"];
        for a in words {
            for b in words {
                for c in words {
                    assert!(levenshtein(a, c) <= levenshtein(a, b) + levenshtein(b, c));
                }
            }
        }
    }

    #[test]
    fn test_levenshtein_agrees_with_strsim() {
        let pairs = [
            ("puthon", "python"),
            ("claer", "clear"),
            ("unisntall", "uninstall"),
            ("kubectl", "kubetcl"),
            ("ñandú", "nandu"),
        ];
        for (a, b) in pairs {
            assert_eq!(levenshtein(a, b), strsim::levenshtein(a, b));
        }
    }

    #[test]
    fn test_rank_filters_and_sorts_stably() {
        let cache = ExecutableCache::with_names(["gut", "git", "grep", "gti", "gitk"]);
        let ranked = cache.rank("gti", 2);
        let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
        // gut, git and gitk tie at 2 and keep discovery order; grep is 3
        assert_eq!(names, ["gti", "gut", "git", "gitk"]);
        assert_eq!(ranked[0].distance, 0);
        assert_eq!(ranked[1].distance, 2);
    }

    #[test]
    fn test_rank_empty_when_nothing_close() {
        let cache = ExecutableCache::with_names(["python", "docker"]);
        assert!(cache.rank("zz", 1).is_empty());
    }

    #[cfg(unix)]
    fn write_file(dir: &Path, name: &str, mode: u32) {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_keeps_only_visible_executables() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        write_file(first.path(), "git", 0o755);
        write_file(first.path(), ".hidden", 0o755);
        write_file(first.path(), "notes.txt", 0o644);
        fs::create_dir(first.path().join("subdir")).unwrap();
        write_file(second.path(), "git", 0o755);
        write_file(second.path(), "grep", 0o700);

        let missing = first.path().join("does-not-exist");
        let search_path = vec![
            first.path().to_path_buf(),
            missing,
            second.path().to_path_buf(),
        ];

        let mut names = scan_search_path(&search_path);
        names.sort();
        assert_eq!(names, ["git", "grep"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_cache_scans_once() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "cargo", 0o755);

        let cache = ExecutableCache::with_search_path(vec![dir.path().to_path_buf()]);
        assert_eq!(cache.names(), ["cargo"]);

        // Added after the first scan, so never seen by this cache
        write_file(dir.path(), "rustc", 0o755);
        assert_eq!(cache.names(), ["cargo"]);
    }
}
