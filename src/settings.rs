//! Process-wide settings, read once at startup.

use serde::Serialize;

const ENV_REQUIRE_CONFIRMATION: &str = "THESHIT_REQUIRE_CONFIRMATION";
const ENV_NO_COLORS: &str = "THESHIT_NO_COLORS";
const ENV_DEBUG: &str = "THESHIT_DEBUG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Ask before running a correction (unless auto-accept is on)
    pub require_confirmation: bool,
    /// Print corrections without ANSI colors
    pub no_colors: bool,
    /// Force debug logging regardless of RUST_LOG
    pub debug: bool,
    /// Attempts allowed without recursive mode
    pub max_attempts: usize,
    /// Attempts allowed with recursive mode
    pub recursive_max_attempts: usize,
    /// Distance bound for the fuzzy rule to claim a match
    pub fuzzy_match_distance: usize,
    /// Wider distance bound used when generating fuzzy suggestions
    pub fuzzy_suggest_distance: usize,
    /// Maximum number of fuzzy suggestions emitted
    pub num_close_matches: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            require_confirmation: true,
            no_colors: false,
            debug: false,
            max_attempts: 1,
            recursive_max_attempts: 10,
            fuzzy_match_distance: 2,
            fuzzy_suggest_distance: 3,
            num_close_matches: 3,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// A toggle only changes when its variable is present, and is enabled
    /// only by the exact text `true`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let toggle = |key: &str, current: bool| match lookup(key) {
            Some(value) => value == "true",
            None => current,
        };

        settings.require_confirmation =
            toggle(ENV_REQUIRE_CONFIRMATION, settings.require_confirmation);
        settings.no_colors = toggle(ENV_NO_COLORS, settings.no_colors);
        settings.debug = toggle(ENV_DEBUG, settings.debug);
        settings
    }

    pub fn attempts_for(&self, recursive: bool) -> usize {
        if recursive {
            self.recursive_max_attempts
        } else {
            self.max_attempts
        }
    }
}
