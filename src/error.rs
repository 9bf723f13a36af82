use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixError {
    #[error("Home directory not found")]
    NoHomeDir,

    #[error("Shell history not found at {0}")]
    HistoryNotFound(PathBuf),

    #[error("Failed to read shell history from {path}: {source}")]
    HistoryRead { path: PathBuf, source: io::Error },

    #[error("Failed to run `{script}`: {source}")]
    Spawn { script: String, source: io::Error },

    #[error("Failed to read confirmation: {0}")]
    Prompt(#[from] io::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

impl FixError {
    /// True for the errors that just mean "there is no previous command to fix".
    pub fn is_missing_input(&self) -> bool {
        matches!(self, FixError::NoHomeDir | FixError::HistoryNotFound(_))
    }
}
