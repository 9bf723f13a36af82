//! The failed command as seen by the rules.

/// A failed script, its captured output and its token split.
///
/// Tokens are the single-space separated fragments of the script with empty
/// fragments dropped. Tabs and other whitespace are NOT delimiters; rules rely
/// on this exact split, so it must not be replaced with shell-style parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    script: String,
    output: String,
    tokens: Vec<String>,
}

impl Command {
    pub fn new(script: impl Into<String>, output: impl Into<String>) -> Self {
        let script = script.into();
        let tokens = tokenize(&script);
        Self {
            script,
            output: output.into(),
            tokens,
        }
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Token at `index`, or `None` when the script is too short.
    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Lowercased copy of the output for case-insensitive checks.
    pub fn output_lowercase(&self) -> String {
        self.output.to_lowercase()
    }
}

fn tokenize(script: &str) -> Vec<String> {
    script
        .split(' ')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
