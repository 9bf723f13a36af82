//! Rule registry and first-match dispatch.

use crate::command::Command;
use crate::rules::{self, Rule, RuleContext};
use tracing::{debug, warn};

/// The rule that fired and what it proposed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub rule: String,
    pub suggestions: Vec<String>,
}

pub struct Registry {
    rules: Vec<Box<dyn Rule>>,
}

impl Registry {
    /// Sorts `rules` by ascending priority; equal priorities keep their given order.
    pub fn new(mut rules: Vec<Box<dyn Rule>>) -> Self {
        rules.sort_by_key(|rule| rule.priority());
        Self { rules }
    }

    /// Registry over the built-in catalog.
    pub fn builtin() -> Self {
        let rules = rules::catalog()
            .into_iter()
            .map(|rule| Box::new(rule) as Box<dyn Rule>)
            .collect();
        Self::new(rules)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }

    /// First matching rule in priority order, with its fix.
    ///
    /// A rule that matches but produces nothing yields the unchanged script.
    pub fn dispatch(&self, cmd: &Command, ctx: &RuleContext<'_>) -> Option<Correction> {
        let rule = self.rules.iter().find(|rule| rule.matches(cmd, ctx))?;

        let mut suggestions = rule.fix(cmd, ctx);
        if suggestions.is_empty() {
            warn!("Rule {} matched but produced no fix", rule.name());
            suggestions.push(cmd.script().to_string());
        }
        debug!("Rule {} proposed {:?}", rule.name(), suggestions);

        Some(Correction {
            rule: rule.name().to_string(),
            suggestions,
        })
    }

    /// Suggestions of the first matching rule; empty means nothing to fix.
    pub fn corrected_commands(&self, cmd: &Command, ctx: &RuleContext<'_>) -> Vec<String> {
        self.dispatch(cmd, ctx)
            .map(|correction| correction.suggestions)
            .unwrap_or_default()
    }
}
