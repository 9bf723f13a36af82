//! Suggests executables from the search path for an unknown command.

use super::{join_with_tail, RuleContext};
use crate::command::Command;

pub fn matches(cmd: &Command, ctx: &RuleContext<'_>) -> bool {
    if !cmd.output().contains("command not found") {
        return false;
    }
    let Some(unresolved) = cmd.token(0) else {
        return false;
    };
    !ctx
        .executables
        .rank(unresolved, ctx.settings.fuzzy_match_distance)
        .is_empty()
}

/// Up to `num_close_matches` candidates within the wider suggestion distance.
pub fn fix(cmd: &Command, ctx: &RuleContext<'_>) -> Vec<String> {
    let Some(unresolved) = cmd.token(0) else {
        return vec![cmd.script().to_string()];
    };

    ctx.executables
        .rank(unresolved, ctx.settings.fuzzy_suggest_distance)
        .into_iter()
        .take(ctx.settings.num_close_matches)
        .map(|candidate| join_with_tail(&candidate.name, cmd.tokens(), 1))
        .collect()
}
