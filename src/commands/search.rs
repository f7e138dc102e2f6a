//! Search commands (KEYS)

use super::{Command, CommandContext, CommandError};

/// KEYS command - Numbered listing of every key in index order
///
/// Syntax: keys pattern
///
/// The pattern is accepted but not applied; every key lists. Glob matching
/// could be layered in without changing the reply shape.
pub struct KeysCommand;

impl Command for KeysCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        _tokens: &[String],
    ) -> Result<String, CommandError> {
        let rows: Vec<String> = ctx
            .db
            .iter()
            .enumerate()
            .map(|(i, (key, _))| format!("{}) \"{}\"", i + 1, key))
            .collect();
        if rows.is_empty() {
            Ok("this database is empty!".to_owned())
        } else {
            Ok(rows.join("\n"))
        }
    }

    fn name(&self) -> &'static str {
        "keys"
    }

    fn min_tokens(&self) -> usize {
        2
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(2)
    }
}
