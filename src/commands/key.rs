//! Key commands (DEL, EXISTS, RENAME)

use super::{Command, CommandContext, CommandError};

/// DEL command - Remove keys, counting the ones that existed
///
/// Syntax: del key [key ...]
pub struct DelCommand;

impl Command for DelCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let count = tokens[1..].iter().filter(|key| ctx.db.remove(key)).count();
        Ok(format!("(integer) {}", count))
    }

    fn name(&self) -> &'static str {
        "del"
    }

    fn min_tokens(&self) -> usize {
        2
    }
}

/// EXISTS command - Count how many of the given keys are present
///
/// Syntax: exists key [key ...]
pub struct ExistsCommand;

impl Command for ExistsCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let count = tokens[1..].iter().filter(|key| ctx.db.contains(key)).count();
        Ok(format!("(integer) {}", count))
    }

    fn name(&self) -> &'static str {
        "exists"
    }

    fn min_tokens(&self) -> usize {
        2
    }
}

/// RENAME command - Rewrite a key in place, preserving the node
///
/// Syntax: rename key newkey
pub struct RenameCommand;

impl Command for RenameCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let (old, new) = (&tokens[1], &tokens[2]);
        Ok(if ctx.db.rename(old, new) {
            "OK".to_owned()
        } else {
            format!("{} does not exist!", old)
        })
    }

    fn name(&self) -> &'static str {
        "rename"
    }

    fn min_tokens(&self) -> usize {
        3
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(3)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{context, run};
    use super::*;
    use crate::store::Value;

    #[test]
    fn test_del_counts_removed_keys() {
        let (_dir, mut ctx) = context();
        ctx.db.insert("a", Value::string("1"));
        ctx.db.insert("b", Value::string("2"));
        assert_eq!(run(&DelCommand, &mut ctx, "del a b missing"), "(integer) 2");
        assert!(!ctx.db.contains("a"));
    }

    #[test]
    fn test_exists_counts_present_keys() {
        let (_dir, mut ctx) = context();
        ctx.db.insert("a", Value::string("1"));
        assert_eq!(
            run(&ExistsCommand, &mut ctx, "exists a a missing"),
            "(integer) 2"
        );
    }

    #[test]
    fn test_rename() {
        let (_dir, mut ctx) = context();
        ctx.db.insert("old", Value::string("v"));
        assert_eq!(run(&RenameCommand, &mut ctx, "rename old new"), "OK");
        assert_eq!(
            run(&RenameCommand, &mut ctx, "rename old other"),
            "old does not exist!"
        );
    }
}
