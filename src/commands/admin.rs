//! Admin commands (SELECT, DBSIZE)

use super::{parse_int, Command, CommandContext, CommandError};

/// SELECT command - Switch the active database
///
/// Syntax: select index
///
/// Flushes the current database before loading the new one, so a queued
/// `select` executed at transaction drain persists everything written so
/// far.
pub struct SelectCommand;

impl Command for SelectCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let index = parse_int(&tokens[1])?;
        Ok(ctx.db.select(index))
    }

    fn name(&self) -> &'static str {
        "select"
    }

    fn min_tokens(&self) -> usize {
        2
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(2)
    }
}

/// DBSIZE command - Number of keys in the active database
///
/// Syntax: dbsize
pub struct DbSizeCommand;

impl Command for DbSizeCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        _tokens: &[String],
    ) -> Result<String, CommandError> {
        Ok(format!("(integer) {}", ctx.db.len()))
    }

    fn name(&self) -> &'static str {
        "dbsize"
    }

    fn min_tokens(&self) -> usize {
        1
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{context, run, tokens};
    use super::*;
    use crate::store::Value;

    #[test]
    fn test_dbsize() {
        let (_dir, mut ctx) = context();
        assert_eq!(run(&DbSizeCommand, &mut ctx, "dbsize"), "(integer) 0");
        ctx.db.insert("a", Value::string("1"));
        ctx.db.insert("b", Value::string("2"));
        assert_eq!(run(&DbSizeCommand, &mut ctx, "dbsize"), "(integer) 2");
    }

    #[test]
    fn test_select_switches_and_validates() {
        let (_dir, mut ctx) = context();
        ctx.db.insert("a", Value::string("1"));
        assert_eq!(run(&SelectCommand, &mut ctx, "select 1"), "OK");
        assert!(!ctx.db.contains("a"));
        assert_eq!(
            run(&SelectCommand, &mut ctx, "select 99"),
            "database index out of range."
        );
    }

    #[test]
    fn test_select_rejects_non_integer_index() {
        let (_dir, mut ctx) = context();
        let err = SelectCommand
            .execute(&mut ctx, &tokens("select one"))
            .unwrap_err();
        assert_eq!(err.to_string(), "'one' is not a valid integer");
    }
}
