//! Counter commands (INCR, INCRBY, DECR, DECRBY, INCRBYFLOAT)
//!
//! Counters follow the Redis convention: the stored value is a string, the
//! number inside it is parsed on demand and the result is re-serialized as
//! a string. The numeric check runs over the dumped form with its outer
//! quotes stripped, so any non-string variant fails it too.

use super::{parse_float, parse_int, strip_outer, Command, CommandContext, CommandError};
use crate::store::Value;

fn integer_delta(
    ctx: &mut CommandContext,
    key: &str,
    delta: i64,
) -> Result<String, CommandError> {
    match ctx.db.get_mut(key) {
        Some(slot) => {
            let dumped = slot.dump_string();
            let digits = strip_outer(&dumped);
            if !digits.chars().all(|c| c.is_ascii_digit()) {
                return Ok(format!("The value of {} is not a numeric type", key));
            }
            let current: i64 = digits
                .parse()
                .map_err(|_| CommandError::InvalidInteger(digits.to_owned()))?;
            let next = current.checked_add(delta).ok_or(CommandError::Overflow)?;
            *slot = Value::string(next.to_string());
            Ok(format!("(integer) {}", next))
        }
        None => {
            // missing key seeds the counter with the increment
            ctx.db.insert(key.to_owned(), Value::string(delta.to_string()));
            Ok(format!("(integer) {}", delta))
        }
    }
}

fn float_delta(ctx: &mut CommandContext, key: &str, delta: f64) -> Result<String, CommandError> {
    match ctx.db.get_mut(key) {
        Some(slot) => {
            let dumped = slot.dump_string();
            let current: f64 = match strip_outer(&dumped).parse() {
                Ok(current) => current,
                Err(_) => return Ok(format!("The value of {} is not a numeric type", key)),
            };
            let formatted = format!("{:.6}", current + delta);
            *slot = Value::string(formatted.clone());
            Ok(format!("(float) {}", formatted))
        }
        None => {
            let formatted = format!("{:.6}", delta);
            ctx.db.insert(key.to_owned(), Value::string(formatted.clone()));
            Ok(format!("(float) {}", formatted))
        }
    }
}

/// INCR command - Add 1 to an integer-valued key
///
/// Syntax: incr key
pub struct IncrCommand;

impl Command for IncrCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        integer_delta(ctx, &tokens[1], 1)
    }

    fn name(&self) -> &'static str {
        "incr"
    }

    fn min_tokens(&self) -> usize {
        2
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(2)
    }
}

/// DECR command - Subtract 1 from an integer-valued key
///
/// Syntax: decr key
pub struct DecrCommand;

impl Command for DecrCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        integer_delta(ctx, &tokens[1], -1)
    }

    fn name(&self) -> &'static str {
        "decr"
    }

    fn min_tokens(&self) -> usize {
        2
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(2)
    }
}

/// INCRBY command - Add an integer amount
///
/// Syntax: incrby key increment
pub struct IncrByCommand;

impl Command for IncrByCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let increment = parse_int(&tokens[2])?;
        integer_delta(ctx, &tokens[1], increment)
    }

    fn name(&self) -> &'static str {
        "incrby"
    }

    fn min_tokens(&self) -> usize {
        3
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(3)
    }
}

/// DECRBY command - Subtract an integer amount
///
/// Syntax: decrby key decrement
pub struct DecrByCommand;

impl Command for DecrByCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let decrement = parse_int(&tokens[2])?;
        let delta = decrement.checked_neg().ok_or(CommandError::Overflow)?;
        integer_delta(ctx, &tokens[1], delta)
    }

    fn name(&self) -> &'static str {
        "decrby"
    }

    fn min_tokens(&self) -> usize {
        3
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(3)
    }
}

/// INCRBYFLOAT command - Add a double amount
///
/// Syntax: incrbyfloat key increment
pub struct IncrByFloatCommand;

impl Command for IncrByFloatCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let increment = parse_float(&tokens[2])?;
        float_delta(ctx, &tokens[1], increment)
    }

    fn name(&self) -> &'static str {
        "incrbyfloat"
    }

    fn min_tokens(&self) -> usize {
        3
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(3)
    }
}
