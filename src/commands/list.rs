//! List commands (LPUSH, RPUSH, LPOP, RPOP, LRANGE)

use super::{parse_int, strip_outer, Command, CommandContext, CommandError};
use crate::store::Value;

fn push(ctx: &mut CommandContext, key: &str, element: &str, front: bool) -> String {
    match ctx.db.get_mut(key) {
        Some(value) => match value.as_list_mut() {
            Some(items) => {
                if front {
                    items.insert(0, Value::string(element));
                } else {
                    items.push(Value::string(element));
                }
                format!("(integer) {}", items.len())
            }
            None => format!(
                "The key:{} already exists and the value is not a list!",
                key
            ),
        },
        None => {
            ctx.db
                .insert(key.to_owned(), Value::List(vec![Value::string(element)]));
            "(integer) 1".to_owned()
        }
    }
}

/// The popped element's dump with its outer quotes stripped, or `(nil)`
/// when the key is absent, holds a non-list, or the list is empty.
fn pop(ctx: &mut CommandContext, key: &str, front: bool) -> String {
    let Some(items) = ctx.db.get_mut(key).and_then(Value::as_list_mut) else {
        return "(nil)".to_owned();
    };
    let element = if front {
        if items.is_empty() {
            None
        } else {
            Some(items.remove(0))
        }
    } else {
        items.pop()
    };
    match element {
        Some(element) => strip_outer(&element.dump_string()).to_owned(),
        None => "(nil)".to_owned(),
    }
}

/// LPUSH command - Prepend a value to a list
///
/// Syntax: lpush key value
pub struct LPushCommand;

impl Command for LPushCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        Ok(push(ctx, &tokens[1], &tokens[2], true))
    }

    fn name(&self) -> &'static str {
        "lpush"
    }

    fn min_tokens(&self) -> usize {
        3
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(3)
    }
}

/// RPUSH command - Append a value to a list
///
/// Syntax: rpush key value
pub struct RPushCommand;

impl Command for RPushCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        Ok(push(ctx, &tokens[1], &tokens[2], false))
    }

    fn name(&self) -> &'static str {
        "rpush"
    }

    fn min_tokens(&self) -> usize {
        3
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(3)
    }
}

/// LPOP command - Remove and return the first element
///
/// Syntax: lpop key
pub struct LPopCommand;

impl Command for LPopCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        Ok(pop(ctx, &tokens[1], true))
    }

    fn name(&self) -> &'static str {
        "lpop"
    }

    fn min_tokens(&self) -> usize {
        2
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(2)
    }
}

/// RPOP command - Remove and return the last element
///
/// Syntax: rpop key
pub struct RPopCommand;

impl Command for RPopCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        Ok(pop(ctx, &tokens[1], false))
    }

    fn name(&self) -> &'static str {
        "rpop"
    }

    fn min_tokens(&self) -> usize {
        2
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(2)
    }
}

/// LRANGE command - Numbered listing of a clamped index window
///
/// Syntax: lrange key start stop
///
/// Rows are numbered by absolute list position, not window offset.
pub struct LRangeCommand;

impl Command for LRangeCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let start = parse_int(&tokens[2])?;
        let stop = parse_int(&tokens[3])?;

        let items = match ctx.db.get(&tokens[1]) {
            Some(value) if value.is_list() => value.array_items(),
            _ => return Ok("(nil)".to_owned()),
        };

        let len = items.len() as i64;
        let left = start.max(0);
        let right = stop.min(len - 1);
        if right < left || left >= len {
            return Ok("(empty list or set)".to_owned());
        }

        let rows: Vec<String> = (left..=right)
            .map(|i| format!("{}) {}", i + 1, items[i as usize].dump_string()))
            .collect();
        Ok(rows.join("\n"))
    }

    fn name(&self) -> &'static str {
        "lrange"
    }

    fn min_tokens(&self) -> usize {
        4
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(4)
    }
}
