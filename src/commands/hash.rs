//! Hash commands (HSET, HGET, HDEL, HKEYS, HVALS)

use std::collections::BTreeMap;

use super::{Command, CommandContext, CommandError};
use crate::store::Value;

/// Inserts field/value pairs without overwriting existing fields; returns
/// how many fields were new. Updating a field takes a delete then a set.
fn insert_new_fields(fields: &mut BTreeMap<String, Value>, pairs: &[String]) -> usize {
    let mut count = 0;
    for pair in pairs.chunks_exact(2) {
        if !fields.contains_key(&pair[0]) {
            fields.insert(pair[0].clone(), Value::string(&pair[1]));
            count += 1;
        }
    }
    count
}

/// HSET command - Add fields to a hash, insert-only per field
///
/// Syntax: hset key field value [field value ...]
pub struct HSetCommand;

impl Command for HSetCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let key = &tokens[1];
        let pairs = &tokens[2..];
        if pairs.len() % 2 != 0 {
            return Ok("wrong number of arguments for HSET.".to_owned());
        }
        Ok(match ctx.db.get_mut(key) {
            Some(value) => match value.as_object_mut() {
                Some(fields) => format!("(integer) {}", insert_new_fields(fields, pairs)),
                None => format!(
                    "The key:{} already exists and the value is not a hashtable!",
                    key
                ),
            },
            None => {
                let mut fields = BTreeMap::new();
                let count = insert_new_fields(&mut fields, pairs);
                ctx.db.insert(key.clone(), Value::Hash(fields));
                format!("(integer) {}", count)
            }
        })
    }

    fn name(&self) -> &'static str {
        "hset"
    }

    fn min_tokens(&self) -> usize {
        4
    }
}

/// HGET command - Fetch one field's string content
///
/// Syntax: hget key field
pub struct HGetCommand;

impl Command for HGetCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let (key, field) = (&tokens[1], &tokens[2]);
        Ok(match ctx.db.get(key) {
            Some(value) if value.is_hash() => match value.object_items().get(field) {
                Some(field_value) => field_value.string_value().to_owned(),
                None => "(nil)".to_owned(),
            },
            _ => "(nil)".to_owned(),
        })
    }

    fn name(&self) -> &'static str {
        "hget"
    }

    fn min_tokens(&self) -> usize {
        3
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(3)
    }
}

/// HDEL command - Remove fields, counting the ones that existed
///
/// Syntax: hdel key field [field ...]
pub struct HDelCommand;

impl Command for HDelCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let mut count = 0;
        if let Some(fields) = ctx.db.get_mut(&tokens[1]).and_then(Value::as_object_mut) {
            for field in &tokens[2..] {
                if fields.remove(field).is_some() {
                    count += 1;
                }
            }
        }
        Ok(format!("(integer) {}", count))
    }

    fn name(&self) -> &'static str {
        "hdel"
    }

    fn min_tokens(&self) -> usize {
        3
    }
}

fn listing(ctx: &CommandContext, key: &str, values: bool) -> String {
    let value = match ctx.db.get(key) {
        Some(value) => value,
        None => return format!("The key:{} does not exist!", key),
    };
    if !value.is_hash() {
        return format!(
            "The key:{} already exists and the value is not a hashtable!",
            key
        );
    }
    let rows: Vec<String> = value
        .object_items()
        .iter()
        .enumerate()
        .map(|(i, (field, field_value))| {
            let payload = if values {
                field_value.string_value()
            } else {
                field.as_str()
            };
            format!("{}) {}", i + 1, payload)
        })
        .collect();
    rows.join("\n")
}

/// HKEYS command - Numbered listing of field names in map order
///
/// Syntax: hkeys key
pub struct HKeysCommand;

impl Command for HKeysCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        Ok(listing(ctx, &tokens[1], false))
    }

    fn name(&self) -> &'static str {
        "hkeys"
    }

    fn min_tokens(&self) -> usize {
        2
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(2)
    }
}

/// HVALS command - Numbered listing of field values in map order
///
/// Syntax: hvals key
pub struct HValsCommand;

impl Command for HValsCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        Ok(listing(ctx, &tokens[1], true))
    }

    fn name(&self) -> &'static str {
        "hvals"
    }

    fn min_tokens(&self) -> usize {
        2
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(2)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{context, run};
    use super::*;

    #[test]
    fn test_hset_counts_new_fields() {
        let (_dir, mut ctx) = context();
        assert_eq!(
            run(&HSetCommand, &mut ctx, "hset H f1 v1 f2 v2"),
            "(integer) 2"
        );
        // f1 already exists, only f3 is new
        assert_eq!(
            run(&HSetCommand, &mut ctx, "hset H f1 other f3 v3"),
            "(integer) 1"
        );
        assert_eq!(run(&HGetCommand, &mut ctx, "hget H f1"), "v1");
    }

    #[test]
    fn test_hset_rejects_dangling_field() {
        let (_dir, mut ctx) = context();
        assert_eq!(
            run(&HSetCommand, &mut ctx, "hset H f1 v1 f2"),
            "wrong number of arguments for HSET."
        );
        assert!(!ctx.db.contains("H"));
    }

    #[test]
    fn test_hset_type_check() {
        let (_dir, mut ctx) = context();
        ctx.db.insert("s", Value::string("scalar"));
        assert_eq!(
            run(&HSetCommand, &mut ctx, "hset s f1 v1"),
            "The key:s already exists and the value is not a hashtable!"
        );
    }

    #[test]
    fn test_hget_missing_cases() {
        let (_dir, mut ctx) = context();
        assert_eq!(run(&HGetCommand, &mut ctx, "hget H f1"), "(nil)");
        run(&HSetCommand, &mut ctx, "hset H f1 v1");
        assert_eq!(run(&HGetCommand, &mut ctx, "hget H nope"), "(nil)");
        ctx.db.insert("s", Value::string("scalar"));
        assert_eq!(run(&HGetCommand, &mut ctx, "hget s f1"), "(nil)");
    }

    #[test]
    fn test_hdel() {
        let (_dir, mut ctx) = context();
        run(&HSetCommand, &mut ctx, "hset H f1 v1 f2 v2 f3 v3");
        assert_eq!(
            run(&HDelCommand, &mut ctx, "hdel H f1 f3 nope"),
            "(integer) 2"
        );
        assert_eq!(run(&HDelCommand, &mut ctx, "hdel missing f1"), "(integer) 0");
        assert_eq!(run(&HKeysCommand, &mut ctx, "hkeys H"), "1) f2");
    }

    #[test]
    fn test_hkeys_hvals_in_map_order() {
        let (_dir, mut ctx) = context();
        run(&HSetCommand, &mut ctx, "hset H f2 v2 f1 v1");
        assert_eq!(run(&HKeysCommand, &mut ctx, "hkeys H"), "1) f1\n2) f2");
        assert_eq!(run(&HValsCommand, &mut ctx, "hvals H"), "1) v1\n2) v2");
    }

    #[test]
    fn test_hkeys_errors() {
        let (_dir, mut ctx) = context();
        assert_eq!(
            run(&HKeysCommand, &mut ctx, "hkeys H"),
            "The key:H does not exist!"
        );
        ctx.db.insert("s", Value::string("scalar"));
        assert_eq!(
            run(&HValsCommand, &mut ctx, "hvals s"),
            "The key:s already exists and the value is not a hashtable!"
        );
    }
}
