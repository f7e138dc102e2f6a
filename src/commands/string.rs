//! String commands (SET, SETNX, SETEX, GET, MSET, MGET, STRLEN, APPEND)

use super::{Command, CommandContext, CommandError};
use crate::store::Value;

/// Insert-only set: refuses to touch an existing key.
fn set_if_absent(ctx: &mut CommandContext, key: &str, value: Value) -> String {
    if ctx.db.contains(key) {
        format!("key: {}  exists!", key)
    } else {
        ctx.db.insert(key, value);
        "OK".to_owned()
    }
}

/// Update-only set: refuses to create a missing key.
fn set_if_present(ctx: &mut CommandContext, key: &str, value: Value) -> String {
    match ctx.db.get_mut(key) {
        Some(slot) => {
            *slot = value;
            "OK".to_owned()
        }
        None => format!("key: {} does not exist!", key),
    }
}

/// SET command - Set a key to a value, optionally insert-only or update-only
///
/// Syntax: set key value [NX|XX]
pub struct SetCommand;

impl Command for SetCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let key = &tokens[1];
        let value = Value::string(&tokens[2]);
        if tokens.len() == 4 {
            return Ok(match tokens[3].as_str() {
                "NX" => set_if_absent(ctx, key, value),
                "XX" => set_if_present(ctx, key, value),
                _ => "wrong mode for SET, expected NX or XX.".to_owned(),
            });
        }
        // default mode is an upsert
        if ctx.db.contains(key) {
            set_if_present(ctx, key, value);
        } else {
            set_if_absent(ctx, key, value);
        }
        Ok("OK".to_owned())
    }

    fn name(&self) -> &'static str {
        "set"
    }

    fn min_tokens(&self) -> usize {
        3
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(4)
    }
}

/// SETNX command - Set only if the key does not exist
///
/// Syntax: setnx key value
pub struct SetNxCommand;

impl Command for SetNxCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        Ok(set_if_absent(ctx, &tokens[1], Value::string(&tokens[2])))
    }

    fn name(&self) -> &'static str {
        "setnx"
    }

    fn min_tokens(&self) -> usize {
        3
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(3)
    }
}

/// SETEX command - Set only if the key already exists
///
/// Syntax: setex key value
pub struct SetExCommand;

impl Command for SetExCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        Ok(set_if_present(ctx, &tokens[1], Value::string(&tokens[2])))
    }

    fn name(&self) -> &'static str {
        "setex"
    }

    fn min_tokens(&self) -> usize {
        3
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(3)
    }
}

/// GET command - Fetch the dumped form of a value
///
/// Syntax: get key
pub struct GetCommand;

impl Command for GetCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let key = &tokens[1];
        Ok(match ctx.db.get(key) {
            Some(value) => value.dump_string(),
            None => format!("key: {} does not exist!", key),
        })
    }

    fn name(&self) -> &'static str {
        "get"
    }

    fn min_tokens(&self) -> usize {
        2
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(2)
    }
}

/// MSET command - Bulk upsert of key/value pairs
///
/// Syntax: mset key value [key value ...]
pub struct MSetCommand;

impl Command for MSetCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let items = &tokens[1..];
        if items.len() % 2 != 0 {
            return Ok("wrong number of arguments for MSET.".to_owned());
        }
        for pair in items.chunks_exact(2) {
            let (key, value) = (&pair[0], Value::string(&pair[1]));
            match ctx.db.get_mut(key) {
                Some(slot) => *slot = value,
                None => {
                    ctx.db.insert(key.clone(), value);
                }
            }
        }
        Ok("OK".to_owned())
    }

    fn name(&self) -> &'static str {
        "mset"
    }

    fn min_tokens(&self) -> usize {
        3
    }
}

/// MGET command - Bulk fetch as a numbered listing
///
/// Syntax: mget key [key ...]
pub struct MGetCommand;

impl Command for MGetCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let rows: Vec<String> = tokens[1..]
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let payload = match ctx.db.get(key) {
                    Some(value) => value.dump_string(),
                    None => "(nil)".to_owned(),
                };
                format!("{}) {}", i + 1, payload)
            })
            .collect();
        Ok(rows.join("\n"))
    }

    fn name(&self) -> &'static str {
        "mget"
    }

    fn min_tokens(&self) -> usize {
        2
    }
}

/// STRLEN command - Length of the dumped form
///
/// Syntax: strlen key
pub struct StrLenCommand;

impl Command for StrLenCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        Ok(match ctx.db.get(&tokens[1]) {
            Some(value) => format!("(integer) {}", value.dump_string().len()),
            None => "(integer) 0".to_owned(),
        })
    }

    fn name(&self) -> &'static str {
        "strlen"
    }

    fn min_tokens(&self) -> usize {
        2
    }

    fn max_tokens(&self) -> Option<usize> {
        Some(2)
    }
}

/// APPEND command - Create a string key or concatenate onto it
///
/// Syntax: append key value
///
/// An existing value of any variant collapses to a string: its dumped form
/// with the suffix attached, and the reply counts the dumped length of that
/// new string.
pub struct AppendCommand;

impl Command for AppendCommand {
    fn execute(
        &self,
        ctx: &mut CommandContext,
        tokens: &[String],
    ) -> Result<String, CommandError> {
        let (key, suffix) = (&tokens[1], &tokens[2]);
        Ok(match ctx.db.get_mut(key) {
            Some(slot) => {
                let appended = format!("{}{}", slot.dump_string(), suffix);
                *slot = Value::string(appended);
                format!("(integer) {}", slot.dump_string().len())
            }
            None => {
                ctx.db.insert(key.clone(), Value::string(suffix));
                format!("(integer) {}", suffix.len())
            }
        })
    }

    fn name(&self) -> &'static str {
        "append"
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

    #[test]
    fn test_set_get() {
        let (_dir, mut ctx) = context();
        assert_eq!(run(&SetCommand, &mut ctx, "set a 1"), "OK");
        assert_eq!(run(&GetCommand, &mut ctx, "get a"), "\"1\"");
    }

    #[test]
    fn test_get_missing_key() {
        let (_dir, mut ctx) = context();
        assert_eq!(
            run(&GetCommand, &mut ctx, "get nope"),
            "key: nope does not exist!"
        );
    }

    #[test]
    fn test_set_modes() {
        let (_dir, mut ctx) = context();
        assert_eq!(run(&SetCommand, &mut ctx, "set a 1 NX"), "OK");
        assert_eq!(run(&SetCommand, &mut ctx, "set a 2 NX"), "key: a  exists!");
        assert_eq!(run(&SetCommand, &mut ctx, "set a 2 XX"), "OK");
        assert_eq!(
            run(&SetCommand, &mut ctx, "set b 1 XX"),
            "key: b does not exist!"
        );
        assert_eq!(
            run(&SetCommand, &mut ctx, "set a 3 YY"),
            "wrong mode for SET, expected NX or XX."
        );
        assert_eq!(run(&GetCommand, &mut ctx, "get a"), "\"2\"");
    }

    #[test]
    fn test_setnx_first_write_wins() {
        let (_dir, mut ctx) = context();
        assert_eq!(run(&SetNxCommand, &mut ctx, "setnx k v1"), "OK");
        assert_eq!(
            run(&SetNxCommand, &mut ctx, "setnx k v2"),
            "key: k  exists!"
        );
        assert_eq!(run(&GetCommand, &mut ctx, "get k"), "\"v1\"");
    }

    #[test]
    fn test_setex_requires_existing_key() {
        let (_dir, mut ctx) = context();
        assert_eq!(
            run(&SetExCommand, &mut ctx, "setex k v1"),
            "key: k does not exist!"
        );
        assert!(!ctx.db.contains("k"));
        run(&SetNxCommand, &mut ctx, "setnx k v1");
        assert_eq!(run(&SetExCommand, &mut ctx, "setex k v2"), "OK");
        assert_eq!(run(&GetCommand, &mut ctx, "get k"), "\"v2\"");
    }

    #[test]
    fn test_mset_mget() {
        let (_dir, mut ctx) = context();
        assert_eq!(run(&MSetCommand, &mut ctx, "mset j1 1 j2 2 j3 3"), "OK");
        assert_eq!(
            run(&MGetCommand, &mut ctx, "mget j1 j2 missing"),
            "1) \"1\"\n2) \"2\"\n3) (nil)"
        );
    }

    #[test]
    fn test_mset_rejects_dangling_key() {
        let (_dir, mut ctx) = context();
        assert_eq!(
            run(&MSetCommand, &mut ctx, "mset j1 1 j2"),
            "wrong number of arguments for MSET."
        );
        assert!(!ctx.db.contains("j1"));
    }

    #[test]
    fn test_strlen_counts_dumped_form() {
        let (_dir, mut ctx) = context();
        assert_eq!(run(&StrLenCommand, &mut ctx, "strlen k"), "(integer) 0");
        run(&SetCommand, &mut ctx, "set k 666");
        // "666" dumps with its quotes
        assert_eq!(run(&StrLenCommand, &mut ctx, "strlen k"), "(integer) 5");
    }

    #[test]
    fn test_append() {
        let (_dir, mut ctx) = context();
        assert_eq!(run(&AppendCommand, &mut ctx, "append k abc"), "(integer) 3");
        // existing value concatenates onto its dumped form, and the reply
        // counts the re-dumped (escaped, quoted) result
        assert_eq!(run(&AppendCommand, &mut ctx, "append k hi"), "(integer) 11");
        assert_eq!(ctx.db.get("k").unwrap().string_value(), "\"abc\"hi");
    }
}
