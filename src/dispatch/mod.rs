//! Command dispatcher and transaction engine
//!
//! Takes one raw command line and returns one reply string. Tokenizes on
//! ASCII whitespace, resolves the first token through the parser registry,
//! and either executes immediately or queues the raw line when the session
//! is inside a transaction. `exec` drains the queue in FIFO order; a queued
//! unknown command arms the deferred abort instead.

mod session;

pub use session::Session;

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::commands::{CommandContext, ParserRegistry};

pub struct Dispatcher {
    registry: ParserRegistry,
    context: CommandContext,
}

impl Dispatcher {
    pub fn new(context: CommandContext) -> Self {
        Dispatcher {
            registry: ParserRegistry::new(),
            context,
        }
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut CommandContext {
        &mut self.context
    }

    /// Dispatch one raw command line for `session`.
    pub fn dispatch(&mut self, session: &mut Session, line: &str) -> String {
        let line = line.trim();
        if line.is_empty() {
            return "nil".to_owned();
        }
        let tokens: Vec<String> = line.split_ascii_whitespace().map(str::to_owned).collect();
        let command = tokens[0].as_str();
        debug!("dispatching command: {}", command);

        match command {
            "quit" | "exit" => "stop".to_owned(),
            "multi" => {
                if session.in_transaction {
                    return "Open the transaction repeatedly!".to_owned();
                }
                session.begin();
                "OK".to_owned()
            }
            "exec" => {
                if !session.in_transaction {
                    return "No transaction is opened!".to_owned();
                }
                session.in_transaction = false;
                if session.fallback {
                    session.fallback = false;
                    session.queued.clear();
                    "(error) EXECABORT Transaction discarded because of previous errors."
                        .to_owned()
                } else {
                    let queued = std::mem::take(&mut session.queued);
                    self.drain(queued)
                }
            }
            "discard" => {
                session.reset();
                "OK".to_owned()
            }
            _ if session.in_transaction => {
                if self.registry.get(command).is_some() {
                    session.queued.push_back(line.to_owned());
                    "QUEUED".to_owned()
                } else {
                    session.fallback = true;
                    format!("Error: Command '{}' not recognized.", command)
                }
            }
            _ => self.execute(&tokens),
        }
    }

    /// Resolve, arity-check and run one tokenized command. Runtime errors
    /// never escape; they become the reply.
    fn execute(&mut self, tokens: &[String]) -> String {
        let name = tokens[0].as_str();
        let parser = match self.registry.get(name) {
            Some(parser) => parser,
            None => {
                warn!("unknown command: {}", name);
                return format!("Error: Command '{}' not recognized.", name);
            }
        };
        if tokens.len() < parser.min_tokens()
            || parser.max_tokens().is_some_and(|max| tokens.len() > max)
        {
            return format!("wrong number of arguments for {}.", name.to_uppercase());
        }
        match parser.execute(&mut self.context, tokens) {
            Ok(reply) => reply,
            Err(e) => format!("Error processing command '{}': {}", name, e),
        }
    }

    /// Runs the queued lines in FIFO order and joins the replies as
    /// `i)<reply>` rows.
    fn drain(&mut self, queued: VecDeque<String>) -> String {
        let mut replies = Vec::new();
        for line in queued {
            let tokens: Vec<String> = line.split_ascii_whitespace().map(str::to_owned).collect();
            let Some(first) = tokens.first() else {
                continue;
            };
            match first.as_str() {
                "quit" | "exit" => return "stop".to_owned(),
                "multi" => replies.push("Open the transaction repeatedly!".to_owned()),
                "exec" => replies.push("No transaction is opened!".to_owned()),
                _ => replies.push(self.execute(&tokens)),
            }
        }
        replies
            .iter()
            .enumerate()
            .map(|(i, reply)| format!("{}){}", i + 1, reply))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Database;
    use tempfile::TempDir;

    fn dispatcher() -> (TempDir, Dispatcher, Session) {
        let dir = TempDir::new().unwrap();
        let database = Database::open(dir.path(), "db_file", 16);
        (
            dir,
            Dispatcher::new(CommandContext::new(database)),
            Session::new(),
        )
    }

    #[test]
    fn test_empty_line_is_nil() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(dispatcher.dispatch(&mut session, ""), "nil");
        assert_eq!(dispatcher.dispatch(&mut session, "   "), "nil");
    }

    #[test]
    fn test_quit_and_exit_stop() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(dispatcher.dispatch(&mut session, "quit"), "stop");
        assert_eq!(dispatcher.dispatch(&mut session, "exit"), "stop");
    }

    #[test]
    fn test_unknown_command() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(
            dispatcher.dispatch(&mut session, "bogus a b"),
            "Error: Command 'bogus' not recognized."
        );
    }

    #[test]
    fn test_arity_violation() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(
            dispatcher.dispatch(&mut session, "get"),
            "wrong number of arguments for GET."
        );
        assert_eq!(
            dispatcher.dispatch(&mut session, "get a b"),
            "wrong number of arguments for GET."
        );
    }

    #[test]
    fn test_set_incrby_get_scenario() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(dispatcher.dispatch(&mut session, "set a 1"), "OK");
        assert_eq!(dispatcher.dispatch(&mut session, "incrby a 10"), "(integer) 11");
        assert_eq!(dispatcher.dispatch(&mut session, "get a"), "\"11\"");
    }

    #[test]
    fn test_list_scenario() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(dispatcher.dispatch(&mut session, "lpush L x"), "(integer) 1");
        assert_eq!(dispatcher.dispatch(&mut session, "rpush L y"), "(integer) 2");
        assert_eq!(
            dispatcher.dispatch(&mut session, "lrange L 0 10"),
            "1) \"x\"\n2) \"y\""
        );
        assert_eq!(dispatcher.dispatch(&mut session, "get L"), "[\"x\", \"y\"]");
        assert_eq!(
            dispatcher.dispatch(&mut session, "incr L"),
            "The value of L is not a numeric type"
        );
    }

    #[test]
    fn test_hash_scenario() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(
            dispatcher.dispatch(&mut session, "hset H f1 v1 f2 v2"),
            "(integer) 2"
        );
        assert_eq!(dispatcher.dispatch(&mut session, "hkeys H"), "1) f1\n2) f2");
        assert_eq!(dispatcher.dispatch(&mut session, "hget H f1"), "v1");
    }

    #[test]
    fn test_transaction_executes_in_order() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(dispatcher.dispatch(&mut session, "multi"), "OK");
        assert_eq!(dispatcher.dispatch(&mut session, "set a 1"), "QUEUED");
        assert_eq!(dispatcher.dispatch(&mut session, "incr a"), "QUEUED");
        assert_eq!(dispatcher.dispatch(&mut session, "get a"), "QUEUED");
        assert_eq!(
            dispatcher.dispatch(&mut session, "exec"),
            "1)OK\n2)(integer) 2\n3)\"2\""
        );
        assert!(!session.in_transaction);
    }

    #[test]
    fn test_transaction_fallback_aborts_everything() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(dispatcher.dispatch(&mut session, "multi"), "OK");
        assert_eq!(dispatcher.dispatch(&mut session, "set a 1"), "QUEUED");
        assert_eq!(
            dispatcher.dispatch(&mut session, "bogus"),
            "Error: Command 'bogus' not recognized."
        );
        assert_eq!(
            dispatcher.dispatch(&mut session, "exec"),
            "(error) EXECABORT Transaction discarded because of previous errors."
        );
        assert_eq!(
            dispatcher.dispatch(&mut session, "get a"),
            "key: a does not exist!"
        );
    }

    #[test]
    fn test_discard_leaves_state_untouched() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        dispatcher.dispatch(&mut session, "set before 1");
        assert_eq!(dispatcher.dispatch(&mut session, "multi"), "OK");
        assert_eq!(dispatcher.dispatch(&mut session, "set a 2"), "QUEUED");
        assert_eq!(dispatcher.dispatch(&mut session, "del before"), "QUEUED");
        assert_eq!(dispatcher.dispatch(&mut session, "discard"), "OK");
        assert_eq!(dispatcher.dispatch(&mut session, "get before"), "\"1\"");
        assert_eq!(
            dispatcher.dispatch(&mut session, "get a"),
            "key: a does not exist!"
        );
    }

    #[test]
    fn test_nested_multi_and_stray_exec() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(
            dispatcher.dispatch(&mut session, "exec"),
            "No transaction is opened!"
        );
        assert_eq!(dispatcher.dispatch(&mut session, "multi"), "OK");
        assert_eq!(
            dispatcher.dispatch(&mut session, "multi"),
            "Open the transaction repeatedly!"
        );
        assert_eq!(dispatcher.dispatch(&mut session, "discard"), "OK");
    }

    #[test]
    fn test_runtime_error_fills_its_slot_without_aborting() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(dispatcher.dispatch(&mut session, "multi"), "OK");
        assert_eq!(dispatcher.dispatch(&mut session, "incrby a ten"), "QUEUED");
        assert_eq!(dispatcher.dispatch(&mut session, "set b 2"), "QUEUED");
        assert_eq!(
            dispatcher.dispatch(&mut session, "exec"),
            "1)Error processing command 'incrby': 'ten' is not a valid integer\n2)OK"
        );
        assert_eq!(dispatcher.dispatch(&mut session, "get b"), "\"2\"");
    }

    #[test]
    fn test_select_scenario() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(
            dispatcher.dispatch(&mut session, "select 99"),
            "database index out of range."
        );
        assert_eq!(dispatcher.dispatch(&mut session, "select 1"), "OK");
        assert_eq!(dispatcher.dispatch(&mut session, "set a 1"), "OK");
        assert_eq!(dispatcher.dispatch(&mut session, "select 0"), "OK");
        assert_eq!(
            dispatcher.dispatch(&mut session, "get a"),
            "key: a does not exist!"
        );
    }

    #[test]
    fn test_select_queued_in_transaction_applies_at_drain() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(dispatcher.dispatch(&mut session, "multi"), "OK");
        assert_eq!(dispatcher.dispatch(&mut session, "select 2"), "QUEUED");
        assert_eq!(dispatcher.dispatch(&mut session, "set a 1"), "QUEUED");
        assert_eq!(dispatcher.dispatch(&mut session, "exec"), "1)OK\n2)OK");
        assert_eq!(dispatcher.context().db.database_index(), 2);
        assert_eq!(dispatcher.dispatch(&mut session, "get a"), "\"1\"");
    }

    #[test]
    fn test_keys_and_dbsize() {
        let (_dir, mut dispatcher, mut session) = dispatcher();
        assert_eq!(
            dispatcher.dispatch(&mut session, "keys *"),
            "this database is empty!"
        );
        dispatcher.dispatch(&mut session, "set b 2");
        dispatcher.dispatch(&mut session, "set a 1");
        assert_eq!(
            dispatcher.dispatch(&mut session, "keys *"),
            "1) \"a\"\n2) \"b\""
        );
        assert_eq!(dispatcher.dispatch(&mut session, "dbsize"), "(integer) 2");
    }
}
