//! Command parsers
//!
//! One parser per command name, all behind the [`Command`] trait. A parser
//! receives the full token vector (command name included) and the execution
//! context, mutates the active database through typed value operations, and
//! returns the human-readable reply. Runtime conversion failures surface as
//! [`CommandError`] and the dispatcher renders them; every other outcome,
//! including diagnostics, is an `Ok` reply.

mod context;
mod registry;

// Command implementations
pub(crate) mod admin;
pub(crate) mod counter;
pub(crate) mod hash;
pub(crate) mod key;
pub(crate) mod list;
pub(crate) mod search;
pub(crate) mod string;

pub use context::CommandContext;
pub use registry::ParserRegistry;

use thiserror::Error;

/// Runtime failure inside a command. The dispatcher formats it as
/// `Error processing command '<name>': <message>`.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("'{0}' is not a valid integer")]
    InvalidInteger(String),

    #[error("'{0}' is not a valid float")]
    InvalidFloat(String),

    #[error("increment or decrement would overflow")]
    Overflow,
}

/// Command execution trait
pub trait Command: Send + Sync {
    /// Executes with the full token vector, command name included.
    fn execute(&self, ctx: &mut CommandContext, tokens: &[String])
        -> Result<String, CommandError>;

    /// The command name as dispatched (lowercase).
    fn name(&self) -> &'static str;

    /// Minimum token count, command name included.
    fn min_tokens(&self) -> usize {
        1
    }

    /// Maximum token count (None = unlimited).
    fn max_tokens(&self) -> Option<usize> {
        None
    }
}

pub(crate) fn parse_int(token: &str) -> Result<i64, CommandError> {
    token
        .parse()
        .map_err(|_| CommandError::InvalidInteger(token.to_owned()))
}

pub(crate) fn parse_float(token: &str) -> Result<f64, CommandError> {
    token
        .parse()
        .map_err(|_| CommandError::InvalidFloat(token.to_owned()))
}

/// Drops the first and last character of a dumped form; on a dumped string
/// that is exactly the outer-quote strip the reply dialect calls for.
pub(crate) fn strip_outer(dumped: &str) -> &str {
    let mut chars = dumped.chars();
    match (chars.next(), chars.next_back()) {
        (Some(_), Some(_)) => chars.as_str(),
        _ => dumped,
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::{Command, CommandContext};
    use crate::store::Database;
    use tempfile::TempDir;

    pub(crate) fn context() -> (TempDir, CommandContext) {
        let dir = TempDir::new().unwrap();
        let database = Database::open(dir.path(), "db_file", 16);
        (dir, CommandContext::new(database))
    }

    pub(crate) fn tokens(line: &str) -> Vec<String> {
        line.split_ascii_whitespace().map(str::to_owned).collect()
    }

    /// Runs a command line through one parser, panicking on runtime errors.
    pub(crate) fn run(command: &dyn Command, ctx: &mut CommandContext, line: &str) -> String {
        command.execute(ctx, &tokens(line)).unwrap()
    }
}
