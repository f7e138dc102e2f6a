//! Command execution context

use crate::store::Database;

/// Context provided to commands during execution: the active database.
/// `select` swaps the database's key space in place, so a context handed to
/// queued transaction commands always sees the selection current at drain
/// time.
pub struct CommandContext {
    pub db: Database,
}

impl CommandContext {
    pub fn new(db: Database) -> Self {
        CommandContext { db }
    }
}
