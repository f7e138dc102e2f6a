//! Parser registry
//!
//! Flyweight cache mapping command names to shared parser instances.
//! Parsers are stateless, so the first lookup of a name builds the instance
//! and every later lookup reuses it. Unknown names yield `None`; the
//! dispatcher owns the resulting reply.

use std::collections::HashMap;
use std::sync::Arc;

use super::{admin, counter, hash, key, list, search, string, Command};

pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn Command>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        ParserRegistry {
            parsers: HashMap::new(),
        }
    }

    /// Returns the shared parser for `name`, creating it on first use.
    pub fn get(&mut self, name: &str) -> Option<Arc<dyn Command>> {
        if let Some(parser) = self.parsers.get(name) {
            return Some(parser.clone());
        }
        let parser = Self::create(name)?;
        self.parsers.insert(name.to_owned(), parser.clone());
        Some(parser)
    }

    fn create(name: &str) -> Option<Arc<dyn Command>> {
        let parser: Arc<dyn Command> = match name {
            "keys" => Arc::new(search::KeysCommand),
            "dbsize" => Arc::new(admin::DbSizeCommand),
            "select" => Arc::new(admin::SelectCommand),
            "exists" => Arc::new(key::ExistsCommand),
            "del" => Arc::new(key::DelCommand),
            "rename" => Arc::new(key::RenameCommand),
            "set" => Arc::new(string::SetCommand),
            "setnx" => Arc::new(string::SetNxCommand),
            "setex" => Arc::new(string::SetExCommand),
            "get" => Arc::new(string::GetCommand),
            "mset" => Arc::new(string::MSetCommand),
            "mget" => Arc::new(string::MGetCommand),
            "strlen" => Arc::new(string::StrLenCommand),
            "append" => Arc::new(string::AppendCommand),
            "incr" => Arc::new(counter::IncrCommand),
            "incrby" => Arc::new(counter::IncrByCommand),
            "incrbyfloat" => Arc::new(counter::IncrByFloatCommand),
            "decr" => Arc::new(counter::DecrCommand),
            "decrby" => Arc::new(counter::DecrByCommand),
            "lpush" => Arc::new(list::LPushCommand),
            "rpush" => Arc::new(list::RPushCommand),
            "lpop" => Arc::new(list::LPopCommand),
            "rpop" => Arc::new(list::RPopCommand),
            "lrange" => Arc::new(list::LRangeCommand),
            "hset" => Arc::new(hash::HSetCommand),
            "hget" => Arc::new(hash::HGetCommand),
            "hdel" => Arc::new(hash::HDelCommand),
            "hkeys" => Arc::new(hash::HKeysCommand),
            "hvals" => Arc::new(hash::HValsCommand),
            _ => return None,
        };
        Some(parser)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
