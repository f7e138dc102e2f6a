//! Skip-list ordered index
//!
//! The backing store for every database: a probabilistic ordered map from
//! string keys to [`Value`]s with expected O(log n) insert, search and
//! delete, and in-order iteration over the level-0 chain.
//!
//! Nodes live in an arena (`Vec`) and the forward pointers are arena
//! indices; removed slots are recycled through a free list. A node keeps
//! its slot for its whole lifetime, which gives `rename` a stable identity
//! to rewrite.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::value::Value;

const MAX_LEVEL: usize = 32;
const BRANCH_PROBABILITY: f64 = 0.25;

/// Null link in the forward chains.
const NIL: usize = usize::MAX;

/// Arena slot of the head sentinel.
const HEAD: usize = 0;

struct Node {
    key: String,
    value: Value,
    forward: Vec<usize>,
}

pub struct SkipList {
    arena: Vec<Node>,
    free: Vec<usize>,
    /// Highest level currently in use.
    level: usize,
    len: usize,
    rng: SmallRng,
}

impl SkipList {
    pub fn new() -> Self {
        let head = Node {
            key: String::new(),
            value: Value::Null,
            forward: vec![NIL; MAX_LEVEL],
        };
        SkipList {
            arena: vec![head],
            free: Vec::new(),
            level: 0,
            len: 0,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Geometric level draw with p = 0.25, capped at the maximum level.
    fn random_level(&mut self) -> usize {
        let mut level = 0;
        while level + 1 < MAX_LEVEL && self.rng.gen::<f64>() < BRANCH_PROBABILITY {
            level += 1;
        }
        level
    }

    fn forward_of(&self, idx: usize, lvl: usize) -> Option<usize> {
        match self.arena[idx].forward[lvl] {
            NIL => None,
            next => Some(next),
        }
    }

    /// The predecessor of `key` at every level, top-down.
    fn predecessors(&self, key: &str) -> [usize; MAX_LEVEL] {
        let mut update = [HEAD; MAX_LEVEL];
        let mut cur = HEAD;
        for lvl in (0..=self.level).rev() {
            while let Some(next) = self.forward_of(cur, lvl) {
                if self.arena[next].key.as_str() < key {
                    cur = next;
                } else {
                    break;
                }
            }
            update[lvl] = cur;
        }
        update
    }

    fn find(&self, key: &str) -> Option<usize> {
        let mut cur = HEAD;
        for lvl in (0..=self.level).rev() {
            while let Some(next) = self.forward_of(cur, lvl) {
                if self.arena[next].key.as_str() < key {
                    cur = next;
                } else {
                    break;
                }
            }
        }
        let candidate = self.forward_of(cur, 0)?;
        (self.arena[candidate].key == key).then_some(candidate)
    }

    /// Inserts a new entry. Returns false without touching the list when the
    /// key already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        let update = self.predecessors(&key);
        if let Some(next) = self.forward_of(update[0], 0) {
            if self.arena[next].key == key {
                return false;
            }
        }

        let node_level = self.random_level();
        if node_level > self.level {
            // update[] already points at the head for the fresh levels
            self.level = node_level;
        }

        let idx = self.alloc(key, value, node_level);
        for lvl in 0..=node_level {
            let pred = update[lvl];
            self.arena[idx].forward[lvl] = self.arena[pred].forward[lvl];
            self.arena[pred].forward[lvl] = idx;
        }
        self.len += 1;
        true
    }

    fn alloc(&mut self, key: String, value: Value, node_level: usize) -> usize {
        let node = Node {
            key,
            value,
            forward: vec![NIL; node_level + 1],
        };
        match self.free.pop() {
            Some(idx) => {
                self.arena[idx] = node;
                idx
            }
            None => {
                self.arena.push(node);
                self.arena.len() - 1
            }
        }
    }

    /// Unlinks and frees the entry. Returns false when the key is absent.
    pub fn remove(&mut self, key: &str) -> bool {
        let update = self.predecessors(key);
        let Some(idx) = self.forward_of(update[0], 0) else {
            return false;
        };
        if self.arena[idx].key != key {
            return false;
        }

        for lvl in 0..=self.level {
            if self.arena[update[lvl]].forward[lvl] == idx {
                self.arena[update[lvl]].forward[lvl] = self.arena[idx].forward[lvl];
            }
        }
        self.arena[idx] = Node {
            key: String::new(),
            value: Value::Null,
            forward: Vec::new(),
        };
        self.free.push(idx);
        while self.level > 0 && self.arena[HEAD].forward[self.level] == NIL {
            self.level -= 1;
        }
        self.len -= 1;
        true
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.find(key).map(|idx| &self.arena[idx].value)
    }

    /// A borrowed handle for in-place mutation. The handle must not outlive
    /// the next structural change, which the borrow checker enforces.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let idx = self.find(key)?;
        Some(&mut self.arena[idx].value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Rewrites the key of an existing entry. The node keeps its slot in the
    /// forward chains.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        match self.find(old) {
            Some(idx) => {
                self.arena[idx].key = new.to_owned();
                true
            }
            None => false,
        }
    }

    /// In-order iteration over the level-0 chain.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.arena[HEAD].forward[0],
        }
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Iter<'a> {
    list: &'a SkipList,
    cursor: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let node = &self.list.arena[self.cursor];
        self.cursor = node.forward[0];
        Some((node.key.as_str(), &node.value))
    }
}
