//! Minimal standalone keyspace map.
//!
//! Stands in for the real server's full, multi-database, multi-type
//! keyspace (`OUT OF SCOPE` per the spec this crate implements): a single
//! `HashMap<Vec<u8>, ListObject>`, with no expiry, no other value types, and
//! no persistence. It exists only to give the command layer and the
//! blocking coordinator a concrete key to look values up by.

use std::collections::HashMap;

use crate::list_object::ListObject;

#[derive(Default)]
pub struct Database {
    pub lists: HashMap<Vec<u8>, ListObject>,
}

impl Database {
    pub fn new() -> Self {
        Database::default()
    }

    /// Remove `key` if it maps to an empty list. Every mutating list command
    /// calls this after the fact, matching the spec's "a list value that has
    /// become empty after any operation must be removed from the owning
    /// keyspace" rule.
    pub fn remove_if_empty(&mut self, key: &[u8]) {
        if let Some(obj) = self.lists.get_mut(key) {
            if obj.is_empty() {
                self.lists.remove(key);
            }
        }
    }
}
