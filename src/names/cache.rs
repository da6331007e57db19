//! One layer of pending name changes: new records plus tombstones.

use crate::error::Result;
use crate::names::{Name, NameData};
use crate::storage::{name_key, DbBatch};
use std::collections::{BTreeMap, BTreeSet};

/// One layer of pending changes to the name database.
///
/// Besides new or updated names it records deletions (tombstones), so that
/// rolling back a registration propagates through parent layers down to disk.
/// A name is never in `entries` and `deleted` at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCache {
    entries: BTreeMap<Name, NameData>,
    deleted: BTreeSet<Name>,
}

impl NameCache {
    pub fn new() -> NameCache {
        NameCache::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.deleted.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.deleted.is_empty()
    }

    pub fn is_deleted(&self, name: &Name) -> bool {
        self.deleted.contains(name)
    }

    /// Data recorded in this layer only. Tombstones and lower layers are not
    /// consulted.
    pub fn get(&self, name: &Name) -> Option<&NameData> {
        self.entries.get(name)
    }

    /// Insert or update; clears a tombstone for the same name.
    pub fn set(&mut self, name: &Name, data: &NameData) {
        self.deleted.remove(name);
        self.entries.insert(name.clone(), data.clone());
    }

    /// Tombstone `name`, whether or not this layer has an entry for it.
    pub fn delete(&mut self, name: &Name) {
        self.entries.remove(name);
        self.deleted.insert(name.clone());
    }

    /// Merge a newer layer on top of this one. The child's entries are
    /// replayed first and its deletions last.
    pub fn apply(&mut self, child: &NameCache) {
        for (name, data) in &child.entries {
            self.set(name, data);
        }
        for name in &child.deleted {
            self.delete(name);
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Name, &NameData)> {
        self.entries.iter()
    }

    pub fn deleted(&self) -> impl Iterator<Item = &Name> {
        self.deleted.iter()
    }

    /// Queue every change as a keyed write or erase.
    pub fn write_batch(&self, batch: &mut DbBatch) -> Result<()> {
        for (name, data) in &self.entries {
            batch.write(name_key(name), data)?;
        }
        for name in &self.deleted {
            batch.erase(name_key(name));
        }
        Ok(())
    }
}
