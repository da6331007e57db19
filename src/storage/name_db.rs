//! Name records and the best block hash in the `chainstate` sled tree.

use crate::error::{BlockchainError, Result};
use crate::names::{Name, NameCache, NameData};
use crate::storage::{DbBatch, NameView};
use crate::utils::deserialize;
use log::debug;
use sled::{Db, Tree};

pub const CHAINSTATE_TREE: &str = "chainstate";

// Key prefixes inside the chainstate tree; the first byte keeps namespaces apart
pub const DB_NAME: u8 = b'n';
pub const DB_BEST_BLOCK: u8 = b'B';

pub fn name_key(name: &Name) -> Vec<u8> {
    let mut key = Vec::with_capacity(name.len() + 1);
    key.push(DB_NAME);
    key.extend_from_slice(name.as_bytes());
    key
}

/// Persistent name records, the bottom layer of every [`NameView`] stack.
#[derive(Clone)]
pub struct NameDb {
    tree: Tree,
}

impl NameDb {
    pub fn open(db: &Db) -> Result<NameDb> {
        let tree = db.open_tree(CHAINSTATE_TREE).map_err(|e| {
            BlockchainError::Database(format!("Failed to open chainstate tree: {e}"))
        })?;
        Ok(NameDb { tree })
    }

    pub fn count_names(&self) -> Result<usize> {
        let mut counter = 0;
        for item in self.tree.scan_prefix([DB_NAME]) {
            item.map_err(|e| {
                BlockchainError::Database(format!("Failed to iterate chainstate tree: {e}"))
            })?;
            counter += 1;
        }
        Ok(counter)
    }

    /// All registered names in key order.
    pub fn list_names(&self) -> Result<Vec<(Name, NameData)>> {
        let mut names = vec![];
        for item in self.tree.scan_prefix([DB_NAME]) {
            let (k, v) = item.map_err(|e| {
                BlockchainError::Database(format!("Failed to iterate chainstate tree: {e}"))
            })?;
            let data: NameData = deserialize(v.as_ref())?;
            names.push((Name::from_bytes(k[1..].to_vec()), data));
        }
        Ok(names)
    }
}

impl NameView for NameDb {
    fn get_name(&self, name: &Name) -> Result<Option<NameData>> {
        let bytes = self
            .tree
            .get(name_key(name))
            .map_err(|e| BlockchainError::Database(format!("Failed to read name: {e}")))?;
        bytes.map(|b| deserialize(b.as_ref())).transpose()
    }

    fn set_name(&mut self, name: &Name, data: &NameData) -> Result<()> {
        let mut cache = NameCache::new();
        cache.set(name, data);
        self.batch_write(&cache, None)
    }

    fn delete_name(&mut self, name: &Name) -> Result<()> {
        let mut cache = NameCache::new();
        cache.delete(name);
        self.batch_write(&cache, None)
    }

    fn get_best_block(&self) -> Result<Option<String>> {
        let bytes = self
            .tree
            .get([DB_BEST_BLOCK])
            .map_err(|e| BlockchainError::Database(format!("Failed to read best block: {e}")))?;
        bytes
            .map(|b| {
                String::from_utf8(b.to_vec()).map_err(|e| {
                    BlockchainError::Database(format!("Invalid best block format: {e}"))
                })
            })
            .transpose()
    }

    fn batch_write(&mut self, names: &NameCache, best_block: Option<&str>) -> Result<()> {
        let mut batch = DbBatch::new();
        names.write_batch(&mut batch)?;
        if let Some(hash) = best_block {
            batch.write_raw(vec![DB_BEST_BLOCK], hash.as_bytes().to_vec());
        }
        if batch.is_empty() {
            return Ok(());
        }

        let ops = batch.len();
        self.tree
            .apply_batch(batch.into_sled())
            .map_err(|e| BlockchainError::Database(format!("Failed to write name batch: {e}")))?;
        debug!("Committed {ops} chainstate changes");
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.tree
            .flush()
            .map_err(|e| BlockchainError::Database(format!("Failed to flush chainstate: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Script;

    fn open_temp() -> NameDb {
        let db = sled::Config::new().temporary(true).open().unwrap();
        NameDb::open(&db).unwrap()
    }

    #[test]
    fn test_set_get_delete_roundtrip() {
        let mut names = open_temp();
        let name = Name::from_string("database-test-name");
        let data = NameData::new(Script::new_p2pkh(&[1u8; 20]));

        assert_eq!(names.get_name(&name).unwrap(), None);
        names.set_name(&name, &data).unwrap();
        assert_eq!(names.get_name(&name).unwrap(), Some(data));
        names.flush().unwrap();

        names.delete_name(&name).unwrap();
        assert_eq!(names.get_name(&name).unwrap(), None);
        assert_eq!(names.count_names().unwrap(), 0);
    }

    #[test]
    fn test_best_block_lives_outside_name_namespace() {
        let mut names = open_temp();
        names
            .batch_write(&NameCache::new(), Some("abcdef"))
            .unwrap();
        assert_eq!(names.get_best_block().unwrap().as_deref(), Some("abcdef"));

        // the empty name still carries the name prefix
        let tricky = Name::from_bytes(vec![]);
        assert_eq!(names.get_name(&tricky).unwrap(), None);
        assert_eq!(names.count_names().unwrap(), 0);
    }

    #[test]
    fn test_list_names_in_byte_order() {
        let mut names = open_temp();
        let data = NameData::new(Script::new_p2pkh(&[2u8; 20]));
        let mut cache = NameCache::new();
        cache.set(&Name::from_string("b"), &data);
        cache.set(&Name::from_string("a"), &data);
        names.batch_write(&cache, None).unwrap();

        let listed: Vec<Name> = names.list_names().unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(listed, vec![Name::from_string("a"), Name::from_string("b")]);
    }
}
