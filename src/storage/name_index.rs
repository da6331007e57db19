//! Which pending transaction claims which name.

use crate::core::Transaction;
use crate::error::{BlockchainError, Result};
use crate::names::{registered_names, Name};
use std::collections::{BTreeMap, BTreeSet};

/// Names claimed by transactions waiting in the memory pool.
///
/// Each name belongs to at most one pending transaction. Only registrations
/// claim names; operations that consume an existing name record (updates,
/// transfers) would also have to release the spent claim here.
#[derive(Debug, Default)]
pub struct MempoolNameIndex {
    // ( K -> name, V -> txid_hex )
    names: BTreeMap<Name, String>,
}

impl MempoolNameIndex {
    pub fn new() -> MempoolNameIndex {
        MempoolNameIndex::default()
    }

    /// Fails if any name `tx` registers is already claimed by another
    /// pending transaction, or registered twice by `tx` itself. Does not
    /// modify the index.
    pub fn check_transaction(&self, tx: &Transaction) -> Result<()> {
        let mut seen = BTreeSet::new();
        for name in registered_names(tx)? {
            let owner = match self.names.get(&name) {
                Some(txid) => Some(txid.clone()),
                None if seen.contains(&name) => Some(tx.get_id_hex()),
                None => None,
            };
            if let Some(txid) = owner {
                return Err(BlockchainError::NameConflict {
                    name: name.to_lossy_string(),
                    txid,
                });
            }
            seen.insert(name);
        }
        Ok(())
    }

    /// Claim every name `tx` registers. Call only after a passing
    /// [`check_transaction`](Self::check_transaction).
    pub fn add_transaction(&mut self, tx: &Transaction) -> Result<()> {
        let txid = tx.get_id_hex();
        for name in registered_names(tx)? {
            self.names.insert(name, txid.clone());
        }
        Ok(())
    }

    /// Release the names claimed by `tx`.
    pub fn remove_transaction(&mut self, tx: &Transaction) {
        let txid = tx.get_id_hex();
        self.names.retain(|_, owner| *owner != txid);
    }

    /// Pending transaction claiming `name`, if any.
    pub fn claimant(&self, name: &Name) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    pub fn size(&self) -> usize {
        self.names.len()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}
