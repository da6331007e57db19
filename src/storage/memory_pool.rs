//! Memory pool of unconfirmed transactions.

use crate::core::{Block, Transaction};
use crate::error::{BlockchainError, Result};
use crate::names::{registered_names, Name};
use crate::storage::MempoolNameIndex;
use log::{debug, error};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct PoolInner {
    // ( K -> txid_hex, V => Transaction )
    txs: HashMap<String, Transaction>,
    names: MempoolNameIndex,
}

impl PoolInner {
    fn remove(&mut self, txid: &str) -> Option<Transaction> {
        let tx = self.txs.remove(txid)?;
        self.names.remove_transaction(&tx);
        Some(tx)
    }
}

/// Unconfirmed transactions together with the names they claim. Both are
/// behind one lock so a transaction and its claims enter and leave together.
pub struct MemoryPool {
    inner: RwLock<PoolInner>,
}

impl Default for MemoryPool {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPool {
    pub fn new() -> MemoryPool {
        MemoryPool {
            inner: RwLock::new(PoolInner::default()),
        }
    }

    fn read(&self) -> Option<RwLockReadGuard<'_, PoolInner>> {
        match self.inner.read() {
            Ok(pool) => Some(pool),
            Err(_) => {
                error!("Failed to acquire read lock on memory pool");
                None
            }
        }
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, PoolInner>> {
        self.inner.write().map_err(|_| {
            error!("Failed to acquire write lock on memory pool");
            BlockchainError::Database("memory pool lock poisoned".to_string())
        })
    }

    pub fn contains(&self, txid: &str) -> bool {
        self.read().is_some_and(|pool| pool.txs.contains_key(txid))
    }

    /// Whether `tx` could be added without a name conflict.
    pub fn check_names(&self, tx: &Transaction) -> Result<()> {
        match self.read() {
            Some(pool) => pool.names.check_transaction(tx),
            None => Err(BlockchainError::Database(
                "memory pool lock poisoned".to_string(),
            )),
        }
    }

    /// Insert `tx` and claim its names. The name check is repeated under the
    /// write lock, so two racing admissions cannot both claim a name.
    pub fn add(&self, tx: Transaction) -> Result<()> {
        let mut pool = self.write()?;
        let txid = tx.get_id_hex();
        if pool.txs.contains_key(&txid) {
            return Err(BlockchainError::Transaction(format!(
                "Transaction {txid} already in memory pool"
            )));
        }
        pool.names.check_transaction(&tx)?;
        pool.names.add_transaction(&tx)?;
        pool.txs.insert(txid, tx);
        Ok(())
    }

    /// Drop a transaction (evicted or conflicted out) and release its names.
    pub fn remove(&self, txid: &str) -> Option<Transaction> {
        self.write().ok()?.remove(txid)
    }

    /// Drop everything `block` made obsolete: its own transactions and any
    /// pending registration of a name the block registered. Returns how many
    /// transactions left the pool.
    pub fn remove_for_block(&self, block: &Block) -> Result<usize> {
        let mut pool = self.write()?;
        let mut removed = 0;

        for tx in block.get_transactions() {
            if pool.remove(&tx.get_id_hex()).is_some() {
                removed += 1;
            }
        }

        for tx in block.get_transactions() {
            for name in registered_names(tx)? {
                let claimant = pool.names.claimant(&name).map(str::to_string);
                if let Some(txid) = claimant {
                    debug!("Evicting {txid}: name '{name}' registered by block");
                    pool.remove(&txid);
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.read().map_or(0, |pool| pool.txs.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of names claimed by pending transactions.
    pub fn name_count(&self) -> usize {
        self.read().map_or(0, |pool| pool.names.size())
    }

    pub fn claimant(&self, name: &Name) -> Option<String> {
        self.read()?.names.claimant(name).map(str::to_string)
    }

    pub fn clear(&self) {
        if let Ok(mut pool) = self.write() {
            pool.txs.clear();
            pool.names.clear();
        }
    }
}
