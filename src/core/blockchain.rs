// The chain state: blocks in one sled tree, name records and the best block
// in another. Connecting or disconnecting a block builds the name changes in
// an in-memory layer and commits them together with the new tip in a single
// batch, so the name database always matches exactly one block.

use crate::config::GLOBAL_CONFIG;
use crate::core::{Block, Transaction, INITIAL_BLOCK_REWARD};
use crate::error::{BlockchainError, Result};
use crate::names::{
    apply_name_transaction, check_names_in_block, undo_name_transaction, Name, NameData,
};
use crate::storage::{MemoryPool, NameDb, NameView, NameViewCache};
use log::{debug, error, info};
use sled::{Db, Tree};
use std::env::current_dir;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

const BLOCKS_TREE: &str = "blocks";

#[derive(Clone)]
pub struct Blockchain {
    db: Db,
    db_path: PathBuf,
    names: NameDb,
    mempool: Arc<MemoryPool>,
    // held for the whole of each mempool accept, block connect or disconnect
    validation_lock: Arc<Mutex<()>>,
}

impl Blockchain {
    pub fn create_blockchain(genesis_address: &str) -> Result<Blockchain> {
        Self::create_blockchain_with_path(genesis_address, &Self::default_db_path()?)
    }

    pub fn new_blockchain() -> Result<Blockchain> {
        Self::new_blockchain_with_path(&Self::default_db_path()?)
    }

    fn default_db_path() -> Result<String> {
        Ok(current_dir()?
            .join(GLOBAL_CONFIG.get_data_dir())
            .to_string_lossy()
            .to_string())
    }

    fn open_db(path: &PathBuf) -> Result<(Db, NameDb)> {
        let db = sled::open(path)
            .map_err(|e| BlockchainError::Database(format!("Failed to open database: {e}")))?;
        let names = NameDb::open(&db)?;
        Ok((db, names))
    }

    fn from_parts(db: Db, db_path: PathBuf, names: NameDb) -> Blockchain {
        Blockchain {
            db,
            db_path,
            names,
            mempool: Arc::new(MemoryPool::new()),
            validation_lock: Arc::new(Mutex::new(())),
        }
    }

    // Opens the chain at `db_path`, creating the genesis block if the database is empty
    pub fn create_blockchain_with_path(genesis_address: &str, db_path: &str) -> Result<Blockchain> {
        let path = PathBuf::from(db_path);
        let (db, mut names) = Self::open_db(&path)?;

        if names.get_best_block()?.is_none() {
            info!("Creating genesis block for address: {genesis_address}");
            let coinbase_tx =
                Transaction::new_coinbase_tx(genesis_address, INITIAL_BLOCK_REWARD, 0)?;
            let block = Block::generate_genesis_block(&coinbase_tx)?;
            Self::store_block(&Self::blocks_tree(&db)?, &block)?;
            Self::connect_names(&mut names, &block)?;
        }

        Ok(Self::from_parts(db, path, names))
    }

    pub fn new_blockchain_with_path(db_path: &str) -> Result<Blockchain> {
        let path = PathBuf::from(db_path);
        let (db, names) = Self::open_db(&path)?;

        if names.get_best_block()?.is_none() {
            return Err(BlockchainError::Database(
                "No existing blockchain found. Create one first.".to_string(),
            ));
        }

        Ok(Self::from_parts(db, path, names))
    }

    fn blocks_tree(db: &Db) -> Result<Tree> {
        db.open_tree(BLOCKS_TREE)
            .map_err(|e| BlockchainError::Database(format!("Failed to open blocks tree: {e}")))
    }

    fn store_block(blocks_tree: &Tree, block: &Block) -> Result<()> {
        blocks_tree
            .insert(block.get_hash(), block.serialize()?)
            .map_err(|e| BlockchainError::Database(format!("Failed to store block: {e}")))?;
        Ok(())
    }

    // Uniqueness pass first, then every output in order through one layer
    // that is flushed together with the new best block
    fn connect_names(names: &mut dyn NameView, block: &Block) -> Result<()> {
        check_names_in_block(block)?;

        let mut view = NameViewCache::new(names);
        for tx in block.get_transactions() {
            apply_name_transaction(tx, &mut view)?;
        }
        view.set_best_block(block.get_hash());
        view.flush()
    }

    fn lock_validation(&self) -> Result<MutexGuard<'_, ()>> {
        self.validation_lock
            .lock()
            .map_err(|_| BlockchainError::Database("validation lock poisoned".to_string()))
    }

    pub fn get_db_path(&self) -> &PathBuf {
        &self.db_path
    }

    pub fn get_mempool(&self) -> &MemoryPool {
        &self.mempool
    }

    /// Hash of the block the name database currently reflects. Read from
    /// the chainstate, so it always moves together with the names.
    pub fn get_tip_hash(&self) -> Result<String> {
        self.names.get_best_block()?.ok_or_else(|| {
            BlockchainError::Database("Chainstate has no best block".to_string())
        })
    }

    pub fn get_block(&self, block_hash: &str) -> Result<Option<Block>> {
        let data = Self::blocks_tree(&self.db)?
            .get(block_hash)
            .map_err(|e| BlockchainError::Database(format!("Failed to read block: {e}")))?;
        data.map(|bytes| Block::deserialize(bytes.as_ref()))
            .transpose()
    }

    fn get_tip_block(&self) -> Result<Block> {
        let tip_hash = self.get_tip_hash()?;
        self.get_block(&tip_hash)?.ok_or_else(|| {
            BlockchainError::Database(format!("Tip block {tip_hash} missing from block store"))
        })
    }

    pub fn get_best_height(&self) -> Result<usize> {
        Ok(self.get_tip_block()?.get_height())
    }

    pub fn iterator(&self) -> Result<BlockchainIterator> {
        Ok(BlockchainIterator::new(self.get_tip_hash()?, self.db.clone()))
    }

    /// Registered data for `name` as of the current tip.
    pub fn get_name(&self, name: &Name) -> Result<Option<NameData>> {
        self.names.get_name(name)
    }

    /// Address a name points to. Fails if the name is unknown or its script
    /// is not a pay-to-pubkey-hash script.
    pub fn get_name_address(&self, name: &Name) -> Result<String> {
        let data = self
            .get_name(name)?
            .ok_or_else(|| BlockchainError::NameNotFound(name.to_lossy_string()))?;
        data.destination_address().ok_or_else(|| {
            BlockchainError::InvalidAddress("destination address cannot be extracted".to_string())
        })
    }

    pub fn list_names(&self) -> Result<Vec<(Name, NameData)>> {
        self.names.list_names()
    }

    /// Admit `tx` to the memory pool.
    ///
    /// The transaction's name operations are checked against the current tip
    /// in a throwaway layer; pending transactions are covered by the pool's
    /// name index instead.
    pub fn accept_transaction(&self, tx: Transaction) -> Result<()> {
        let _guard = self.lock_validation()?;

        if tx.is_coinbase() {
            return Err(BlockchainError::Transaction(
                "Coinbase transaction outside of a block".to_string(),
            ));
        }
        if !tx.verify_id()? {
            return Err(BlockchainError::Transaction(format!(
                "Transaction id {} does not match its contents",
                tx.get_id_hex()
            )));
        }
        if self.mempool.contains(&tx.get_id_hex()) {
            return Err(BlockchainError::Transaction(format!(
                "Transaction {} already in memory pool",
                tx.get_id_hex()
            )));
        }
        self.mempool.check_names(&tx)?;

        let mut names = self.names.clone();
        let mut view = NameViewCache::new(&mut names);
        apply_name_transaction(&tx, &mut view)?;
        drop(view);

        debug!("Accepted transaction {} into memory pool", tx.get_id_hex());
        self.mempool.add(tx)
    }

    /// Connect `block` on top of the current tip.
    pub fn connect_block(&self, block: &Block) -> Result<()> {
        let _guard = self.lock_validation()?;

        let tip = self.get_tip_block()?;
        if block.get_pre_block_hash() != tip.get_hash() {
            return Err(BlockchainError::InvalidBlock(format!(
                "Block {} does not extend tip {}",
                block.get_hash(),
                tip.get_hash()
            )));
        }
        if block.get_height() != tip.get_height() + 1 {
            return Err(BlockchainError::InvalidBlock(format!(
                "Block height {} does not follow tip height {}",
                block.get_height(),
                tip.get_height()
            )));
        }
        if block.get_transactions().is_empty() {
            return Err(BlockchainError::InvalidBlock(
                "Block must contain at least one transaction".to_string(),
            ));
        }
        if !block.verify_hash()? {
            return Err(BlockchainError::InvalidBlock(format!(
                "Block hash {} does not match contents",
                block.get_hash()
            )));
        }

        // a stored but unconnected block is harmless
        Self::store_block(&Self::blocks_tree(&self.db)?, block)?;
        let mut names = self.names.clone();
        Self::connect_names(&mut names, block)?;

        let evicted = self.mempool.remove_for_block(block).unwrap_or_else(|e| {
            error!("Failed to update memory pool after block {}: {e}", block.get_hash());
            0
        });
        info!(
            "Connected block {} at height {} ({} transactions, {} left the memory pool)",
            block.get_hash(),
            block.get_height(),
            block.get_transactions().len(),
            evicted
        );
        Ok(())
    }

    /// Undo the tip block's name registrations and step back to its parent.
    /// Its non-coinbase transactions are offered back to the memory pool.
    pub fn disconnect_tip(&self) -> Result<Block> {
        let block = {
            let _guard = self.lock_validation()?;

            let block = self.get_tip_block()?;
            if block.get_height() == 0 {
                return Err(BlockchainError::InvalidBlock(
                    "Cannot disconnect the genesis block".to_string(),
                ));
            }

            let mut names = self.names.clone();
            let mut view = NameViewCache::new(&mut names);
            for tx in block.get_transactions().iter().rev() {
                undo_name_transaction(tx, &mut view)?;
            }
            view.set_best_block(block.get_pre_block_hash());
            view.flush()?;

            info!(
                "Disconnected block {} at height {}",
                block.get_hash(),
                block.get_height()
            );
            block
        };

        for tx in block.get_transactions() {
            if tx.is_coinbase() {
                continue;
            }
            if let Err(e) = self.accept_transaction(tx.clone()) {
                debug!("Dropping {} after disconnect: {e}", tx.get_id_hex());
            }
        }
        Ok(block)
    }
}

pub struct BlockchainIterator {
    db: Db,
    current_hash: String,
}

impl BlockchainIterator {
    fn new(tip_hash: String, db: Db) -> BlockchainIterator {
        BlockchainIterator {
            current_hash: tip_hash,
            db,
        }
    }
}

impl Iterator for BlockchainIterator {
    type Item = Block;

    fn next(&mut self) -> Option<Self::Item> {
        let block_tree = self.db.open_tree(BLOCKS_TREE).ok()?;
        let data = block_tree.get(self.current_hash.as_str()).ok()??;
        let block = Block::deserialize(data.as_ref()).ok()?;
        self.current_hash = block.get_pre_block_hash().to_string();
        Some(block)
    }
}
