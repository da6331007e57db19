use crate::core::Transaction;
use crate::error::Result;
use crate::utils::{current_timestamp, deserialize, serialize, sha256d_digest};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};

pub const GENESIS_PREV_HASH: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Block {
    timestamp: i64,
    pre_block_hash: String,
    hash: String,
    transactions: Vec<Transaction>,
    height: usize,
}

// Fields covered by the block hash
#[derive(Serialize, bincode::Encode)]
struct BlockHeader<'a> {
    timestamp: i64,
    pre_block_hash: &'a str,
    tx_ids: Vec<Vec<u8>>,
    height: usize,
}

impl Block {
    pub fn new_block(
        pre_block_hash: String,
        transactions: &[Transaction],
        height: usize,
    ) -> Result<Block> {
        Self::new_block_with_timestamp(current_timestamp()?, pre_block_hash, transactions, height)
    }

    pub fn new_block_with_timestamp(
        timestamp: i64,
        pre_block_hash: String,
        transactions: &[Transaction],
        height: usize,
    ) -> Result<Block> {
        let mut block = Block {
            timestamp,
            pre_block_hash,
            hash: String::new(),
            transactions: transactions.to_vec(),
            height,
        };
        block.hash = block.compute_hash()?;
        Ok(block)
    }

    pub fn generate_genesis_block(transaction: &Transaction) -> Result<Block> {
        Block::new_block(
            String::from(GENESIS_PREV_HASH),
            std::slice::from_ref(transaction),
            0,
        )
    }

    fn compute_hash(&self) -> Result<String> {
        let header = BlockHeader {
            timestamp: self.timestamp,
            pre_block_hash: self.pre_block_hash.as_str(),
            tx_ids: self
                .transactions
                .iter()
                .map(Transaction::hash)
                .collect::<Result<_>>()?,
            height: self.height,
        };
        Ok(HEXLOWER.encode(&sha256d_digest(&serialize(&header)?)))
    }

    /// Recompute the hash from the transaction contents and compare it with
    /// the stored one. Every stored transaction id must match as well.
    pub fn verify_hash(&self) -> Result<bool> {
        for tx in &self.transactions {
            if !tx.verify_id()? {
                return Ok(false);
            }
        }
        Ok(self.compute_hash()? == self.hash)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Block> {
        deserialize::<Block>(bytes)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_pre_block_hash(&self) -> &str {
        self.pre_block_hash.as_str()
    }

    pub fn get_hash(&self) -> &str {
        self.hash.as_str()
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn get_height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Script, TXInput};
    use crate::names::{get_name_cost, Name, NameData};
    use crate::wallet::convert_address;

    #[test]
    fn test_block_hash_commits_to_transactions() {
        let address = convert_address(&[4u8; 20]);
        let tx1 = Transaction::new_coinbase_tx(&address, 10, 1).unwrap();
        let tx2 = Transaction::new_coinbase_tx(&address, 10, 2).unwrap();

        let a = Block::new_block_with_timestamp(1, "prev".to_string(), &[tx1.clone()], 1).unwrap();
        let b = Block::new_block_with_timestamp(1, "prev".to_string(), &[tx2], 1).unwrap();
        assert_ne!(a.get_hash(), b.get_hash());
        assert!(a.verify_hash().unwrap());

        let restored = Block::deserialize(&a.serialize().unwrap()).unwrap();
        assert_eq!(restored, a);
        assert_eq!(restored.get_transactions()[0], tx1);
    }

    fn replace_bytes(bytes: &mut [u8], from: &[u8], to: &[u8]) {
        let at = bytes
            .windows(from.len())
            .position(|w| w == from)
            .expect("pattern present");
        bytes[at..at + from.len()].copy_from_slice(to);
    }

    #[test]
    fn test_edited_registration_fails_verification() {
        let name = Name::from_string("aaaa-name");
        let tx = Transaction::new_name_registration(
            vec![TXInput::new(&[1; 32], 0)],
            &name,
            &NameData::new(Script::new_p2pkh(&[4u8; 20])),
            get_name_cost(&name),
        )
        .unwrap();
        let block = Block::new_block_with_timestamp(1, "prev".to_string(), &[tx], 1).unwrap();
        assert!(block.verify_hash().unwrap());

        let mut bytes = block.serialize().unwrap();
        replace_bytes(&mut bytes, b"aaaa-name", b"bbbb-name");
        let edited = Block::deserialize(&bytes).unwrap();
        assert_eq!(edited.get_hash(), block.get_hash());
        assert!(!edited.verify_hash().unwrap());
    }

    #[test]
    fn test_stale_transaction_id_fails_verification() {
        let address = convert_address(&[4u8; 20]);
        let tx = Transaction::new_coinbase_tx(&address, 10, 1).unwrap();
        let block = Block::new_block_with_timestamp(1, "prev".to_string(), &[tx.clone()], 1).unwrap();

        // bump the reward but leave the id and the block hash alone
        let mut bytes = block.serialize().unwrap();
        let id = tx.get_id().to_vec();
        let edited_tx = Transaction::new_coinbase_tx(&address, 11, 1).unwrap();
        let mut forged = edited_tx.serialize().unwrap();
        replace_bytes(&mut forged, edited_tx.get_id(), &id);
        replace_bytes(&mut bytes, &tx.serialize().unwrap(), &forged);

        let edited = Block::deserialize(&bytes).unwrap();
        assert_eq!(edited.get_transactions()[0].get_id(), tx.get_id());
        assert!(!edited.verify_hash().unwrap());
    }
}
