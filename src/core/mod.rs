//! Core chain functionality
//!
//! Blocks, transactions, output scripts and the chain state that connects
//! and disconnects blocks against the name database.

pub mod block;
pub mod blockchain;
pub mod monetary;
pub mod script;
pub mod transaction;

pub use block::{Block, GENESIS_PREV_HASH};
pub use blockchain::{Blockchain, BlockchainIterator};
pub use monetary::{format_satoshis, INITIAL_BLOCK_REWARD, SATOSHIS_PER_COIN};
pub use script::{Script, OP_NAME_REGISTER, PUB_KEY_HASH_LEN};
pub use transaction::{TXInput, TXOutput, Transaction};
