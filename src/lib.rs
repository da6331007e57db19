//! # namechain
//!
//! A UTXO chain extended with on-chain name registration. Byte-string names
//! are registered by outputs of the form
//! `OP_RETURN OP_NAME_REGISTER <name> <address-script>`, each name bound to a
//! recipient script and unique across the chain.
//!
//! ## Layout
//! - `names/`: the name type, script codec, cost rule, cache layer and
//!   consensus checks
//! - `storage/`: sled chainstate, layered name views, batched writes and the
//!   memory pool with its per-name claim index
//! - `core/`: scripts, transactions, blocks and the chain state that connects
//!   and disconnects blocks
//! - `wallet/`: base58check addresses
//! - `config/`, `error/`, `utils/`, `cli/`: the usual plumbing
//!
//! ## Consistency rules
//! - A name is registered at most once per block, once per pending
//!   transaction set, and once per chain.
//! - Validation never writes to disk directly; it builds a `NameViewCache`
//!   layer that is either flushed in one batch with the new tip or dropped.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod names;
pub mod storage;
pub mod utils;
pub mod wallet;

#[cfg(test)]
pub mod testnet;

pub use cli::{Command, Opt};
pub use config::{Config, GLOBAL_CONFIG};
pub use core::{Block, Blockchain, Script, TXInput, TXOutput, Transaction};
pub use error::{BlockchainError, Result};
pub use names::{
    apply_name_operation, check_name_operation, check_names_in_block, construct_name_registration,
    decode_name_script, get_name_cost, Name, NameCache, NameData,
};
pub use storage::{MemoryPool, MempoolNameIndex, NameDb, NameView, NameViewCache};
pub use wallet::{address_to_pub_key_hash, convert_address, validate_address};
