//! Test utilities for chain and name tests

use crate::core::{Blockchain, Script, TXInput, Transaction};
use crate::error::{BlockchainError, Result};
use crate::names::{get_name_cost, Name, NameData};
use crate::wallet::address_to_pub_key_hash;
use tempfile::TempDir;

/// Well-known valid address used as genesis and name recipient in tests
pub const TEST_ADDRESS: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";

pub fn test_address() -> String {
    TEST_ADDRESS.to_string()
}

pub fn create_temp_dir() -> Result<TempDir> {
    tempfile::tempdir().map_err(|e| BlockchainError::Io(e.to_string()))
}

/// Create a test blockchain with temporary storage
pub fn create_test_blockchain() -> Result<(Blockchain, TempDir)> {
    let temp_dir = create_temp_dir()?;
    let db_path = temp_dir.path().join("test_blockchain");
    let blockchain =
        Blockchain::create_blockchain_with_path(TEST_ADDRESS, &db_path.to_string_lossy())?;
    Ok((blockchain, temp_dir))
}

/// Name data pointing at [`TEST_ADDRESS`]
pub fn test_name_data() -> NameData {
    let pub_key_hash =
        address_to_pub_key_hash(TEST_ADDRESS).expect("test address is valid base58check");
    NameData::new(Script::new_p2pkh(&pub_key_hash))
}

/// Registration of `name` paying exactly its cost; `input_tag` keeps txids apart
pub fn registration_tx(name: &str, input_tag: u8) -> Transaction {
    let name = Name::from_string(name);
    Transaction::new_name_registration(
        vec![TXInput::new(&[input_tag; 32], 0)],
        &name,
        &test_name_data(),
        get_name_cost(&name),
    )
    .expect("registration transaction builds")
}
