//! Address handling
//!
//! Names are bound to recipient scripts; these helpers translate between
//! base58check addresses and the pay-to-pubkey-hash scripts they stand for.

pub mod address;

pub use address::{
    address_to_pub_key_hash, convert_address, hash_pub_key, validate_address,
    ADDRESS_CHECK_SUM_LEN,
};
