//! Utility functions and helpers
//!
//! Hashing, base58 and bincode helpers shared by the chain, the name layer
//! and address handling.

pub mod crypto;
pub mod serialization;

pub use crypto::{
    base58_decode, base58_encode, current_timestamp, ripemd160_digest, sha256_digest,
    sha256d_digest,
};

pub use serialization::{deserialize, serialize};
