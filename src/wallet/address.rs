use crate::core::PUB_KEY_HASH_LEN;
use crate::error::{BlockchainError, Result};
use crate::utils::{base58_decode, base58_encode, ripemd160_digest, sha256_digest, sha256d_digest};

const VERSION: u8 = 0x00;
pub const ADDRESS_CHECK_SUM_LEN: usize = 4;

pub fn hash_pub_key(pub_key: &[u8]) -> Vec<u8> {
    let pub_key_sha256 = sha256_digest(pub_key);
    ripemd160_digest(pub_key_sha256.as_slice())
}

fn checksum(payload: &[u8]) -> Vec<u8> {
    sha256d_digest(payload)[0..ADDRESS_CHECK_SUM_LEN].to_vec()
}

pub fn convert_address(pub_key_hash: &[u8]) -> String {
    let mut payload: Vec<u8> = vec![VERSION];
    payload.extend(pub_key_hash);
    let checksum = checksum(payload.as_slice());
    // version + pub_key_hash + checksum
    payload.extend(checksum.as_slice());
    base58_encode(payload.as_slice())
}

/// Decode a base58check address back to its public key hash.
pub fn address_to_pub_key_hash(address: &str) -> Result<[u8; PUB_KEY_HASH_LEN]> {
    let payload = base58_decode(address)?;
    if payload.len() < ADDRESS_CHECK_SUM_LEN + 1 {
        return Err(BlockchainError::InvalidAddress(format!(
            "{address}: payload too short"
        )));
    }

    let (body, actual_checksum) = payload.split_at(payload.len() - ADDRESS_CHECK_SUM_LEN);
    if checksum(body) != actual_checksum {
        return Err(BlockchainError::InvalidAddress(format!(
            "{address}: checksum mismatch"
        )));
    }
    if body[0] != VERSION {
        return Err(BlockchainError::InvalidAddress(format!(
            "{address}: unknown version byte {}",
            body[0]
        )));
    }
    body[1..].try_into().map_err(|_| {
        BlockchainError::InvalidAddress(format!(
            "{address}: expected a {PUB_KEY_HASH_LEN}-byte public key hash"
        ))
    })
}

pub fn validate_address(address: &str) -> bool {
    address_to_pub_key_hash(address).is_ok()
}
