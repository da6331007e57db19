//! Output scripts
//!
//! A thin wrapper over [`bitcoin::ScriptBuf`] that adds the storage encoding
//! the rest of the chain uses. Script execution is not implemented here.

use bitcoin::hashes::Hash as _;
use bitcoin::opcodes::all::OP_RETURN_208;
use bitcoin::opcodes::Opcode;
use bitcoin::script::Instructions;
use bitcoin::{PubkeyHash, ScriptBuf};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name registration. Lives in the unassigned opcode range (0xd0).
pub const OP_NAME_REGISTER: Opcode = OP_RETURN_208;

pub const PUB_KEY_HASH_LEN: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Script(ScriptBuf);

impl Script {
    pub fn new() -> Script {
        Script(ScriptBuf::new())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Script {
        Script(ScriptBuf::from_bytes(bytes))
    }

    /// Standard `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG` script.
    pub fn new_p2pkh(pub_key_hash: &[u8; PUB_KEY_HASH_LEN]) -> Script {
        Script(ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array(
            *pub_key_hash,
        )))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Opcodes and pushes of the script; non-minimal pushes are accepted.
    pub fn instructions(&self) -> Instructions<'_> {
        self.0.instructions()
    }

    /// Provably unspendable, data-carrying output.
    pub fn is_op_return(&self) -> bool {
        self.0.is_op_return()
    }

    /// The public key hash of a pay-to-pubkey-hash script, if this is one.
    pub fn p2pkh_hash(&self) -> Option<&[u8]> {
        if self.0.is_p2pkh() {
            Some(&self.0.as_bytes()[3..3 + PUB_KEY_HASH_LEN])
        } else {
            None
        }
    }
}

impl From<ScriptBuf> for Script {
    fn from(script: ScriptBuf) -> Self {
        Script(script)
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script::from_bytes(bytes)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0.as_bytes()))
    }
}

// Stored as its raw bytes, length-prefixed like any other byte vector.
impl bincode::Encode for Script {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> std::result::Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(self.0.as_bytes(), encoder)
    }
}

impl<Context> bincode::Decode<Context> for Script {
    fn decode<D: bincode::de::Decoder<Context = Context>>(
        decoder: &mut D,
    ) -> std::result::Result<Self, bincode::error::DecodeError> {
        let bytes: Vec<u8> = bincode::Decode::decode(decoder)?;
        Ok(Script::from_bytes(bytes))
    }
}

bincode::impl_borrow_decode!(Script);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{deserialize, serialize};
    use bitcoin::opcodes::all::{OP_PUSHNUM_1, OP_RETURN};
    use bitcoin::script::Builder;

    #[test]
    fn test_p2pkh_detection() {
        let hash = [9u8; 20];
        let script = Script::new_p2pkh(&hash);
        assert_eq!(script.len(), 25);
        assert_eq!(script.p2pkh_hash(), Some(&hash[..]));
        assert!(!script.is_op_return());

        let other = Script::from(
            Builder::new()
                .push_opcode(OP_RETURN)
                .push_slice(hash)
                .into_script(),
        );
        assert_eq!(other.p2pkh_hash(), None);
        assert!(other.is_op_return());
    }

    #[test]
    fn test_name_opcode_value() {
        assert_eq!(OP_NAME_REGISTER.to_u8(), 0xd0);
        assert_ne!(OP_NAME_REGISTER, OP_PUSHNUM_1);
    }

    #[test]
    fn test_storage_encoding_keeps_raw_bytes() {
        // truncated push; storage must not care whether the script parses
        let script = Script::from_bytes(vec![0x6a, 0x05, 0x01]);
        let decoded: Script = deserialize(&serialize(&script).unwrap()).unwrap();
        assert_eq!(decoded, script);
        assert_eq!(decoded.to_string(), "6a0501");
    }
}
