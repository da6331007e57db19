use crate::core::Script;
use crate::wallet::convert_address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered name. Raw bytes, ordered byte-lexicographically, never
/// normalized. Use [`Name::to_lossy_string`] only for display.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct Name(Vec<u8>);

impl Name {
    /// Reinterpret the string's UTF-8 bytes as a name.
    pub fn from_string(s: &str) -> Name {
        Name(s.as_bytes().to_vec())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Name {
        Name(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Printable form; invalid UTF-8 sequences become U+FFFD.
    pub fn to_lossy_string(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::from_string(s)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_lossy_string())
    }
}

/// Everything stored for a registered name.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct NameData {
    /// The name's ownership / recipient script.
    address: Script,
}

impl NameData {
    pub fn new(address: Script) -> NameData {
        NameData { address }
    }

    pub fn get_address(&self) -> &Script {
        &self.address
    }

    /// Base58check address of the recipient, if the script is pay-to-pubkey-hash.
    pub fn destination_address(&self) -> Option<String> {
        self.address.p2pkh_hash().map(convert_address)
    }
}
