//! Error handling for the name chain
//!
//! Every failure on a validation path is returned as a value. Name rejections
//! carry a DoS score and a short reject reason so callers (mempool admission,
//! block connection) can surface them without inspecting message text.

use std::fmt;

/// Result type alias for chain operations
pub type Result<T> = std::result::Result<T, BlockchainError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockchainError {
    /// Database-related errors
    Database(String),
    /// Configuration errors
    Config(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Invalid address format
    InvalidAddress(String),
    /// Transaction validation errors unrelated to names
    Transaction(String),
    /// Block validation errors unrelated to names
    InvalidBlock(String),
    /// Script looks like a name operation but does not parse
    NameFormat(String),
    /// Output value below the minimum cost of the name
    NameCost { required: u64, available: u64 },
    /// Name is already registered in the view
    NameExists(String),
    /// Name is already claimed by another pending transaction
    NameConflict { name: String, txid: String },
    /// Name touched more than once within one block
    DuplicateNameInBlock(String),
    /// Lookup of a name that is not registered
    NameNotFound(String),
}

impl BlockchainError {
    /// Misbehaviour score to assign to the peer that relayed the offending data.
    pub fn dos_score(&self) -> u32 {
        match self {
            BlockchainError::NameFormat(_)
            | BlockchainError::NameCost { .. }
            | BlockchainError::DuplicateNameInBlock(_)
            | BlockchainError::InvalidBlock(_) => 100,
            BlockchainError::NameExists(_) | BlockchainError::Transaction(_) => 10,
            _ => 0,
        }
    }

    /// Short machine-readable rejection reason.
    pub fn reject_reason(&self) -> &'static str {
        match self {
            BlockchainError::NameFormat(_) => "bad-name-script",
            BlockchainError::NameCost { .. } => "bad-name-cost",
            BlockchainError::NameExists(_) => "name-exists",
            BlockchainError::NameConflict { .. } => "name-mempool-conflict",
            BlockchainError::DuplicateNameInBlock(_) => "bad-blk-duplicate-name",
            BlockchainError::NameNotFound(_) => "name-not-found",
            BlockchainError::Transaction(_) => "bad-txns",
            BlockchainError::InvalidBlock(_) => "bad-blk",
            BlockchainError::InvalidAddress(_) => "bad-address",
            BlockchainError::Database(_)
            | BlockchainError::Config(_)
            | BlockchainError::Serialization(_)
            | BlockchainError::Io(_) => "internal-error",
        }
    }

    /// True for errors caused by the data being validated rather than the node.
    pub fn is_rejection(&self) -> bool {
        self.reject_reason() != "internal-error"
    }
}

impl fmt::Display for BlockchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockchainError::Database(msg) => write!(f, "Database error: {msg}"),
            BlockchainError::Config(msg) => write!(f, "Configuration error: {msg}"),
            BlockchainError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            BlockchainError::Io(msg) => write!(f, "I/O error: {msg}"),
            BlockchainError::InvalidAddress(addr) => write!(f, "Invalid address: {addr}"),
            BlockchainError::Transaction(msg) => write!(f, "Transaction error: {msg}"),
            BlockchainError::InvalidBlock(msg) => write!(f, "Invalid block: {msg}"),
            BlockchainError::NameFormat(msg) => write!(f, "Malformed name script: {msg}"),
            BlockchainError::NameCost {
                required,
                available,
            } => {
                write!(
                    f,
                    "Name registration underpaid: required {required}, available {available}"
                )
            }
            BlockchainError::NameExists(name) => write!(f, "Name already registered: '{name}'"),
            BlockchainError::NameConflict { name, txid } => {
                write!(f, "Name '{name}' already claimed by pending transaction {txid}")
            }
            BlockchainError::DuplicateNameInBlock(name) => {
                write!(f, "Name '{name}' registered more than once in block")
            }
            BlockchainError::NameNotFound(name) => write!(f, "Name not found: '{name}'"),
        }
    }
}

impl std::error::Error for BlockchainError {}

impl From<std::io::Error> for BlockchainError {
    fn from(err: std::io::Error) -> Self {
        BlockchainError::Io(err.to_string())
    }
}

impl From<sled::Error> for BlockchainError {
    fn from(err: sled::Error) -> Self {
        BlockchainError::Database(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for BlockchainError {
    fn from(err: bincode::error::EncodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for BlockchainError {
    fn from(err: bincode::error::DecodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BlockchainError {
    fn from(err: toml::de::Error) -> Self {
        BlockchainError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_errors_are_rejections() {
        let err = BlockchainError::NameCost {
            required: 10,
            available: 9,
        };
        assert!(err.is_rejection());
        assert_eq!(err.dos_score(), 100);
        assert_eq!(err.reject_reason(), "bad-name-cost");

        let conflict = BlockchainError::NameConflict {
            name: "n".to_string(),
            txid: "ab".to_string(),
        };
        assert_eq!(conflict.dos_score(), 0);
        assert!(conflict.is_rejection());
    }

    #[test]
    fn test_storage_errors_are_internal() {
        let err = BlockchainError::Database("boom".to_string());
        assert!(!err.is_rejection());
        assert_eq!(err.to_string(), "Database error: boom");
    }
}
