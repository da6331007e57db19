// bincode 2 helpers; every persisted record goes through these
use crate::error::{BlockchainError, Result};
use serde::{Deserialize, Serialize};

/// Serialize data using bincode 2.0 with standard configuration
pub fn serialize<T: Serialize + bincode::Encode>(data: &T) -> Result<Vec<u8>> {
    let config = bincode::config::standard();
    bincode::encode_to_vec(data, config)
        .map_err(|e| BlockchainError::Serialization(format!("Serialization failed: {e}")))
}

/// Deserialize data using bincode 2.0 with standard configuration
pub fn deserialize<T>(bytes: &[u8]) -> Result<T>
where
    T: for<'de> Deserialize<'de> + bincode::Decode<()>,
{
    let config = bincode::config::standard();
    let (data, _) = bincode::decode_from_slice(bytes, config)
        .map_err(|e| BlockchainError::Serialization(format!("Deserialization failed: {e}")))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Script;
    use crate::names::NameData;

    #[test]
    fn test_name_data_survives_storage_encoding() {
        let data = NameData::new(Script::new_p2pkh(&[7u8; 20]));
        let bytes = serialize(&data).expect("Serialization should work");
        let decoded: NameData = deserialize(&bytes).expect("Deserialization should work");
        assert_eq!(data, decoded);
    }

    #[test]
    fn test_deserialize_invalid_data() {
        let invalid_bytes = vec![0xFF, 0xFF, 0xFF, 0xFF];
        let result: Result<NameData> = deserialize(&invalid_bytes);
        assert!(result.is_err());
    }
}
