// Transactions follow the UTXO model: inputs reference earlier outputs, outputs
// carry a value and a locking script. Name registrations are ordinary outputs
// whose script starts with OP_RETURN OP_NAME_REGISTER.

use crate::core::Script;
use crate::error::{BlockchainError, Result};
use crate::names::{construct_name_registration, Name, NameData};
use crate::utils::{deserialize, serialize, sha256d_digest};
use crate::wallet::address_to_pub_key_hash;
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};

// An input points at output `vout` of transaction `txid`
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct TXInput {
    txid: Vec<u8>,
    vout: usize,
    signature: Vec<u8>,
}

impl TXInput {
    pub fn new(txid: &[u8], vout: usize) -> TXInput {
        TXInput {
            txid: txid.to_vec(),
            vout,
            signature: vec![],
        }
    }

    pub fn get_txid(&self) -> &[u8] {
        self.txid.as_slice()
    }

    pub fn get_vout(&self) -> usize {
        self.vout
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct TXOutput {
    value: u64,
    script_pubkey: Script,
}

impl TXOutput {
    pub fn new(value: u64, script_pubkey: Script) -> TXOutput {
        TXOutput {
            value,
            script_pubkey,
        }
    }

    // Pay-to-pubkey-hash output for a base58check address
    pub fn to_address(value: u64, address: &str) -> Result<TXOutput> {
        if value == 0 {
            return Err(BlockchainError::Transaction(
                "Transaction value must be positive".to_string(),
            ));
        }
        let pub_key_hash = address_to_pub_key_hash(address)?;
        Ok(TXOutput::new(value, Script::new_p2pkh(&pub_key_hash)))
    }

    pub fn get_value(&self) -> u64 {
        self.value
    }

    pub fn get_script_pubkey(&self) -> &Script {
        &self.script_pubkey
    }

    pub fn is_locked_with_key(&self, pub_key_hash: &[u8]) -> bool {
        self.script_pubkey.p2pkh_hash() == Some(pub_key_hash)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Transaction {
    id: Vec<u8>,
    vin: Vec<TXInput>,
    vout: Vec<TXOutput>,
}

impl Transaction {
    pub fn new(vin: Vec<TXInput>, vout: Vec<TXOutput>) -> Result<Transaction> {
        let mut tx = Transaction {
            id: vec![],
            vin,
            vout,
        };
        tx.id = tx.hash()?;
        Ok(tx)
    }

    // The block height goes into the coinbase input so every coinbase id is unique
    pub fn new_coinbase_tx(to: &str, reward: u64, height: usize) -> Result<Transaction> {
        let txout = TXOutput::to_address(reward, to)?;
        let tx_input = TXInput {
            signature: (height as u64).to_le_bytes().to_vec(),
            ..Default::default()
        };
        Self::new(vec![tx_input], vec![txout])
    }

    /// Transaction spending `vin` into a single registration output of `value`.
    pub fn new_name_registration(
        vin: Vec<TXInput>,
        name: &Name,
        data: &NameData,
        value: u64,
    ) -> Result<Transaction> {
        let script = construct_name_registration(name, data)?;
        Self::new(vin, vec![TXOutput::new(value, script)])
    }

    pub fn is_coinbase(&self) -> bool {
        self.vin.len() == 1 && self.vin[0].txid.is_empty()
    }

    /// Id recomputed from the inputs and outputs.
    pub(crate) fn hash(&self) -> Result<Vec<u8>> {
        let tx_copy = Transaction {
            id: vec![],
            vin: self.vin.clone(),
            vout: self.vout.clone(),
        };
        Ok(sha256d_digest(&tx_copy.serialize()?))
    }

    /// Whether the stored id matches the transaction's contents.
    pub fn verify_id(&self) -> Result<bool> {
        Ok(self.hash()? == self.id)
    }

    pub fn get_id(&self) -> &[u8] {
        self.id.as_slice()
    }

    pub fn get_id_hex(&self) -> String {
        HEXLOWER.encode(self.id.as_slice())
    }

    pub fn get_vin(&self) -> &[TXInput] {
        self.vin.as_slice()
    }

    pub fn get_vout(&self) -> &[TXOutput] {
        self.vout.as_slice()
    }

    pub fn get_output_value(&self) -> Result<u64> {
        self.vout.iter().try_fold(0u64, |acc, out| {
            acc.checked_add(out.get_value())
                .ok_or_else(|| BlockchainError::Transaction("Output value overflow".to_string()))
        })
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Transaction> {
        deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::convert_address;

    #[test]
    fn test_coinbase_ids_differ_by_height() {
        let address = convert_address(&[1u8; 20]);
        let a = Transaction::new_coinbase_tx(&address, 50, 1).unwrap();
        let b = Transaction::new_coinbase_tx(&address, 50, 2).unwrap();
        assert!(a.is_coinbase());
        assert_ne!(a.get_id(), b.get_id());
        assert!(a.get_vout()[0].is_locked_with_key(&[1u8; 20]));
    }

    #[test]
    fn test_registration_tx_carries_name_script() {
        let name = Name::from_string("tx-name");
        let data = NameData::new(Script::new_p2pkh(&[3u8; 20]));
        let tx = Transaction::new_name_registration(
            vec![TXInput::new(&[0xab; 32], 0)],
            &name,
            &data,
            1_000,
        )
        .unwrap();

        assert!(!tx.is_coinbase());
        assert_eq!(tx.get_id().len(), 32);
        assert!(tx.get_vout()[0].get_script_pubkey().is_op_return());
        assert_eq!(tx.get_output_value().unwrap(), 1_000);

        let decoded = Transaction::deserialize(&tx.serialize().unwrap()).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn test_zero_value_address_output_rejected() {
        let address = convert_address(&[1u8; 20]);
        assert!(TXOutput::to_address(0, &address).is_err());
    }
}
