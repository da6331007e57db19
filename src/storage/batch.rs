use crate::error::Result;
use crate::utils::serialize;
use serde::Serialize;

/// A single queued change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Write { key: Vec<u8>, value: Vec<u8> },
    Erase { key: Vec<u8> },
}

impl BatchOp {
    pub fn key(&self) -> &[u8] {
        match self {
            BatchOp::Write { key, .. } | BatchOp::Erase { key } => key.as_slice(),
        }
    }
}

/// Ordered list of writes and erases, applied to the store in one go.
#[derive(Debug, Clone, Default)]
pub struct DbBatch {
    ops: Vec<BatchOp>,
}

impl DbBatch {
    pub fn new() -> DbBatch {
        DbBatch::default()
    }

    pub fn write<T: Serialize + bincode::Encode>(&mut self, key: Vec<u8>, value: &T) -> Result<()> {
        let value = serialize(value)?;
        self.write_raw(key, value);
        Ok(())
    }

    pub fn write_raw(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.ops.push(BatchOp::Write { key, value });
    }

    pub fn erase(&mut self, key: Vec<u8>) {
        self.ops.push(BatchOp::Erase { key });
    }

    pub fn ops(&self) -> &[BatchOp] {
        self.ops.as_slice()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Later ops on the same key override earlier ones, as in sled.
    pub fn into_sled(self) -> sled::Batch {
        let mut batch = sled::Batch::default();
        for op in self.ops {
            match op {
                BatchOp::Write { key, value } => batch.insert(key, value),
                BatchOp::Erase { key } => batch.remove(key),
            }
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sled_batch_applies_atomically_in_order() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let tree = db.open_tree("t").unwrap();
        tree.insert(b"gone", b"x".to_vec()).unwrap();

        let mut batch = DbBatch::new();
        batch.write_raw(b"k".to_vec(), b"1".to_vec());
        batch.write_raw(b"k".to_vec(), b"2".to_vec());
        batch.erase(b"gone".to_vec());
        assert_eq!(batch.len(), 3);

        tree.apply_batch(batch.into_sled()).unwrap();
        assert_eq!(tree.get(b"k").unwrap().unwrap().as_ref(), b"2");
        assert!(tree.get(b"gone").unwrap().is_none());
    }
}
