//! Data storage and persistence
//!
//! The sled-backed chainstate (name records, best block), the layered name
//! views validation works against, batched writes, and the memory pool with
//! its per-name claim index.

pub mod batch;
pub mod memory_pool;
pub mod name_db;
pub mod name_index;
pub mod name_view;

pub use batch::{BatchOp, DbBatch};
pub use memory_pool::MemoryPool;
pub use name_db::{name_key, NameDb, CHAINSTATE_TREE, DB_BEST_BLOCK, DB_NAME};
pub use name_index::MempoolNameIndex;
pub use name_view::{NameView, NameViewCache};
