//! Name registration layer
//!
//! Byte-string names registered on-chain through `OP_NAME_REGISTER` outputs,
//! each bound to a recipient script and unique across the chain.
//!
//! - `name`: the [`Name`] key and the [`NameData`] record
//! - `codec`: reading and building name scripts
//! - `cost`: minimum value a registration must lock
//! - `cache`: one layer of pending name changes
//! - `validation`: per-output and per-block consensus checks

pub mod cache;
pub mod codec;
pub mod cost;
pub mod name;
pub mod validation;

pub use cache::NameCache;
pub use codec::{
    construct_name_registration, decode_name_script, registered_names, NameOpKind, NameOperation,
};
pub use cost::{get_name_cost, NAME_BASE_COST, SHORT_NAME_LEN};
pub use name::{Name, NameData};
pub use validation::{
    apply_name_operation, apply_name_transaction, check_name_operation, check_names_in_block,
    undo_name_transaction,
};
