//! Consensus checks for name operations.
//!
//! Every function takes the view it works against explicitly. Outputs are
//! processed in order, so later outputs (and later transactions of the same
//! block) see the registrations made by earlier ones through the shared view.

use crate::core::{Block, TXOutput, Transaction};
use crate::error::{BlockchainError, Result};
use crate::names::{decode_name_script, get_name_cost, registered_names, NameOpKind};
use crate::storage::NameView;
use log::debug;
use std::collections::BTreeSet;

/// Check a single output. Non-name outputs always pass.
pub fn check_name_operation(output: &TXOutput, view: &dyn NameView) -> Result<()> {
    let op = match decode_name_script(output.get_script_pubkey())? {
        Some(op) => op,
        None => return Ok(()),
    };

    match op.kind() {
        NameOpKind::Register => {
            let required = get_name_cost(op.name());
            if output.get_value() < required {
                return Err(BlockchainError::NameCost {
                    required,
                    available: output.get_value(),
                });
            }
            if view.get_name(op.name())?.is_some() {
                return Err(BlockchainError::NameExists(op.name().to_lossy_string()));
            }
        }
    }
    Ok(())
}

/// Check, then record the output's effect in `view`.
pub fn apply_name_operation(output: &TXOutput, view: &mut dyn NameView) -> Result<()> {
    check_name_operation(output, view)?;

    if let Some(op) = decode_name_script(output.get_script_pubkey())? {
        match op.kind() {
            NameOpKind::Register => {
                debug!("Registering name '{}'", op.name());
                view.set_name(op.name(), &op.name_data())?;
            }
        }
    }
    Ok(())
}

/// Apply every output of `tx` in order.
pub fn apply_name_transaction(tx: &Transaction, view: &mut dyn NameView) -> Result<()> {
    for output in tx.get_vout() {
        apply_name_operation(output, view)?;
    }
    Ok(())
}

/// Reverse [`apply_name_transaction`] when the containing block is
/// disconnected.
pub fn undo_name_transaction(tx: &Transaction, view: &mut dyn NameView) -> Result<()> {
    for name in registered_names(tx)? {
        debug!("Unregistering name '{name}'");
        view.delete_name(&name)?;
    }
    Ok(())
}

/// Reject blocks that touch any name more than once.
///
/// Cheap and independent of chain and mempool state; runs before the
/// per-output checks.
pub fn check_names_in_block(block: &Block) -> Result<()> {
    let mut names = BTreeSet::new();
    for tx in block.get_transactions() {
        for name in registered_names(tx)? {
            if names.contains(&name) {
                return Err(BlockchainError::DuplicateNameInBlock(
                    name.to_lossy_string(),
                ));
            }
            names.insert(name);
        }
    }
    Ok(())
}
