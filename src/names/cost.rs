//! Minimum locked value for registering a name.
//!
//! Consensus rule: depends on nothing but the name's length. Short names are
//! scarce, so each byte below [`SHORT_NAME_LEN`] doubles the price.

use crate::core::SATOSHIS_PER_COIN;
use crate::names::Name;

/// Cost of any name at least [`SHORT_NAME_LEN`] bytes long (0.01 coins).
pub const NAME_BASE_COST: u64 = SATOSHIS_PER_COIN / 100;

pub const SHORT_NAME_LEN: usize = 8;

pub fn get_name_cost(name: &Name) -> u64 {
    let shortfall = SHORT_NAME_LEN.saturating_sub(name.len()) as u32;
    NAME_BASE_COST << shortfall
}
