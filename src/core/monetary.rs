/// Monetary units
///
/// Amounts are counted in satoshis; one coin is 100,000,000 satoshis.
pub const SATOSHIS_PER_COIN: u64 = 100_000_000;

/// Reward paid by the genesis coinbase (50 coins)
pub const INITIAL_BLOCK_REWARD: u64 = 50 * SATOSHIS_PER_COIN;

/// Format satoshis as a human-readable string
///
/// # Examples
/// ```
/// use namechain::core::monetary::format_satoshis;
/// assert_eq!(format_satoshis(100_000_000), "1.00000000 coins");
/// assert_eq!(format_satoshis(1_000_000), "0.01000000 coins");
/// ```
pub fn format_satoshis(satoshis: u64) -> String {
    format!(
        "{}.{:08} coins",
        satoshis / SATOSHIS_PER_COIN,
        satoshis % SATOSHIS_PER_COIN
    )
}
