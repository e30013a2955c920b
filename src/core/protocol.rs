//! Fixed protocol parameters. Not configurable from any source.

/// Schema version of the on-disk database. Part of the database file name.
pub const VERSION_MAJOR: u32 = 1;

/// Address version byte.
pub const ADDRESS_VERSION: u8 = 0x1b;

/// Height of the first block the daemon cares about.
pub const BLOCK_FIRST: u64 = 17_000;

pub const BURN_START: u64 = 17_000;
/// 30 days of one-minute blocks after `BURN_START`.
pub const BURN_END: u64 = BURN_START + 30 * 24 * 60;

/// Provably unspendable burn address.
pub const UNSPENDABLE: &str = "1CounterpartyXXXXXXXXXXXXXXXUWLpVr";

/// Message prefix marking protocol transactions.
pub const PREFIX: &[u8] = b"CNTRPRTY";

/// Seconds a temporary wallet unlock stays valid.
pub const UNLOCK_WINDOW_SECS: u64 = 60;

/// Bundle of the constants above, carried on the runtime config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolParams {
    pub address_version: u8,
    pub block_first: u64,
    pub burn_start: u64,
    pub burn_end: u64,
    pub unspendable: &'static str,
    pub prefix: &'static [u8],
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            address_version: ADDRESS_VERSION,
            block_first: BLOCK_FIRST,
            burn_start: BURN_START,
            burn_end: BURN_END,
            unspendable: UNSPENDABLE,
            prefix: PREFIX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burn_window_is_thirty_days() {
        let p = ProtocolParams::default();
        assert_eq!(p.burn_end - p.burn_start, 43_200);
        assert_eq!(p.prefix, b"CNTRPRTY");
    }
}
