use crate::Balance;

pub const TOKEN_NAME: &str = "PocMon";
pub const TOKEN_SYMBOL: &str = "MON";
pub const DECIMALS: u8 = 9;
pub const UNIT: Balance = 1_000_000_000; // 10^DECIMALS

pub const TOTAL_SUPPLY: Balance = 300_000_000 * UNIT;

// Fee schedule (percent of the transferred amount)
pub const DEFAULT_REFLECTION_FEE: u128 = 1;
pub const DEFAULT_LIQUIDITY_FEE: u128 = 3;
pub const DEFAULT_DEV_FEE: u128 = 6;
pub const MAX_FEE_PERCENT: u128 = 25;
pub const FEE_DENOMINATOR: u128 = 100;

// Transfer cap
pub const MIN_MAX_TX_AMOUNT: Balance = 1_500_000 * UNIT;
pub const DEFAULT_MAX_TX_AMOUNT: Balance = 15_000_000 * UNIT;

// Reserve converted per swap-and-liquify
pub const DEFAULT_SWAP_THRESHOLD: Balance = 1_500_000 * UNIT;

/// Router calls expire this long after the triggering block.
pub const SWAP_DEADLINE_MS: u64 = 300_000;
