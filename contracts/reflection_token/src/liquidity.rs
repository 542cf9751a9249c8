//! Sizing for the swap-and-liquify cycle.
//!
//! A reserve `A` is cut into a liquidity share `L` (by the liquidity:dev fee
//! ratio) and a dev share `A - L`.  Half of `L` stays as tokens for pairing;
//! everything else is sold at once, and the coin received is split so the dev
//! wallet gets the proceeds of its `A - L` tokens.
//!
//! ```text
//!   A ──► pair_tokens = L/2 ─────────────────────────────► add_liquidity
//!     └─► tokens_to_swap = A - L/2 ──► swap ──► received ─┬─► liquidity_native
//!                                                         └─► dev_native
//! ```

use crate::errors::{Error, Result};
use crate::fees::FeeSchedule;
use crate::Balance;

/// Where a swap-and-liquify cycle stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum SwapStage {
    Plan,
    Swap,
    AddLiquidity,
    DevTransfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapPlan {
    pub amount: Balance,
    /// Kept back and deposited next to the coin.
    pub pair_tokens: Balance,
    /// Sold for coin in one swap.
    pub tokens_to_swap: Balance,
    /// Portion of `tokens_to_swap` whose proceeds go to the dev wallet.
    pub dev_tokens: Balance,
}

impl SwapPlan {
    pub fn new(amount: Balance, fees: &FeeSchedule) -> Result<Self> {
        let reserve_percent = fees
            .liquidity
            .checked_add(fees.dev)
            .ok_or(Error::Overflow)?;
        let liquidity_tokens = if reserve_percent == 0 {
            amount
        } else {
            amount
                .checked_mul(fees.liquidity)
                .ok_or(Error::Overflow)?
                / reserve_percent
        };
        let pair_tokens = liquidity_tokens / 2;

        Ok(Self {
            amount,
            pair_tokens,
            tokens_to_swap: amount - pair_tokens,
            dev_tokens: amount - liquidity_tokens,
        })
    }

    /// Split `received` coin into `(liquidity_native, dev_native)`.
    pub fn split_native(&self, received: Balance) -> Result<(Balance, Balance)> {
        if self.tokens_to_swap == 0 {
            return Ok((received, 0));
        }
        let dev_native = received
            .checked_mul(self.dev_tokens)
            .ok_or(Error::Overflow)?
            / self.tokens_to_swap;
        Ok((received - dev_native, dev_native))
    }
}

/// Inputs to the swap trigger, read once per transfer.
#[derive(Debug, Clone, Copy)]
pub struct Trigger {
    pub enabled: bool,
    pub in_swap: bool,
    pub from_pair: bool,
    pub threshold: Balance,
    /// Contract's token balance, capped at the transfer limit.
    pub reserve: Balance,
}

impl Trigger {
    pub fn fires(&self) -> bool {
        self.enabled
            && !self.in_swap
            && !self.from_pair
            && self.threshold > 0
            && self.reserve >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_SWAP_THRESHOLD, UNIT};

    #[test]
    fn default_split_of_the_threshold() {
        let plan = SwapPlan::new(DEFAULT_SWAP_THRESHOLD, &FeeSchedule::default()).unwrap();
        assert_eq!(plan.pair_tokens, 250_000 * UNIT);
        assert_eq!(plan.tokens_to_swap, 1_250_000 * UNIT);
        assert_eq!(plan.dev_tokens, 1_000_000 * UNIT);

        // Linear price of 1 coin per 100 tokens.
        let (liquidity, dev) = plan.split_native(12_500 * UNIT).unwrap();
        assert_eq!(dev, 10_000 * UNIT);
        assert_eq!(liquidity, 2_500 * UNIT);
    }

    #[test]
    fn no_dev_fee_sends_everything_to_liquidity() {
        let fees = FeeSchedule::new(1, 4, 0).unwrap();
        let plan = SwapPlan::new(1_000, &fees).unwrap();
        assert_eq!(plan.pair_tokens, 500);
        assert_eq!(plan.dev_tokens, 0);
        assert_eq!(plan.split_native(77).unwrap(), (77, 0));
    }

    #[test]
    fn zero_reserve_fees_pair_the_whole_amount() {
        let fees = FeeSchedule::new(2, 0, 0).unwrap();
        let plan = SwapPlan::new(1_001, &fees).unwrap();
        assert_eq!(plan.pair_tokens, 500);
        assert_eq!(plan.tokens_to_swap, 501);
        assert_eq!(plan.dev_tokens, 0);
    }

    #[test]
    fn trigger_conditions() {
        let armed = Trigger {
            enabled: true,
            in_swap: false,
            from_pair: false,
            threshold: 10,
            reserve: 10,
        };
        assert!(armed.fires());
        assert!(!Trigger { enabled: false, ..armed }.fires());
        assert!(!Trigger { in_swap: true, ..armed }.fires());
        assert!(!Trigger { from_pair: true, ..armed }.fires());
        assert!(!Trigger { threshold: 0, ..armed }.fires());
        assert!(!Trigger { reserve: 9, ..armed }.fires());
    }
}
