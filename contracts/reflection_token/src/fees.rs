use crate::constants::*;
use crate::errors::{Error, Result};
use crate::Balance;

/// Owner-tunable fee percents.  Each is capped at `MAX_FEE_PERCENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct FeeSchedule {
    pub reflection: u128,
    pub liquidity: u128,
    pub dev: u128,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            reflection: DEFAULT_REFLECTION_FEE,
            liquidity: DEFAULT_LIQUIDITY_FEE,
            dev: DEFAULT_DEV_FEE,
        }
    }
}

/// How one transfer's `amount` is divided.
///
/// `reflection + reserve + net == amount` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub amount: Balance,
    /// Burned from reflected space, shared by all included holders.
    pub reflection: Balance,
    /// Liquidity plus dev fee, credited to the contract for later swapping.
    pub reserve: Balance,
    /// What the recipient gets.
    pub net: Balance,
}

impl FeeBreakdown {
    pub fn fee_free(amount: Balance) -> Self {
        Self {
            amount,
            reflection: 0,
            reserve: 0,
            net: amount,
        }
    }

    pub fn total_fee(&self) -> Balance {
        self.reflection + self.reserve
    }
}

impl FeeSchedule {
    pub fn new(reflection: u128, liquidity: u128, dev: u128) -> Result<Self> {
        for percent in [reflection, liquidity, dev] {
            ensure_within_ceiling(percent)?;
        }
        Ok(Self {
            reflection,
            liquidity,
            dev,
        })
    }

    pub fn set_reflection(&mut self, percent: u128) -> Result<()> {
        ensure_within_ceiling(percent)?;
        self.reflection = percent;
        Ok(())
    }

    pub fn set_liquidity(&mut self, percent: u128) -> Result<()> {
        ensure_within_ceiling(percent)?;
        self.liquidity = percent;
        Ok(())
    }

    pub fn set_dev(&mut self, percent: u128) -> Result<()> {
        ensure_within_ceiling(percent)?;
        self.dev = percent;
        Ok(())
    }

    /// Each fee is floored on its own, so `net` absorbs the rounding.
    pub fn breakdown(&self, amount: Balance) -> Result<FeeBreakdown> {
        let reflection = percent_of(amount, self.reflection)?;
        let reserve = percent_of(amount, self.liquidity)?
            .checked_add(percent_of(amount, self.dev)?)
            .ok_or(Error::Overflow)?;
        let net = amount
            .checked_sub(reflection)
            .and_then(|rest| rest.checked_sub(reserve))
            .ok_or(Error::Overflow)?;

        Ok(FeeBreakdown {
            amount,
            reflection,
            reserve,
            net,
        })
    }
}

fn ensure_within_ceiling(percent: u128) -> Result<()> {
    if percent > MAX_FEE_PERCENT {
        return Err(Error::FeeAboveCeiling);
    }
    Ok(())
}

fn percent_of(amount: Balance, percent: u128) -> Result<Balance> {
    Ok(amount.checked_mul(percent).ok_or(Error::Overflow)? / FEE_DENOMINATOR)
}
