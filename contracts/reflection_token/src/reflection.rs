//! Reflected-space accounting.
//!
//! Included holders store balances in a huge "reflected" unit space and read
//! them back through a single global rate:
//!
//! ```text
//!   rate        = min(r_supply / t_supply, r_current / t_total)
//!   balance_of  = r_owned / rate
//! ```
//!
//! Taking a reflection fee burns reflected units out of `r_supply` and
//! `r_current` without touching `t_supply`, so the rate falls and every
//! included balance rises at once.  Excluded holders sit outside the
//! `r_supply` / `t_supply` pair: their true balance is removed from
//! `t_supply` ("pinned") and they own no reflected units.  `r_current` only
//! ever shrinks by burned fees, and bounds the reflected-to-token conversion.

use crate::errors::{Error, Result};
use crate::Balance;

#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct Pool {
    /// Fixed token supply `T`.
    t_total: Balance,
    /// Largest multiple of `T` in `u128`.  Never changes.
    r_total: Balance,
    /// `r_total` minus every reflection fee burned so far.
    r_current: Balance,
    /// Sum of reflected balances of included accounts.
    r_supply: Balance,
    /// `T` minus the true balances of excluded accounts.
    t_supply: Balance,
    /// Cumulative reflection fees, in token units.
    t_fee_total: Balance,
}

impl Pool {
    /// Genesis pool: all reflected units belong to included holders.
    ///
    /// `t_total` must be non-zero.
    pub fn new(t_total: Balance) -> Self {
        let r_total = Balance::MAX - (Balance::MAX % t_total);
        Self {
            t_total,
            r_total,
            r_current: r_total,
            r_supply: r_total,
            t_supply: t_total,
            t_fee_total: 0,
        }
    }

    /// Current reflected units per token.
    ///
    /// Never above `r_current / t_total`, so any amount up to the supply
    /// converts to at most `r_current` reflected units.  Falls back to that
    /// ceiling when the included pool is empty or its reflected supply drops
    /// below one unit of it.
    pub fn rate(&self) -> Balance {
        let ceiling = self.r_current / self.t_total;
        if self.t_supply == 0 || self.r_supply < ceiling {
            return ceiling.max(1);
        }
        (self.r_supply / self.t_supply).min(ceiling).max(1)
    }

    /// Reflected equivalent of `amount` at the current rate.
    pub fn to_reflected(&self, amount: Balance) -> Result<Balance> {
        if amount > self.t_total {
            return Err(Error::AmountExceedsSupply);
        }
        amount.checked_mul(self.rate()).ok_or(Error::Overflow)
    }

    /// Token equivalent of `reflected` at the current rate.
    pub fn to_token(&self, reflected: Balance) -> Result<Balance> {
        if reflected > self.r_current {
            return Err(Error::AmountExceedsReflections);
        }
        Ok(self.token_value(reflected))
    }

    /// Unbounded `reflected / rate`, for balances already known to be in the
    /// pool.
    pub fn token_value(&self, reflected: Balance) -> Balance {
        reflected / self.rate()
    }

    pub fn deposit_reflected(&mut self, reflected: Balance) -> Result<()> {
        self.r_supply = self
            .r_supply
            .checked_add(reflected)
            .ok_or(Error::Overflow)?;
        Ok(())
    }

    pub fn withdraw_reflected(&mut self, reflected: Balance) -> Result<()> {
        self.r_supply = self
            .r_supply
            .checked_sub(reflected)
            .ok_or(Error::Overflow)?;
        Ok(())
    }

    /// Move `amount` tokens out of the shared pool into an excluded balance.
    pub fn pin(&mut self, amount: Balance) -> Result<()> {
        self.t_supply = self
            .t_supply
            .checked_sub(amount)
            .ok_or(Error::Overflow)?;
        Ok(())
    }

    /// Return `amount` tokens from an excluded balance to the shared pool.
    pub fn unpin(&mut self, amount: Balance) -> Result<()> {
        let t_supply = self.t_supply.checked_add(amount).ok_or(Error::Overflow)?;
        if t_supply > self.t_total {
            return Err(Error::AmountExceedsSupply);
        }
        self.t_supply = t_supply;
        Ok(())
    }

    /// Account for a reflection fee of `amount` tokens already withheld from
    /// `r_supply` at the transfer's frozen `rate`.
    pub fn record_fee(&mut self, amount: Balance, rate: Balance) -> Result<()> {
        let burned = amount.checked_mul(rate).ok_or(Error::Overflow)?;
        let r_current = self.r_current.checked_sub(burned).ok_or(Error::Overflow)?;
        self.t_fee_total = self
            .t_fee_total
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        self.r_current = r_current;
        Ok(())
    }

    pub fn t_total(&self) -> Balance {
        self.t_total
    }

    pub fn r_total(&self) -> Balance {
        self.r_total
    }

    pub fn r_current(&self) -> Balance {
        self.r_current
    }

    pub fn r_supply(&self) -> Balance {
        self.r_supply
    }

    pub fn t_supply(&self) -> Balance {
        self.t_supply
    }

    pub fn t_fee_total(&self) -> Balance {
        self.t_fee_total
    }
}
