//! Per-account state and the moves that keep it consistent with the [`Pool`].

use ink::primitives::AccountId;

use crate::errors::{Error, Result};
use crate::reflection::Pool;
use crate::Balance;

/// Neighbours of an excluded account in the exclusion list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct ExclusionLink {
    pub prev: Option<AccountId>,
    pub next: Option<AccountId>,
}

/// Stored balance of one holder.
///
/// Exactly one of `r_owned` / `t_owned` is live, selected by
/// `excluded_from_reward`.
#[derive(Debug, Default, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct AccountState {
    pub r_owned: Balance,
    pub t_owned: Balance,
    pub excluded_from_reward: bool,
    pub excluded_from_fee: bool,
}

impl AccountState {
    pub fn balance(&self, pool: &Pool) -> Balance {
        if self.excluded_from_reward {
            self.t_owned
        } else {
            pool.token_value(self.r_owned)
        }
    }

    /// Add `amount` tokens at the transfer's frozen `rate`.
    pub fn credit(&mut self, pool: &mut Pool, amount: Balance, rate: Balance) -> Result<()> {
        if self.excluded_from_reward {
            let t_owned = self.t_owned.checked_add(amount).ok_or(Error::Overflow)?;
            pool.pin(amount)?;
            self.t_owned = t_owned;
        } else {
            let reflected = amount.checked_mul(rate).ok_or(Error::Overflow)?;
            let r_owned = self.r_owned.checked_add(reflected).ok_or(Error::Overflow)?;
            pool.deposit_reflected(reflected)?;
            self.r_owned = r_owned;
        }
        Ok(())
    }

    /// Remove `amount` tokens at the transfer's frozen `rate`.
    pub fn debit(&mut self, pool: &mut Pool, amount: Balance, rate: Balance) -> Result<()> {
        if self.excluded_from_reward {
            let t_owned = self
                .t_owned
                .checked_sub(amount)
                .ok_or(Error::InsufficientBalance)?;
            pool.unpin(amount)?;
            self.t_owned = t_owned;
        } else {
            let reflected = amount.checked_mul(rate).ok_or(Error::Overflow)?;
            let r_owned = self
                .r_owned
                .checked_sub(reflected)
                .ok_or(Error::InsufficientBalance)?;
            pool.withdraw_reflected(reflected)?;
            self.r_owned = r_owned;
        }
        Ok(())
    }

    /// Snapshot the true balance and take it out of the shared pool.
    ///
    /// Refuses to drain the pool: the rate needs at least one other included
    /// holder.
    pub fn exclude(&mut self, pool: &mut Pool) -> Result<()> {
        if self.excluded_from_reward {
            return Err(Error::AlreadyExcluded);
        }
        let t_owned = pool.token_value(self.r_owned);
        if self.r_owned > 0 && (self.r_owned >= pool.r_supply() || t_owned >= pool.t_supply()) {
            return Err(Error::RewardPoolExhausted);
        }

        pool.withdraw_reflected(self.r_owned)?;
        pool.pin(t_owned)?;
        self.t_owned = t_owned;
        self.r_owned = 0;
        self.excluded_from_reward = true;
        Ok(())
    }

    /// Convert the snapshot back into reflected units at the current rate.
    pub fn include(&mut self, pool: &mut Pool) -> Result<()> {
        if !self.excluded_from_reward {
            return Err(Error::NotExcluded);
        }
        let reflected = self
            .t_owned
            .checked_mul(pool.rate())
            .ok_or(Error::Overflow)?;

        pool.unpin(self.t_owned)?;
        pool.deposit_reflected(reflected)?;
        self.r_owned = reflected;
        self.t_owned = 0;
        self.excluded_from_reward = false;
        Ok(())
    }
}
