#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Error {
    /// Caller is not the contract owner.
    NotOwner,
    /// Transfer above `max_tx_amount` between fee-paying accounts.
    ExceedsMaxTxAmount,
    /// A fee percent above `MAX_FEE_PERCENT`.
    FeeAboveCeiling,
    /// A transfer cap below `MIN_MAX_TX_AMOUNT`.
    MaxTxBelowFloor,
    InsufficientBalance,
    InsufficientAllowance,
    ZeroAmount,
    /// Token amount larger than the total supply.
    AmountExceedsSupply,
    /// Reflected amount larger than the current reflected total.
    AmountExceedsReflections,
    AlreadyExcluded,
    NotExcluded,
    /// Exclusion would empty the pool that carries the conversion rate.
    RewardPoolExhausted,
    /// The AMM router must keep receiving reflections.
    RouterNotExcludable,
    Overflow,
}

pub type Result<T> = core::result::Result<T, Error>;
