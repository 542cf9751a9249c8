#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub use self::compensation_ledger::{CompensationLedger, CompensationLedgerRef, Error};

/// # Gem — Fee Compensation Ledger
///
/// **Role:** Mint-only rebate asset.  The PocMon token reports the native-coin
/// value of every fee it takes, and this ledger mints Gem to the fee payer in
/// proportion.
///
/// ```text
///   [PocMon token] ──compensate_native(payer, native)──► [Gem ledger]
///                                                       minted = native × rate / 10^9
/// ```
///
/// Only the registered `compensator` can mint.  Any other caller gets
/// `Ok(0)` and nothing is minted; `compensate_native` never fails for an
/// unauthorised caller.
#[ink::contract]
mod compensation_ledger {
    use ink::prelude::string::String;
    use ink::storage::Mapping;

    // =========================================================================
    // CONSTANTS
    // =========================================================================

    pub const TOKEN_NAME: &str = "Gem";
    pub const TOKEN_SYMBOL: &str = "GEM";
    pub const DECIMALS: u8 = 9;

    /// `compensation_rate` is fixed-point with this many units per 1.0.
    pub const RATE_PRECISION: Balance = 1_000_000_000;

    // =========================================================================
    // STORAGE
    // =========================================================================

    #[ink(storage)]
    pub struct CompensationLedger {
        owner: AccountId,
        /// The only account allowed to mint.  Unset until the owner wires it.
        compensator: Option<AccountId>,
        /// Gem minted per native unit, scaled by `RATE_PRECISION`.
        compensation_rate: Balance,
        total_supply: Balance,
        balances: Mapping<AccountId, Balance>,
        allowances: Mapping<(AccountId, AccountId), Balance>,
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    #[ink(event)]
    pub struct Transfer {
        #[ink(topic)]
        from: Option<AccountId>,
        #[ink(topic)]
        to: Option<AccountId>,
        value: Balance,
    }

    #[ink(event)]
    pub struct Approval {
        #[ink(topic)]
        owner: AccountId,
        #[ink(topic)]
        spender: AccountId,
        value: Balance,
    }

    /// Emitted for every successful mint by the compensator.
    #[ink(event)]
    pub struct Compensated {
        #[ink(topic)]
        beneficiary: AccountId,
        native_amount: Balance,
        minted: Balance,
    }

    #[ink(event)]
    pub struct CompensationRateUpdated {
        previous_rate: Balance,
        new_rate: Balance,
    }

    #[ink(event)]
    pub struct CompensatorUpdated {
        #[ink(topic)]
        compensator: AccountId,
    }

    #[ink(event)]
    pub struct OwnershipTransferred {
        #[ink(topic)]
        previous_owner: AccountId,
        #[ink(topic)]
        new_owner: AccountId,
    }

    // =========================================================================
    // ERRORS
    // =========================================================================

    #[derive(Debug, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub enum Error {
        /// Caller is not the contract owner.
        NotOwner,
        /// Sender's Gem balance is insufficient.
        InsufficientBalance,
        /// Spender's allowance is insufficient.
        InsufficientAllowance,
        /// An arithmetic operation overflowed.
        Overflow,
    }

    // =========================================================================
    // IMPLEMENTATION
    // =========================================================================

    impl CompensationLedger {
        /// Deploy an empty ledger.  Nothing can be minted until the owner
        /// calls `set_compensator`.
        #[ink(constructor)]
        pub fn new(compensation_rate: Balance) -> Self {
            Self {
                owner: Self::env().caller(),
                compensator: None,
                compensation_rate,
                total_supply: 0,
                balances: Mapping::default(),
                allowances: Mapping::default(),
            }
        }

        // =====================================================================
        // COMPENSATION
        // =====================================================================

        /// Mint Gem to `beneficiary` for `native_amount` of fees paid.
        ///
        /// Returns the amount minted.  Calls from anyone but the compensator
        /// mint nothing and still return `Ok(0)`.
        #[ink(message)]
        pub fn compensate_native(
            &mut self,
            beneficiary: AccountId,
            native_amount: Balance,
        ) -> Result<Balance, Error> {
            if self.compensator != Some(self.env().caller()) {
                return Ok(0);
            }

            let minted = native_amount
                .checked_mul(self.compensation_rate)
                .ok_or(Error::Overflow)?
                / RATE_PRECISION;
            if minted == 0 {
                return Ok(0);
            }

            self.total_supply = self
                .total_supply
                .checked_add(minted)
                .ok_or(Error::Overflow)?;
            let balance = self.balance_of(beneficiary);
            self.balances.insert(
                beneficiary,
                &balance.checked_add(minted).ok_or(Error::Overflow)?,
            );

            self.env().emit_event(Transfer {
                from: None,
                to: Some(beneficiary),
                value: minted,
            });
            self.env().emit_event(Compensated {
                beneficiary,
                native_amount,
                minted,
            });

            Ok(minted)
        }

        // =====================================================================
        // TOKEN SURFACE
        // =====================================================================

        #[ink(message)]
        pub fn name(&self) -> String {
            String::from(TOKEN_NAME)
        }

        #[ink(message)]
        pub fn symbol(&self) -> String {
            String::from(TOKEN_SYMBOL)
        }

        #[ink(message)]
        pub fn decimals(&self) -> u8 {
            DECIMALS
        }

        #[ink(message)]
        pub fn total_supply(&self) -> Balance {
            self.total_supply
        }

        #[ink(message)]
        pub fn balance_of(&self, owner: AccountId) -> Balance {
            self.balances.get(owner).unwrap_or(0)
        }

        #[ink(message)]
        pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Balance {
            self.allowances.get((owner, spender)).unwrap_or(0)
        }

        #[ink(message)]
        pub fn approve(&mut self, spender: AccountId, value: Balance) -> Result<(), Error> {
            let owner = self.env().caller();
            self.allowances.insert((owner, spender), &value);
            self.env().emit_event(Approval { owner, spender, value });
            Ok(())
        }

        #[ink(message)]
        pub fn transfer(&mut self, to: AccountId, value: Balance) -> Result<(), Error> {
            let from = self.env().caller();
            self.process_transfer(from, to, value)
        }

        #[ink(message)]
        pub fn transfer_from(
            &mut self,
            from: AccountId,
            to: AccountId,
            value: Balance,
        ) -> Result<(), Error> {
            let caller = self.env().caller();
            let allowance = self.allowance(from, caller);
            if allowance < value {
                return Err(Error::InsufficientAllowance);
            }

            self.process_transfer(from, to, value)?;
            self.allowances.insert((from, caller), &(allowance - value));
            Ok(())
        }

        fn process_transfer(
            &mut self,
            from: AccountId,
            to: AccountId,
            value: Balance,
        ) -> Result<(), Error> {
            let from_balance = self.balance_of(from);
            if from_balance < value {
                return Err(Error::InsufficientBalance);
            }

            self.balances.insert(from, &(from_balance - value));
            let to_balance = self.balance_of(to);
            self.balances.insert(
                to,
                &to_balance.checked_add(value).ok_or(Error::Overflow)?,
            );

            self.env().emit_event(Transfer {
                from: Some(from),
                to: Some(to),
                value,
            });
            Ok(())
        }

        // =====================================================================
        // ADMIN
        // =====================================================================

        #[ink(message)]
        pub fn set_compensation_rate(&mut self, rate: Balance) -> Result<(), Error> {
            self.only_owner()?;
            let previous_rate = self.compensation_rate;
            self.compensation_rate = rate;
            self.env().emit_event(CompensationRateUpdated {
                previous_rate,
                new_rate: rate,
            });
            Ok(())
        }

        /// Register the minting account.  Normally called once right after
        /// deployment with the token's address; the owner may rewire it.
        #[ink(message)]
        pub fn set_compensator(&mut self, compensator: AccountId) -> Result<(), Error> {
            self.only_owner()?;
            self.compensator = Some(compensator);
            self.env().emit_event(CompensatorUpdated { compensator });
            Ok(())
        }

        #[ink(message)]
        pub fn transfer_ownership(&mut self, new_owner: AccountId) -> Result<(), Error> {
            self.only_owner()?;
            let previous_owner = self.owner;
            self.owner = new_owner;
            self.env().emit_event(OwnershipTransferred {
                previous_owner,
                new_owner,
            });
            Ok(())
        }

        // =====================================================================
        // VIEW FUNCTIONS
        // =====================================================================

        #[ink(message)]
        pub fn compensation_rate(&self) -> Balance {
            self.compensation_rate
        }

        #[ink(message)]
        pub fn compensator(&self) -> Option<AccountId> {
            self.compensator
        }

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            self.owner
        }

        fn only_owner(&self) -> Result<(), Error> {
            if self.env().caller() != self.owner {
                return Err(Error::NotOwner);
            }
            Ok(())
        }
    }

    // =========================================================================
    // UNIT TESTS
    // =========================================================================

    #[cfg(test)]
    mod tests {
        use super::*;
        use ink::env::{test, DefaultEnvironment};

        type Env = DefaultEnvironment;

        const ONE_GEM: Balance = 1_000_000_000;

        fn accounts() -> test::DefaultAccounts<Env> {
            test::default_accounts::<Env>()
        }

        fn set_caller(addr: AccountId) {
            test::set_caller::<Env>(addr);
        }

        /// Alice owns the ledger; charlie plays the token contract.
        fn deploy() -> CompensationLedger {
            let accs = accounts();
            set_caller(accs.alice);
            let mut gem = CompensationLedger::new(RATE_PRECISION);
            gem.set_compensator(accs.charlie).unwrap();
            gem
        }

        #[ink::test]
        fn metadata_is_correct() {
            let gem = deploy();
            assert_eq!(gem.name(), "Gem");
            assert_eq!(gem.symbol(), "GEM");
            assert_eq!(gem.decimals(), 9);
            assert_eq!(gem.total_supply(), 0);
        }

        // ── Access control ────────────────────────────────────────────────────

        #[ink::test]
        fn only_owner_sets_compensation_rate() {
            let mut gem = deploy();
            let accs = accounts();

            set_caller(accs.bob);
            assert_eq!(gem.set_compensation_rate(10), Err(Error::NotOwner));

            set_caller(accs.alice);
            gem.set_compensation_rate(10).unwrap();
            assert_eq!(gem.compensation_rate(), 10);
        }

        #[ink::test]
        fn only_owner_sets_compensator() {
            let mut gem = deploy();
            let accs = accounts();

            set_caller(accs.bob);
            assert_eq!(gem.set_compensator(accs.bob), Err(Error::NotOwner));
            assert_eq!(gem.compensator(), Some(accs.charlie));
        }

        #[ink::test]
        fn compensator_can_be_rewired() {
            let mut gem = deploy();
            let accs = accounts();

            gem.set_compensator(accs.django).unwrap();
            assert_eq!(gem.compensator(), Some(accs.django));

            set_caller(accs.charlie);
            assert_eq!(gem.compensate_native(accs.bob, ONE_GEM), Ok(0));

            set_caller(accs.django);
            assert_eq!(gem.compensate_native(accs.bob, ONE_GEM), Ok(ONE_GEM));
        }

        // ── Minting ───────────────────────────────────────────────────────────

        #[ink::test]
        fn non_compensator_mints_nothing() {
            let mut gem = deploy();
            let accs = accounts();

            set_caller(accs.bob);
            assert_eq!(gem.compensate_native(accs.bob, ONE_GEM), Ok(0));
            assert_eq!(gem.balance_of(accs.bob), 0);
            assert_eq!(gem.total_supply(), 0);
        }

        #[ink::test]
        fn unset_compensator_mints_nothing() {
            let accs = accounts();
            set_caller(accs.alice);
            let mut gem = CompensationLedger::new(RATE_PRECISION);

            assert_eq!(gem.compensate_native(accs.bob, ONE_GEM), Ok(0));
            assert_eq!(gem.total_supply(), 0);
        }

        #[ink::test]
        fn compensation_scales_with_rate() {
            let mut gem = deploy();
            let accs = accounts();

            // 100 native units at a rate of 1.0 mint 100 Gem.
            set_caller(accs.charlie);
            let minted = gem.compensate_native(accs.bob, 100 * ONE_GEM).unwrap();
            assert_eq!(minted, 100 * ONE_GEM);
            assert_eq!(gem.balance_of(accs.bob), 100 * ONE_GEM);

            // Rate 2.5 mints 2.5 Gem per native unit.
            set_caller(accs.alice);
            gem.set_compensation_rate(2 * RATE_PRECISION + RATE_PRECISION / 2).unwrap();
            set_caller(accs.charlie);
            gem.compensate_native(accs.django, 4 * ONE_GEM).unwrap();
            assert_eq!(gem.balance_of(accs.django), 10 * ONE_GEM);
            assert_eq!(gem.total_supply(), 110 * ONE_GEM);
        }

        #[ink::test]
        fn compensation_overflow_is_reported() {
            let mut gem = deploy();
            let accs = accounts();

            set_caller(accs.alice);
            gem.set_compensation_rate(Balance::MAX).unwrap();
            set_caller(accs.charlie);
            assert_eq!(gem.compensate_native(accs.bob, 2), Err(Error::Overflow));
            assert_eq!(gem.balance_of(accs.bob), 0);
        }

        // ── Token surface ─────────────────────────────────────────────────────

        #[ink::test]
        fn minted_gem_is_transferable() {
            let mut gem = deploy();
            let accs = accounts();

            set_caller(accs.charlie);
            gem.compensate_native(accs.bob, 10 * ONE_GEM).unwrap();

            set_caller(accs.bob);
            gem.transfer(accs.eve, 4 * ONE_GEM).unwrap();
            assert_eq!(gem.balance_of(accs.bob), 6 * ONE_GEM);
            assert_eq!(gem.balance_of(accs.eve), 4 * ONE_GEM);

            assert_eq!(
                gem.transfer(accs.eve, 7 * ONE_GEM),
                Err(Error::InsufficientBalance)
            );
        }

        #[ink::test]
        fn transfer_from_spends_allowance() {
            let mut gem = deploy();
            let accs = accounts();

            set_caller(accs.charlie);
            gem.compensate_native(accs.bob, 10 * ONE_GEM).unwrap();

            set_caller(accs.bob);
            gem.approve(accs.eve, 3 * ONE_GEM).unwrap();

            set_caller(accs.eve);
            assert_eq!(
                gem.transfer_from(accs.bob, accs.eve, 4 * ONE_GEM),
                Err(Error::InsufficientAllowance)
            );
            gem.transfer_from(accs.bob, accs.eve, 3 * ONE_GEM).unwrap();
            assert_eq!(gem.allowance(accs.bob, accs.eve), 0);
            assert_eq!(gem.balance_of(accs.eve), 3 * ONE_GEM);
        }
    }
}
