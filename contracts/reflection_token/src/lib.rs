#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub type Balance = u128;

pub mod collaborators;
pub mod constants;
pub mod errors;
pub mod fees;
pub mod liquidity;
pub mod reflection;
pub mod registry;

pub use self::reflection_token::{ReflectionToken, ReflectionTokenRef};

/// # PocMon — Reflection Token
///
/// **Role:** Fee-on-transfer token.  Every taxed transfer is split three ways:
///
/// - a reflection fee, shared by every included holder through a single
///   global rate change;
/// - a liquidity fee and a dev fee, credited together to the contract as a
///   reserve.
///
/// **Architecture:**
/// ```text
///   transfer ──► fee-exemption / max-tx checks
///            ──► dual-space ledger move (Pool + AccountState)
///            ──► quote fee in coin ──► [Gem ledger] compensate_native
///            ──► swap trigger ──► [Router] swap + add liquidity ──► dev wallet
/// ```
///
/// The last two steps only run for transfers that paid a fee.  Router and
/// ledger failures never revert a transfer.  They are reported
/// through `SwapAndLiquifyFailed` / `CompensationFailed` and the reserve is
/// kept for the next trigger.
///
/// The pool and the swap latch live in `Lazy` cells so a router calling back
/// into the token mid-swap reads current state.
#[ink::contract]
mod reflection_token {
    use crate::collaborators::{CallError, Collaborators, CrossContract};
    use crate::constants::*;
    use crate::errors::Error;
    use crate::fees::{FeeBreakdown, FeeSchedule};
    use crate::liquidity::{SwapPlan, SwapStage, Trigger};
    use crate::reflection::Pool;
    use crate::registry::{AccountState, ExclusionLink};
    use ink::prelude::{string::String, vec, vec::Vec};
    use ink::storage::{Lazy, Mapping};

    // =========================================================================
    // STORAGE
    // =========================================================================

    #[ink(storage)]
    pub struct ReflectionToken {
        owner: AccountId,

        // ── Ledger ────────────────────────────────────────────────────────
        accounts: Mapping<AccountId, AccountState>,
        allowances: Mapping<(AccountId, AccountId), Balance>,
        /// Accounts excluded from reward, linked in exclusion order.
        excluded_links: Mapping<AccountId, ExclusionLink>,
        excluded_head: Option<AccountId>,
        excluded_tail: Option<AccountId>,
        pool: Lazy<Pool>,

        // ── Parameters ────────────────────────────────────────────────────
        fees: FeeSchedule,
        max_tx_amount: Balance,
        num_tokens_sell_to_add_to_liquidity: Balance,
        swap_and_liquify_enabled: bool,
        /// Set for the duration of a swap-and-liquify cycle.
        in_swap: Lazy<bool>,

        // ── Collaborators ─────────────────────────────────────────────────
        router: AccountId,
        pair: AccountId,
        wrapped_native: AccountId,
        dev_wallet: AccountId,
        compensation_ledger: Option<AccountId>,
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

    #[ink(event)]
    pub struct OwnershipTransferred {
        #[ink(topic)]
        previous_owner: AccountId,
        #[ink(topic)]
        new_owner: AccountId,
    }

    #[ink(event)]
    pub struct FeesUpdated {
        reflection: u128,
        liquidity: u128,
        dev: u128,
    }

    #[ink(event)]
    pub struct MaxTxAmountUpdated {
        max_tx_amount: Balance,
    }

    #[ink(event)]
    pub struct SwapThresholdUpdated {
        threshold: Balance,
    }

    #[ink(event)]
    pub struct SwapAndLiquifyEnabledUpdated {
        enabled: bool,
    }

    #[ink(event)]
    pub struct DevWalletUpdated {
        #[ink(topic)]
        dev_wallet: AccountId,
    }

    #[ink(event)]
    pub struct RouterUpdated {
        #[ink(topic)]
        router: AccountId,
        #[ink(topic)]
        pair: AccountId,
    }

    #[ink(event)]
    pub struct CompensationLedgerUpdated {
        ledger: Option<AccountId>,
    }

    #[ink(event)]
    pub struct ExcludedFromFee {
        #[ink(topic)]
        account: AccountId,
    }

    #[ink(event)]
    pub struct IncludedInFee {
        #[ink(topic)]
        account: AccountId,
    }

    #[ink(event)]
    pub struct ExcludedFromReward {
        #[ink(topic)]
        account: AccountId,
        balance: Balance,
    }

    #[ink(event)]
    pub struct IncludedInReward {
        #[ink(topic)]
        account: AccountId,
        balance: Balance,
    }

    #[ink(event)]
    pub struct SwapAndLiquify {
        tokens_swapped: Balance,
        native_received: Balance,
        tokens_into_liquidity: Balance,
        native_into_liquidity: Balance,
        dev_native: Balance,
    }

    #[ink(event)]
    pub struct SwapAndLiquifyFailed {
        stage: SwapStage,
        amount: Balance,
    }

    #[ink(event)]
    pub struct FeeCompensated {
        #[ink(topic)]
        beneficiary: AccountId,
        native_amount: Balance,
        minted: Balance,
    }

    #[ink(event)]
    pub struct CompensationFailed {
        #[ink(topic)]
        beneficiary: AccountId,
        reason: CallError,
    }

    // =========================================================================
    // IMPLEMENTATION
    // =========================================================================

    impl ReflectionToken {
        /// Mint the whole supply to the deployer.  The deployer and the
        /// contract itself start fee-exempt.
        #[ink(constructor)]
        pub fn new(
            router: AccountId,
            pair: AccountId,
            wrapped_native: AccountId,
            dev_wallet: AccountId,
            compensation_ledger: Option<AccountId>,
        ) -> Self {
            let caller = Self::env().caller();
            let contract = Self::env().account_id();
            let genesis = Pool::new(TOTAL_SUPPLY);

            let mut token = Self {
                owner: caller,
                accounts: Mapping::default(),
                allowances: Mapping::default(),
                excluded_links: Mapping::default(),
                excluded_head: None,
                excluded_tail: None,
                pool: Lazy::new(),
                fees: FeeSchedule::default(),
                max_tx_amount: DEFAULT_MAX_TX_AMOUNT,
                num_tokens_sell_to_add_to_liquidity: DEFAULT_SWAP_THRESHOLD,
                swap_and_liquify_enabled: true,
                in_swap: Lazy::new(),
                router,
                pair,
                wrapped_native,
                dev_wallet,
                compensation_ledger,
            };

            token.accounts.insert(
                caller,
                &AccountState {
                    r_owned: genesis.r_total(),
                    excluded_from_fee: true,
                    ..Default::default()
                },
            );
            let mut own = token.account(contract);
            own.excluded_from_fee = true;
            token.accounts.insert(contract, &own);

            token.pool.set(&genesis);
            token.in_swap.set(&false);

            Self::env().emit_event(Transfer {
                from: None,
                to: Some(caller),
                value: TOTAL_SUPPLY,
            });
            token
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
            self.load_pool().t_total()
        }

        #[ink(message)]
        pub fn balance_of(&self, owner: AccountId) -> Balance {
            self.account(owner).balance(&self.load_pool())
        }

        #[ink(message)]
        pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Balance {
            self.allowances.get((owner, spender)).unwrap_or(0)
        }

        #[ink(message)]
        pub fn approve(&mut self, spender: AccountId, value: Balance) -> Result<(), Error> {
            let owner = self.env().caller();
            self.set_allowance(owner, spender, value);
            Ok(())
        }

        #[ink(message)]
        pub fn increase_allowance(&mut self, spender: AccountId, delta: Balance) -> Result<(), Error> {
            let owner = self.env().caller();
            let value = self
                .allowance(owner, spender)
                .checked_add(delta)
                .ok_or(Error::Overflow)?;
            self.set_allowance(owner, spender, value);
            Ok(())
        }

        #[ink(message)]
        pub fn decrease_allowance(&mut self, spender: AccountId, delta: Balance) -> Result<(), Error> {
            let owner = self.env().caller();
            let value = self
                .allowance(owner, spender)
                .checked_sub(delta)
                .ok_or(Error::InsufficientAllowance)?;
            self.set_allowance(owner, spender, value);
            Ok(())
        }

        #[ink(message)]
        pub fn transfer(&mut self, to: AccountId, value: Balance) -> Result<(), Error> {
            let from = self.env().caller();
            let mut ext = self.cross_contract();
            self.transfer_with(&mut ext, from, to, value)
        }

        #[ink(message)]
        pub fn transfer_from(
            &mut self,
            from: AccountId,
            to: AccountId,
            value: Balance,
        ) -> Result<(), Error> {
            let spender = self.env().caller();
            let allowance = self.allowance(from, spender);
            if allowance < value {
                return Err(Error::InsufficientAllowance);
            }

            let mut ext = self.cross_contract();
            self.transfer_with(&mut ext, from, to, value)?;
            self.set_allowance(from, spender, allowance - value);
            Ok(())
        }

        // =====================================================================
        // REFLECTION QUERIES
        // =====================================================================

        /// Reflected equivalent of `amount`, optionally after fees.
        #[ink(message)]
        pub fn reflection_from_token(
            &self,
            amount: Balance,
            deduct_transfer_fee: bool,
        ) -> Result<Balance, Error> {
            let pool = self.load_pool();
            if amount > pool.t_total() {
                return Err(Error::AmountExceedsSupply);
            }
            if !deduct_transfer_fee {
                return pool.to_reflected(amount);
            }
            pool.to_reflected(self.fees.breakdown(amount)?.net)
        }

        #[ink(message)]
        pub fn token_from_reflection(&self, reflected: Balance) -> Result<Balance, Error> {
            self.load_pool().to_token(reflected)
        }

        #[ink(message)]
        pub fn total_fees(&self) -> Balance {
            self.load_pool().t_fee_total()
        }

        #[ink(message)]
        pub fn is_excluded_from_fee(&self, account: AccountId) -> bool {
            self.account(account).excluded_from_fee
        }

        #[ink(message)]
        pub fn is_excluded_from_reward(&self, account: AccountId) -> bool {
            self.account(account).excluded_from_reward
        }

        #[ink(message)]
        pub fn excluded_accounts(&self) -> Vec<AccountId> {
            let mut accounts = Vec::new();
            let mut cursor = self.excluded_head;
            while let Some(account) = cursor {
                accounts.push(account);
                cursor = self.excluded_links.get(account).and_then(|link| link.next);
            }
            accounts
        }

        // =====================================================================
        // ADMIN — EXCLUSIONS
        // =====================================================================

        #[ink(message)]
        pub fn exclude_from_reward(&mut self, account: AccountId) -> Result<(), Error> {
            self.only_owner()?;
            if account == self.router {
                return Err(Error::RouterNotExcludable);
            }

            let mut pool = self.load_pool();
            let mut state = self.account(account);
            state.exclude(&mut pool)?;

            self.accounts.insert(account, &state);
            self.pool.set(&pool);
            self.push_excluded(account);

            self.env().emit_event(ExcludedFromReward {
                account,
                balance: state.t_owned,
            });
            Ok(())
        }

        #[ink(message)]
        pub fn include_in_reward(&mut self, account: AccountId) -> Result<(), Error> {
            self.only_owner()?;

            let mut pool = self.load_pool();
            let mut state = self.account(account);
            state.include(&mut pool)?;

            self.accounts.insert(account, &state);
            self.pool.set(&pool);
            self.unlink_excluded(account);

            self.env().emit_event(IncludedInReward {
                account,
                balance: state.balance(&pool),
            });
            Ok(())
        }

        #[ink(message)]
        pub fn exclude_from_fee(&mut self, account: AccountId) -> Result<(), Error> {
            self.only_owner()?;
            self.set_fee_exempt(account, true);
            self.env().emit_event(ExcludedFromFee { account });
            Ok(())
        }

        #[ink(message)]
        pub fn include_in_fee(&mut self, account: AccountId) -> Result<(), Error> {
            self.only_owner()?;
            self.set_fee_exempt(account, false);
            self.env().emit_event(IncludedInFee { account });
            Ok(())
        }

        // =====================================================================
        // ADMIN — PARAMETERS
        // =====================================================================

        #[ink(message)]
        pub fn set_reflection_fee_percent(&mut self, percent: u128) -> Result<(), Error> {
            self.only_owner()?;
            self.fees.set_reflection(percent)?;
            self.emit_fees();
            Ok(())
        }

        #[ink(message)]
        pub fn set_liquidity_fee_percent(&mut self, percent: u128) -> Result<(), Error> {
            self.only_owner()?;
            self.fees.set_liquidity(percent)?;
            self.emit_fees();
            Ok(())
        }

        #[ink(message)]
        pub fn set_dev_fee_percent(&mut self, percent: u128) -> Result<(), Error> {
            self.only_owner()?;
            self.fees.set_dev(percent)?;
            self.emit_fees();
            Ok(())
        }

        #[ink(message)]
        pub fn set_max_tx_amount(&mut self, max_tx_amount: Balance) -> Result<(), Error> {
            self.only_owner()?;
            if max_tx_amount < MIN_MAX_TX_AMOUNT {
                return Err(Error::MaxTxBelowFloor);
            }
            self.max_tx_amount = max_tx_amount;
            self.env().emit_event(MaxTxAmountUpdated { max_tx_amount });
            Ok(())
        }

        #[ink(message)]
        pub fn set_num_tokens_sell_to_add_to_liquidity(&mut self, threshold: Balance) -> Result<(), Error> {
            self.only_owner()?;
            self.num_tokens_sell_to_add_to_liquidity = threshold;
            self.env().emit_event(SwapThresholdUpdated { threshold });
            Ok(())
        }

        #[ink(message)]
        pub fn set_swap_and_liquify_enabled(&mut self, enabled: bool) -> Result<(), Error> {
            self.only_owner()?;
            self.swap_and_liquify_enabled = enabled;
            self.env().emit_event(SwapAndLiquifyEnabledUpdated { enabled });
            Ok(())
        }

        #[ink(message)]
        pub fn set_dev_wallet(&mut self, dev_wallet: AccountId) -> Result<(), Error> {
            self.only_owner()?;
            self.dev_wallet = dev_wallet;
            self.env().emit_event(DevWalletUpdated { dev_wallet });
            Ok(())
        }

        /// Point the token at a new router and its pair for this token.
        #[ink(message)]
        pub fn set_router_address(&mut self, router: AccountId, pair: AccountId) -> Result<(), Error> {
            self.only_owner()?;
            if self.account(router).excluded_from_reward {
                return Err(Error::RouterNotExcludable);
            }
            self.router = router;
            self.pair = pair;
            self.env().emit_event(RouterUpdated { router, pair });
            Ok(())
        }

        /// `None` switches fee compensation off.
        #[ink(message)]
        pub fn set_compensation_ledger(&mut self, ledger: Option<AccountId>) -> Result<(), Error> {
            self.only_owner()?;
            self.compensation_ledger = ledger;
            self.env().emit_event(CompensationLedgerUpdated { ledger });
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
        pub fn owner(&self) -> AccountId {
            self.owner
        }

        #[ink(message)]
        pub fn reflection_fee(&self) -> u128 {
            self.fees.reflection
        }

        #[ink(message)]
        pub fn liquidity_fee(&self) -> u128 {
            self.fees.liquidity
        }

        #[ink(message)]
        pub fn dev_fee(&self) -> u128 {
            self.fees.dev
        }

        #[ink(message)]
        pub fn max_tx_amount(&self) -> Balance {
            self.max_tx_amount
        }

        #[ink(message)]
        pub fn num_tokens_sell_to_add_to_liquidity(&self) -> Balance {
            self.num_tokens_sell_to_add_to_liquidity
        }

        #[ink(message)]
        pub fn swap_and_liquify_enabled(&self) -> bool {
            self.swap_and_liquify_enabled
        }

        #[ink(message)]
        pub fn dev_wallet(&self) -> AccountId {
            self.dev_wallet
        }

        #[ink(message)]
        pub fn router(&self) -> AccountId {
            self.router
        }

        #[ink(message)]
        pub fn pair(&self) -> AccountId {
            self.pair
        }

        #[ink(message)]
        pub fn compensation_ledger(&self) -> Option<AccountId> {
            self.compensation_ledger
        }

        // =====================================================================
        // INTERNAL — Transfer pipeline
        // =====================================================================

        /// Full transfer: checks, ledger move, then for fee-bearing transfers
        /// compensation and the swap trigger.
        fn transfer_with<C: Collaborators>(
            &mut self,
            ext: &mut C,
            from: AccountId,
            to: AccountId,
            amount: Balance,
        ) -> Result<(), Error> {
            if amount == 0 {
                return Err(Error::ZeroAmount);
            }

            let in_swap = self.in_swap();
            let fee_exempt =
                self.account(from).excluded_from_fee || self.account(to).excluded_from_fee;
            if !fee_exempt && !in_swap && amount > self.max_tx_amount {
                return Err(Error::ExceedsMaxTxAmount);
            }
            if self.balance_of(from) < amount {
                return Err(Error::InsufficientBalance);
            }

            let take_fee = !fee_exempt && !in_swap;
            let split = self.token_transfer(from, to, amount, take_fee)?;
            if split.total_fee() == 0 {
                return Ok(());
            }
            self.compensate_fee_payer(ext, from, split.total_fee());

            let trigger = Trigger {
                enabled: self.swap_and_liquify_enabled,
                in_swap,
                from_pair: from == self.pair,
                threshold: self.num_tokens_sell_to_add_to_liquidity,
                reserve: self
                    .balance_of(self.env().account_id())
                    .min(self.max_tx_amount),
            };
            if trigger.fires() {
                self.with_swap_lock(|token| token.swap_and_liquify(ext, from));
            }
            Ok(())
        }

        /// Move `amount` between two accounts at one frozen rate.
        fn token_transfer(
            &mut self,
            from: AccountId,
            to: AccountId,
            amount: Balance,
            take_fee: bool,
        ) -> Result<FeeBreakdown, Error> {
            let split = if take_fee {
                self.fees.breakdown(amount)?
            } else {
                FeeBreakdown::fee_free(amount)
            };
            let mut pool = self.load_pool();
            let rate = pool.rate();

            let mut sender = self.account(from);
            sender.debit(&mut pool, split.amount, rate)?;
            self.accounts.insert(from, &sender);

            let mut recipient = self.account(to);
            recipient.credit(&mut pool, split.net, rate)?;
            self.accounts.insert(to, &recipient);

            let contract = self.env().account_id();
            if split.reserve > 0 {
                let mut reserve = self.account(contract);
                reserve.credit(&mut pool, split.reserve, rate)?;
                self.accounts.insert(contract, &reserve);
            }

            pool.record_fee(split.reflection, rate)?;
            self.pool.set(&pool);

            self.env().emit_event(Transfer {
                from: Some(from),
                to: Some(to),
                value: split.net,
            });
            if split.reserve > 0 {
                self.env().emit_event(Transfer {
                    from: Some(from),
                    to: Some(contract),
                    value: split.reserve,
                });
            }
            Ok(split)
        }

        // =====================================================================
        // INTERNAL — Swap and liquify
        // =====================================================================

        /// Run `f` with the swap latch held.  `f` reports failures as values;
        /// a panic reverts the whole call, latch write included.
        fn with_swap_lock<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
            self.in_swap.set(&true);
            let out = f(self);
            self.in_swap.set(&false);
            out
        }

        fn swap_and_liquify<C: Collaborators>(&mut self, ext: &mut C, beneficiary: AccountId) {
            let amount = self.num_tokens_sell_to_add_to_liquidity;
            if let Err(stage) = self.liquify(ext, beneficiary, amount) {
                self.env().emit_event(SwapAndLiquifyFailed { stage, amount });
            }
        }

        fn liquify<C: Collaborators>(
            &mut self,
            ext: &mut C,
            beneficiary: AccountId,
            amount: Balance,
        ) -> Result<(), SwapStage> {
            let plan = SwapPlan::new(amount, &self.fees).map_err(|_| SwapStage::Plan)?;
            let contract = self.env().account_id();
            let pair = self.pair;

            // ── Step 1: sell ──────────────────────────────────────────────────
            self.move_fee_free(contract, pair, plan.tokens_to_swap)
                .map_err(|_| SwapStage::Swap)?;
            let native_before = self.env().balance();
            if ext
                .swap_tokens_for_native(plan.tokens_to_swap, 0, self.sell_path(), contract)
                .is_err()
            {
                self.move_fee_free(pair, contract, plan.tokens_to_swap)
                    .map_err(|_| SwapStage::Swap)?;
                return Err(SwapStage::Swap);
            }
            let received = self.env().balance().saturating_sub(native_before);
            let (liquidity_native, dev_native) =
                plan.split_native(received).map_err(|_| SwapStage::Swap)?;

            // ── Step 2: pair the kept tokens ─────────────────────────────────
            if plan.pair_tokens > 0 && liquidity_native > 0 {
                self.move_fee_free(contract, pair, plan.pair_tokens)
                    .map_err(|_| SwapStage::AddLiquidity)?;
                if ext
                    .add_liquidity_native(contract, plan.pair_tokens, liquidity_native, 0, 0, self.owner)
                    .is_err()
                {
                    self.move_fee_free(pair, contract, plan.pair_tokens)
                        .map_err(|_| SwapStage::AddLiquidity)?;
                    return Err(SwapStage::AddLiquidity);
                }
            }

            // ── Step 3: dev share ─────────────────────────────────────────────
            if dev_native > 0 {
                self.env()
                    .transfer(self.dev_wallet, dev_native)
                    .map_err(|_| SwapStage::DevTransfer)?;
                if let Some(ledger) = self.compensation_ledger.filter(|l| *l == self.dev_wallet) {
                    self.report_compensation(ext, ledger, beneficiary, dev_native);
                }
            }

            self.env().emit_event(SwapAndLiquify {
                tokens_swapped: plan.tokens_to_swap,
                native_received: received,
                tokens_into_liquidity: plan.pair_tokens,
                native_into_liquidity: liquidity_native,
                dev_native,
            });
            Ok(())
        }

        fn move_fee_free(&mut self, from: AccountId, to: AccountId, amount: Balance) -> Result<(), Error> {
            self.token_transfer(from, to, amount, false).map(|_| ())
        }

        fn sell_path(&self) -> Vec<AccountId> {
            vec![self.env().account_id(), self.wrapped_native]
        }

        // =====================================================================
        // INTERNAL — Compensation
        // =====================================================================

        /// Quote the fee in coin and have the ledger mint the payer's rebate.
        fn compensate_fee_payer<C: Collaborators>(
            &mut self,
            ext: &mut C,
            payer: AccountId,
            fee_tokens: Balance,
        ) {
            let Some(ledger) = self.compensation_ledger else {
                return;
            };
            match ext.quote_native(fee_tokens, self.sell_path()) {
                Ok(0) => {}
                Ok(native) => self.report_compensation(ext, ledger, payer, native),
                Err(reason) => self.env().emit_event(CompensationFailed {
                    beneficiary: payer,
                    reason,
                }),
            }
        }

        fn report_compensation<C: Collaborators>(
            &mut self,
            ext: &mut C,
            ledger: AccountId,
            beneficiary: AccountId,
            native_amount: Balance,
        ) {
            match ext.compensate(ledger, beneficiary, native_amount) {
                Ok(minted) => self.env().emit_event(FeeCompensated {
                    beneficiary,
                    native_amount,
                    minted,
                }),
                Err(reason) => self.env().emit_event(CompensationFailed {
                    beneficiary,
                    reason,
                }),
            }
        }

        // =====================================================================
        // INTERNAL — Helpers
        // =====================================================================

        fn cross_contract(&self) -> CrossContract {
            CrossContract {
                router: self.router,
                deadline: self.env().block_timestamp().saturating_add(SWAP_DEADLINE_MS),
            }
        }

        fn account(&self, who: AccountId) -> AccountState {
            self.accounts.get(who).unwrap_or_default()
        }

        fn load_pool(&self) -> Pool {
            self.pool.get().unwrap_or_else(|| Pool::new(TOTAL_SUPPLY))
        }

        fn in_swap(&self) -> bool {
            self.in_swap.get().unwrap_or(false)
        }

        fn push_excluded(&mut self, account: AccountId) {
            match self.excluded_tail {
                Some(tail) => self.update_link(tail, |link| link.next = Some(account)),
                None => self.excluded_head = Some(account),
            }
            self.excluded_links.insert(
                account,
                &ExclusionLink {
                    prev: self.excluded_tail,
                    next: None,
                },
            );
            self.excluded_tail = Some(account);
        }

        fn unlink_excluded(&mut self, account: AccountId) {
            let Some(removed) = self.excluded_links.take(account) else {
                return;
            };
            match removed.prev {
                Some(prev) => self.update_link(prev, |link| link.next = removed.next),
                None => self.excluded_head = removed.next,
            }
            match removed.next {
                Some(next) => self.update_link(next, |link| link.prev = removed.prev),
                None => self.excluded_tail = removed.prev,
            }
        }

        fn update_link(&mut self, account: AccountId, f: impl FnOnce(&mut ExclusionLink)) {
            let mut link = self.excluded_links.get(account).unwrap_or_default();
            f(&mut link);
            self.excluded_links.insert(account, &link);
        }

        fn set_allowance(&mut self, owner: AccountId, spender: AccountId, value: Balance) {
            self.allowances.insert((owner, spender), &value);
            self.env().emit_event(Approval {
                owner,
                spender,
                value,
            });
        }

        fn set_fee_exempt(&mut self, account: AccountId, exempt: bool) {
            let mut state = self.account(account);
            state.excluded_from_fee = exempt;
            self.accounts.insert(account, &state);
        }

        fn emit_fees(&self) {
            self.env().emit_event(FeesUpdated {
                reflection: self.fees.reflection,
                liquidity: self.fees.liquidity,
                dev: self.fees.dev,
            });
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

}
