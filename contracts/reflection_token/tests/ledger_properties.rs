//! Property-based tests for the dual-space ledger.
//!
//! These drive `Pool` and `AccountState` through random sequences of taxed
//! and fee-free transfers, exclusions and inclusions, and check the
//! accounting laws after every step.

use proptest::prelude::*;
use reflection_token::constants::{MAX_FEE_PERCENT, TOTAL_SUPPLY};
use reflection_token::errors::Error;
use reflection_token::fees::{FeeBreakdown, FeeSchedule};
use reflection_token::reflection::Pool;
use reflection_token::registry::AccountState;
use reflection_token::Balance;

const ACCOUNTS: usize = 5;

#[derive(Debug, Clone)]
enum Op {
    Transfer {
        from: usize,
        to: usize,
        per_mille: u128,
        taxed: bool,
    },
    Exclude(usize),
    Include(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..ACCOUNTS, 0..ACCOUNTS, 1u128..=1_000, any::<bool>()).prop_map(
            |(from, to, per_mille, taxed)| Op::Transfer { from, to, per_mille, taxed }
        ),
        1 => (0..ACCOUNTS).prop_map(Op::Exclude),
        1 => (0..ACCOUNTS).prop_map(Op::Include),
    ]
}

/// A contract-free ledger: holders plus the always-included fee reserve.
struct Ledger {
    pool: Pool,
    holders: Vec<AccountState>,
    reserve: AccountState,
    fees: FeeSchedule,
}

impl Ledger {
    fn genesis(fees: FeeSchedule) -> Self {
        let pool = Pool::new(TOTAL_SUPPLY);
        let mut holders = vec![AccountState::default(); ACCOUNTS];
        holders[0].r_owned = pool.r_total();
        Self {
            pool,
            holders,
            reserve: AccountState::default(),
            fees,
        }
    }

    fn balance(&self, who: usize) -> Balance {
        self.holders[who].balance(&self.pool)
    }

    fn transfer(&mut self, from: usize, to: usize, amount: Balance, taxed: bool) -> Result<FeeBreakdown, Error> {
        let split = if taxed {
            self.fees.breakdown(amount)?
        } else {
            FeeBreakdown::fee_free(amount)
        };
        let rate = self.pool.rate();
        self.holders[from].debit(&mut self.pool, split.amount, rate)?;
        self.holders[to].credit(&mut self.pool, split.net, rate)?;
        self.reserve.credit(&mut self.pool, split.reserve, rate)?;
        self.pool.record_fee(split.reflection, rate)?;
        Ok(split)
    }

    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Transfer { from, to, per_mille, taxed } => {
                let amount = self.balance(from) * per_mille / 1_000;
                if amount > 0 {
                    self.transfer(from, to, amount, taxed).unwrap();
                }
            }
            // Invalid transitions are rejected without side effects.
            Op::Exclude(who) => {
                let _ = self.holders[who].exclude(&mut self.pool);
            }
            Op::Include(who) => {
                let _ = self.holders[who].include(&mut self.pool);
            }
        }
    }

    fn all_accounts(&self) -> impl Iterator<Item = &AccountState> {
        self.holders.iter().chain(core::iter::once(&self.reserve))
    }

    fn total_balance(&self) -> Balance {
        self.all_accounts().map(|a| a.balance(&self.pool)).sum()
    }
}

fn fee_schedule() -> impl Strategy<Value = FeeSchedule> {
    (0..=MAX_FEE_PERCENT, 0..=MAX_FEE_PERCENT, 0..=MAX_FEE_PERCENT)
        .prop_map(|(r, l, d)| FeeSchedule::new(r, l, d).unwrap())
}

proptest! {
    /// Property: the reflected pool is exactly the sum of included holdings,
    /// and the true pool is the supply minus excluded holdings.
    #[test]
    fn prop_pools_match_holdings(
        fees in fee_schedule(),
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let mut ledger = Ledger::genesis(fees);
        for op in &ops {
            ledger.apply(op);

            let included: Balance = ledger
                .all_accounts()
                .filter(|a| !a.excluded_from_reward)
                .map(|a| a.r_owned)
                .sum();
            let excluded: Balance = ledger
                .all_accounts()
                .filter(|a| a.excluded_from_reward)
                .map(|a| a.t_owned)
                .sum();

            prop_assert_eq!(ledger.pool.r_supply(), included);
            prop_assert_eq!(ledger.pool.t_supply(), TOTAL_SUPPLY - excluded);
        }
    }

    /// Property: balances sum to the supply up to floor-division dust of a
    /// few units per account and operation.
    #[test]
    fn prop_supply_is_conserved(
        fees in fee_schedule(),
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let mut ledger = Ledger::genesis(fees);
        for (step, op) in ops.iter().enumerate() {
            ledger.apply(op);
            let total = ledger.total_balance();
            let dust_bound = 2 * (ACCOUNTS as Balance + 1 + step as Balance + 1);

            prop_assert!(
                total.abs_diff(TOTAL_SUPPLY) <= dust_bound,
                "balances sum to {} after {} steps",
                total,
                step + 1
            );
        }
    }

    /// Property: token -> reflected -> token is the identity for every
    /// amount up to the supply, whoever is excluded.
    #[test]
    fn prop_reflection_round_trip(
        amount in 1..=TOTAL_SUPPLY,
        fees in fee_schedule(),
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let mut ledger = Ledger::genesis(fees);
        for op in &ops {
            ledger.apply(op);

            let reflected = ledger.pool.to_reflected(amount).unwrap();
            prop_assert!(reflected <= ledger.pool.r_current());
            prop_assert_eq!(ledger.pool.to_token(reflected), Ok(amount));
            prop_assert_eq!(ledger.pool.to_token(TOTAL_SUPPLY * ledger.pool.rate()), Ok(TOTAL_SUPPLY));
        }
    }

    /// Property: the current reflected total only falls, and only by burned
    /// reflection fees.
    #[test]
    fn prop_reflected_total_tracks_burned_fees(
        fees in fee_schedule(),
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let mut ledger = Ledger::genesis(fees);
        for op in &ops {
            let before = ledger.pool.r_current();
            let fees_before = ledger.pool.t_fee_total();
            ledger.apply(op);

            prop_assert!(ledger.pool.r_current() <= before);
            if ledger.pool.t_fee_total() == fees_before {
                prop_assert_eq!(ledger.pool.r_current(), before);
            }
        }
    }

    /// Property: a fee-free transfer credits the recipient with exactly the
    /// amount sent, whichever spaces the two parties live in.
    #[test]
    fn prop_fee_free_transfer_is_exact(
        amount in 1..=100_000_000_000_000_000u128,
        exclude_sender in any::<bool>(),
        exclude_recipient in any::<bool>(),
    ) {
        let mut ledger = Ledger::genesis(FeeSchedule::default());
        ledger.transfer(0, 1, 100_000_000_000_000_000, false).unwrap();
        if exclude_sender {
            ledger.holders[1].exclude(&mut ledger.pool).unwrap();
        }
        if exclude_recipient {
            ledger.holders[2].exclude(&mut ledger.pool).unwrap();
        }

        let before = ledger.balance(2);
        ledger.transfer(1, 2, amount, false).unwrap();
        prop_assert_eq!(ledger.balance(2) - before, amount);
    }

    /// Property: the three parts of a fee split always add back up to the
    /// transferred amount.
    #[test]
    fn prop_fee_split_is_complete(fees in fee_schedule(), amount in 0..=TOTAL_SUPPLY) {
        let split = fees.breakdown(amount).unwrap();
        prop_assert_eq!(split.reflection + split.reserve + split.net, amount);
        prop_assert!(split.total_fee() <= amount * 3 * MAX_FEE_PERCENT / 100);
    }
}
