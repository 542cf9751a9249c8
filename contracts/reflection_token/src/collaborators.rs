//! Outbound calls: the AMM router and the compensation ledger.
//!
//! The token only talks to the outside through [`Collaborators`], so the swap
//! orchestration can run off-chain against a stub.  Every call reports failure
//! as a value; nothing here may trap the caller.

use compensation_ledger::CompensationLedgerRef;
use ink::env::call::{build_call, ExecutionInput, FromAccountId, Selector};
use ink::codegen::TraitCallBuilder;
use ink::env::{CallFlags, DefaultEnvironment};
use ink::prelude::vec::Vec;
use ink::primitives::AccountId;

use crate::Balance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum CallError {
    /// The call could not be dispatched or the callee trapped.
    Environment,
    /// The callee rejected the message selector or its input.
    Dispatch,
    /// The callee ran and returned an error.
    Rejected,
    /// The callee answered with something unusable.
    BadResponse,
}

/// Router-side error code.  The token never inspects it.
#[derive(Debug, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct RouterError(pub u8);

pub trait Collaborators {
    /// Sell `amount_in` tokens already sitting in the pair for native coin
    /// paid to `to`.
    fn swap_tokens_for_native(
        &mut self,
        amount_in: Balance,
        amount_out_min: Balance,
        path: Vec<AccountId>,
        to: AccountId,
    ) -> Result<(), CallError>;

    /// Pair `token_amount` tokens already in the pair with `native_amount`
    /// coin sent along with the call.
    fn add_liquidity_native(
        &mut self,
        token: AccountId,
        token_amount: Balance,
        native_amount: Balance,
        token_min: Balance,
        native_min: Balance,
        to: AccountId,
    ) -> Result<(), CallError>;

    /// Native coin the router would pay for `token_amount` along `path`.
    fn quote_native(&self, token_amount: Balance, path: Vec<AccountId>) -> Result<Balance, CallError>;

    /// Ask `ledger` to mint compensation for `native_amount` of fees.
    fn compensate(
        &mut self,
        ledger: AccountId,
        beneficiary: AccountId,
        native_amount: Balance,
    ) -> Result<Balance, CallError>;
}

/// On-chain collaborators reached through cross-contract calls.
pub struct CrossContract {
    pub router: AccountId,
    /// Absolute timestamp after which the router must refuse the trade.
    pub deadline: u64,
}

impl CrossContract {
    fn flatten<T, E>(
        result: Result<ink::MessageResult<Result<T, E>>, ink::env::Error>,
    ) -> Result<T, CallError> {
        match result {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(_))) => Err(CallError::Rejected),
            Ok(Err(_)) => Err(CallError::Dispatch),
            Err(_) => Err(CallError::Environment),
        }
    }
}

impl Collaborators for CrossContract {
    fn swap_tokens_for_native(
        &mut self,
        amount_in: Balance,
        amount_out_min: Balance,
        path: Vec<AccountId>,
        to: AccountId,
    ) -> Result<(), CallError> {
        let result = build_call::<DefaultEnvironment>()
            .call(self.router)
            .call_flags(CallFlags::ALLOW_REENTRY)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!(
                    "swap_exact_tokens_for_native"
                )))
                .push_arg(amount_in)
                .push_arg(amount_out_min)
                .push_arg(path)
                .push_arg(to)
                .push_arg(self.deadline),
            )
            .returns::<Result<Vec<Balance>, RouterError>>()
            .try_invoke();

        Self::flatten(result).map(|_| ())
    }

    fn add_liquidity_native(
        &mut self,
        token: AccountId,
        token_amount: Balance,
        native_amount: Balance,
        token_min: Balance,
        native_min: Balance,
        to: AccountId,
    ) -> Result<(), CallError> {
        let result = build_call::<DefaultEnvironment>()
            .call(self.router)
            .call_flags(CallFlags::ALLOW_REENTRY)
            .transferred_value(native_amount)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!("add_liquidity_native")))
                    .push_arg(token)
                    .push_arg(token_amount)
                    .push_arg(token_min)
                    .push_arg(native_min)
                    .push_arg(to)
                    .push_arg(self.deadline),
            )
            .returns::<Result<(Balance, Balance, Balance), RouterError>>()
            .try_invoke();

        Self::flatten(result).map(|_| ())
    }

    fn quote_native(&self, token_amount: Balance, path: Vec<AccountId>) -> Result<Balance, CallError> {
        let result = build_call::<DefaultEnvironment>()
            .call(self.router)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!("get_amounts_out")))
                    .push_arg(token_amount)
                    .push_arg(path),
            )
            .returns::<Result<Vec<Balance>, RouterError>>()
            .try_invoke();

        let amounts = Self::flatten(result)?;
        amounts.last().copied().ok_or(CallError::BadResponse)
    }

    fn compensate(
        &mut self,
        ledger: AccountId,
        beneficiary: AccountId,
        native_amount: Balance,
    ) -> Result<Balance, CallError> {
        let mut ledger =
            <CompensationLedgerRef as FromAccountId<DefaultEnvironment>>::from_account_id(ledger);
        let result = ledger
            .call_mut()
            .compensate_native(beneficiary, native_amount)
            .try_invoke();

        Self::flatten(result)
    }
}
