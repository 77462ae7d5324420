//! Deposit and withdraw orchestration.
//!
//! All admissibility checks run locally before anything is submitted, so a
//! doomed operation never costs gas: deposits check the wallet balance and then
//! the ERC-20 allowance; withdrawals check the computed available-funds figure,
//! which accounts for accrued lockup rather than the raw balance. The checks
//! are best-effort snapshots — the chain can still revert a submitted write
//! that raced another transaction.

use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types_eth::TransactionReceipt;

use crate::chain;
use crate::contracts::IPayments;
use crate::error::PaymentsError;
use crate::events::find_event;
use crate::pay::approval::{ApprovalOptions, build_approval_request};
use crate::pay::permit::{PermitParams, SignerLike, sign_permit};
use crate::pay::{PaymentsClient, lockup};
use crate::timestamp::UnixTimestamp;
use crate::types::{Account, Epoch};

/// Default permit lifetime: one hour from submission.
const DEFAULT_PERMIT_TTL_SECS: u64 = 60 * 60;

/// Option bag for the compound permit deposit-and-approve flow.
#[derive(Debug, Clone, Default)]
pub struct DepositAndApproveOptions {
    /// Operator to approve; defaults to the configured storage-service
    /// operator.
    pub operator: Option<Address>,
    pub rate_allowance: Option<U256>,
    pub lockup_allowance: Option<U256>,
    pub max_lockup_period: Option<U256>,
    /// Permit deadline; defaults to one hour from now.
    pub deadline: Option<UnixTimestamp>,
}

pub(crate) fn require_positive_amount(amount: U256) -> Result<(), PaymentsError> {
    if amount.is_zero() {
        return Err(PaymentsError::validation("amount must be strictly positive"));
    }
    Ok(())
}

/// Balance is checked before allowance: a payer with no funds should hear
/// about the missing funds, not about a missing approval they may never need.
pub(crate) fn check_deposit_funding(
    balance: U256,
    allowance: U256,
    amount: U256,
) -> Result<(), PaymentsError> {
    if balance < amount {
        return Err(PaymentsError::InsufficientBalance {
            required: amount,
            available: balance,
        });
    }
    if allowance < amount {
        return Err(PaymentsError::InsufficientAllowance {
            required: amount,
            approved: allowance,
        });
    }
    Ok(())
}

pub(crate) fn check_withdrawable(
    account: &Account,
    current_epoch: Epoch,
    amount: U256,
) -> Result<(), PaymentsError> {
    let available = lockup::available_funds(account, current_epoch);
    if amount > available {
        return Err(PaymentsError::InsufficientAvailableFunds {
            requested: amount,
            available,
        });
    }
    Ok(())
}

impl<S> PaymentsClient<S> {
    async fn prepare_deposit(
        &self,
        amount: U256,
        to: Option<Address>,
        token: Option<Address>,
    ) -> Result<(Address, Address), PaymentsError> {
        require_positive_amount(amount)?;
        let token = self.token_or_default(token);
        let to = to.unwrap_or(self.from);
        let erc20 = self.erc20(token);
        let balance = erc20.balanceOf(self.from).call().await?;
        let allowance = erc20.allowance(self.from, self.config.payments).call().await?;
        check_deposit_funding(balance, allowance, amount)?;
        Ok((token, to))
    }

    /// Deposits `amount` of `token` into the payments contract for `to` (both
    /// defaulting to the configured token and the caller). Returns the
    /// transaction hash.
    pub async fn deposit(
        &self,
        amount: U256,
        to: Option<Address>,
        token: Option<Address>,
    ) -> Result<B256, PaymentsError> {
        let (token, to) = self.prepare_deposit(amount, to, token).await?;
        tracing::info!(%token, %to, %amount, "Submitting deposit");
        let pending = self.payments().deposit(token, to, amount).send().await?;
        Ok(*pending.tx_hash())
    }

    /// As [`deposit`](Self::deposit), then waits for confirmation and extracts
    /// the `DepositRecorded` event.
    pub async fn deposit_sync(
        &self,
        amount: U256,
        to: Option<Address>,
        token: Option<Address>,
    ) -> Result<(TransactionReceipt, IPayments::DepositRecorded), PaymentsError> {
        let (token, to) = self.prepare_deposit(amount, to, token).await?;
        tracing::info!(%token, %to, %amount, "Submitting deposit (sync)");
        let pending = self.payments().deposit(token, to, amount).send().await?;
        let receipt = chain::confirm(pending, &self.config).await?;
        let event = find_event::<IPayments::DepositRecorded>(&receipt)
            .ok_or(PaymentsError::EventNotFound("DepositRecorded"))?;
        Ok((receipt, event))
    }

    /// Withdraws `amount` of `token` from the caller's account.
    ///
    /// The bound is the *computed* available-funds figure, not the raw
    /// deposited balance: withdrawing must never dip into funds already
    /// committed to active rails via lockup.
    pub async fn withdraw(
        &self,
        amount: U256,
        token: Option<Address>,
    ) -> Result<B256, PaymentsError> {
        let token = self.prepare_withdraw(amount, token).await?;
        tracing::info!(%token, %amount, "Submitting withdrawal");
        let pending = self.payments().withdraw(token, amount).send().await?;
        Ok(*pending.tx_hash())
    }

    /// As [`withdraw`](Self::withdraw), then waits for confirmation and
    /// extracts the `WithdrawRecorded` event.
    pub async fn withdraw_sync(
        &self,
        amount: U256,
        token: Option<Address>,
    ) -> Result<(TransactionReceipt, IPayments::WithdrawRecorded), PaymentsError> {
        let token = self.prepare_withdraw(amount, token).await?;
        tracing::info!(%token, %amount, "Submitting withdrawal (sync)");
        let pending = self.payments().withdraw(token, amount).send().await?;
        let receipt = chain::confirm(pending, &self.config).await?;
        let event = find_event::<IPayments::WithdrawRecorded>(&receipt)
            .ok_or(PaymentsError::EventNotFound("WithdrawRecorded"))?;
        Ok((receipt, event))
    }

    async fn prepare_withdraw(
        &self,
        amount: U256,
        token: Option<Address>,
    ) -> Result<Address, PaymentsError> {
        require_positive_amount(amount)?;
        let token = self.token_or_default(token);
        let account = self.account(None, Some(token)).await?;
        let epoch = self.current_epoch().await?;
        check_withdrawable(&account, epoch, amount)?;
        Ok(token)
    }
}

impl<S: SignerLike + Sync> PaymentsClient<S> {
    /// Deposits with an off-chain EIP-2612 permit and grants operator approval
    /// in one atomic transaction, avoiding a separate on-chain `approve` call.
    ///
    /// Validation (positive amount, complete bounds for a custom operator)
    /// runs before anything is signed, so no signature is wasted on a doomed
    /// transaction. The deposit is credited to the caller.
    pub async fn deposit_and_approve(
        &self,
        amount: U256,
        options: DepositAndApproveOptions,
    ) -> Result<B256, PaymentsError> {
        if amount.is_zero() {
            return Err(PaymentsError::DepositAmount);
        }
        let approval = build_approval_request(
            &self.config,
            true,
            &ApprovalOptions {
                operator: options.operator,
                token: None,
                rate_allowance: options.rate_allowance,
                lockup_allowance: options.lockup_allowance,
                max_lockup_period: options.max_lockup_period,
            },
        )?;

        let token = self.config.token;
        let erc20 = self.erc20(token);
        let name = erc20.name().call().await?;
        // Tokens without a version() getter are treated as EIP-712 version 1.
        let version = match erc20.version().call().await {
            Ok(version) => version,
            Err(_) => "1".to_string(),
        };
        let nonce = erc20.nonces(self.from).call().await?;
        let deadline = options
            .deadline
            .unwrap_or_else(|| UnixTimestamp::now() + DEFAULT_PERMIT_TTL_SECS);
        let deadline = U256::from(deadline.as_secs());

        let params = PermitParams {
            chain_id: self.config.chain_id,
            token,
            name,
            version,
            owner: self.from,
            spender: self.config.payments,
            value: amount,
            nonce,
            deadline,
        };
        let signature = sign_permit(&self.signer, &params).await?;

        tracing::info!(
            %token,
            %amount,
            operator = %approval.operator,
            "Submitting permit deposit with operator approval"
        );
        let pending = self
            .payments()
            .depositWithPermitAndApproveOperator(
                token,
                self.from,
                amount,
                deadline,
                signature.v,
                signature.r,
                signature.s,
                approval.operator,
                approval.rate_allowance,
                approval.lockup_allowance,
                approval.max_lockup_period,
            )
            .send()
            .await?;
        Ok(*pending.tx_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amount_fails_validation() {
        let err = require_positive_amount(U256::ZERO).unwrap_err();
        assert!(matches!(err, PaymentsError::Validation(_)));
        assert!(require_positive_amount(U256::from(1u64)).is_ok());
    }

    #[test]
    fn balance_is_checked_before_allowance() {
        // Balance 50, allowance 0, amount 100: both are short, but the balance
        // failure must win.
        let err =
            check_deposit_funding(U256::from(50u64), U256::ZERO, U256::from(100u64)).unwrap_err();
        assert!(matches!(
            err,
            PaymentsError::InsufficientBalance {
                required,
                available,
            } if required == U256::from(100u64) && available == U256::from(50u64)
        ));
    }

    #[test]
    fn allowance_is_checked_after_balance_passes() {
        let err = check_deposit_funding(U256::from(100u64), U256::from(50u64), U256::from(100u64))
            .unwrap_err();
        assert!(matches!(
            err,
            PaymentsError::InsufficientAllowance {
                required,
                approved,
            } if required == U256::from(100u64) && approved == U256::from(50u64)
        ));
    }

    #[test]
    fn exactly_funded_deposit_passes() {
        let amount = U256::from(100u64);
        assert!(check_deposit_funding(amount, amount, amount).is_ok());
    }

    #[test]
    fn withdraw_bound_is_the_accrued_available_figure() {
        let account = Account {
            funds: U256::from(100u64),
            lockup_current: U256::from(20u64),
            lockup_rate: U256::from(1u64),
            lockup_last_settled_at: 0,
        };
        // available at epoch 10: 100 - (20 + 10) = 70
        assert!(check_withdrawable(&account, 10, U256::from(70u64)).is_ok());
        let err = check_withdrawable(&account, 10, U256::from(71u64)).unwrap_err();
        assert!(matches!(
            err,
            PaymentsError::InsufficientAvailableFunds {
                requested,
                available,
            } if requested == U256::from(71u64) && available == U256::from(70u64)
        ));
    }
}
