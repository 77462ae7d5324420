//! Operator approvals: defaulting, validation, and the on-chain update.
//!
//! Defaulting and validation are one pure function ([`build_approval_request`])
//! so they can be tested without a provider; the async operations only submit
//! what that function produced.

use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types_eth::TransactionReceipt;

use crate::chain;
use crate::config::{ChainConfig, DEFAULT_MAX_LOCKUP_EPOCHS};
use crate::contracts::IPayments;
use crate::error::PaymentsError;
use crate::events::find_event;
use crate::pay::PaymentsClient;

/// Option bag for an approval update. Unset fields resolve per the defaulting
/// table of [`build_approval_request`].
#[derive(Debug, Clone, Default)]
pub struct ApprovalOptions {
    /// Operator to grant or revoke; defaults to the configured
    /// storage-service operator.
    pub operator: Option<Address>,
    /// Token the approval is scoped to; defaults to the configured token.
    pub token: Option<Address>,
    /// Maximum per-epoch payment rate the operator may commit across rails.
    pub rate_allowance: Option<U256>,
    /// Maximum total lockup the operator may commit across rails.
    pub lockup_allowance: Option<U256>,
    /// Longest lockup duration (epochs) the operator may set on a rail.
    pub max_lockup_period: Option<U256>,
}

/// A fully resolved, validated approval update, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalRequest {
    pub token: Address,
    pub operator: Address,
    pub approved: bool,
    pub rate_allowance: U256,
    pub lockup_allowance: U256,
    pub max_lockup_period: U256,
}

/// Resolves defaults and validates an approval update.
///
/// Defaulting rules:
///
/// - Approving the **default** operator: unset allowances default to
///   [`U256::MAX`], unset `max_lockup_period` to 30 days of epochs. The
///   designated operator is trusted with unbounded allowances by policy.
/// - Approving a **custom** operator: all three bounds are required; missing
///   any of them fails validation rather than silently over-granting to an
///   unknown operator.
/// - Revoking: unset fields default to zero. Explicit non-zero values are
///   passed through, so a caller may flip the approval flag while retaining
///   part of the allowance.
pub fn build_approval_request(
    config: &ChainConfig,
    approved: bool,
    options: &ApprovalOptions,
) -> Result<ApprovalRequest, PaymentsError> {
    let operator = options.operator.unwrap_or(config.operator);
    let token = options.token.unwrap_or(config.token);

    let (rate_allowance, lockup_allowance, max_lockup_period) = if approved {
        if operator == config.operator {
            (
                options.rate_allowance.unwrap_or(U256::MAX),
                options.lockup_allowance.unwrap_or(U256::MAX),
                options
                    .max_lockup_period
                    .unwrap_or(U256::from(DEFAULT_MAX_LOCKUP_EPOCHS)),
            )
        } else {
            match (
                options.rate_allowance,
                options.lockup_allowance,
                options.max_lockup_period,
            ) {
                (Some(rate), Some(lockup), Some(period)) => (rate, lockup, period),
                _ => {
                    return Err(PaymentsError::validation(
                        "approving a custom operator requires explicit rate allowance, \
                         lockup allowance, and max lockup period",
                    ));
                }
            }
        }
    } else {
        (
            options.rate_allowance.unwrap_or(U256::ZERO),
            options.lockup_allowance.unwrap_or(U256::ZERO),
            options.max_lockup_period.unwrap_or(U256::ZERO),
        )
    };

    Ok(ApprovalRequest {
        token,
        operator,
        approved,
        rate_allowance,
        lockup_allowance,
        max_lockup_period,
    })
}

impl<S> PaymentsClient<S> {
    /// Submits an approval update and returns the transaction hash.
    pub async fn set_operator_approval(
        &self,
        approved: bool,
        options: ApprovalOptions,
    ) -> Result<B256, PaymentsError> {
        let request = build_approval_request(&self.config, approved, &options)?;
        tracing::info!(
            operator = %request.operator,
            token = %request.token,
            approved,
            "Submitting operator approval update"
        );
        let pending = self
            .payments()
            .setOperatorApproval(
                request.token,
                request.operator,
                request.approved,
                request.rate_allowance,
                request.lockup_allowance,
                request.max_lockup_period,
            )
            .send()
            .await?;
        Ok(*pending.tx_hash())
    }

    /// As [`set_operator_approval`](Self::set_operator_approval), then waits
    /// for confirmation and extracts the `OperatorApprovalUpdated` event.
    pub async fn set_operator_approval_sync(
        &self,
        approved: bool,
        options: ApprovalOptions,
    ) -> Result<(TransactionReceipt, IPayments::OperatorApprovalUpdated), PaymentsError> {
        let request = build_approval_request(&self.config, approved, &options)?;
        tracing::info!(
            operator = %request.operator,
            token = %request.token,
            approved,
            "Submitting operator approval update (sync)"
        );
        let pending = self
            .payments()
            .setOperatorApproval(
                request.token,
                request.operator,
                request.approved,
                request.rate_allowance,
                request.lockup_allowance,
                request.max_lockup_period,
            )
            .send()
            .await?;
        let receipt = chain::confirm(pending, &self.config).await?;
        let event = find_event::<IPayments::OperatorApprovalUpdated>(&receipt)
            .ok_or(PaymentsError::EventNotFound("OperatorApprovalUpdated"))?;
        Ok((receipt, event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use url::Url;

    const PAYMENTS: Address = address!("0000000000000000000000000000000000000001");
    const TOKEN: Address = address!("0000000000000000000000000000000000000002");
    const OPERATOR: Address = address!("0000000000000000000000000000000000000003");
    const CUSTOM: Address = address!("00000000000000000000000000000000000000ff");

    fn config() -> ChainConfig {
        ChainConfig::new(
            314159,
            vec![crate::config::RpcConfig::new(
                Url::parse("http://localhost:8545").unwrap(),
            )],
            PAYMENTS,
            TOKEN,
            OPERATOR,
        )
    }

    #[test]
    fn approve_default_operator_gets_max_allowances() {
        let request =
            build_approval_request(&config(), true, &ApprovalOptions::default()).unwrap();
        assert_eq!(request.operator, OPERATOR);
        assert_eq!(request.token, TOKEN);
        assert!(request.approved);
        assert_eq!(request.rate_allowance, U256::MAX);
        assert_eq!(request.lockup_allowance, U256::MAX);
        assert_eq!(request.max_lockup_period, U256::from(86_400u64));
    }

    #[test]
    fn approve_default_operator_keeps_explicit_overrides() {
        let options = ApprovalOptions {
            rate_allowance: Some(U256::from(10u64)),
            ..Default::default()
        };
        let request = build_approval_request(&config(), true, &options).unwrap();
        assert_eq!(request.rate_allowance, U256::from(10u64));
        assert_eq!(request.lockup_allowance, U256::MAX);
    }

    #[test]
    fn approve_custom_operator_requires_all_bounds() {
        let missing_one = ApprovalOptions {
            operator: Some(CUSTOM),
            rate_allowance: Some(U256::from(5u64)),
            lockup_allowance: Some(U256::from(500u64)),
            ..Default::default()
        };
        let err = build_approval_request(&config(), true, &missing_one).unwrap_err();
        assert!(matches!(err, PaymentsError::Validation(_)));
    }

    #[test]
    fn approve_custom_operator_preserves_explicit_bounds() {
        let options = ApprovalOptions {
            operator: Some(CUSTOM),
            rate_allowance: Some(U256::from(5u64)),
            lockup_allowance: Some(U256::from(500u64)),
            max_lockup_period: Some(U256::from(2880u64)),
            ..Default::default()
        };
        let request = build_approval_request(&config(), true, &options).unwrap();
        assert_eq!(request.operator, CUSTOM);
        assert_eq!(request.rate_allowance, U256::from(5u64));
        assert_eq!(request.lockup_allowance, U256::from(500u64));
        assert_eq!(request.max_lockup_period, U256::from(2880u64));
    }

    #[test]
    fn revoke_defaults_to_zero() {
        let request =
            build_approval_request(&config(), false, &ApprovalOptions::default()).unwrap();
        assert!(!request.approved);
        assert_eq!(request.rate_allowance, U256::ZERO);
        assert_eq!(request.lockup_allowance, U256::ZERO);
        assert_eq!(request.max_lockup_period, U256::ZERO);
    }

    #[test]
    fn revoke_may_retain_partial_allowance() {
        let options = ApprovalOptions {
            lockup_allowance: Some(U256::from(100u64)),
            ..Default::default()
        };
        let request = build_approval_request(&config(), false, &options).unwrap();
        assert!(!request.approved);
        assert_eq!(request.rate_allowance, U256::ZERO);
        assert_eq!(request.lockup_allowance, U256::from(100u64));
    }

    #[test]
    fn revoke_of_custom_operator_needs_no_bounds() {
        let options = ApprovalOptions {
            operator: Some(CUSTOM),
            ..Default::default()
        };
        let request = build_approval_request(&config(), false, &options).unwrap();
        assert_eq!(request.operator, CUSTOM);
        assert_eq!(request.rate_allowance, U256::ZERO);
    }
}
