//! Rail settlement: realizing accrued rail value as actual transfers.
//!
//! Settling advances `settled_up_to` toward `min(current_epoch, end_epoch)`.
//! Settlement is idempotent at the ledger level — settling twice to the same
//! epoch finds nothing new the second time — so no client-side deduplication is
//! done. The emergency path for terminated rails bypasses the rail's validator
//! entirely; the chain enforces who may call it and when, and an early or
//! ineligible call surfaces as a chain-layer error.

use alloy_primitives::{B256, U256};
use alloy_rpc_types_eth::TransactionReceipt;

use crate::chain;
use crate::contracts::IPayments;
use crate::error::PaymentsError;
use crate::events::find_event;
use crate::pay::PaymentsClient;
use crate::types::{Epoch, SettlementResult};

impl<S> PaymentsClient<S> {
    async fn resolve_until_epoch(&self, until_epoch: Option<Epoch>) -> Result<Epoch, PaymentsError> {
        match until_epoch {
            Some(epoch) => Ok(epoch),
            None => self.current_epoch().await,
        }
    }

    /// Settles a rail up to `until_epoch` (default: the chain's current
    /// epoch). Returns the transaction hash.
    pub async fn settle(
        &self,
        rail_id: U256,
        until_epoch: Option<Epoch>,
    ) -> Result<B256, PaymentsError> {
        let until = self.resolve_until_epoch(until_epoch).await?;
        tracing::info!(rail_id = %rail_id, until, "Submitting rail settlement");
        let pending = self
            .payments()
            .settleRail(rail_id, U256::from(until))
            .send()
            .await?;
        Ok(*pending.tx_hash())
    }

    /// As [`settle`](Self::settle), then waits for confirmation and extracts
    /// the `RailSettled` event.
    ///
    /// A repeat settlement to an already-settled epoch confirms fine and
    /// reports zero newly settled amount.
    pub async fn settle_sync(
        &self,
        rail_id: U256,
        until_epoch: Option<Epoch>,
    ) -> Result<(TransactionReceipt, SettlementResult), PaymentsError> {
        let until = self.resolve_until_epoch(until_epoch).await?;
        tracing::info!(rail_id = %rail_id, until, "Submitting rail settlement (sync)");
        let pending = self
            .payments()
            .settleRail(rail_id, U256::from(until))
            .send()
            .await?;
        let receipt = chain::confirm(pending, &self.config).await?;
        let event = find_event::<IPayments::RailSettled>(&receipt)
            .ok_or(PaymentsError::EventNotFound("RailSettled"))?;
        Ok((receipt, event.into()))
    }

    /// Emergency settlement of a terminated rail, bypassing its validator.
    ///
    /// An escape hatch against an unresponsive or faulty validator: pays out in
    /// full up to the maximum settleable epoch. Only the payer may call it, and
    /// only after the validator's on-chain response window has elapsed — both
    /// conditions are enforced by the contract, not here, and a premature call
    /// reverts. Calling it on a still-active rail (`end_epoch == 0`) likewise
    /// reverts.
    pub async fn settle_terminated_without_validation(
        &self,
        rail_id: U256,
    ) -> Result<B256, PaymentsError> {
        tracing::info!(rail_id = %rail_id, "Submitting emergency settlement of terminated rail");
        let pending = self
            .payments()
            .settleTerminatedRailWithoutValidation(rail_id)
            .send()
            .await?;
        Ok(*pending.tx_hash())
    }

    /// As [`settle_terminated_without_validation`](Self::settle_terminated_without_validation),
    /// then waits for confirmation and extracts the `RailSettled` event.
    pub async fn settle_terminated_without_validation_sync(
        &self,
        rail_id: U256,
    ) -> Result<(TransactionReceipt, SettlementResult), PaymentsError> {
        tracing::info!(
            rail_id = %rail_id,
            "Submitting emergency settlement of terminated rail (sync)"
        );
        let pending = self
            .payments()
            .settleTerminatedRailWithoutValidation(rail_id)
            .send()
            .await?;
        let receipt = chain::confirm(pending, &self.config).await?;
        let event = find_event::<IPayments::RailSettled>(&receipt)
            .ok_or(PaymentsError::EventNotFound("RailSettled"))?;
        Ok((receipt, event.into()))
    }
}

#[cfg(test)]
mod tests {
    use crate::contracts::IPayments;
    use crate::types::SettlementResult;
    use alloy_primitives::U256;

    #[test]
    fn settlement_result_from_event() {
        let event = IPayments::RailSettled {
            railId: U256::from(9u64),
            totalSettledAmount: U256::from(1_000u64),
            totalNetPayeeAmount: U256::from(980u64),
            operatorCommission: U256::from(15u64),
            networkFee: U256::from(5u64),
            settledUpTo: U256::from(123_456u64),
        };
        let result = SettlementResult::from(event);
        assert_eq!(result.rail_id, U256::from(9u64));
        assert_eq!(result.total_settled_amount, U256::from(1_000u64));
        assert_eq!(result.total_net_payee_amount, U256::from(980u64));
        assert_eq!(result.operator_commission, U256::from(15u64));
        assert_eq!(result.network_fee, U256::from(5u64));
        assert_eq!(result.settled_up_to, 123_456);
    }

    #[test]
    fn repeat_settlement_event_reports_nothing_new() {
        // The second settlement to the same epoch emits a zero-amount event;
        // the client surfaces it as-is rather than treating it as an error.
        let event = IPayments::RailSettled {
            railId: U256::from(9u64),
            totalSettledAmount: U256::ZERO,
            totalNetPayeeAmount: U256::ZERO,
            operatorCommission: U256::ZERO,
            networkFee: U256::ZERO,
            settledUpTo: U256::from(123_456u64),
        };
        let result = SettlementResult::from(event);
        assert_eq!(result.total_settled_amount, U256::ZERO);
        assert_eq!(result.settled_up_to, 123_456);
    }
}
