//! Value objects for accounts, rails, and operator approvals.
//!
//! These are plain snapshots of on-chain state. An [`Account`] is time-dependent
//! through its `lockup_rate`, so snapshots are read fresh before every decision
//! and never cached across epochs.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::contracts::IPayments;

/// A chain epoch, i.e. block height.
pub type Epoch = u64;

/// Per (payer, token) ledger snapshot.
///
/// `lockup_current` is authoritative as of `lockup_last_settled_at`; obligations
/// keep accruing at `lockup_rate` per epoch after that, which is why the usable
/// balance is a function of the current epoch (see [`crate::pay::lockup`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Total deposited balance, in the token's base units.
    pub funds: U256,
    /// Amount already locked as of `lockup_last_settled_at`.
    pub lockup_current: U256,
    /// Additional lockup accruing per epoch.
    pub lockup_rate: U256,
    /// Epoch at which `lockup_current` was last recomputed on-chain.
    pub lockup_last_settled_at: Epoch,
}

impl From<IPayments::accountsReturn> for Account {
    fn from(ret: IPayments::accountsReturn) -> Self {
        Self {
            funds: ret.funds,
            lockup_current: ret.lockupCurrent,
            lockup_rate: ret.lockupRate,
            lockup_last_settled_at: ret.lockupLastSettledAt.saturating_to(),
        }
    }
}

/// Allowance tuple granted to an operator for a (payer, token) pair.
///
/// The usage fields are chain-enforced upper-bound trackers and read-only from
/// this client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorApproval {
    pub is_approved: bool,
    pub rate_allowance: U256,
    pub lockup_allowance: U256,
    pub rate_usage: U256,
    pub lockup_usage: U256,
    pub max_lockup_period: U256,
}

impl OperatorApproval {
    /// Rate allowance not yet committed to rails.
    pub fn remaining_rate_allowance(&self) -> U256 {
        self.rate_allowance.saturating_sub(self.rate_usage)
    }

    /// Lockup allowance not yet committed to rails.
    pub fn remaining_lockup_allowance(&self) -> U256 {
        self.lockup_allowance.saturating_sub(self.lockup_usage)
    }
}

impl From<IPayments::operatorApprovalsReturn> for OperatorApproval {
    fn from(ret: IPayments::operatorApprovalsReturn) -> Self {
        Self {
            is_approved: ret.isApproved,
            rate_allowance: ret.rateAllowance,
            lockup_allowance: ret.lockupAllowance,
            rate_usage: ret.rateUsage,
            lockup_usage: ret.lockupUsage,
            max_lockup_period: ret.maxLockupPeriod,
        }
    }
}

/// A single payer→payee payment stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rail {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub operator: Address,
    pub validator: Address,
    /// Payment rate per epoch, in base units.
    pub payment_rate: U256,
    /// Epochs of lockup the payer must maintain ahead of settlement.
    pub lockup_period: Epoch,
    /// Fixed lockup on top of the rate-based component.
    pub lockup_fixed: U256,
    /// Epoch up to which the rail has been settled.
    pub settled_up_to: Epoch,
    /// Zero while active; the termination epoch once the service ends the rail.
    pub end_epoch: Epoch,
    pub commission_rate_bps: u64,
    pub service_fee_recipient: Address,
}

impl Rail {
    /// A rail is terminated once the service sets a non-zero end epoch. A
    /// terminated rail still accrues unsettled value between `settled_up_to`
    /// and `end_epoch` until someone settles it.
    pub fn is_terminated(&self) -> bool {
        self.end_epoch > 0
    }

    /// Fully settled: terminated and nothing left between `settled_up_to` and
    /// `end_epoch`. Further settlement calls are inert.
    pub fn is_fully_settled(&self) -> bool {
        self.is_terminated() && self.settled_up_to >= self.end_epoch
    }
}

impl From<IPayments::RailView> for Rail {
    fn from(view: IPayments::RailView) -> Self {
        Self {
            token: view.token,
            from: view.from,
            to: view.to,
            operator: view.operator,
            validator: view.validator,
            payment_rate: view.paymentRate,
            lockup_period: view.lockupPeriod.saturating_to(),
            lockup_fixed: view.lockupFixed,
            settled_up_to: view.settledUpTo.saturating_to(),
            end_epoch: view.endEpoch.saturating_to(),
            commission_rate_bps: view.commissionRateBps.saturating_to(),
            service_fee_recipient: view.serviceFeeRecipient,
        }
    }
}

/// Listing entry returned by the payer/payee rail queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RailInfo {
    pub rail_id: U256,
    pub is_terminated: bool,
    pub end_epoch: Epoch,
}

impl From<IPayments::RailInfo> for RailInfo {
    fn from(info: IPayments::RailInfo) -> Self {
        Self {
            rail_id: info.railId,
            is_terminated: info.isTerminated,
            end_epoch: info.endEpoch.saturating_to(),
        }
    }
}

/// Outcome of a confirmed settlement, extracted from the `RailSettled` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub rail_id: U256,
    /// Gross amount realized by this settlement.
    pub total_settled_amount: U256,
    /// Amount the payee actually received after commission and fees.
    pub total_net_payee_amount: U256,
    pub operator_commission: U256,
    pub network_fee: U256,
    /// Epoch the rail is now settled up to.
    pub settled_up_to: Epoch,
}

impl From<IPayments::RailSettled> for SettlementResult {
    fn from(event: IPayments::RailSettled) -> Self {
        Self {
            rail_id: event.railId,
            total_settled_amount: event.totalSettledAmount,
            total_net_payee_amount: event.totalNetPayeeAmount,
            operator_commission: event.operatorCommission,
            network_fee: event.networkFee,
            settled_up_to: event.settledUpTo.saturating_to(),
        }
    }
}
