//! Error taxonomy for payment-rail operations.
//!
//! Local validation and balance checks fail before anything touches the network,
//! so a caller never pays gas for a doomed operation. Once a transaction is
//! submitted, chain-layer failures pass through unmodified and are never retried
//! here; retry policy belongs to the caller.

use alloy_contract::Error as ContractError;
use alloy_primitives::{B256, U256};
use alloy_provider::PendingTransactionError;
use alloy_transport::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum PaymentsError {
    /// A request failed local validation before any transaction was built.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Wallet token balance below the requested deposit.
    #[error("insufficient token balance: required {required}, available {available}")]
    InsufficientBalance { required: U256, available: U256 },

    /// ERC-20 allowance for the payments contract below the requested deposit.
    #[error("insufficient token allowance: required {required}, approved {approved}")]
    InsufficientAllowance { required: U256, approved: U256 },

    /// Requested withdrawal exceeds the funds not spoken for by lockup.
    #[error("insufficient available funds: requested {requested}, available {available}")]
    InsufficientAvailableFunds { requested: U256, available: U256 },

    /// Non-positive amount in the permit-based deposit flow, caught before
    /// anything is signed.
    #[error("deposit amount must be positive")]
    DepositAmount,

    /// A sync operation's receipt did not contain the expected event. Indicates
    /// a contract/ABI mismatch or a reorg invalidating the receipt; fatal, not
    /// retried.
    #[error("event {0} not found in transaction receipt")]
    EventNotFound(&'static str),

    /// The transaction was mined but reverted.
    #[error("transaction {0} reverted")]
    Reverted(B256),

    /// Off-chain signing failed.
    #[error("signing failed: {0}")]
    Signing(#[from] alloy_signer::Error),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    PendingTransaction(#[from] PendingTransactionError),
}

impl PaymentsError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
