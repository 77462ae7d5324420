//! EIP-2612 permit signing for the compound deposit-and-approve flow.
//!
//! The flow is staged so each step is testable on its own: parameter fetching
//! (network I/O, lives in [`crate::pay::deposit`]) → message building (pure) →
//! signing ([`SignerLike`]) → v/r/s splitting for the contract call.

use alloy_primitives::{Address, B256, FixedBytes, Signature, U256};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{Eip712Domain, SolStruct, eip712_domain};
use async_trait::async_trait;
use std::sync::Arc;

use crate::contracts::Permit;
use crate::error::PaymentsError;

/// Everything needed to build and sign a permit message.
///
/// `name`, `version`, and `nonce` come from the token contract; the rest is
/// chosen by the caller. Building the message from these params is pure, so the
/// EIP-712 hash can be tested without a provider.
#[derive(Debug, Clone)]
pub struct PermitParams {
    /// EIP-155 chain id for the EIP-712 domain.
    pub chain_id: u64,
    /// Token contract address (the verifying contract).
    pub token: Address,
    /// EIP-712 domain name, as reported by the token's `name()`.
    pub name: String,
    /// EIP-712 domain version, as reported by the token's `version()`.
    pub version: String,
    /// The token holder signing the permit.
    pub owner: Address,
    /// The contract being authorized to pull funds (the payments contract).
    pub spender: Address,
    /// Amount authorized.
    pub value: U256,
    /// The owner's current permit nonce, from the token's `nonces()`.
    pub nonce: U256,
    /// Unix timestamp after which the permit is dead.
    pub deadline: U256,
}

/// A permit signature split into the (v, r, s) components the contract takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermitSignature {
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl From<Signature> for PermitSignature {
    fn from(signature: Signature) -> Self {
        Self {
            v: 27 + signature.v() as u8,
            r: signature.r().into(),
            s: signature.s().into(),
        }
    }
}

/// Builds the permit struct and its EIP-712 domain. Pure.
pub fn build_permit_message(params: &PermitParams) -> (Permit, Eip712Domain) {
    let domain = eip712_domain! {
        name: params.name.clone(),
        version: params.version.clone(),
        chain_id: params.chain_id,
        verifying_contract: params.token,
    };
    let permit = Permit {
        owner: params.owner,
        spender: params.spender,
        value: params.value,
        nonce: params.nonce,
        deadline: params.deadline,
    };
    (permit, domain)
}

/// Signs the permit message and splits the signature for the contract call.
pub async fn sign_permit<S: SignerLike + Sync>(
    signer: &S,
    params: &PermitParams,
) -> Result<PermitSignature, PaymentsError> {
    let (permit, domain) = build_permit_message(params);
    let hash = permit.eip712_signing_hash(&domain);
    let signature = signer.sign_hash(&hash).await?;
    Ok(signature.into())
}

/// Abstracts signing so both owned signers and `Arc`-wrapped signers work.
///
/// Alloy's `Signer` trait is not implemented for `Arc<T>`, but callers may want
/// to share one key between this client and other components.
#[async_trait]
pub trait SignerLike {
    /// Returns the address of the signer.
    fn address(&self) -> Address;

    /// Signs the given hash.
    async fn sign_hash(&self, hash: &FixedBytes<32>) -> Result<Signature, alloy_signer::Error>;
}

#[async_trait]
impl SignerLike for PrivateKeySigner {
    fn address(&self) -> Address {
        PrivateKeySigner::address(self)
    }

    async fn sign_hash(&self, hash: &FixedBytes<32>) -> Result<Signature, alloy_signer::Error> {
        alloy_signer::Signer::sign_hash(self, hash).await
    }
}

#[async_trait]
impl<T: SignerLike + Send + Sync> SignerLike for Arc<T> {
    fn address(&self) -> Address {
        (**self).address()
    }

    async fn sign_hash(&self, hash: &FixedBytes<32>) -> Result<Signature, alloy_signer::Error> {
        (**self).sign_hash(hash).await
    }
}
