//! Client library for payment rails on Filecoin-style EVM chains.
//!
//! A *rail* is a continuously-accruing payment obligation from a payer to a
//! storage-service payee, mediated by an approved operator. This crate drives the
//! client side of the rail lifecycle against the on-chain payments contract:
//! deposit funds, grant bounded operator approvals, settle rails (including the
//! emergency path for terminated rails with an unresponsive validator), and
//! withdraw whatever is not locked up.
//!
//! The chain is authoritative for all settlement math. This crate only *previews*
//! outcomes locally — most importantly the lockup accrual that determines how much
//! of a deposit is actually withdrawable at a given epoch — so that doomed
//! transactions fail before any gas is spent.
//!
//! # Modules
//!
//! - [`chain`] — Provider construction and receipt plumbing (the alloy stack).
//! - [`config`] — Per-chain configuration: contract addresses, default token and
//!   operator, RPC endpoints.
//! - [`contracts`] — Typed `sol!` interfaces for the payments contract and the
//!   ERC-20 token, plus the EIP-2612 permit struct.
//! - [`error`] — The [`PaymentsError`](error::PaymentsError) taxonomy.
//! - [`events`] — Typed event extraction from transaction receipts.
//! - [`pay`] — The [`PaymentsClient`](pay::PaymentsClient) and the rail accounting
//!   operations: lockup accrual, operator approvals, deposit/withdraw, settlement.
//! - [`timestamp`] — Unix timestamp type for permit deadlines.
//! - [`types`] — Account, rail, and approval value objects.
//!
//! # Example
//!
//! ```ignore
//! use filpay::config::ChainConfig;
//! use filpay::pay::PaymentsClient;
//! use alloy_signer_local::PrivateKeySigner;
//!
//! let config = ChainConfig::calibration(payments_addr, usdfc_addr, operator_addr);
//! let signer: PrivateKeySigner = private_key.parse()?;
//! let client = PaymentsClient::connect(config, signer)?;
//!
//! let available = client.available_funds(None, None).await?;
//! let tx = client.deposit(amount, None, None).await?;
//! ```

pub mod chain;
pub mod config;
pub mod contracts;
pub mod error;
pub mod events;
pub mod pay;
pub mod timestamp;
pub mod types;
