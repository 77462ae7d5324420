//! Provider construction and receipt plumbing.
//!
//! This is the chain-adapter seam of the crate: everything that talks JSON-RPC
//! lives behind the [`PayProvider`] built here. The provider composes the alloy
//! filler stack for gas, blob gas, nonce, and chain id on top of a wallet, and
//! the RPC client layers per-endpoint throttling with fallback across the
//! configured endpoints.

use std::num::NonZeroUsize;
use std::time::Duration;

use alloy_network::EthereumWallet;
use alloy_provider::fillers::{
    BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller,
};
use alloy_provider::{Identity, PendingTransactionBuilder, Provider, ProviderBuilder, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types_eth::TransactionReceipt;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::layers::{FallbackLayer, ThrottleLayer};
use alloy_transport_http::Http;
use tower::ServiceBuilder;

use crate::config::{ChainConfig, RpcConfig};
use crate::error::PaymentsError;
use crate::types::Epoch;

/// Combined filler type for gas, blob gas, nonce, and chain ID.
pub type InnerFiller =
    JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>;

/// The fully composed provider type used by the payments client.
///
/// Combines filler layers for gas, nonce, chain ID, and blob gas with wallet
/// signing, and wraps a [`RootProvider`] for actual JSON-RPC communication.
pub type PayProvider = FillProvider<
    JoinFill<JoinFill<Identity, InnerFiller>, WalletFiller<EthereumWallet>>,
    RootProvider,
>;

/// Builds an RPC client over the configured HTTP endpoints.
///
/// Each endpoint gets its own throttle layer (requests per second, unlimited
/// when unset); the fallback layer rotates across all of them.
pub fn rpc_client(chain_id: u64, rpc: &[RpcConfig]) -> Result<RpcClient, PaymentsError> {
    let transports = rpc
        .iter()
        .filter_map(|endpoint| {
            let scheme = endpoint.http.scheme();
            let is_http = scheme == "http" || scheme == "https";
            if !is_http {
                return None;
            }
            let rpc_url = endpoint.http.clone();
            tracing::debug!(chain_id, rpc_url = %rpc_url, rate_limit = ?endpoint.rate_limit, "Using HTTP transport");
            let rate_limit = endpoint.rate_limit.unwrap_or(u32::MAX);
            let service = ServiceBuilder::new()
                .layer(ThrottleLayer::new(rate_limit))
                .service(Http::new(rpc_url));
            Some(service)
        })
        .collect::<Vec<_>>();
    let active = NonZeroUsize::new(transports.len())
        .ok_or_else(|| PaymentsError::validation("at least one HTTP RPC endpoint is required"))?;
    let fallback = ServiceBuilder::new()
        .layer(FallbackLayer::default().with_active_transport_count(active))
        .service(transports);
    Ok(RpcClient::new(fallback, false))
}

/// Builds the composed provider from configuration and a signing key.
pub fn connect(config: &ChainConfig, signer: PrivateKeySigner) -> Result<PayProvider, PaymentsError> {
    let signer = signer.with_chain_id(Some(config.chain_id));
    let wallet = EthereumWallet::from(signer);
    let client = rpc_client(config.chain_id, &config.rpc)?;
    let provider = ProviderBuilder::new().wallet(wallet).connect_client(client);
    Ok(provider)
}

/// Resolves the chain's current epoch (block height).
pub async fn current_epoch(provider: &PayProvider) -> Result<Epoch, PaymentsError> {
    let height = provider.get_block_number().await?;
    Ok(height)
}

/// Awaits confirmation of a pending transaction and checks its status.
///
/// Receipt fetching is bounded by the configured timeout; a mined-but-reverted
/// transaction surfaces as [`PaymentsError::Reverted`] rather than a missing
/// event further down the line.
pub async fn confirm(
    pending: PendingTransactionBuilder<alloy_network::Ethereum>,
    config: &ChainConfig,
) -> Result<TransactionReceipt, PaymentsError> {
    let timeout = Duration::from_secs(config.receipt_timeout_secs);
    let receipt = pending
        .with_required_confirmations(config.confirmations)
        .with_timeout(Some(timeout))
        .get_receipt()
        .await?;
    if !receipt.status() {
        return Err(PaymentsError::Reverted(receipt.transaction_hash));
    }
    Ok(receipt)
}
