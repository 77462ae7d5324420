//! Per-chain configuration for the payments client.
//!
//! Every operation in this crate takes its contract addresses and defaults from an
//! explicit [`ChainConfig`] value rather than ambient state, so multiple
//! configurations can coexist in one process (e.g. mainnet and calibration in the
//! same test run).

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use url::Url;

/// Filecoin block time is 30 seconds, i.e. 2880 epochs per day.
pub const EPOCHS_PER_DAY: u64 = 2880;

/// Default cap on how long an operator may lock funds on a rail: 30 days.
pub const DEFAULT_MAX_LOCKUP_EPOCHS: u64 = 30 * EPOCHS_PER_DAY;

/// Default timeout when waiting for a transaction receipt.
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 90;

/// RPC provider configuration for a single endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcConfig {
    /// HTTP URL for the RPC endpoint.
    pub http: Url,
    /// Rate limit for requests per second (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u32>,
}

impl RpcConfig {
    pub fn new(http: Url) -> Self {
        Self {
            http,
            rate_limit: None,
        }
    }
}

/// Configuration for a single chain deployment of the payments contract.
///
/// Contract addresses are deployment-specific and always caller-supplied; the
/// known-network constructors only fill in chain id and public RPC endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// EIP-155 chain id (314 for Filecoin mainnet, 314159 for calibration).
    pub chain_id: u64,
    /// RPC endpoints, tried in order with fallback.
    pub rpc: Vec<RpcConfig>,
    /// Address of the payments contract.
    pub payments: Address,
    /// Default ERC-20 token for all operations that do not name one explicitly.
    pub token: Address,
    /// The designated storage-service operator, used when an approval or rail
    /// operation does not name an operator explicitly.
    pub operator: Address,
    /// Timeout for receipt fetching on sync operations.
    #[serde(default = "default_receipt_timeout")]
    pub receipt_timeout_secs: u64,
    /// Block confirmations to wait for on sync operations.
    #[serde(default = "default_confirmations")]
    pub confirmations: u64,
}

fn default_receipt_timeout() -> u64 {
    DEFAULT_RECEIPT_TIMEOUT_SECS
}

fn default_confirmations() -> u64 {
    1
}

impl ChainConfig {
    pub fn new(
        chain_id: u64,
        rpc: Vec<RpcConfig>,
        payments: Address,
        token: Address,
        operator: Address,
    ) -> Self {
        Self {
            chain_id,
            rpc,
            payments,
            token,
            operator,
            receipt_timeout_secs: default_receipt_timeout(),
            confirmations: default_confirmations(),
        }
    }

    /// Filecoin mainnet (chain id 314) via the public Glif endpoint.
    pub fn mainnet(payments: Address, token: Address, operator: Address) -> Self {
        let url = Url::parse("https://api.node.glif.io/rpc/v1").expect("static url is valid");
        Self::new(314, vec![RpcConfig::new(url)], payments, token, operator)
    }

    /// Filecoin calibration testnet (chain id 314159) via the public Glif endpoint.
    pub fn calibration(payments: Address, token: Address, operator: Address) -> Self {
        let url = Url::parse("https://api.calibration.node.glif.io/rpc/v1")
            .expect("static url is valid");
        Self::new(314159, vec![RpcConfig::new(url)], payments, token, operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const PAYMENTS: Address = address!("0000000000000000000000000000000000000001");
    const TOKEN: Address = address!("0000000000000000000000000000000000000002");
    const OPERATOR: Address = address!("0000000000000000000000000000000000000003");

    #[test]
    fn known_networks_have_expected_chain_ids() {
        assert_eq!(ChainConfig::mainnet(PAYMENTS, TOKEN, OPERATOR).chain_id, 314);
        assert_eq!(
            ChainConfig::calibration(PAYMENTS, TOKEN, OPERATOR).chain_id,
            314159
        );
    }

    #[test]
    fn serde_fills_receipt_defaults() {
        let json = serde_json::json!({
            "chain_id": 314159,
            "rpc": [{ "http": "http://localhost:8545" }],
            "payments": PAYMENTS,
            "token": TOKEN,
            "operator": OPERATOR,
        });
        let config: ChainConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.receipt_timeout_secs, DEFAULT_RECEIPT_TIMEOUT_SECS);
        assert_eq!(config.confirmations, 1);
        assert_eq!(config.rpc[0].rate_limit, None);
    }

    #[test]
    fn max_lockup_default_is_thirty_days() {
        assert_eq!(DEFAULT_MAX_LOCKUP_EPOCHS, 86_400);
    }
}
