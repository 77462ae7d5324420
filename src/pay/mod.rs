//! The payments client and rail accounting operations.
//!
//! [`PaymentsClient`] owns the composed provider, the per-chain configuration,
//! and the signing key. Read operations return plain value objects from
//! [`crate::types`]; write operations return the transaction hash, with `_sync`
//! variants that additionally wait for confirmation and extract the resulting
//! contract event.
//!
//! Every read is a snapshot of externally-owned chain state and may be stale by
//! the time a subsequent write lands: the pre-flight checks here are best-effort
//! fail-fast guards, and the chain itself is the final arbiter. Nothing in this
//! module retries, queues, or serializes operations; callers issuing multiple
//! mutating operations from the same account must serialize themselves.

pub mod approval;
pub mod deposit;
pub mod lockup;
pub mod permit;
pub mod settlement;

pub use approval::{ApprovalOptions, ApprovalRequest, build_approval_request};
pub use deposit::DepositAndApproveOptions;
pub use permit::{PermitParams, PermitSignature, SignerLike};

use alloy_primitives::{Address, U256};
use alloy_signer_local::PrivateKeySigner;

use crate::chain::{self, PayProvider};
use crate::config::ChainConfig;
use crate::contracts::{IERC20, IPayments};
use crate::error::PaymentsError;
use crate::types::{Account, Epoch, OperatorApproval, Rail, RailInfo};

/// Client for a single payments-contract deployment.
///
/// Generic over the signer so Arc-shared or custom signers can be used for the
/// permit flow; [`PaymentsClient::connect`] covers the common local-key case.
#[derive(Debug)]
pub struct PaymentsClient<S = PrivateKeySigner> {
    pub(crate) provider: PayProvider,
    pub(crate) config: ChainConfig,
    pub(crate) signer: S,
    /// The payer address all defaulting resolves to.
    pub(crate) from: Address,
}

impl PaymentsClient<PrivateKeySigner> {
    /// Connects with a local private-key signer. The same key signs
    /// transactions and off-chain permits.
    pub fn connect(config: ChainConfig, signer: PrivateKeySigner) -> Result<Self, PaymentsError> {
        let from = signer.address();
        let provider = chain::connect(&config, signer.clone())?;
        Ok(Self {
            provider,
            config,
            signer,
            from,
        })
    }
}

impl<S> PaymentsClient<S> {
    /// Assembles a client from already-built parts. `from` is the payer address
    /// matching the provider's wallet signer.
    pub fn from_parts(provider: PayProvider, config: ChainConfig, signer: S, from: Address) -> Self {
        Self {
            provider,
            config,
            signer,
            from,
        }
    }

    /// The payer address this client signs for.
    pub fn address(&self) -> Address {
        self.from
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub(crate) fn payments(&self) -> IPayments::IPaymentsInstance<PayProvider> {
        IPayments::new(self.config.payments, self.provider.clone())
    }

    pub(crate) fn erc20(&self, token: Address) -> IERC20::IERC20Instance<PayProvider> {
        IERC20::new(token, self.provider.clone())
    }

    pub(crate) fn token_or_default(&self, token: Option<Address>) -> Address {
        token.unwrap_or(self.config.token)
    }

    /// The chain's current epoch (block height).
    pub async fn current_epoch(&self) -> Result<Epoch, PaymentsError> {
        chain::current_epoch(&self.provider).await
    }

    /// Reads the (owner, token) account snapshot. Both default to the client's
    /// own address and the configured token.
    pub async fn account(
        &self,
        owner: Option<Address>,
        token: Option<Address>,
    ) -> Result<Account, PaymentsError> {
        let owner = owner.unwrap_or(self.from);
        let token = self.token_or_default(token);
        let ret = self.payments().accounts(token, owner).call().await?;
        Ok(ret.into())
    }

    /// Funds not spoken for by lockup as of the current epoch.
    ///
    /// Reads the account snapshot and applies the lockup accrual calculator at
    /// the chain's current block height. This is the figure `withdraw` checks
    /// against.
    pub async fn available_funds(
        &self,
        owner: Option<Address>,
        token: Option<Address>,
    ) -> Result<U256, PaymentsError> {
        let account = self.account(owner, token).await?;
        let epoch = self.current_epoch().await?;
        Ok(lockup::available_funds(&account, epoch))
    }

    /// Reads the approval granted by this client to `operator` (defaulting to
    /// the configured storage-service operator).
    pub async fn operator_approval(
        &self,
        operator: Option<Address>,
        token: Option<Address>,
    ) -> Result<OperatorApproval, PaymentsError> {
        let operator = operator.unwrap_or(self.config.operator);
        let token = self.token_or_default(token);
        let ret = self
            .payments()
            .operatorApprovals(token, self.from, operator)
            .call()
            .await?;
        Ok(ret.into())
    }

    /// Reads the full state of a rail.
    pub async fn rail(&self, rail_id: U256) -> Result<Rail, PaymentsError> {
        let view = self.payments().getRail(rail_id).call().await?;
        Ok(view.into())
    }

    /// Lists rails where `payer` (default: this client) pays in `token`.
    ///
    /// `limit = 0` means "all remaining from `offset`"; the sentinel is
    /// interpreted by the contract, not here.
    pub async fn rails_for_payer(
        &self,
        payer: Option<Address>,
        token: Option<Address>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<RailInfo>, PaymentsError> {
        let payer = payer.unwrap_or(self.from);
        let token = self.token_or_default(token);
        let infos = self
            .payments()
            .getRailsForPayerAndToken(payer, token, U256::from(offset), U256::from(limit))
            .call()
            .await?;
        Ok(infos.into_iter().map(Into::into).collect())
    }

    /// Lists rails where `payee` (default: this client) is paid in `token`.
    pub async fn rails_for_payee(
        &self,
        payee: Option<Address>,
        token: Option<Address>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<RailInfo>, PaymentsError> {
        let payee = payee.unwrap_or(self.from);
        let token = self.token_or_default(token);
        let infos = self
            .payments()
            .getRailsForPayeeAndToken(payee, token, U256::from(offset), U256::from(limit))
            .call()
            .await?;
        Ok(infos.into_iter().map(Into::into).collect())
    }
}
