//! Chain access behind a trait seam.
//!
//! One read provider per supported chain and, when a signing key is
//! configured, one signing middleware per chain. Both maps are built once at
//! startup and shared read-only across requests; no request mutates them.

use crate::chain::ChainId;
use crate::config::GatewayConfig;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionRequest, U256, U64};
use log::info;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainClientError {
    #[error("unsupported chain ID: {0}")]
    Unsupported(u64),

    #[error("no signing credential configured")]
    NoSigner,

    #[error("{0}")]
    Call(String),

    #[error("transaction {0} dropped before inclusion")]
    Dropped(String),

    #[error("transaction {0} reverted on-chain")]
    Reverted(String),
}

/// What a confirmed submission reports back.
#[derive(Debug, Clone)]
pub struct ReceiptSummary {
    pub transaction_hash: String,
    pub block_number: u64,
    pub gas_used: U256,
}

/// The dispatch engine's view of the chain: a read call or a signed
/// submission against one of the supported networks.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Whether a connection handle exists for this chain.
    fn supports(&self, chain: ChainId) -> bool;

    /// Invoke a read method for its return value, no value transfer.
    async fn call(
        &self,
        chain: ChainId,
        to: Address,
        data: Bytes,
    ) -> Result<Bytes, ChainClientError>;

    /// Sign and submit a transaction, block until inclusion is confirmed.
    async fn submit(
        &self,
        chain: ChainId,
        to: Address,
        data: Bytes,
    ) -> Result<ReceiptSummary, ChainClientError>;
}

/// Production client backed by ethers JSON-RPC providers.
pub struct EthersChainClient {
    providers: HashMap<ChainId, Provider<Http>>,
    signers: HashMap<ChainId, SignerMiddleware<Provider<Http>, LocalWallet>>,
}

impl EthersChainClient {
    /// Build providers (and signers, when the config carries a signing key)
    /// for every supported chain.
    pub fn connect(config: &GatewayConfig) -> Result<Self> {
        let mut providers = HashMap::new();
        let mut signers = HashMap::new();

        for chain in ChainId::ALL {
            let url = config.rpc_url(chain);
            let provider = Provider::<Http>::try_from(url.as_str())
                .with_context(|| format!("failed to create provider for {chain}"))?;

            if let Some(key) = config.signing_key.as_deref() {
                let wallet = key
                    .parse::<LocalWallet>()
                    .map_err(|e| anyhow!("invalid signing key: {e}"))?
                    .with_chain_id(chain.id());
                signers.insert(chain, SignerMiddleware::new(provider.clone(), wallet));
            }

            providers.insert(chain, provider);
            info!("initialized provider for chain {chain}");
        }

        Ok(Self { providers, signers })
    }
}

#[async_trait]
impl ChainClient for EthersChainClient {
    fn supports(&self, chain: ChainId) -> bool {
        self.providers.contains_key(&chain)
    }

    async fn call(
        &self,
        chain: ChainId,
        to: Address,
        data: Bytes,
    ) -> Result<Bytes, ChainClientError> {
        let provider = self
            .providers
            .get(&chain)
            .ok_or(ChainClientError::Unsupported(chain.id()))?;

        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        provider
            .call(&tx, None)
            .await
            .map_err(|e| ChainClientError::Call(e.to_string()))
    }

    async fn submit(
        &self,
        chain: ChainId,
        to: Address,
        data: Bytes,
    ) -> Result<ReceiptSummary, ChainClientError> {
        if !self.supports(chain) {
            return Err(ChainClientError::Unsupported(chain.id()));
        }
        let signer = self.signers.get(&chain).ok_or(ChainClientError::NoSigner)?;

        let tx = TransactionRequest::new().to(to).data(data).value(0u64);
        let pending = signer
            .send_transaction(tx, None)
            .await
            .map_err(|e| ChainClientError::Call(e.to_string()))?;

        let tx_hash = format!("{:#x}", pending.tx_hash());
        info!("transaction sent on {chain}: {tx_hash}");

        let receipt = pending
            .await
            .map_err(|e| ChainClientError::Call(e.to_string()))?
            .ok_or_else(|| ChainClientError::Dropped(tx_hash.clone()))?;

        if receipt.status != Some(U64::from(1)) {
            return Err(ChainClientError::Reverted(tx_hash));
        }

        Ok(ReceiptSummary {
            transaction_hash: tx_hash,
            block_number: receipt.block_number.map(|n| n.as_u64()).unwrap_or_default(),
            gas_used: receipt.gas_used.unwrap_or_default(),
        })
    }
}
