//! Web3 Client Module
//!
//! Handles connectivity to the chain RPC endpoint: gas quotes, signing and
//! submitting transactions, and waiting for confirmed receipts.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, error, info, instrument};
use url::Url;
use web3::{
    transports::Http,
    types::{CallRequest, TransactionParameters, H256, U256},
    Web3,
};

use crate::error::{ChainError, Result};
use crate::types::{Receipt, TransactionData};
use crate::wallet::Signer;

/// Operations the kit needs from a chain node
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current network gas price in wei
    async fn gas_price(&self) -> Result<U256>;

    /// Sign and submit `tx` at `gas_price`, returning its hash
    async fn send_transaction(&self, tx: TransactionData, gas_price: U256) -> Result<H256>;

    /// Block until `hash` is mined with at least `confirmations` blocks,
    /// counting the inclusion block
    async fn wait_for_receipt(&self, hash: H256, confirmations: usize) -> Result<Receipt>;
}

#[async_trait]
impl<C: ChainClient + ?Sized> ChainClient for Arc<C> {
    async fn gas_price(&self) -> Result<U256> {
        (**self).gas_price().await
    }

    async fn send_transaction(&self, tx: TransactionData, gas_price: U256) -> Result<H256> {
        (**self).send_transaction(tx, gas_price).await
    }

    async fn wait_for_receipt(&self, hash: H256, confirmations: usize) -> Result<Receipt> {
        (**self).wait_for_receipt(hash, confirmations).await
    }
}

/// Connection settings for [`Web3Client`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// JSON-RPC endpoint
    pub rpc_url: Url,
    /// Expected EIP-155 chain id
    pub chain_id: u64,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Delay between receipt polls
    pub poll_interval: Duration,
    /// Overall limit for a receipt to reach the confirmation depth
    pub receipt_timeout: Duration,
}

/// Web3 client wrapper bound to one chain and one signer
#[derive(Clone, Debug)]
pub struct Web3Client {
    inner: Arc<Web3<Http>>,
    signer: Signer,
    options: ClientOptions,
}

impl Web3Client {
    /// Create new Web3 client instance
    #[instrument(level = "debug", skip(signer))]
    pub fn new(options: ClientOptions, signer: Signer) -> Result<Self> {
        info!("🔧 Initializing Web3Client for chain {}", options.chain_id);
        let http = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| ChainError::Config(e.to_string()))?;
        let transport = Http::with_client(http, options.rpc_url.clone());
        Ok(Self {
            inner: Arc::new(Web3::new(transport)),
            signer,
            options,
        })
    }

    /// Address transactions are sent from
    pub fn sender(&self) -> web3::types::Address {
        self.signer.address()
    }

    /// Check that the endpoint serves the configured chain
    #[instrument(level = "debug", skip(self))]
    pub async fn verify_chain(&self) -> Result<()> {
        let actual = self.inner.eth().chain_id().await?.low_u64();
        if actual != self.options.chain_id {
            error!("❌ Endpoint reports chain {}, expected {}", actual, self.options.chain_id);
            return Err(ChainError::ChainMismatch {
                expected: self.options.chain_id,
                actual,
            });
        }
        info!("✅ Connected to chain {}", actual);
        Ok(())
    }

    /// Current block number
    #[instrument(level = "debug", skip(self))]
    pub async fn block_number(&self) -> Result<u64> {
        Ok(self.inner.eth().block_number().await?.as_u64())
    }

    async fn poll_receipt(&self, hash: H256, confirmations: usize) -> Result<Receipt> {
        let eth = self.inner.eth();
        loop {
            if let Some(receipt) = eth.transaction_receipt(hash).await? {
                if let Some(included) = receipt.block_number {
                    let head = eth.block_number().await?.as_u64();
                    debug!("🔧 {:?} included in {}, head {}", hash, included, head);
                    if confirmed(included.as_u64(), head, confirmations) {
                        return Ok(receipt.into());
                    }
                }
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }
}

/// A block counts toward its own confirmations; a head behind the inclusion
/// block (reorg, lagging node) confirms nothing.
fn confirmed(included: u64, head: u64, confirmations: usize) -> bool {
    head >= included && head - included + 1 >= confirmations as u64
}

#[async_trait]
impl ChainClient for Web3Client {
    #[instrument(level = "debug", skip(self))]
    async fn gas_price(&self) -> Result<U256> {
        let price = self.inner.eth().gas_price().await?;
        info!("⛽ Current gas price: {} wei", price);
        Ok(price)
    }

    #[instrument(level = "debug", skip(self, tx), fields(to = ?tx.to))]
    async fn send_transaction(&self, tx: TransactionData, gas_price: U256) -> Result<H256> {
        let start = Instant::now();
        let request = CallRequest::builder()
            .from(self.signer.address())
            .data(tx.data.clone())
            .value(tx.value)
            .gas_price(gas_price);
        let request = match tx.to {
            Some(to) => request.to(to).build(),
            None => request.build(),
        };

        let gas = self
            .inner
            .eth()
            .estimate_gas(request, None)
            .await
            .map_err(|e| match e {
                web3::Error::Rpc(rpc) => ChainError::Rejected(rpc.message),
                other => ChainError::Provider(other),
            })?;
        debug!("🔧 Estimated gas: {}", gas);

        let params = TransactionParameters {
            to: tx.to,
            data: tx.data,
            value: tx.value,
            gas,
            gas_price: Some(gas_price),
            chain_id: Some(self.options.chain_id),
            ..Default::default()
        };
        let signed = self
            .inner
            .accounts()
            .sign_transaction(params, self.signer.key())
            .await
            .map_err(|e| ChainError::Signing(e.to_string()))?;

        let hash = self
            .inner
            .eth()
            .send_raw_transaction(signed.raw_transaction)
            .await
            .map_err(|e| match e {
                web3::Error::Rpc(rpc) => ChainError::Rejected(rpc.message),
                other => ChainError::Provider(other),
            })?;

        info!("✅ Submitted {:?} in {:?}", hash, start.elapsed());
        Ok(hash)
    }

    #[instrument(level = "debug", skip(self))]
    async fn wait_for_receipt(&self, hash: H256, confirmations: usize) -> Result<Receipt> {
        let start = Instant::now();
        let receipt = tokio::time::timeout(
            self.options.receipt_timeout,
            self.poll_receipt(hash, confirmations),
        )
        .await
        .map_err(|_| ChainError::ReceiptTimeout(hash))??;

        info!(
            "✅ {:?} confirmed in block {} after {:?}",
            hash,
            receipt.block_number,
            start.elapsed()
        );
        Ok(receipt)
    }
}
