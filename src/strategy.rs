// =============================================================================
// Allo Starter Kit - Strategy Deployment
// =============================================================================
//
// License: Apache 2.0 / MIT
//
// Description:
//   Deploys a MicroGrants strategy contract and registers a pool for it with
//   Allo, returning the pool id from the PoolCreated event.
//
// =============================================================================

use std::time::Instant;

use allo_ipfs::Pointer;
use allo_web3::prelude::*;
use allo_web3::{Allo, CreatePoolArgs, Metadata, MicroGrantsInit, MicroGrantsStrategy};
use async_trait::async_trait;
use tracing::{error, info, instrument};

use crate::error::{AlloError, Result};
use crate::transaction::{quote_gas, submit_and_confirm, DEFAULT_CONFIRMATIONS};

/// Deploys a strategy and creates the pool that uses it
#[async_trait]
pub trait StrategyDeployer: Send + Sync {
    /// Deploy for `profile_id` with pool metadata at `pointer`, returning the pool id
    async fn deploy(&self, pointer: &Pointer, profile_id: H256) -> Result<U256>;
}

/// Pool parameters that do not come from the bootstrap flow
#[derive(Debug, Clone)]
pub struct StrategySettings {
    /// Name passed to the strategy constructor
    pub name: String,
    /// Strategy initialisation
    pub init: MicroGrantsInit,
    /// Pool token
    pub token: Address,
    /// Initial funding, sent as value for the native token
    pub amount: U256,
    /// Pool managers
    pub managers: Vec<Address>,
}

/// MicroGrants deployer
pub struct MicroGrantsDeployer<C> {
    chain: C,
    allo: Allo,
    strategy: MicroGrantsStrategy,
    settings: StrategySettings,
    confirmations: usize,
}

impl<C: ChainClient> MicroGrantsDeployer<C> {
    /// Create a deployer over `chain`
    pub fn new(chain: C, allo: Allo, strategy: MicroGrantsStrategy, settings: StrategySettings) -> Self {
        Self {
            chain,
            allo,
            strategy,
            settings,
            confirmations: DEFAULT_CONFIRMATIONS,
        }
    }

    /// Override the confirmation depth
    pub fn with_confirmations(mut self, confirmations: usize) -> Self {
        self.confirmations = confirmations;
        self
    }

    async fn deploy_strategy(&self, gas_price: U256) -> Result<Address> {
        let tx = self
            .strategy
            .deploy(self.allo.address(), &self.settings.name)
            .map_err(AlloError::Encoding)?;
        let receipt = submit_and_confirm(&self.chain, tx, gas_price, self.confirmations).await?;
        receipt
            .contract_address
            .ok_or_else(|| AlloError::PoolCreationFailed("strategy receipt has no contract address".into()))
    }

    async fn create_pool(&self, gas_price: U256, strategy: Address, pointer: &Pointer, profile_id: H256) -> Result<U256> {
        let tx = self
            .allo
            .create_pool_with_custom_strategy(&CreatePoolArgs {
                profile_id,
                strategy,
                init_strategy_data: self.settings.init.encode(),
                token: self.settings.token,
                amount: self.settings.amount,
                metadata: Metadata::ipfs(pointer.as_str()),
                managers: self.settings.managers.clone(),
            })
            .map_err(AlloError::Encoding)?;
        let receipt = submit_and_confirm(&self.chain, tx, gas_price, self.confirmations).await?;
        self.allo
            .pool_created(&receipt)
            .map_err(|e| AlloError::PoolCreationFailed(e.to_string()))
    }
}

#[async_trait]
impl<C: ChainClient> StrategyDeployer for MicroGrantsDeployer<C> {
    #[instrument(level = "debug", skip(self, pointer), fields(pointer = %pointer))]
    async fn deploy(&self, pointer: &Pointer, profile_id: H256) -> Result<U256> {
        info!("🔧 Deploying {} strategy for profile {:?}", self.settings.name, profile_id);
        let start = Instant::now();

        let result = async {
            let gas_price = quote_gas(&self.chain).await?;
            let strategy = self.deploy_strategy(gas_price).await?;
            info!("✅ Strategy deployed at {:?}", strategy);
            self.create_pool(gas_price, strategy, pointer, profile_id).await
        }
        .await;

        match result {
            Ok(pool_id) => {
                info!("✅ Pool {} created in {:?}", pool_id, start.elapsed());
                Ok(pool_id)
            }
            Err(e) => {
                error!("❌ Strategy deployment failed: {}", e);
                Err(AlloError::deployment(e))
            }
        }
    }
}
