// =============================================================================
// Allo Starter Kit - Pool Bootstrap
// =============================================================================
//
// License: Apache 2.0 / MIT
//
// Description:
//   Create profile, pin metadata, deploy strategy. Strictly in that order,
//   each step awaited before the next. A failed step stops the flow and is
//   returned as-is; earlier on-chain effects are not rolled back.
//
// =============================================================================

use std::time::Instant;

use allo_ipfs::Pinner;
use allo_web3::prelude::*;
use allo_web3::CreateProfileArgs;
use serde_json::json;
use tracing::{error, info, instrument};

use crate::error::{AlloError, Result};
use crate::metadata::{PoolMetadata, PoolTemplate};
use crate::registry::ProfileCreator;
use crate::strategy::StrategyDeployer;

/// Pool bootstrap flow over its three collaborators
pub struct PoolBootstrap<R, P, D> {
    profiles: R,
    pinner: P,
    deployer: D,
    template: PoolTemplate,
}

impl<R, P, D> PoolBootstrap<R, P, D>
where
    R: ProfileCreator,
    P: Pinner,
    D: StrategyDeployer,
{
    /// Assemble the flow
    pub fn new(profiles: R, pinner: P, deployer: D, template: PoolTemplate) -> Self {
        Self {
            profiles,
            pinner,
            deployer,
            template,
        }
    }

    /// Run the flow for a fresh profile built from `args`, returning the pool id
    #[instrument(level = "debug", skip_all, fields(nonce = %args.nonce))]
    pub async fn bootstrap(&self, args: CreateProfileArgs) -> Result<U256> {
        info!("🚀 Bootstrapping pool {:?}", self.template.name);
        let start = Instant::now();

        let profile_id = self.profiles.create_profile(args).await?;

        let mut metadata = PoolMetadata::new(profile_id, &self.template);
        if let Some(image) = metadata.inline_image().map(str::to_owned) {
            let image_pointer = self.pin(&json!({ "data": image })).await?;
            info!("✅ Image saved to IPFS with pointer: {}", image_pointer);
            metadata.base64_image = image_pointer.to_string();
        }

        let pointer = self.pin(&metadata.to_json()?).await?;
        info!("✅ Metadata saved to IPFS with pointer: {}", pointer);

        let pool_id = self
            .deployer
            .deploy(&pointer, profile_id)
            .await
            .map_err(AlloError::deployment)?;

        info!("🎉 Pool created with ID {} in {:?}", pool_id, start.elapsed());
        Ok(pool_id)
    }

    async fn pin(&self, document: &serde_json::Value) -> Result<allo_ipfs::Pointer> {
        self.pinner.pin_json(document).await.map_err(|e| {
            error!("❌ Pinning failed: {}", e);
            AlloError::Pinning(e)
        })
    }
}
