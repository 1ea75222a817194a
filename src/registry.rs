// =============================================================================
// Allo Starter Kit - Registry Client
// =============================================================================
//
// License: Apache 2.0 / MIT
//
// Description:
//   Profile creation against the Allo v2 Registry. The client is built once
//   from an injected chain client and registry binding and passed to whoever
//   needs it.
//
// =============================================================================

use std::time::Instant;

use allo_web3::prelude::*;
use allo_web3::{predict_profile_id, CreateProfileArgs, Registry};
use async_trait::async_trait;
use tracing::{error, info, instrument, warn};

use crate::config::ProfileDefaults;
use crate::error::{AlloError, Result};
use crate::transaction::{quote_gas, submit_and_confirm, DEFAULT_CONFIRMATIONS};

/// Profile arguments from configured defaults.
///
/// Without an explicit `nonce` a random one is drawn; reusing a nonce for the
/// same owner makes the registry reject the transaction.
pub fn profile_args(defaults: &ProfileDefaults, nonce: Option<u64>, name: Option<String>) -> CreateProfileArgs {
    CreateProfileArgs {
        nonce: U256::from(nonce.unwrap_or_else(rand::random)),
        name: name.unwrap_or_else(|| defaults.name.clone()),
        metadata: defaults.metadata.clone(),
        members: defaults.members.clone(),
        owner: defaults.owner,
    }
}

/// Something that can create an Allo profile and report its id
#[async_trait]
pub trait ProfileCreator: Send + Sync {
    /// Create a profile, returning the id assigned by the registry
    async fn create_profile(&self, args: CreateProfileArgs) -> Result<H256>;
}

/// Registry client bound to one chain
pub struct RegistryClient<C> {
    chain: C,
    registry: Registry,
    confirmations: usize,
}

impl<C: ChainClient> RegistryClient<C> {
    /// Create a registry client over `chain`
    pub fn new(chain: C, registry: Registry) -> Self {
        Self {
            chain,
            registry,
            confirmations: DEFAULT_CONFIRMATIONS,
        }
    }

    /// Override the confirmation depth
    pub fn with_confirmations(mut self, confirmations: usize) -> Self {
        self.confirmations = confirmations;
        self
    }

    /// Registry binding in use
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[async_trait]
impl<C: ChainClient> ProfileCreator for RegistryClient<C> {
    #[instrument(level = "debug", skip(self, args), fields(nonce = %args.nonce, owner = ?args.owner))]
    async fn create_profile(&self, args: CreateProfileArgs) -> Result<H256> {
        info!("🔧 Creating profile {:?}", args.name);
        let start = Instant::now();

        let gas_price = quote_gas(&self.chain).await?;

        let tx = self
            .registry
            .create_profile(&args)
            .map_err(AlloError::Encoding)?;
        let receipt = submit_and_confirm(&self.chain, tx, gas_price, self.confirmations).await?;

        let profile_id = self.registry.profile_created(&receipt).map_err(|e| {
            error!("❌ Profile creation failed: {}", e);
            AlloError::ProfileCreationFailed(e.to_string())
        })?;
        if profile_id.is_zero() {
            error!("❌ Profile creation failed: registry reported an empty id");
            return Err(AlloError::ProfileCreationFailed("empty profile id".into()));
        }

        let expected = predict_profile_id(args.nonce, args.owner);
        if expected != profile_id {
            warn!("⚠️ Profile id {:?} differs from local derivation {:?}", profile_id, expected);
        }

        info!("✅ Profile created in {:?}. Profile ID: {:?}", start.elapsed(), profile_id);
        Ok(profile_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allo_web3::Metadata;

    fn defaults() -> ProfileDefaults {
        ProfileDefaults {
            name: "Allo Workshop".into(),
            metadata: Metadata::ipfs("bafybeia4khbew3r2mkflyn7nzlvfzcb3qpfeftz5ivpzfwn77ollj47gqi"),
            members: vec![Address::repeat_byte(0x1f)],
            owner: Address::repeat_byte(0x1f),
        }
    }

    #[test]
    fn test_profile_args_explicit() {
        let args = profile_args(&defaults(), Some(7), Some("Workshop II".into()));
        assert_eq!(args.nonce, U256::from(7));
        assert_eq!(args.name, "Workshop II");
        assert_eq!(args.owner, Address::repeat_byte(0x1f));
    }

    #[test]
    fn test_profile_args_random_nonce() {
        let a = profile_args(&defaults(), None, None);
        let b = profile_args(&defaults(), None, None);
        assert_eq!(a.name, "Allo Workshop");
        // 2^-64 chance of a false failure
        assert_ne!(a.nonce, b.nonce);
    }
}
