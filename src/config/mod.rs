// =============================================================================
// Allo Starter Kit - Configuration
// =============================================================================
//
// License: Apache 2.0 / MIT
//
// Description:
//   TOML file merged with ALLO_-prefixed environment variables. Nothing that
//   identifies an endpoint or a key is compiled in; everything is validated
//   once at startup into typed settings.
//
// =============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use allo_ipfs::{IpfsConfig, Pointer};
use allo_web3::chains::{self, parse_address};
use allo_web3::prelude::*;
use allo_web3::{ClientOptions, Metadata, MicroGrantsInit, Signer};
use figment::{
    providers::{Env, Format, Toml},
    value::{Uncased, UncasedStr},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::error::{AlloError, Result};
use crate::metadata::PoolTemplate;
use crate::strategy::StrategySettings;

static SECTIONS: [&str; 6] = ["chain", "signer", "ipfs", "profile", "pool", "strategy"];

/// Raw configuration as read from file and environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chain endpoint and contract addresses
    pub chain: ChainConfig,
    /// Transaction signer
    #[serde(default)]
    pub signer: SignerConfig,
    /// Pinning service
    #[serde(default)]
    pub ipfs: IpfsConfig,
    /// Defaults for new profiles
    #[serde(default)]
    pub profile: ProfileConfig,
    /// Pool metadata
    #[serde(default)]
    pub pool: PoolTemplate,
    /// Strategy deployment
    #[serde(default)]
    pub strategy: StrategyConfig,
}

/// `[chain]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// EIP-155 chain id
    pub id: u64,
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Registry override, canonical address otherwise
    #[serde(default)]
    pub registry_address: Option<String>,
    /// Allo override, canonical address otherwise
    #[serde(default)]
    pub allo_address: Option<String>,
    /// Confirmation depth for every transaction
    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
    /// Receipt poll interval
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Receipt wait limit
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
    /// HTTP request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// `[signer]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Hex private key, best supplied as `ALLO_SIGNER_KEY`
    #[serde(default, skip_serializing)]
    pub key: Option<String>,
}

/// `[profile]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Display name
    #[serde(default = "default_profile_name")]
    pub name: String,
    /// Profile metadata CID
    #[serde(default = "default_profile_pointer")]
    pub metadata_pointer: String,
    /// Metadata protocol, 1 = IPFS
    #[serde(default = "default_protocol")]
    pub metadata_protocol: u64,
    /// Members; the owner alone when empty
    #[serde(default)]
    pub members: Vec<String>,
    /// Owner; the signer when unset
    #[serde(default)]
    pub owner: Option<String>,
}

/// `[strategy]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Hex bytecode of the MicroGrants strategy
    #[serde(default)]
    pub artifact: Option<PathBuf>,
    /// Constructor name
    #[serde(default = "default_strategy_name")]
    pub name: String,
    /// Require registry anchors for recipients
    #[serde(default)]
    pub use_registry_anchor: bool,
    /// Allocation window length starting now
    #[serde(default = "default_allocation_duration_secs")]
    pub allocation_duration_secs: u64,
    /// Approvals needed per request
    #[serde(default = "default_approval_threshold")]
    pub approval_threshold: u64,
    /// Decimal wei
    #[serde(default = "default_zero", deserialize_with = "decimal::deserialize")]
    pub max_requested_amount: String,
    /// Pool token; native when unset
    #[serde(default)]
    pub token: Option<String>,
    /// Initial funding, decimal wei
    #[serde(default = "default_zero", deserialize_with = "decimal::deserialize")]
    pub amount: String,
    /// Pool managers
    #[serde(default)]
    pub managers: Vec<String>,
}

/// Wei amounts as written in TOML strings or parsed as integers from `ALLO_*`.
mod decimal {
    use std::fmt;

    use serde::de::{self, Deserializer, Visitor};

    struct Decimal;

    impl<'de> Visitor<'de> for Decimal {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal amount as string or integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_any(Decimal)
    }
}

fn default_confirmations() -> usize {
    crate::transaction::DEFAULT_CONFIRMATIONS
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_receipt_timeout_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_profile_name() -> String {
    "Allo Workshop".to_string()
}

fn default_profile_pointer() -> String {
    "bafybeia4khbew3r2mkflyn7nzlvfzcb3qpfeftz5ivpzfwn77ollj47gqi".to_string()
}

fn default_protocol() -> u64 {
    1
}

fn default_strategy_name() -> String {
    "MicroGrantsv1".to_string()
}

fn default_allocation_duration_secs() -> u64 {
    30 * 24 * 3600 // 30 days
}

fn default_approval_threshold() -> u64 {
    1
}

fn default_zero() -> String {
    "0".to_string()
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: default_profile_name(),
            metadata_pointer: default_profile_pointer(),
            metadata_protocol: default_protocol(),
            members: Vec::new(),
            owner: None,
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            artifact: None,
            name: default_strategy_name(),
            use_registry_anchor: false,
            allocation_duration_secs: default_allocation_duration_secs(),
            approval_threshold: default_approval_threshold(),
            max_requested_amount: default_zero(),
            token: None,
            amount: default_zero(),
            managers: Vec::new(),
        }
    }
}

/// Profile fields resolved against the signer
#[derive(Debug, Clone)]
pub struct ProfileDefaults {
    /// Display name
    pub name: String,
    /// Profile metadata
    pub metadata: Metadata,
    /// Members
    pub members: Vec<Address>,
    /// Owner
    pub owner: Address,
}

/// Validated, typed settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Chain client options
    pub client: ClientOptions,
    /// Transaction signer
    pub signer: Signer,
    /// Registry contract
    pub registry_address: Address,
    /// Allo contract
    pub allo_address: Address,
    /// Confirmation depth
    pub confirmations: usize,
    /// Pinning service
    pub ipfs: IpfsConfig,
    /// Profile defaults
    pub profile: ProfileDefaults,
    /// Pool metadata
    pub pool: PoolTemplate,
    /// Strategy artifact path, required only for pool creation
    pub strategy_artifact: Option<PathBuf>,
    /// Strategy parameters with the allocation window starting at validation time
    pub strategy: StrategySettings,
}

fn map_env_key(key: &UncasedStr) -> Uncased<'_> {
    let key = key.as_str().to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(&format!("{section}_")) {
            return Uncased::from(format!("{section}.{rest}"));
        }
    }
    Uncased::from(key)
}

/// Sections needed to resolve the profile owner
#[derive(Debug, Default, Deserialize)]
struct OwnerSections {
    #[serde(default)]
    signer: SignerConfig,
    #[serde(default)]
    profile: ProfileConfig,
}

fn signer(config: &SignerConfig) -> Result<Signer> {
    let key = config
        .key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| config_error("signer.key", "missing, set ALLO_SIGNER_KEY"))?;
    Signer::from_hex(key).map_err(|e| config_error("signer.key", e))
}

fn config_error(field: &str, err: impl std::fmt::Display) -> AlloError {
    AlloError::Config(format!("{field}: {err}"))
}

fn address(field: &str, value: &str) -> Result<Address> {
    parse_address(value).map_err(|e| config_error(field, e))
}

fn addresses(field: &str, values: &[String]) -> Result<Vec<Address>> {
    values.iter().map(|v| address(field, v)).collect()
}

fn wei(field: &str, value: &str) -> Result<U256> {
    U256::from_dec_str(value.trim()).map_err(|e| config_error(field, format!("{value}: {e:?}")))
}

impl Config {
    /// Figment for `path` (if any) overlaid with `ALLO_*` variables
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("ALLO_").map(map_env_key))
    }

    /// Load configuration
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Config = Self::figment(path).extract()?;
        info!(
            "✅ Configuration loaded for chain {} ({})",
            config.chain.id,
            chains::chain_info(config.chain.id).map_or("unknown", |c| c.name)
        );
        Ok(config)
    }

    /// Profile owner without touching the chain: `profile.owner` when set,
    /// the address of `signer.key` otherwise. Other sections may be absent.
    pub fn profile_owner(path: Option<&Path>) -> Result<Address> {
        let sections: OwnerSections = Self::figment(path).extract()?;
        match &sections.profile.owner {
            Some(owner) => address("profile.owner", owner),
            None => Ok(signer(&sections.signer)?.address()),
        }
    }

    /// Validate every field and resolve defaults
    pub fn validate(&self) -> Result<Settings> {
        let rpc_url = Url::parse(&self.chain.rpc_url).map_err(|e| config_error("chain.rpc_url", e))?;
        if !matches!(rpc_url.scheme(), "http" | "https") {
            return Err(config_error("chain.rpc_url", "must be http(s)"));
        }
        if self.chain.confirmations == 0 {
            return Err(config_error("chain.confirmations", "must be at least 1"));
        }
        if self.chain.poll_interval_ms == 0 || self.chain.receipt_timeout_secs == 0 {
            return Err(config_error("chain", "poll interval and receipt timeout must be positive"));
        }
        match chains::chain_info(self.chain.id) {
            Some(info) if !info.testnet => warn!("⚠️ Chain {} is a production network", info.name),
            Some(_) => {}
            None => warn!("⚠️ Chain {} is not a known Allo deployment", self.chain.id),
        }

        let signer = signer(&self.signer)?;

        let registry_address = address(
            "chain.registry_address",
            self.chain.registry_address.as_deref().unwrap_or(chains::REGISTRY_ADDRESS),
        )?;
        let allo_address = address(
            "chain.allo_address",
            self.chain.allo_address.as_deref().unwrap_or(chains::ALLO_ADDRESS),
        )?;

        self.ipfs.validate().map_err(|e| config_error("ipfs", e))?;

        let pointer: Pointer = self
            .profile
            .metadata_pointer
            .parse()
            .map_err(|e| config_error("profile.metadata_pointer", e))?;
        let owner = match &self.profile.owner {
            Some(owner) => address("profile.owner", owner)?,
            None => signer.address(),
        };
        let mut members = addresses("profile.members", &self.profile.members)?;
        if members.is_empty() {
            members.push(owner);
        }

        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
        let allocation_end_time = now
            .checked_add(self.strategy.allocation_duration_secs)
            .ok_or_else(|| config_error("strategy.allocation_duration_secs", "allocation window ends past u64 time"))?;
        let strategy = StrategySettings {
            name: self.strategy.name.clone(),
            init: MicroGrantsInit {
                use_registry_anchor: self.strategy.use_registry_anchor,
                allocation_start_time: now,
                allocation_end_time,
                approval_threshold: U256::from(self.strategy.approval_threshold),
                max_requested_amount: wei("strategy.max_requested_amount", &self.strategy.max_requested_amount)?,
            },
            token: address(
                "strategy.token",
                self.strategy.token.as_deref().unwrap_or(chains::NATIVE_TOKEN),
            )?,
            amount: wei("strategy.amount", &self.strategy.amount)?,
            managers: addresses("strategy.managers", &self.strategy.managers)?,
        };

        Ok(Settings {
            client: ClientOptions {
                rpc_url,
                chain_id: self.chain.id,
                request_timeout: Duration::from_secs(self.chain.request_timeout_secs),
                poll_interval: Duration::from_millis(self.chain.poll_interval_ms),
                receipt_timeout: Duration::from_secs(self.chain.receipt_timeout_secs),
            },
            signer,
            registry_address,
            allo_address,
            confirmations: self.chain.confirmations,
            ipfs: self.ipfs.clone(),
            profile: ProfileDefaults {
                name: self.profile.name.clone(),
                metadata: Metadata {
                    protocol: U256::from(self.profile.metadata_protocol),
                    pointer: pointer.to_string(),
                },
                members,
                owner,
            },
            pool: self.pool.clone(),
            strategy_artifact: self.strategy.artifact.clone(),
            strategy,
        })
    }
}
