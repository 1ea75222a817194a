// =============================================================================
// Allo Starter Kit - Library Crate
// =============================================================================
//
// License: Apache 2.0 / MIT
//
// Description:
//   Creates an Allo v2 profile, pins pool metadata to IPFS and deploys a
//   MicroGrants pool for it. Chain access lives in `allo-web3`, pinning in
//   `allo-ipfs`; this crate sequences them.
//
// =============================================================================

pub mod config;
pub mod error;
pub mod metadata;
pub mod pool;
pub mod registry;
pub mod strategy;
pub mod transaction;

pub use config::{Config, Settings};
pub use error::{AlloError, Result};
pub use metadata::{PoolMetadata, PoolTemplate};
pub use pool::PoolBootstrap;
pub use registry::{profile_args, ProfileCreator, RegistryClient};
pub use strategy::{MicroGrantsDeployer, StrategyDeployer, StrategySettings};

// Re-export workspace crates
pub use allo_ipfs as ipfs;
pub use allo_web3 as web3;
