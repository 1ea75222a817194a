// =============================================================================
// Allo Starter Kit - Error Types
// =============================================================================
//
// License: Apache 2.0 / MIT
//
// Description:
//   One variant per stage of the profile/pool flow so callers can tell a
//   transient network failure from a permanent on-chain one.
//
// =============================================================================

use allo_web3::prelude::H256;
use allo_web3::{ChainError, ContractError};
use thiserror::Error;

/// Allo starter kit error types
#[derive(Debug, Error)]
pub enum AlloError {
    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The gas price could not be read; nothing was sent
    #[error("Gas price unavailable: {0}")]
    GasPriceUnavailable(#[source] ChainError),

    /// A call could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(#[source] ContractError),

    /// The node did not accept the transaction
    #[error("Transaction send failed: {0}")]
    TransactionSend(#[source] ChainError),

    /// The receipt never arrived or never reached the confirmation depth
    #[error("Receipt wait failed: {0}")]
    ReceiptWait(#[source] ChainError),

    /// The transaction was mined but reverted
    #[error("Transaction {0:?} reverted")]
    TransactionReverted(H256),

    /// The receipt did not carry a usable `ProfileCreated` event
    #[error("Profile creation failed: {0}")]
    ProfileCreationFailed(String),

    /// The receipt did not carry a usable `PoolCreated` event
    #[error("Pool creation failed: {0}")]
    PoolCreationFailed(String),

    /// Metadata could not be pinned
    #[error("Pinning failed: {0}")]
    Pinning(#[from] allo_ipfs::Error),

    /// Strategy or pool deployment failed
    #[error("Deployment failed: {0}")]
    Deployment(#[source] Box<AlloError>),
}

impl AlloError {
    /// Whether the same call could succeed if simply repeated.
    ///
    /// Network and timing failures are retryable; reverts, missing events,
    /// bad configuration and rejected transactions are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            AlloError::GasPriceUnavailable(_) | AlloError::ReceiptWait(_) => true,
            AlloError::TransactionSend(e) => e.is_transient(),
            AlloError::Pinning(e) => e.is_transient(),
            AlloError::Deployment(inner) => inner.is_retryable(),
            _ => false,
        }
    }

    /// Wrap a stage error as a deployment failure
    pub fn deployment(err: AlloError) -> Self {
        match err {
            AlloError::Deployment(_) => err,
            other => AlloError::Deployment(Box::new(other)),
        }
    }
}

/// Result type for Allo starter kit operations
pub type Result<T> = std::result::Result<T, AlloError>;

impl From<figment::Error> for AlloError {
    fn from(err: figment::Error) -> Self {
        AlloError::Config(err.to_string())
    }
}
