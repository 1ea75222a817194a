//! Error types for IPFS integration
//!
//! This module defines the error types raised while pinning metadata.

use thiserror::Error;

/// IPFS error types
#[derive(Error, Debug)]
pub enum Error {
    /// IPFS API error
    #[error("IPFS API error: {0}")]
    IpfsApi(String),

    /// The node answered and refused the request
    #[error("IPFS API rejected request: {0}")]
    Rejected(String),

    /// CID error
    #[error("CID error: {0}")]
    Cid(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Timeout error
    #[error("Timeout error: {0}")]
    Timeout(String),
}

impl Error {
    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::IpfsApi(_) | Error::Timeout(_))
    }
}

/// Result type for IPFS operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<ipfs_api::Error> for Error {
    fn from(err: ipfs_api::Error) -> Self {
        match &err {
            ipfs_api::Error::Api(_) => Error::Rejected(err.to_string()),
            _ => Error::IpfsApi(err.to_string()),
        }
    }
}

impl From<cid::Error> for Error {
    fn from(err: cid::Error) -> Self {
        Error::Cid(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        Error::Timeout(err.to_string())
    }
}
