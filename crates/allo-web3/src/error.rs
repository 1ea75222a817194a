//! Error Handling Module
//!
//! Errors raised by the chain client and the contract bindings.

use thiserror::Error;
use web3::types::H256;

/// Errors from talking to the chain
#[derive(Debug, Error)]
pub enum ChainError {
    /// JSON-RPC transport or node error
    #[error("Web3 provider error: {0}")]
    Provider(#[from] web3::Error),

    /// The node rejected the transaction before it was mined
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// Local signing failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// No receipt with enough confirmations arrived in time
    #[error("Timed out waiting for receipt of {0:?}")]
    ReceiptTimeout(H256),

    /// The endpoint serves a different chain than configured
    #[error("Chain id mismatch: expected {expected}, endpoint reports {actual}")]
    ChainMismatch {
        /// Configured chain id
        expected: u64,
        /// Chain id returned by `eth_chainId`
        actual: u64,
    },

    /// Invalid client configuration
    #[error("Invalid chain configuration: {0}")]
    Config(String),
}

impl ChainError {
    /// Transport failures and timeouts can be retried; rejections cannot
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ChainError::Provider(web3::Error::Transport(_))
                | ChainError::Provider(web3::Error::Unreachable)
                | ChainError::ReceiptTimeout(_)
        )
    }
}

/// Errors from encoding calls or decoding events
#[derive(Debug, Error)]
pub enum ContractError {
    /// ABI error
    #[error("Ethabi error: {0}")]
    Ethabi(#[from] web3::ethabi::Error),

    /// Invalid address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid bytecode artifact
    #[error("Invalid bytecode: {0}")]
    InvalidBytecode(String),

    /// Expected event missing from the receipt
    #[error("Event {0} not found in receipt")]
    EventNotFound(&'static str),

    /// Event present but a field is missing or has the wrong type
    #[error("Event {event} has malformed field {field}")]
    MalformedEvent {
        /// Event name
        event: &'static str,
        /// Field name
        field: &'static str,
    },
}

/// Result type for chain operations
pub type Result<T> = std::result::Result<T, ChainError>;
