//! Allo Web3 Integration Library
//!
//! Chain access for the Allo starter kit: a JSON-RPC client that signs and
//! submits transactions and waits for confirmed receipts, plus `ethabi`
//! bindings for the Allo v2 Registry, Allo core and MicroGrants strategy.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod chains;
pub mod client;
pub mod contracts;
pub mod error;
pub mod events;
pub mod types;
pub mod wallet;

pub use web3;

pub use client::{ChainClient, ClientOptions, Web3Client};
pub use contracts::{
    Allo, CreatePoolArgs, CreateProfileArgs, Metadata, MicroGrantsInit, MicroGrantsStrategy, Registry,
};
pub use error::{ChainError, ContractError};
pub use types::{Receipt, ReceiptLog, TransactionData};
pub use wallet::{predict_profile_id, Signer, WalletError};

/// Re-export of common types
pub mod prelude {
    pub use super::{ChainClient, ChainError, ContractError, Receipt, TransactionData};
    pub use web3::types::{Address, Bytes, H256, U256};
    pub use web3::Error as Web3Error;
}
