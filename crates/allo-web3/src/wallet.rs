//! Wallet Management Module
//!
//! Loads the signing key used for every transaction and derives the
//! identifiers the registry computes from it.

use std::fmt;

use thiserror::Error;
use tiny_keccak::{Hasher, Keccak};
use tracing::{info, instrument};
use web3::signing::{Key, SecretKey, SecretKeyRef};
use web3::types::{Address, H256, U256};

/// Keccak-256 hash function
pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    let mut hasher = Keccak::v256();
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Profile id the registry assigns to `(nonce, owner)`:
/// `keccak256(abi.encodePacked(uint256 nonce, address owner))`.
pub fn predict_profile_id(nonce: U256, owner: Address) -> H256 {
    let mut packed = [0u8; 52];
    nonce.to_big_endian(&mut packed[..32]);
    packed[32..].copy_from_slice(owner.as_bytes());
    H256(keccak256(&packed))
}

/// Local transaction signer
#[derive(Clone)]
pub struct Signer {
    secret_key: SecretKey,
    address: Address,
}

impl Signer {
    /// Load a signer from a hex-encoded private key, with or without `0x`
    #[instrument(level = "debug", skip(hex_key))]
    pub fn from_hex(hex_key: &str) -> Result<Self, WalletError> {
        let trimmed = hex_key.trim().trim_start_matches("0x");
        let bytes = hex::decode(trimmed).map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        let address = SecretKeyRef::new(&secret_key).address();

        info!("🔑 Loaded signer {:?}", address);
        Ok(Self {
            secret_key,
            address,
        })
    }

    /// Address transactions are sent from
    pub fn address(&self) -> Address {
        self.address
    }

    pub(crate) fn key(&self) -> SecretKeyRef<'_> {
        SecretKeyRef::new(&self.secret_key)
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Wallet-specific errors
#[derive(Error, Debug)]
pub enum WalletError {
    /// Invalid key format
    #[error("Invalid key format: {0}")]
    InvalidKey(String),
}
