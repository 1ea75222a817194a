//! Allo IPFS Integration
//!
//! Pins the JSON metadata documents that Allo profiles and pools point to.
//! Only the returned content pointer is stored on-chain.
//!
//! # Example
//! ```no_run
//! use allo_ipfs::{IpfsConfig, IpfsPinner, Pinner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pinner = IpfsPinner::new(IpfsConfig::default())?;
//!     let pointer = pinner.pin_json(&serde_json::json!({"name": "Allo Starter Kit"})).await?;
//!     println!("{pointer}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{IpfsPinner, Pinner};
pub use config::IpfsConfig;
pub use error::{Error, Result};
pub use types::Pointer;

/// IPFS integration version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
