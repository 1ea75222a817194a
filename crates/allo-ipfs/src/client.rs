//! IPFS client
//!
//! Pins JSON documents through the IPFS HTTP API and hands back the content
//! pointer that is later referenced on-chain.

use std::io::Cursor;
use std::time::Instant;

use async_trait::async_trait;
use ipfs_api::{IpfsApi, IpfsClient, TryFromUri};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::IpfsConfig;
use crate::error::{Error, Result};
use crate::types::Pointer;

/// Content-addressed pinning service
#[async_trait]
pub trait Pinner: Send + Sync {
    /// Pin `document` and return its pointer
    async fn pin_json(&self, document: &Value) -> Result<Pointer>;
}

/// Pinner backed by an IPFS node's HTTP API
pub struct IpfsPinner {
    api: IpfsClient,
    config: IpfsConfig,
}

impl IpfsPinner {
    /// Create new IPFS pinner
    pub fn new(config: IpfsConfig) -> Result<Self> {
        debug!("🔧 Creating IPFS pinner for {}", config.api_url);
        let url = config.validate()?;

        let mut api = IpfsClient::from_str(url.as_str())
            .map_err(|e| Error::Config(format!("api_url {url}: {e}")))?;
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            api = api.with_credentials(username.as_str(), password.as_str());
        }

        info!("✅ IPFS pinner ready for {}", url);
        Ok(Self { api, config })
    }

    async fn add_and_pin(&self, bytes: Vec<u8>) -> Result<Pointer> {
        let added = self.api.add(Cursor::new(bytes)).await?;
        let pointer: Pointer = added.hash.parse()?;
        self.api.pin_add(pointer.as_str(), true).await?;
        Ok(pointer)
    }
}

#[async_trait]
impl Pinner for IpfsPinner {
    #[instrument(level = "debug", skip(self, document))]
    async fn pin_json(&self, document: &Value) -> Result<Pointer> {
        debug!("🔧 Pinning JSON document");
        let start = Instant::now();

        let bytes = serde_json::to_vec(document)?;
        let size = bytes.len();
        let pointer = tokio::time::timeout(self.config.pin_timeout, self.add_and_pin(bytes)).await??;

        info!("✅ Pinned {} bytes as {} in {:?}", size, pointer, start.elapsed());
        Ok(pointer)
    }
}
