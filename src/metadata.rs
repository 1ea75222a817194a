// =============================================================================
// Allo Starter Kit - Pool Metadata
// =============================================================================
//
// License: Apache 2.0 / MIT
//
// Description:
//   The JSON document pinned to IPFS for a pool. Only its pointer goes
//   on-chain.
//
// =============================================================================

use std::path::Path;

use allo_web3::prelude::H256;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AlloError, Result};

/// Fixed pool fields supplied by configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTemplate {
    /// Pool name
    pub name: String,
    /// Project website
    pub website: String,
    /// Free-form description
    pub description: String,
    /// Optional image as a `data:<mime>;base64,` URL
    #[serde(default)]
    pub image: Option<String>,
}

impl Default for PoolTemplate {
    fn default() -> Self {
        Self {
            name: "Allo Starter Kit".into(),
            website: "https://allo.gitcoin.co".into(),
            description: "A starter kit for Allo".into(),
            image: None,
        }
    }
}

/// Pool metadata document as pinned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMetadata {
    /// Owning profile
    pub profile_id: H256,
    /// Pool name
    pub name: String,
    /// Project website
    pub website: String,
    /// Free-form description
    pub description: String,
    /// Inline base64 image, or the pointer it was pinned under, or empty
    pub base64_image: String,
}

impl PoolMetadata {
    /// Fill `template` for `profile_id`
    pub fn new(profile_id: H256, template: &PoolTemplate) -> Self {
        Self {
            profile_id,
            name: template.name.clone(),
            website: template.website.clone(),
            description: template.description.clone(),
            base64_image: template.image.clone().unwrap_or_default(),
        }
    }

    /// Inline `data:...;base64,` payload that should be pinned on its own first
    pub fn inline_image(&self) -> Option<&str> {
        let image = self.base64_image.as_str();
        let header = image.strip_prefix("data:")?.split_once(',')?.0;
        header.ends_with(";base64").then_some(image)
    }

    /// JSON form handed to the pinner
    pub fn to_json(&self) -> Result<Value> {
        document(self)
    }
}

fn document<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| AlloError::Pinning(e.into()))
}

/// Read an image file into a `data:` URL
pub fn image_data_url(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{}", mime.essence_str(), encoded))
}
