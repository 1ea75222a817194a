//! IPFS configuration
//!
//! Endpoint, credentials and timeouts for the pinning service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// IPFS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpfsConfig {
    /// HTTP API endpoint of the node or pinning gateway
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Basic-auth user (project id for hosted gateways)
    #[serde(default, deserialize_with = "text::deserialize")]
    pub username: Option<String>,

    /// Basic-auth password (project secret for hosted gateways)
    #[serde(default, deserialize_with = "text::deserialize")]
    pub password: Option<String>,

    /// Limit for a single add + pin round trip
    #[serde(default = "default_pin_timeout", with = "secs")]
    pub pin_timeout: Duration,
}

fn default_api_url() -> String {
    "http://127.0.0.1:5001".to_string()
}

fn default_pin_timeout() -> Duration {
    Duration::from_secs(60)
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// Credentials read from the environment may arrive as numbers or booleans.
mod text {
    use std::fmt;

    use serde::de::{self, Deserializer, Visitor};

    struct Text;

    impl<'de> Visitor<'de> for Text {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or a scalar")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_owned()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(Text)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        deserializer.deserialize_any(Text)
    }
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            username: None,
            password: None,
            pin_timeout: default_pin_timeout(),
        }
    }
}

impl IpfsConfig {
    /// Check the endpoint and credential pairing
    pub fn validate(&self) -> Result<Url> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| Error::Config(format!("api_url {}: {e}", self.api_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!("unsupported scheme {}", url.scheme())));
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(Error::Config("username and password must be set together".into()));
        }
        if self.pin_timeout.is_zero() {
            return Err(Error::Config("pin_timeout must be positive".into()));
        }
        Ok(url)
    }
}
