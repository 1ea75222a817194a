//! IPFS types
//!
//! Content pointers returned by the pinning service. Parsing (`FromStr`,
//! deserialization) validates the CID; [`Pointer::new`] does not.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A validated content identifier as returned by `/api/v0/add`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pointer(String);

impl Pointer {
    /// Wrap a pointer without checking it
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The CID string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse as a CID and return its version (0 for `Qm…`, 1 for `bafy…`)
    pub fn version(&self) -> Result<u64, Error> {
        let cid = cid::Cid::try_from(self.0.as_str())?;
        Ok(u64::from(cid.version()))
    }
}

impl FromStr for Pointer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        cid::Cid::try_from(trimmed)?;
        Ok(Self(trimmed.to_owned()))
    }
}

impl TryFrom<String> for Pointer {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Pointer> for String {
    fn from(pointer: Pointer) -> Self {
        pointer.0
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
