//! Identity type for places

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable external identifier of a place (e.g. a POI-index node id)
///
/// Serialized as a bare string, so `"123"` on the wire maps to `PlaceId("123")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(pub String);

impl PlaceId {
    /// Create a new place ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlaceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PlaceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for PlaceId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}
