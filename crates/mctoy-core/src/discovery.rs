//! External provider seams: point-of-interest discovery and geocoding

use crate::error::Result;
use crate::model::{Coordinates, DiscoveredPlace};
use async_trait::async_trait;

/// Search radius used when none is configured
pub const DEFAULT_RADIUS_METERS: u32 = 5000;

/// Produces candidate places around a center point.
///
/// Implementations translate a provider response and nothing else: no
/// merging, no state. Entries that cannot be translated are dropped
/// individually.
#[async_trait]
pub trait PlaceSource: Send + Sync {
    async fn discover(&self, center: Coordinates, radius_meters: u32)
        -> Result<Vec<DiscoveredPlace>>;
}

/// Resolves free-text addresses to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the provider has no match.
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>>;
}
