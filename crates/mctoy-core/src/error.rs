//! Error types for mctoy-core

use crate::identity::PlaceId;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// A toy edit targeted a place the directory does not hold.
    #[error("Location not found: {0}")]
    NotFound(PlaceId),

    /// A network round trip failed or timed out.
    #[error("Transport error: {0}")]
    Transport(String),

    /// An external service answered with something we could not use.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Geocoding returned no match for the searched address.
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// The toy catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(String),
}

impl Error {
    /// Whether this is the toy-edit `NotFound` condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
