//! McToy Net - Outbound HTTP adapters
//!
//! - [`OverpassClient`]: nearby restaurants from the Overpass API
//! - [`NominatimClient`]: address lookup with an in-memory cache
//! - [`HttpDirectory`]: the REST place directory, seen from a client
//!
//! Every adapter only translates between the provider's wire format and the
//! `mctoy-core` types. None of them retries; a failed call surfaces as
//! `Error::Transport` and the caller decides what to do.

mod client;
mod directory;
mod nominatim;
mod overpass;

pub use client::{build_client, ClientConfig, USER_AGENT};
pub use directory::HttpDirectory;
pub use nominatim::{parse_search, NominatimClient, DEFAULT_NOMINATIM_URL};
pub use overpass::{
    build_query, format_address, parse_elements, OverpassClient, OverpassQuery,
    ADDRESS_NOT_AVAILABLE, DEFAULT_OVERPASS_URL, DEFAULT_PLACE_NAME,
};
