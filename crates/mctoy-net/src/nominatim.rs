//! Nominatim geocoder with a moka lookup cache

use crate::client::{base_url, build_client, encode_component, request_error, ClientConfig};
use async_trait::async_trait;
use mctoy_core::{Coordinates, Error, Geocoder, Result};
use moka::future::Cache;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Public Nominatim instance
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

const CACHE_CAPACITY: u64 = 1024;
const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Coordinates of the first search hit, `None` for an empty result.
///
/// Nominatim sends `lat`/`lon` as strings; plain numbers are accepted too.
pub fn parse_search(body: &Value) -> Result<Option<Coordinates>> {
    let hits = body.as_array().ok_or_else(|| {
        Error::MalformedResponse("nominatim search did not return an array".to_string())
    })?;
    let Some(first) = hits.first() else {
        return Ok(None);
    };
    let lat = coordinate(first, "lat")?;
    let lng = coordinate(first, "lon")?;
    Ok(Some(Coordinates::new(lat, lng)))
}

fn coordinate(hit: &Value, key: &str) -> Result<f64> {
    let parsed = match hit.get(key) {
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| Error::MalformedResponse(format!("nominatim hit has no usable {}", key)))
}

/// Geocoder backed by a Nominatim search endpoint
pub struct NominatimClient {
    client: Client,
    base_url: String,
    cache: Cache<String, Option<Coordinates>>,
}

impl NominatimClient {
    /// Create a client for the given Nominatim base URL
    pub fn new(base: impl Into<String>, config: &ClientConfig) -> Result<Self> {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();
        Ok(Self {
            client: build_client(config)?,
            base_url: base_url(base),
            cache,
        })
    }

    fn search_url(&self, address: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            encode_component(address)
        )
    }

    async fn lookup(&self, address: &str) -> Result<Option<Coordinates>> {
        let response = self
            .client
            .get(self.search_url(address))
            .send()
            .await
            .map_err(request_error)?;
        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "nominatim answered {}",
                response.status()
            )));
        }
        let body: Value = response.json().await.map_err(request_error)?;
        parse_search(&body)
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        let key = address.trim().to_string();
        if key.is_empty() {
            return Ok(None);
        }
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(address = %key, "geocode cache hit");
            return Ok(hit);
        }

        let found = self.lookup(&key).await?;
        tracing::info!(address = %key, found = found.is_some(), "geocoded");
        // Failed lookups are not cached, empty results are.
        self.cache.insert(key, found).await;
        Ok(found)
    }
}
