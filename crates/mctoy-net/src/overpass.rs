//! Overpass API place source
//!
//! Runs a radius query for named fast-food nodes and turns each returned
//! node into a [`DiscoveredPlace`].

use crate::client::{base_url, build_client, encode_component, request_error, ClientConfig};
use async_trait::async_trait;
use mctoy_core::{Coordinates, DiscoveredPlace, Error, PlaceId, PlaceSource, Result};
use reqwest::Client;
use serde_json::{Map, Value};

/// Public Overpass interpreter endpoint
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Name used when a node carries no `name` tag
pub const DEFAULT_PLACE_NAME: &str = "McDonald's";

/// Address used when a node has no street tag
pub const ADDRESS_NOT_AVAILABLE: &str = "Address not available";

/// Which nodes to ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassQuery {
    /// Value of the `amenity` tag
    pub amenity: String,
    /// Regex matched against the `name` tag
    pub name_pattern: String,
}

impl Default for OverpassQuery {
    fn default() -> Self {
        Self {
            amenity: "fast_food".to_string(),
            name_pattern: DEFAULT_PLACE_NAME.to_string(),
        }
    }
}

/// Overpass QL for nodes matching `query` within `radius_meters` of `center`
pub fn build_query(query: &OverpassQuery, center: Coordinates, radius_meters: u32) -> String {
    format!(
        "[out:json];node[\"amenity\"=\"{}\"][\"name\"~\"{}\"](around:{},{},{});out body;",
        query.amenity, query.name_pattern, radius_meters, center.lat, center.lng
    )
}

/// `"{street}, {city} {postcode}"`, or the placeholder without a street.
///
/// Missing city or postcode become empty segments, so spacing is kept
/// literally: `"5th Ave,  10001"`.
pub fn format_address(tags: &Map<String, Value>) -> String {
    let tag = |key: &str| tags.get(key).and_then(Value::as_str).unwrap_or("");
    let street = tag("addr:street");
    if street.is_empty() {
        return ADDRESS_NOT_AVAILABLE.to_string();
    }
    format!("{}, {} {}", street, tag("addr:city"), tag("addr:postcode"))
}

/// Translate an Overpass response body.
///
/// Elements without an id or coordinates are skipped one by one; a body with
/// no `elements` array at all is a malformed response.
pub fn parse_elements(body: &Value) -> Result<Vec<DiscoveredPlace>> {
    let elements = body
        .get("elements")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::MalformedResponse("overpass response has no elements".to_string()))?;

    let mut places = Vec::with_capacity(elements.len());
    for element in elements {
        match parse_element(element) {
            Some(place) => places.push(place),
            None => tracing::warn!(%element, "skipping unparseable overpass element"),
        }
    }
    Ok(places)
}

fn parse_element(element: &Value) -> Option<DiscoveredPlace> {
    let id = match element.get("id")? {
        Value::Number(n) => n.as_u64()?.to_string(),
        Value::String(s) if !s.is_empty() => s.clone(),
        _ => return None,
    };
    let lat = element.get("lat")?.as_f64()?;
    let lng = element.get("lon")?.as_f64()?;

    let empty = Map::new();
    let tags = element.get("tags").and_then(Value::as_object).unwrap_or(&empty);
    let name = tags
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_PLACE_NAME);

    Some(DiscoveredPlace {
        place_id: PlaceId::new(id),
        display_name: name.to_string(),
        coordinates: Coordinates::new(lat, lng),
        address: format_address(tags),
        rating: None,
    })
}

/// Place source backed by an Overpass endpoint
pub struct OverpassClient {
    client: Client,
    endpoint: String,
    query: OverpassQuery,
}

impl OverpassClient {
    /// Create a client for the given interpreter endpoint
    pub fn new(endpoint: impl Into<String>, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            endpoint: base_url(endpoint),
            query: OverpassQuery::default(),
        })
    }

    /// Override which nodes are queried
    pub fn with_query(mut self, query: OverpassQuery) -> Self {
        self.query = query;
        self
    }

    fn request_url(&self, center: Coordinates, radius_meters: u32) -> String {
        let query = build_query(&self.query, center, radius_meters);
        format!("{}?data={}", self.endpoint, encode_component(&query))
    }
}

#[async_trait]
impl PlaceSource for OverpassClient {
    async fn discover(
        &self,
        center: Coordinates,
        radius_meters: u32,
    ) -> Result<Vec<DiscoveredPlace>> {
        let url = self.request_url(center, radius_meters);
        let response = self.client.get(&url).send().await.map_err(request_error)?;
        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "overpass answered {}",
                response.status()
            )));
        }
        let body: Value = response.json().await.map_err(request_error)?;
        let places = parse_elements(&body)?;
        tracing::info!(
            lat = center.lat,
            lng = center.lng,
            radius_meters,
            found = places.len(),
            "overpass discovery"
        );
        Ok(places)
    }
}
