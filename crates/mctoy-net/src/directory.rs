//! Directory store that talks to a remote `/locations` REST service

use crate::client::{base_url, build_client, encode_component, request_error, ClientConfig};
use async_trait::async_trait;
use mctoy_core::{DirectoryStore, Error, PlaceId, PlaceRecord, PlaceSet, Result, ToysUpdate};
use reqwest::{Client, Response, StatusCode};

/// Request/response variant of the place directory.
///
/// Every call is a single HTTP round trip. There is no push channel, so
/// [`DirectoryStore::subscribe`] keeps its `None` default.
pub struct HttpDirectory {
    client: Client,
    base_url: String,
}

impl HttpDirectory {
    /// Create a directory client for a server root such as `http://localhost:5000`
    pub fn new(base: impl Into<String>, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            base_url: base_url(base),
        })
    }

    /// Server root this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn locations_url(&self) -> String {
        format!("{}/locations", self.base_url)
    }

    fn toys_url(&self, place_id: &PlaceId) -> String {
        format!(
            "{}/locations/{}/toys",
            self.base_url,
            encode_component(place_id.as_str())
        )
    }
}

async fn expect_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Transport(format!("{} failed with {}: {}", what, status, body)))
}

#[async_trait]
impl DirectoryStore for HttpDirectory {
    async fn list_all(&self) -> Result<PlaceSet> {
        let response = self
            .client
            .get(self.locations_url())
            .send()
            .await
            .map_err(request_error)?;
        let response = expect_success(response, "GET /locations").await?;
        let places: PlaceSet = response.json().await.map_err(request_error)?;
        tracing::debug!(count = places.len(), "fetched locations");
        Ok(places)
    }

    async fn upsert_display_fields(&self, record: &PlaceRecord) -> Result<()> {
        self.upsert_many(std::slice::from_ref(record)).await
    }

    /// One `POST /locations` carrying the whole batch
    async fn upsert_many(&self, records: &[PlaceRecord]) -> Result<()> {
        let response = self
            .client
            .post(self.locations_url())
            .json(records)
            .send()
            .await
            .map_err(request_error)?;
        expect_success(response, "POST /locations").await?;
        tracing::debug!(count = records.len(), "saved locations");
        Ok(())
    }

    async fn set_toys(&self, place_id: &PlaceId, toys: &[String]) -> Result<()> {
        let body = ToysUpdate {
            toys: toys.to_vec(),
        };
        let response = self
            .client
            .put(self.toys_url(place_id))
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(place_id.clone()));
        }
        expect_success(response, "PUT /locations/:placeId/toys").await?;
        tracing::debug!(place_id = %place_id, toys = toys.len(), "updated toys");
        Ok(())
    }
}
