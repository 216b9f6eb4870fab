//! `/locations` REST handlers
//!
//! Dispatch works on plain method/route/body values so the whole API can be
//! exercised without a socket. Store calls run on the blocking pool.

use crate::router::Route;
use crate::ServerState;
use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue, ALLOW};
use hyper::{Method, StatusCode};
use mctoy_core::{PlaceRecord, ToysUpdate};
use percent_encoding::percent_decode_str;
use serde::Serialize;

const TEXT: &str = "text/plain; charset=utf-8";
const JSON: &str = "application/json";

/// A response before it is turned into a hyper response
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Bytes,
    pub headers: Vec<(HeaderName, HeaderValue)>,
}

impl ApiResponse {
    /// Plain text response
    pub fn text(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            content_type: TEXT,
            body: Bytes::from(message.into()),
            headers: Vec::new(),
        }
    }

    /// JSON response, or a 500 if `value` cannot be serialized
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status: StatusCode::OK,
                content_type: JSON,
                body: Bytes::from(body),
                headers: Vec::new(),
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response");
                Self::text(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }

    fn with_header(mut self, name: HeaderName, value: &'static str) -> Self {
        self.headers.push((name, HeaderValue::from_static(value)));
        self
    }

    /// Body as UTF-8 text (lossy), mostly useful in tests and logs
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Handle one API request
pub async fn dispatch(
    state: &ServerState,
    method: &Method,
    route: &Route,
    query: Option<&str>,
    body: &[u8],
) -> ApiResponse {
    match (method, route) {
        (&Method::GET, Route::Locations) => list_locations(state, query).await,
        (&Method::POST, Route::Locations) => save_locations(state, body).await,
        (&Method::PUT, Route::LocationToys(place_id)) => update_toys(state, place_id, body).await,
        (&Method::GET, Route::Toys) => {
            let toys: Vec<_> = state.catalog.list_toys().collect();
            ApiResponse::json(&toys)
        }
        (&Method::GET, Route::Health) => ApiResponse::text(StatusCode::OK, "ok"),
        (&Method::OPTIONS, _) => preflight(route),
        _ => ApiResponse::text(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
            .with_header(ALLOW, route.allowed_methods()),
    }
}

async fn list_locations(state: &ServerState, query: Option<&str>) -> ApiResponse {
    let toy = query.and_then(|q| query_param(q, "toy")).filter(|t| !t.is_empty());
    let result = state
        .store
        .run_blocking(move |store| match toy.as_deref() {
            Some(toy) => store.places_with_toy(toy),
            None => store.list_places(),
        })
        .await;
    match result {
        Ok(places) => ApiResponse::json(&places),
        Err(e) => {
            tracing::warn!(error = %e, "failed to list locations");
            ApiResponse::text(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching locations")
        }
    }
}

async fn save_locations(state: &ServerState, body: &[u8]) -> ApiResponse {
    let records: Vec<PlaceRecord> = match serde_json::from_slice(body) {
        Ok(records) => records,
        Err(e) => {
            return ApiResponse::text(
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {}", e),
            )
        }
    };
    let received = records.len();
    match state
        .store
        .run_blocking(move |store| store.upsert_many(&records))
        .await
    {
        Ok(inserted) => {
            tracing::info!(received, inserted, "locations saved");
            ApiResponse::text(StatusCode::OK, "Data saved successfully")
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to save locations");
            ApiResponse::text(StatusCode::INTERNAL_SERVER_ERROR, "Error saving locations")
        }
    }
}

async fn update_toys(
    state: &ServerState,
    place_id: &mctoy_core::PlaceId,
    body: &[u8],
) -> ApiResponse {
    let update: ToysUpdate = match serde_json::from_slice(body) {
        Ok(update) => update,
        Err(e) => {
            return ApiResponse::text(
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {}", e),
            )
        }
    };
    let toys = update.toys.len();
    let id = place_id.clone();
    match state
        .store
        .run_blocking(move |store| store.set_toys(&id, &update.toys))
        .await
    {
        Ok(()) => {
            tracing::info!(place_id = %place_id, toys, "toys updated");
            ApiResponse::text(StatusCode::OK, "Toys updated successfully")
        }
        Err(mctoy_db::Error::NotFound(_)) => {
            ApiResponse::text(StatusCode::NOT_FOUND, "Location not found")
        }
        Err(e) => {
            tracing::warn!(place_id = %place_id, error = %e, "failed to update toys");
            ApiResponse::text(StatusCode::INTERNAL_SERVER_ERROR, "Error updating toys")
        }
    }
}

fn preflight(route: &Route) -> ApiResponse {
    let methods = route.allowed_methods();
    let mut response = ApiResponse::text(StatusCode::NO_CONTENT, "");
    response.headers.push((ALLOW, HeaderValue::from_static(methods)));
    response.headers.push((
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static(methods),
    ));
    response
        .with_header(
            HeaderName::from_static("access-control-allow-headers"),
            "Content-Type",
        )
}

/// First value of `key` in a query string, `+` and percent escapes decoded
pub fn query_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        (name == key).then(|| {
            percent_decode_str(&value.replace('+', " "))
                .decode_utf8_lossy()
                .into_owned()
        })
    })
}
