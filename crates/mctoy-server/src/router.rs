//! API route table

use mctoy_core::PlaceId;
use percent_encoding::percent_decode_str;
use regex::Regex;

/// A matched API route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/locations`
    Locations,
    /// `/locations/:placeId/toys`
    LocationToys(PlaceId),
    /// `/toys`
    Toys,
    /// `/health`
    Health,
}

impl Route {
    /// Methods this route answers, for the `Allow` header on a 405
    pub fn allowed_methods(&self) -> &'static str {
        match self {
            Route::Locations => "GET, POST",
            Route::LocationToys(_) => "PUT",
            Route::Toys | Route::Health => "GET",
        }
    }
}

/// Why a path did not produce a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Not an API path
    NoMatch,
    /// A `placeId` segment that does not decode to UTF-8
    BadPlaceId,
}

/// Router for API paths
pub struct Router {
    toys_of_place: Regex,
}

impl Router {
    /// Compile the route patterns
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            toys_of_place: Regex::new(r"^/locations/([^/]+)/toys/?$")?,
        })
    }

    /// Match a request path to a route
    pub fn route(&self, path: &str) -> Result<Route, RouteError> {
        match path.trim_end_matches('/') {
            "/locations" => return Ok(Route::Locations),
            "/toys" => return Ok(Route::Toys),
            "/health" => return Ok(Route::Health),
            _ => {}
        }

        let captures = self.toys_of_place.captures(path).ok_or(RouteError::NoMatch)?;
        let raw = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let decoded = percent_decode_str(raw)
            .decode_utf8()
            .map_err(|_| RouteError::BadPlaceId)?;
        Ok(Route::LocationToys(PlaceId::new(decoded.into_owned())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_routes() {
        let router = Router::new().unwrap();
        assert_eq!(router.route("/locations"), Ok(Route::Locations));
        assert_eq!(router.route("/locations/"), Ok(Route::Locations));
        assert_eq!(router.route("/toys"), Ok(Route::Toys));
        assert_eq!(router.route("/health"), Ok(Route::Health));
    }

    #[test]
    fn test_toys_route_decodes_place_id() {
        let router = Router::new().unwrap();
        assert_eq!(
            router.route("/locations/123456/toys"),
            Ok(Route::LocationToys(PlaceId::new("123456")))
        );
        assert_eq!(
            router.route("/locations/node%2F42/toys"),
            Ok(Route::LocationToys(PlaceId::new("node/42")))
        );
        assert_eq!(
            router.route("/locations/%FF/toys"),
            Err(RouteError::BadPlaceId)
        );
    }

    #[test]
    fn test_no_match() {
        let router = Router::new().unwrap();
        assert_eq!(router.route("/"), Err(RouteError::NoMatch));
        assert_eq!(router.route("/locations/1"), Err(RouteError::NoMatch));
        assert_eq!(router.route("/locations//toys"), Err(RouteError::NoMatch));
        assert_eq!(router.route("/index.html"), Err(RouteError::NoMatch));
    }
}
