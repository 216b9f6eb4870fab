//! Place document model.

use mctoy_core::{Coordinates, PlaceId, PlaceRecord};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored place document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredPlace {
    /// Primary key - place ID.
    #[primary_key]
    pub place_id: String,
    /// Display name.
    pub name: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Formatted address.
    pub address: String,
    /// Provider rating, if any.
    pub rating: Option<f64>,
    /// Toy names.
    pub toys: Vec<String>,
}

impl StoredPlace {
    /// Create from a place record, toys included.
    pub fn from_record(record: &PlaceRecord) -> Self {
        Self {
            place_id: record.place_id.as_str().to_string(),
            name: record.display_name.clone(),
            lat: record.coordinates.lat,
            lng: record.coordinates.lng,
            address: record.address.clone(),
            rating: record.rating,
            toys: record.toys.clone(),
        }
    }

    /// Convert to a place record.
    pub fn to_record(&self) -> PlaceRecord {
        PlaceRecord {
            place_id: PlaceId::new(self.place_id.clone()),
            display_name: self.name.clone(),
            coordinates: Coordinates::new(self.lat, self.lng),
            address: self.address.clone(),
            rating: self.rating,
            toys: self.toys.clone(),
        }
    }

    /// Overwrite the display fields from `record`; `toys` is untouched.
    pub fn merge_display_fields(&mut self, record: &PlaceRecord) {
        self.name = record.display_name.clone();
        self.lat = record.coordinates.lat;
        self.lng = record.coordinates.lng;
        self.address = record.address.clone();
        self.rating = record.rating;
    }
}
