//! Place records and the ordered place set

use crate::identity::PlaceId;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create a coordinate pair
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A restaurant location plus the toys reported there
///
/// On the wire a record has the persisted shape
/// `{id, name, coordinates, address, rating, placeId, toys}` where `id`
/// repeats `placeId`. When reading, `placeId` wins over `id` and
/// `displayName` wins over `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlaceRecordWire", into = "PlaceRecordWire")]
pub struct PlaceRecord {
    pub place_id: PlaceId,
    pub display_name: String,
    pub coordinates: Coordinates,
    pub address: String,
    /// Provider-dependent, absent for most discovery sources.
    pub rating: Option<f64>,
    /// Toy names. Semantically a set; order is kept but carries no meaning.
    pub toys: Vec<String>,
}

impl PlaceRecord {
    /// Create a record with no toys
    pub fn new(
        place_id: impl Into<PlaceId>,
        display_name: impl Into<String>,
        coordinates: Coordinates,
        address: impl Into<String>,
    ) -> Self {
        Self {
            place_id: place_id.into(),
            display_name: display_name.into(),
            coordinates,
            address: address.into(),
            rating: None,
            toys: Vec::new(),
        }
    }

    /// Builder-style toy assignment
    pub fn with_toys<I, S>(mut self, toys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.toys = normalize_toys(toys);
        self
    }

    /// Builder-style rating assignment
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Copy of this record with display fields taken from `place`.
    ///
    /// `toys` is carried over untouched.
    pub fn refreshed(&self, place: &DiscoveredPlace) -> Self {
        Self {
            place_id: self.place_id.clone(),
            display_name: place.display_name.clone(),
            coordinates: place.coordinates,
            address: place.address.clone(),
            rating: place.rating,
            toys: self.toys.clone(),
        }
    }

    /// Overwrite the display fields in place, leaving `toys` alone.
    pub fn refresh_from(&mut self, other: &PlaceRecord) {
        self.display_name = other.display_name.clone();
        self.coordinates = other.coordinates;
        self.address = other.address.clone();
        self.rating = other.rating;
    }

    /// The display half of this record, as a discovery source would report it.
    pub fn discovered(&self) -> DiscoveredPlace {
        DiscoveredPlace {
            place_id: self.place_id.clone(),
            display_name: self.display_name.clone(),
            coordinates: self.coordinates,
            address: self.address.clone(),
            rating: self.rating,
        }
    }

    /// Whether the given toy name is listed for this place.
    pub fn has_toy(&self, name: &str) -> bool {
        self.toys.iter().any(|t| t == name)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceRecordWire {
    #[serde(default)]
    id: Option<PlaceId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    coordinates: Coordinates,
    #[serde(default)]
    address: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    place_id: Option<PlaceId>,
    #[serde(default)]
    toys: Vec<String>,
}

impl TryFrom<PlaceRecordWire> for PlaceRecord {
    type Error = String;

    fn try_from(wire: PlaceRecordWire) -> Result<Self, Self::Error> {
        let place_id = wire
            .place_id
            .or(wire.id)
            .ok_or_else(|| "place record has neither placeId nor id".to_string())?;
        let display_name = wire
            .display_name
            .or(wire.name)
            .ok_or_else(|| "place record has neither displayName nor name".to_string())?;
        Ok(Self {
            place_id,
            display_name,
            coordinates: wire.coordinates,
            address: wire.address,
            rating: wire.rating,
            toys: wire.toys,
        })
    }
}

impl From<PlaceRecord> for PlaceRecordWire {
    fn from(record: PlaceRecord) -> Self {
        Self {
            id: Some(record.place_id.clone()),
            name: Some(record.display_name),
            display_name: None,
            coordinates: record.coordinates,
            address: record.address,
            rating: record.rating,
            place_id: Some(record.place_id),
            toys: record.toys,
        }
    }
}

/// A candidate place produced by a discovery source. Carries no toy data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredPlace {
    pub place_id: PlaceId,
    pub display_name: String,
    pub coordinates: Coordinates,
    pub address: String,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl DiscoveredPlace {
    /// First sighting of this place: a record with no toys.
    pub fn into_record(self) -> PlaceRecord {
        PlaceRecord {
            place_id: self.place_id,
            display_name: self.display_name,
            coordinates: self.coordinates,
            address: self.address,
            rating: self.rating,
            toys: Vec::new(),
        }
    }
}

/// Body of a toy edit request: `{"toys": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToysUpdate {
    pub toys: Vec<String>,
}

/// Drop duplicate toy names, keeping the first occurrence of each.
pub fn normalize_toys<I, S>(toys: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    toys.into_iter()
        .map(Into::into)
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

/// Insertion-ordered set of place records keyed by `placeId`
///
/// Serialized as a plain array of records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<PlaceRecord>", into = "Vec<PlaceRecord>")]
pub struct PlaceSet {
    records: IndexMap<PlaceId, PlaceRecord>,
}

impl PlaceSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by place ID
    pub fn get(&self, id: &PlaceId) -> Option<&PlaceRecord> {
        self.records.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &PlaceId) -> Option<&mut PlaceRecord> {
        self.records.get_mut(id)
    }

    pub fn contains(&self, id: &PlaceId) -> bool {
        self.records.contains_key(id)
    }

    /// Insert or replace a record. A replaced record keeps its position.
    pub fn insert(&mut self, record: PlaceRecord) -> Option<PlaceRecord> {
        self.records.insert(record.place_id.clone(), record)
    }

    /// Iterate records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &PlaceRecord> {
        self.records.values()
    }

    /// Iterate place IDs in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &PlaceId> {
        self.records.keys()
    }

    /// Clone the records out as a vector
    pub fn to_vec(&self) -> Vec<PlaceRecord> {
        self.records.values().cloned().collect()
    }

    /// Consume the set into a vector of records
    pub fn into_vec(self) -> Vec<PlaceRecord> {
        self.records.into_values().collect()
    }
}

impl FromIterator<PlaceRecord> for PlaceSet {
    fn from_iter<T: IntoIterator<Item = PlaceRecord>>(iter: T) -> Self {
        let mut set = PlaceSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

impl From<Vec<PlaceRecord>> for PlaceSet {
    fn from(records: Vec<PlaceRecord>) -> Self {
        records.into_iter().collect()
    }
}

impl From<PlaceSet> for Vec<PlaceRecord> {
    fn from(set: PlaceSet) -> Self {
        set.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elm_street() -> PlaceRecord {
        PlaceRecord::new("1", "Elm St McD's", Coordinates::new(40.0, -73.0), "Elm St,  10001")
    }

    #[test]
    fn test_record_wire_shape() {
        let record = elm_street().with_toys(["Happy Meal Dino"]);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], "1");
        assert_eq!(json["placeId"], "1");
        assert_eq!(json["name"], "Elm St McD's");
        assert_eq!(json["coordinates"]["lat"], 40.0);
        assert_eq!(json["coordinates"]["lng"], -73.0);
        assert!(json["rating"].is_null());
        assert_eq!(json["toys"][0], "Happy Meal Dino");
    }

    #[test]
    fn test_record_from_document() {
        let json = r#"{
            "_id": "65f0c0ffee",
            "id": "1",
            "name": "Elm St McD's",
            "coordinates": {"lat": 40.0, "lng": -73.0},
            "address": "Elm St,  10001",
            "rating": 0,
            "placeId": "1",
            "toys": ["Happy Meal Dino"],
            "__v": 0
        }"#;
        let record: PlaceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.place_id, PlaceId::new("1"));
        assert_eq!(record.rating, Some(0.0));
        assert_eq!(record.toys, vec!["Happy Meal Dino"]);
    }

    #[test]
    fn test_record_upsert_body_defaults() {
        // Upsert bodies may use displayName, omit toys and rating.
        let json = r#"{
            "placeId": "9",
            "displayName": "Main St",
            "coordinates": {"lat": 1.5, "lng": 2.5},
            "address": "Address not available"
        }"#;
        let record: PlaceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.display_name, "Main St");
        assert_eq!(record.rating, None);
        assert!(record.toys.is_empty());
    }

    #[test]
    fn test_record_display_name_wins_over_name() {
        let json = r#"{
            "placeId": "9",
            "name": "Old Name",
            "displayName": "New Name",
            "coordinates": {"lat": 0, "lng": 0}
        }"#;
        let record: PlaceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.display_name, "New Name");

        let json = r#"{"placeId": "9", "coordinates": {"lat": 0, "lng": 0}}"#;
        assert!(serde_json::from_str::<PlaceRecord>(json).is_err());

        let written = serde_json::to_value(&record).unwrap();
        assert_eq!(written["name"], "New Name");
        assert!(written.get("displayName").is_none());
    }

    #[test]
    fn test_record_place_id_wins_over_id() {
        let json = r#"{"id": "a", "placeId": "b", "name": "x", "coordinates": {"lat": 0, "lng": 0}}"#;
        let record: PlaceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.place_id, PlaceId::new("b"));

        let json = r#"{"name": "x", "coordinates": {"lat": 0, "lng": 0}}"#;
        assert!(serde_json::from_str::<PlaceRecord>(json).is_err());
    }

    #[test]
    fn test_refreshed_keeps_toys() {
        let record = elm_street().with_toys(["Toy A"]);
        let mut place = record.discovered();
        place.display_name = "Elm St McD's (renamed)".to_string();
        place.rating = Some(4.5);

        let refreshed = record.refreshed(&place);
        assert_eq!(refreshed.display_name, "Elm St McD's (renamed)");
        assert_eq!(refreshed.rating, Some(4.5));
        assert_eq!(refreshed.toys, vec!["Toy A"]);
    }

    #[test]
    fn test_normalize_toys() {
        let toys = normalize_toys(["B", "A", "B", "C", "A"]);
        assert_eq!(toys, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_place_set_order_and_replace() {
        let mut set = PlaceSet::new();
        set.insert(elm_street());
        set.insert(PlaceRecord::new("2", "Oak", Coordinates::new(1.0, 1.0), ""));
        set.insert(elm_street().with_toys(["Toy A"]));

        let ids: Vec<_> = set.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(set.get(&PlaceId::new("1")).unwrap().toys, vec!["Toy A"]);
    }

    #[test]
    fn test_place_set_serializes_as_array() {
        let set: PlaceSet = vec![elm_street()].into();
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.starts_with('['));

        let back: PlaceSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
