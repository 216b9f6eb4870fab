//! Discovery and toy-edit reconciliation
//!
//! Both operations are pure: they take the current place set by reference
//! and return a new one, so a failed downstream write can simply keep the
//! old set.

use crate::error::{Error, Result};
use crate::identity::PlaceId;
use crate::model::{normalize_toys, Coordinates, DiscoveredPlace, PlaceRecord, PlaceSet};
use indexmap::IndexSet;

/// Merge a discovery batch into an existing place set.
///
/// - A discovered place already in `existing` takes the discovered display
///   fields and keeps the existing `toys`.
/// - A new place enters with no toys, appended in discovery order.
/// - Places missing from the batch are carried over unchanged.
///
/// If the batch lists the same place twice the later entry wins.
pub fn merge_discovery(existing: &PlaceSet, discovered: &[DiscoveredPlace]) -> PlaceSet {
    let mut merged = existing.clone();
    for place in discovered {
        let record = match existing.get(&place.place_id) {
            Some(current) => current.refreshed(place),
            None => place.clone().into_record(),
        };
        merged.insert(record);
    }
    merged
}

/// The records of `merged` that a discovery batch refreshed or created, once
/// each, in batch order.
///
/// Untouched records need no write: a display-field upsert of an unchanged
/// record is a no-op.
pub fn touched_records(merged: &PlaceSet, discovered: &[DiscoveredPlace]) -> Vec<PlaceRecord> {
    let ids: IndexSet<&PlaceId> = discovered.iter().map(|place| &place.place_id).collect();
    ids.into_iter()
        .filter_map(|id| merged.get(id).cloned())
        .collect()
}

/// Replace the toys of one place.
///
/// Fails with [`Error::NotFound`] when `place_id` is not in `current`;
/// `current` itself is never modified.
pub fn apply_toy_edit(
    current: &PlaceSet,
    place_id: &PlaceId,
    toys: impl IntoIterator<Item = String>,
) -> Result<PlaceSet> {
    if !current.contains(place_id) {
        return Err(Error::NotFound(place_id.clone()));
    }
    let mut updated = current.clone();
    if let Some(record) = updated.get_mut(place_id) {
        record.toys = normalize_toys(toys);
    }
    Ok(updated)
}

/// Places that list the given toy
pub fn places_with_toy<'a>(set: &'a PlaceSet, toy: &str) -> Vec<&'a PlaceRecord> {
    set.iter().filter(|record| record.has_toy(toy)).collect()
}

/// Mean position of all places, `None` for an empty set
pub fn centroid(set: &PlaceSet) -> Option<Coordinates> {
    if set.is_empty() {
        return None;
    }
    let count = set.len() as f64;
    let (lat, lng) = set.iter().fold((0.0, 0.0), |(lat, lng), record| {
        (lat + record.coordinates.lat, lng + record.coordinates.lng)
    });
    Some(Coordinates::new(lat / count, lng / count))
}
