//! Client session: the in-memory location list and the workflows that feed it
//!
//! The session is the single owner of the place list shown to a user. The
//! list changes only through [`Session::refresh`], [`Session::search`],
//! [`Session::edit_toys`], or a snapshot pushed by a synchronized directory.
//! A failed network call leaves the list as it was.

use crate::directory::{DirectoryStore, Subscription};
use crate::discovery::{Geocoder, PlaceSource, DEFAULT_RADIUS_METERS};
use crate::error::{Error, Result};
use crate::identity::PlaceId;
use crate::model::{normalize_toys, Coordinates, PlaceRecord, PlaceSet};
use crate::reconcile::{
    apply_toy_edit, centroid, merge_discovery, places_with_toy, touched_records,
};
use std::sync::Arc;

/// Map center before anything has been loaded (Times Square)
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 40.7580,
    lng: -73.9855,
};

/// Outcome of a successful search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSummary {
    /// Geocoded search center
    pub center: Coordinates,
    /// Places reported by the discovery source
    pub discovered: usize,
    /// Places seen for the first time
    pub added: usize,
    /// Size of the list after the merge
    pub total: usize,
}

/// A user's view of the place directory
pub struct Session {
    directory: Arc<dyn DirectoryStore>,
    source: Arc<dyn PlaceSource>,
    geocoder: Arc<dyn Geocoder>,
    places: PlaceSet,
    center: Coordinates,
    radius_meters: u32,
    subscription: Option<Subscription>,
}

impl Session {
    /// Create a session. If the directory pushes changes, the session starts
    /// from its current snapshot.
    pub fn new(
        directory: Arc<dyn DirectoryStore>,
        source: Arc<dyn PlaceSource>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        let subscription = directory.subscribe();
        let places = subscription
            .as_ref()
            .map(|sub| sub.borrow().as_ref().clone())
            .unwrap_or_default();
        Self {
            directory,
            source,
            geocoder,
            places,
            center: DEFAULT_CENTER,
            radius_meters: DEFAULT_RADIUS_METERS,
            subscription,
        }
    }

    /// Override the discovery radius
    pub fn with_radius(mut self, radius_meters: u32) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    pub fn places(&self) -> &PlaceSet {
        &self.places
    }

    pub fn center(&self) -> Coordinates {
        self.center
    }

    pub fn radius_meters(&self) -> u32 {
        self.radius_meters
    }

    /// Whether the directory pushes snapshots to this session
    pub fn is_live(&self) -> bool {
        self.subscription.is_some()
    }

    /// Places that list the given toy
    pub fn places_with_toy(&self, toy: &str) -> Vec<&PlaceRecord> {
        places_with_toy(&self.places, toy)
    }

    /// Replace the list with the directory's contents and recentre on them.
    pub async fn refresh(&mut self) -> Result<usize> {
        let places = self.directory.list_all().await.map_err(|e| {
            tracing::warn!(error = %e, "fetching locations failed");
            e
        })?;
        if let Some(center) = centroid(&places) {
            self.center = center;
        }
        self.places = places;
        Ok(self.places.len())
    }

    /// Geocode `address`, discover places around it, and merge them in.
    ///
    /// The records the batch touched are written to the directory before the
    /// session adopts the merged list. A geocoding miss returns [`Error::AddressNotFound`] and does
    /// nothing else.
    pub async fn search(&mut self, address: &str) -> Result<SearchSummary> {
        let center = match self.geocoder.geocode(address).await {
            Ok(Some(center)) => center,
            Ok(None) => return Err(Error::AddressNotFound(address.to_string())),
            Err(e) => {
                tracing::warn!(address, error = %e, "geocoding failed");
                return Err(e);
            }
        };
        self.center = center;

        let discovered = self
            .source
            .discover(center, self.radius_meters)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "discovery failed");
                e
            })?;

        let merged = merge_discovery(&self.places, &discovered);
        let added = merged.len() - self.places.len();

        let touched = touched_records(&merged, &discovered);
        if let Err(e) = self.directory.upsert_many(&touched).await {
            tracing::warn!(error = %e, "saving locations failed");
            return Err(e);
        }

        tracing::info!(
            discovered = discovered.len(),
            added,
            total = merged.len(),
            "discovery merged"
        );
        self.places = merged;
        self.sync();

        Ok(SearchSummary {
            center,
            discovered: discovered.len(),
            added,
            total: self.places.len(),
        })
    }

    /// Replace the toys of one place, locally first and then in the directory.
    ///
    /// If the directory write fails the local edit is rolled back.
    pub async fn edit_toys(&mut self, place_id: &PlaceId, toys: Vec<String>) -> Result<()> {
        let toys = normalize_toys(toys);
        let updated = apply_toy_edit(&self.places, place_id, toys.iter().cloned())?;
        let previous = std::mem::replace(&mut self.places, updated);

        if let Err(e) = self.directory.set_toys(place_id, &toys).await {
            tracing::warn!(place_id = %place_id, error = %e, "updating toys failed");
            self.places = previous;
            return Err(e);
        }

        self.sync();
        Ok(())
    }

    /// Fold the latest pushed snapshot into the list, if one arrived.
    ///
    /// Returns `true` when the list was replaced.
    pub fn sync(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        match subscription.has_changed() {
            Ok(true) => {
                self.places = subscription.borrow_and_update().as_ref().clone();
                true
            }
            _ => false,
        }
    }

    /// Wait for the next pushed snapshot and adopt it.
    pub async fn next_snapshot(&mut self) -> Result<()> {
        let Some(subscription) = self.subscription.as_mut() else {
            return Err(Error::Transport("directory has no subscription".to_string()));
        };
        subscription
            .changed()
            .await
            .map_err(|_| Error::Transport("directory subscription closed".to_string()))?;
        self.places = subscription.borrow_and_update().as_ref().clone();
        Ok(())
    }
}
