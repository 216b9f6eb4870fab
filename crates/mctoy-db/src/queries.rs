//! Common query patterns for the database.

use crate::error::Result;
use crate::models::*;
use crate::store::Store;
use mctoy_core::PlaceRecord;

impl Store {
    /// Get all places that list a specific toy.
    pub fn places_with_toy(&self, toy: &str) -> Result<Vec<PlaceRecord>> {
        Ok(self
            .stored_places()?
            .into_iter()
            .filter(|p| p.toys.iter().any(|t| t == toy))
            .map(|p| p.to_record())
            .collect())
    }

    /// Count stored places.
    pub fn count_places(&self) -> Result<usize> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredPlace>()?;
        let iter = scan.all()?;
        Ok(iter.count())
    }
}
