//! `DirectoryStore` implementation for the request/response store.
//!
//! Each call runs on the blocking pool, so native_db's disk I/O never holds
//! a runtime worker.

use crate::store::Store;
use async_trait::async_trait;
use mctoy_core::{DirectoryStore, PlaceId, PlaceRecord, PlaceSet, Result};

#[async_trait]
impl DirectoryStore for Store {
    async fn list_all(&self) -> Result<PlaceSet> {
        let places = self.run_blocking(|store| store.list_places()).await?;
        Ok(places.into())
    }

    async fn upsert_display_fields(&self, record: &PlaceRecord) -> Result<()> {
        let record = record.clone();
        self.run_blocking(move |store| store.upsert_display_fields(&record))
            .await?;
        Ok(())
    }

    async fn upsert_many(&self, records: &[PlaceRecord]) -> Result<()> {
        let records = records.to_vec();
        self.run_blocking(move |store| store.upsert_many(&records))
            .await?;
        Ok(())
    }

    async fn set_toys(&self, place_id: &PlaceId, toys: &[String]) -> Result<()> {
        let place_id = place_id.clone();
        let toys = toys.to_vec();
        Ok(self
            .run_blocking(move |store| store.set_toys(&place_id, &toys))
            .await?)
    }
}
