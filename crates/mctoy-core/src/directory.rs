//! Place directory contract
//!
//! Every storage backend implements [`DirectoryStore`]. Request/response
//! backends only answer calls; continuously-synchronized backends also hand
//! out a [`Subscription`] that always holds the last committed snapshot.

use crate::error::Result;
use crate::identity::PlaceId;
use crate::model::{PlaceRecord, PlaceSet};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

/// Full place set as pushed by a synchronized directory
pub type Snapshot = Arc<PlaceSet>;

/// Receiver side of a directory's push channel
pub type Subscription = watch::Receiver<Snapshot>;

/// Persistence for place records
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Every stored record
    async fn list_all(&self) -> Result<PlaceSet>;

    /// Refresh display fields of an existing record, or insert a new one.
    ///
    /// An existing record's `toys` is never modified by this call.
    async fn upsert_display_fields(&self, record: &PlaceRecord) -> Result<()>;

    /// Apply [`upsert_display_fields`](Self::upsert_display_fields) to each
    /// record in turn. Records already written stay written if a later one
    /// fails.
    async fn upsert_many(&self, records: &[PlaceRecord]) -> Result<()> {
        for record in records {
            self.upsert_display_fields(record).await?;
        }
        Ok(())
    }

    /// Replace the toys of a stored record. `Error::NotFound` if absent.
    async fn set_toys(&self, place_id: &PlaceId, toys: &[String]) -> Result<()>;

    /// Standing subscription, for backends that push changes.
    fn subscribe(&self) -> Option<Subscription> {
        None
    }
}
