//! Continuously-synchronized directory
//!
//! Documents live in a [`Store`]. Each committed mutation is folded into the
//! cached place set and the result is pushed on a `watch` channel, so a
//! subscriber always sees the last committed snapshot rather than a stream of
//! diffs. A call publishes at most once, however many records it writes.

use crate::error::Result;
use crate::store::{Store, UpsertOutcome};
use async_trait::async_trait;
use mctoy_core::{DirectoryStore, PlaceId, PlaceRecord, PlaceSet, Snapshot, Subscription};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Place directory that pushes its contents to subscribers
///
/// Clones share the store, the channel and the write lock.
#[derive(Clone)]
pub struct LiveDirectory {
    store: Store,
    snapshots: Arc<watch::Sender<Snapshot>>,
    // Held across commit and publish so pushes follow commit order.
    writer: Arc<Mutex<()>>,
}

impl LiveDirectory {
    /// Wrap a store, seeding the channel with its current contents.
    pub fn new(store: Store) -> Result<Self> {
        let initial: PlaceSet = store.list_places()?.into();
        let (snapshots, _) = watch::channel(Arc::new(initial));
        Ok(Self {
            store,
            snapshots: Arc::new(snapshots),
            writer: Arc::new(Mutex::new(())),
        })
    }

    /// A receiver holding the latest snapshot
    pub fn subscribe(&self) -> Subscription {
        self.snapshots.subscribe()
    }

    /// The last pushed snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.snapshots.receiver_count()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Merge-write display fields; an existing document keeps its toys.
    pub fn upsert_display_fields(&self, record: &PlaceRecord) -> Result<UpsertOutcome> {
        let _writer = self.lock_writer();
        let (committed, outcome) = self.store.merge_write(record)?;
        self.publish(vec![committed]);
        Ok(outcome)
    }

    /// Merge-write each record, pushing once at the end.
    ///
    /// Stops at the first failure. Records committed before it are still
    /// pushed.
    pub fn upsert_many(&self, records: &[PlaceRecord]) -> Result<usize> {
        let _writer = self.lock_writer();
        let mut committed = Vec::with_capacity(records.len());
        let mut inserted = 0;
        let mut result = Ok(());
        for record in records {
            match self.store.merge_write(record) {
                Ok((record, outcome)) => {
                    if outcome == UpsertOutcome::Inserted {
                        inserted += 1;
                    }
                    committed.push(record);
                }
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        self.publish(committed);
        result.map(|()| inserted)
    }

    /// Partial update of the `toys` field.
    ///
    /// Fails only if the write itself did not commit.
    pub fn set_toys(&self, id: &PlaceId, toys: &[String]) -> Result<()> {
        let _writer = self.lock_writer();
        let committed = self.store.replace_toys(id, toys)?;
        self.publish(vec![committed]);
        Ok(())
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fold committed records into the cached set and push it.
    fn publish(&self, committed: Vec<PlaceRecord>) {
        if committed.is_empty() {
            return;
        }
        let mut places = self.snapshot().as_ref().clone();
        let written = committed.len();
        for record in committed {
            places.insert(record);
        }
        tracing::debug!(
            written,
            places = places.len(),
            subscribers = self.snapshots.receiver_count(),
            "snapshot pushed"
        );
        self.snapshots.send_replace(Arc::new(places));
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&LiveDirectory) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let live = self.clone();
        tokio::task::spawn_blocking(move || op(&live)).await?
    }
}

#[async_trait]
impl DirectoryStore for LiveDirectory {
    async fn list_all(&self) -> mctoy_core::Result<PlaceSet> {
        Ok(self.snapshot().as_ref().clone())
    }

    async fn upsert_display_fields(&self, record: &PlaceRecord) -> mctoy_core::Result<()> {
        let record = record.clone();
        self.run_blocking(move |live| live.upsert_display_fields(&record))
            .await?;
        Ok(())
    }

    async fn upsert_many(&self, records: &[PlaceRecord]) -> mctoy_core::Result<()> {
        let records = records.to_vec();
        self.run_blocking(move |live| live.upsert_many(&records))
            .await?;
        Ok(())
    }

    async fn set_toys(&self, place_id: &PlaceId, toys: &[String]) -> mctoy_core::Result<()> {
        let place_id = place_id.clone();
        let toys = toys.to_vec();
        Ok(self
            .run_blocking(move |live| live.set_toys(&place_id, &toys))
            .await?)
    }

    fn subscribe(&self) -> Option<Subscription> {
        Some(LiveDirectory::subscribe(self))
    }
}
