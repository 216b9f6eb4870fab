//! Database store wrapper.

use crate::error::{Error, Result};
use crate::models::*;
use mctoy_core::{normalize_toys, PlaceId, PlaceRecord};
use native_db::*;
use std::path::Path;
use std::sync::{Arc, LazyLock};

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredPlace>().unwrap();
    models
});

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new document was created, toys included.
    Inserted,
    /// An existing document had its display fields refreshed.
    Updated,
}

/// Document store for place records.
///
/// Cloning is cheap; clones share the same database.
#[derive(Clone)]
pub struct Store {
    pub(crate) db: Arc<Database<'static>>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Builder::new()
            .create(&MODELS, path)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Run `op` on the blocking pool.
    ///
    /// Every store method does synchronous disk I/O; async callers go
    /// through here instead of calling them on a runtime worker.
    pub async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Store) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || op(&store)).await?
    }

    /// Load a place by ID.
    pub fn get_place(&self, id: &PlaceId) -> Result<Option<PlaceRecord>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredPlace> = r.get().primary(id.as_str().to_string())?;
        Ok(stored.map(|s| s.to_record()))
    }

    /// Load all places.
    pub fn list_places(&self) -> Result<Vec<PlaceRecord>> {
        Ok(self.stored_places()?.iter().map(StoredPlace::to_record).collect())
    }

    pub(crate) fn stored_places(&self) -> Result<Vec<StoredPlace>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredPlace>()?;
        let iter = scan.all()?;
        let places: std::result::Result<Vec<StoredPlace>, _> = iter.collect();
        places.map_err(|e| Error::Database(e.to_string()))
    }

    /// Refresh the display fields of a stored place, or insert it.
    ///
    /// Runs as a single read-modify-write transaction. An existing
    /// document keeps its toys.
    pub fn upsert_display_fields(&self, record: &PlaceRecord) -> Result<UpsertOutcome> {
        Ok(self.merge_write(record)?.1)
    }

    /// [`Store::upsert_display_fields`], also returning the record as committed.
    pub(crate) fn merge_write(&self, record: &PlaceRecord) -> Result<(PlaceRecord, UpsertOutcome)> {
        let rw = self.db.rw_transaction()?;
        let existing: Option<StoredPlace> = rw.get().primary(record.place_id.as_str().to_string())?;

        let (stored, outcome) = match existing {
            Some(mut stored) => {
                stored.merge_display_fields(record);
                (stored, UpsertOutcome::Updated)
            }
            None => {
                let mut stored = StoredPlace::from_record(record);
                stored.toys = normalize_toys(stored.toys);
                (stored, UpsertOutcome::Inserted)
            }
        };
        let committed = stored.to_record();
        rw.upsert(stored)?;
        rw.commit()?;

        tracing::debug!(place_id = %record.place_id, ?outcome, "place upserted");
        Ok((committed, outcome))
    }

    /// Upsert each record in its own transaction.
    ///
    /// Stops at the first failure; earlier records stay committed.
    pub fn upsert_many(&self, records: &[PlaceRecord]) -> Result<usize> {
        let mut inserted = 0;
        for record in records {
            if self.upsert_display_fields(record)? == UpsertOutcome::Inserted {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Replace the toys of a stored place.
    pub fn set_toys(&self, id: &PlaceId, toys: &[String]) -> Result<()> {
        self.replace_toys(id, toys).map(drop)
    }

    /// [`Store::set_toys`], returning the record as committed.
    pub(crate) fn replace_toys(&self, id: &PlaceId, toys: &[String]) -> Result<PlaceRecord> {
        let rw = self.db.rw_transaction()?;
        let existing: Option<StoredPlace> = rw.get().primary(id.as_str().to_string())?;
        let Some(mut stored) = existing else {
            return Err(Error::NotFound(id.clone()));
        };
        stored.toys = normalize_toys(toys.iter().cloned());
        let committed = stored.to_record();
        rw.upsert(stored)?;
        rw.commit()?;

        tracing::debug!(place_id = %id, toys = committed.toys.len(), "toys replaced");
        Ok(committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mctoy_core::Coordinates;

    fn elm_street() -> PlaceRecord {
        PlaceRecord::new("1", "Elm St McD's", Coordinates::new(40.0, -73.0), "Elm St,  10001")
    }

    #[test]
    fn test_insert_and_load() {
        let store = Store::in_memory().unwrap();
        let record = elm_street().with_toys(["Happy Meal Dino"]);

        assert_eq!(store.upsert_display_fields(&record).unwrap(), UpsertOutcome::Inserted);
        assert_eq!(store.get_place(&PlaceId::new("1")).unwrap(), Some(record));
        assert_eq!(store.get_place(&PlaceId::new("2")).unwrap(), None);
    }

    #[test]
    fn test_upsert_keeps_toys() {
        let store = Store::in_memory().unwrap();
        store
            .upsert_display_fields(&elm_street().with_toys(["Happy Meal Dino"]))
            .unwrap();

        // A discovery refresh arrives with no toys and a new name.
        let mut refreshed = elm_street();
        refreshed.display_name = "Elm St McD's (renamed)".to_string();
        refreshed.rating = Some(3.5);
        assert_eq!(store.upsert_display_fields(&refreshed).unwrap(), UpsertOutcome::Updated);

        let stored = store.get_place(&PlaceId::new("1")).unwrap().unwrap();
        assert_eq!(stored.display_name, "Elm St McD's (renamed)");
        assert_eq!(stored.rating, Some(3.5));
        assert_eq!(stored.toys, vec!["Happy Meal Dino"]);
    }

    #[test]
    fn test_upsert_many_counts_inserts() {
        let store = Store::in_memory().unwrap();
        store.upsert_display_fields(&elm_street()).unwrap();

        let batch = vec![
            elm_street(),
            PlaceRecord::new("2", "Oak", Coordinates::new(1.0, 2.0), ""),
            PlaceRecord::new("3", "Pine", Coordinates::new(3.0, 4.0), ""),
        ];
        assert_eq!(store.upsert_many(&batch).unwrap(), 2);
        assert_eq!(store.list_places().unwrap().len(), 3);
    }

    #[test]
    fn test_set_toys() {
        let store = Store::in_memory().unwrap();
        store.upsert_display_fields(&elm_street()).unwrap();

        let id = PlaceId::new("1");
        let toys = vec!["Toy A".to_string(), "Toy B".to_string(), "Toy A".to_string()];
        store.set_toys(&id, &toys).unwrap();

        let stored = store.get_place(&id).unwrap().unwrap();
        assert_eq!(stored.toys, vec!["Toy A", "Toy B"]);
        assert_eq!(stored.display_name, "Elm St McD's");
    }

    #[test]
    fn test_set_toys_not_found() {
        let store = Store::in_memory().unwrap();
        let err = store.set_toys(&PlaceId::new("999"), &[]).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(store.list_places().unwrap().is_empty());
    }

    #[test]
    fn test_writes_return_committed_record() {
        let store = Store::in_memory().unwrap();
        store
            .upsert_display_fields(&elm_street().with_toys(["Toy A"]))
            .unwrap();

        let mut refreshed = elm_street();
        refreshed.display_name = "Renamed".to_string();
        let (committed, outcome) = store.merge_write(&refreshed).unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(committed.display_name, "Renamed");
        assert_eq!(committed.toys, vec!["Toy A"]);

        let toys = vec!["Toy B".to_string(), "Toy B".to_string()];
        let committed = store.replace_toys(&PlaceId::new("1"), &toys).unwrap();
        assert_eq!(committed.toys, vec!["Toy B"]);
        assert_eq!(Some(committed), store.get_place(&PlaceId::new("1")).unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_blocking_shares_database() {
        let store = Store::in_memory().unwrap();

        let writes: Vec<_> = (0..4)
            .map(|i| {
                let record = PlaceRecord::new(
                    i.to_string(),
                    format!("Place {}", i),
                    Coordinates::new(0.0, 0.0),
                    "",
                );
                store.run_blocking(move |store| store.upsert_display_fields(&record))
            })
            .collect();
        for write in writes {
            assert_eq!(write.await.unwrap(), UpsertOutcome::Inserted);
        }

        let count = store.run_blocking(|store| store.count_places()).await.unwrap();
        assert_eq!(count, 4);
        assert_eq!(store.clone().list_places().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_run_blocking_propagates_errors() {
        let store = Store::in_memory().unwrap();
        let err = store
            .run_blocking(|store| store.set_toys(&PlaceId::new("404"), &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_error_into_core() {
        let err: mctoy_core::Error = Error::NotFound(PlaceId::new("9")).into();
        assert!(err.is_not_found());

        let err: mctoy_core::Error = Error::Database("disk full".to_string()).into();
        assert!(matches!(err, mctoy_core::Error::Store(_)));
    }
}
