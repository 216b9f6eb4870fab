//! McToy Core - Place records and toy reconciliation
//!
//! This crate provides the shared types and logic for the mctoy tracker:
//! - Place records with stable identities and toy associations
//! - The read-only toy catalog
//! - Pure reconciliation of discovery batches and toy edits
//! - The `DirectoryStore`, `PlaceSource` and `Geocoder` seams that storage
//!   and network backends implement
//! - A client `Session` that owns the in-memory location list
//!
//! ## Ownership of the `toys` field
//!
//! Discovery only ever refreshes display fields (`name`, `coordinates`,
//! `address`, `rating`). The `toys` list of a place is written exclusively
//! by toy edits:
//!
//! ```text
//!  discovery ──▶ merge_discovery ──▶ upsert_many ──▶ directory
//!                     ▲                                  │
//!                     └──────── list_all / snapshot ◀────┘
//!  toy edit  ──▶ apply_toy_edit  ──▶ set_toys    ──▶ directory
//! ```

mod catalog;
mod directory;
mod discovery;
mod error;
mod identity;
mod model;
pub mod reconcile;
mod session;

pub use catalog::{Catalog, Toy, UNKNOWN_TOY};
pub use directory::{DirectoryStore, Snapshot, Subscription};
pub use discovery::{Geocoder, PlaceSource, DEFAULT_RADIUS_METERS};
pub use error::{Error, Result};
pub use identity::PlaceId;
pub use model::{
    normalize_toys, Coordinates, DiscoveredPlace, PlaceRecord, PlaceSet, ToysUpdate,
};
pub use reconcile::{
    apply_toy_edit, centroid, merge_discovery, places_with_toy, touched_records,
};
pub use session::{SearchSummary, Session, DEFAULT_CENTER};
