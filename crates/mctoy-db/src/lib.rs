//! McToy DB - Place directory storage using native_db
//!
//! Provides two directory backends over the same document store:
//! - [`Store`]: request/response persistence, one transaction per record
//! - [`LiveDirectory`]: the same store plus a push channel that delivers the
//!   full place set after every committed mutation

mod directory;
mod error;
mod live;
mod models;
mod queries;
mod store;

pub use error::{Error, Result};
pub use live::LiveDirectory;
pub use models::StoredPlace;
pub use store::{Store, UpsertOutcome};
