//! Database models for persistent storage.

mod place;

pub use place::*;
