//! Service layer for the movie collection.
//! - `movies::repository` defines the storage seam and its in-memory implementation.
//! - `movies::service` turns request payloads into validated store operations.

pub mod errors;
pub mod movies;
