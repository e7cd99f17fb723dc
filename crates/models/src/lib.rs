//! Movie records and the rules a payload must satisfy before it reaches the store.

pub mod errors;
pub mod movie;
pub mod seed;
pub mod validation;

pub use errors::ModelError;
pub use movie::{Movie, MoviePatch};
