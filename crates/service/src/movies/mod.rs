pub mod repository;
pub mod service;

pub use repository::{InMemoryMovieStore, MovieRepository};
pub use service::MovieService;
