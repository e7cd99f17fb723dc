use std::sync::Arc;

use configs::PatchMode;
use models::{Movie, MoviePatch};
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::movies::repository::MovieRepository;

/// Application service: unwraps the `{movie: {...}}` envelope, validates,
/// then delegates to the repository.
#[derive(Clone)]
pub struct MovieService {
    repo: Arc<dyn MovieRepository>,
    patch_mode: PatchMode,
}

impl MovieService {
    pub fn new(repo: Arc<dyn MovieRepository>, patch_mode: PatchMode) -> Self {
        Self { repo, patch_mode }
    }

    pub async fn list(&self) -> Vec<Movie> { self.repo.list().await }

    pub async fn get(&self, id: i64) -> Result<Movie, ServiceError> {
        self.repo.get(id).await.ok_or_else(ServiceError::not_found)
    }

    pub async fn count(&self) -> usize { self.repo.len().await }

    #[instrument(skip(self, body))]
    pub async fn create(&self, body: &Value) -> Result<Movie, ServiceError> {
        let payload = movie_payload(body)?;
        let movie = Movie::from_payload(&payload).map_err(|e| {
            warn!(reason = %e, "movie_create_rejected");
            ServiceError::from(e)
        })?;
        let stored = self.repo.insert(movie).await.map_err(|e| {
            warn!(reason = e.reason(), "movie_create_rejected");
            e
        })?;
        info!(id = stored.id, title = %stored.title, "movie_created");
        Ok(stored)
    }

    /// Validation runs before the lookup, so a bad payload for a missing id is a 400.
    #[instrument(skip(self, body))]
    pub async fn patch(&self, id: i64, body: &Value) -> Result<Movie, ServiceError> {
        let payload = movie_payload(body)?;
        let patch = MoviePatch::from_payload(&payload, self.patch_mode).map_err(|e| {
            warn!(reason = %e, "movie_patch_rejected");
            ServiceError::from(e)
        })?;
        let merged = self.repo.update(id, patch).await.map_err(|e| {
            warn!(reason = e.reason(), "movie_patch_rejected");
            e
        })?;
        info!(id = merged.id, "movie_patched");
        Ok(merged)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if self.repo.delete(id).await? {
            info!("movie_deleted");
            Ok(())
        } else {
            warn!(reason = crate::errors::NOT_FOUND, "movie_delete_rejected");
            Err(ServiceError::not_found())
        }
    }
}

/// Extract the `movie` object from a request body. A missing key behaves like
/// an empty object so the validator reports the first missing field.
pub fn movie_payload(body: &Value) -> Result<Map<String, Value>, ServiceError> {
    let envelope = body
        .as_object()
        .ok_or_else(|| ServiceError::Validation("Request body must be a JSON object".into()))?;
    match envelope.get("movie") {
        None => Ok(Map::new()),
        Some(Value::Object(movie)) => Ok(movie.clone()),
        Some(_) => Err(ServiceError::Validation("Field 'movie' must be a JSON object".into())),
    }
}
