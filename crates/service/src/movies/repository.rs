use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use models::{Movie, MoviePatch};
use serde_json::Value;
use tokio::{fs, sync::RwLock};
use tracing::debug;

use crate::errors::ServiceError;

/// Storage seam for movie records. Ids are unique across the collection.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// All records in insertion order.
    async fn list(&self) -> Vec<Movie>;
    async fn get(&self, id: i64) -> Option<Movie>;
    /// Append; `Conflict` if the id is taken.
    async fn insert(&self, movie: Movie) -> Result<Movie, ServiceError>;
    /// Overlay `patch` on the record with `id` and return the merged record.
    async fn update(&self, id: i64, patch: MoviePatch) -> Result<Movie, ServiceError>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;
    async fn len(&self) -> usize;
}

/// Process-local store: an ordered `Vec` behind a tokio `RwLock`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryMovieStore {
    inner: Arc<RwLock<Vec<Movie>>>,
}

impl InMemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movies(movies: Vec<Movie>) -> Result<Self, ServiceError> {
        for (i, m) in movies.iter().enumerate() {
            if movies[..i].iter().any(|other| other.id == m.id) {
                return Err(ServiceError::Conflict(format!("duplicate id {} in seed data", m.id)));
            }
        }
        Ok(Self { inner: Arc::new(RwLock::new(movies)) })
    }

    pub fn seeded() -> Self {
        Self { inner: Arc::new(RwLock::new(models::seed::default_movies())) }
    }

    /// Load a JSON array of movies; every entry goes through the full validator.
    pub async fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .await
            .map_err(|e| ServiceError::Internal(format!("cannot read {}: {e}", path.display())))?;
        let entries: Vec<Value> = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Internal(format!("cannot parse {}: {e}", path.display())))?;
        let mut movies = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let obj = entry.as_object().ok_or_else(|| {
                ServiceError::Validation(format!("seed entry {i} is not a JSON object"))
            })?;
            let movie = Movie::from_payload(obj)
                .map_err(|e| ServiceError::Validation(format!("seed entry {i}: {e}")))?;
            movies.push(movie);
        }
        debug!(path = %path.display(), count = movies.len(), "loaded seed file");
        Self::with_movies(movies)
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieStore {
    async fn list(&self) -> Vec<Movie> {
        self.inner.read().await.clone()
    }

    async fn get(&self, id: i64) -> Option<Movie> {
        let movies = self.inner.read().await;
        movies.iter().find(|m| m.id == id).cloned()
    }

    async fn insert(&self, movie: Movie) -> Result<Movie, ServiceError> {
        let mut movies = self.inner.write().await;
        if movies.iter().any(|m| m.id == movie.id) {
            return Err(ServiceError::duplicate_id());
        }
        movies.push(movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: i64, patch: MoviePatch) -> Result<Movie, ServiceError> {
        let mut movies = self.inner.write().await;
        let idx = movies
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(ServiceError::not_found)?;
        if let Some(new_id) = patch.id {
            if new_id != id && movies.iter().any(|m| m.id == new_id) {
                return Err(ServiceError::duplicate_id());
            }
        }
        let existing = &mut movies[idx];
        patch.apply(existing);
        Ok(existing.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let mut movies = self.inner.write().await;
        match movies.iter().position(|m| m.id == id) {
            Some(idx) => {
                movies.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: title.into(),
            year: 2000,
            director: "Someone".into(),
            length: "01:30:00".into(),
            rating: 5,
        }
    }

    #[tokio::test]
    async fn crud_keeps_insertion_order() -> Result<(), ServiceError> {
        let store = InMemoryMovieStore::new();
        store.insert(movie(3, "c")).await?;
        store.insert(movie(1, "a")).await?;
        store.insert(movie(2, "b")).await?;
        let ids: Vec<i64> = store.list().await.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        assert_eq!(store.get(1).await.map(|m| m.title), Some("a".to_string()));
        assert!(store.get(42).await.is_none());

        assert!(store.delete(1).await?);
        assert!(!store.delete(1).await?);
        let ids: Vec<i64> = store.list().await.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(store.len().await, 2);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_conflict() {
        let store = InMemoryMovieStore::seeded();
        let err = store.insert(movie(1, "dup")).await.unwrap_err();
        assert_eq!(err, ServiceError::duplicate_id());
        assert_eq!(store.len().await, 10);
    }

    #[tokio::test]
    async fn update_merges_and_guards_id_uniqueness() {
        let store = InMemoryMovieStore::with_movies(vec![movie(1, "a"), movie(2, "b")]).unwrap();

        let merged = store
            .update(1, MoviePatch { rating: Some(9), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(merged.rating, 9);
        assert_eq!(merged.title, "a");

        let err = store
            .update(1, MoviePatch { id: Some(2), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::duplicate_id());

        let moved = store
            .update(1, MoviePatch { id: Some(7), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(moved.id, 7);
        assert!(store.get(1).await.is_none());

        let err = store.update(99, MoviePatch::default()).await.unwrap_err();
        assert_eq!(err, ServiceError::not_found());
    }

    #[test]
    fn with_movies_rejects_duplicate_ids() {
        assert!(InMemoryMovieStore::with_movies(vec![movie(1, "a"), movie(1, "b")]).is_err());
    }

    #[tokio::test]
    async fn seed_file_is_loaded_and_validated() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir();
        let good = dir.join(format!("movies_seed_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(
            &good,
            r#"[{"id": 100, "title": "Alien", "year": 1979, "director": "Ridley Scott", "length": "01:57:00", "rating": 8}]"#,
        )
        .await?;
        let store = InMemoryMovieStore::from_seed_file(&good).await?;
        assert_eq!(store.list().await.len(), 1);
        assert_eq!(store.get(100).await.map(|m| m.year), Some(1979));

        let bad = dir.join(format!("movies_seed_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&bad, r#"[{"id": 1, "title": "x", "year": 1800}]"#).await?;
        let err = InMemoryMovieStore::from_seed_file(&bad).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("'year'")));

        let _ = tokio::fs::remove_file(&good).await;
        let _ = tokio::fs::remove_file(&bad).await;
        Ok(())
    }
}
