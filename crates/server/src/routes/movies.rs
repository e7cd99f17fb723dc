use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use models::Movie;
use serde::Serialize;
use serde_json::Value;

use crate::errors::JsonApiError;
use crate::observability;
use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct MovieList {
    pub list: Vec<Movie>,
}

#[derive(Debug, Serialize)]
pub struct MovieEnvelope {
    pub movie: Movie,
}

type MovieResult = Result<Json<MovieEnvelope>, JsonApiError>;

/// Path ids are non-negative integers; anything else does not address a movie.
fn path_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, JsonApiError> {
    match id {
        Ok(Path(id)) if id >= 0 => Ok(id),
        _ => Err(JsonApiError::not_found()),
    }
}

fn observed<T>(operation: &str, ok: StatusCode, res: Result<T, JsonApiError>) -> Result<T, JsonApiError> {
    let status = match &res {
        Ok(_) => ok,
        Err(e) => e.status(),
    };
    observability::record(operation, status);
    res
}

async fn refresh_count(state: &AppState) {
    observability::set_movie_count(state.movies.count().await);
}

#[utoipa::path(
    get, path = "/api/movies", tag = "movies",
    responses((status = 200, description = "All movies in insertion order", body = crate::openapi::MovieListDoc))
)]
pub async fn list_movies(State(state): State<AppState>) -> Json<MovieList> {
    let list = state.movies.list().await;
    observability::record("list", StatusCode::OK);
    Json(MovieList { list })
}

#[utoipa::path(
    get, path = "/api/movies/{id}", tag = "movies",
    params(("id" = i64, Path, description = "Movie id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::MovieEnvelopeDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get_movie(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> MovieResult {
    let res = async {
        let id = path_id(id)?;
        let movie = state.movies.get(id).await?;
        Ok::<_, JsonApiError>(Json(MovieEnvelope { movie }))
    }
    .await;
    observed("get", StatusCode::OK, res)
}

#[utoipa::path(
    post, path = "/api/movies", tag = "movies",
    request_body = crate::openapi::MovieEnvelopeDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::MovieEnvelopeDoc),
        (status = 400, description = "Validation error or duplicate id", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create_movie(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> MovieResult {
    let res = async {
        let Json(body) = body?;
        let movie = state.movies.create(&body).await?;
        Ok::<_, JsonApiError>(Json(MovieEnvelope { movie }))
    }
    .await;
    refresh_count(&state).await;
    observed("create", StatusCode::OK, res)
}

#[utoipa::path(
    patch, path = "/api/movies/{id}", tag = "movies",
    params(("id" = i64, Path, description = "Movie id")),
    request_body = crate::openapi::MoviePatchEnvelopeDoc,
    responses(
        (status = 200, description = "Merged record", body = crate::openapi::MovieEnvelopeDoc),
        (status = 400, description = "Validation error", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn patch_movie(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> MovieResult {
    let res = async {
        let id = path_id(id)?;
        let Json(body) = body?;
        let movie = state.movies.patch(id, &body).await?;
        Ok::<_, JsonApiError>(Json(MovieEnvelope { movie }))
    }
    .await;
    observed("patch", StatusCode::OK, res)
}

#[utoipa::path(
    delete, path = "/api/movies/{id}", tag = "movies",
    params(("id" = i64, Path, description = "Movie id")),
    responses(
        (status = 202, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete_movie(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let res = async {
        let id = path_id(id)?;
        state.movies.delete(id).await?;
        Ok::<_, JsonApiError>(StatusCode::ACCEPTED)
    }
    .await;
    refresh_count(&state).await;
    observed("delete", StatusCode::ACCEPTED, res)
}
