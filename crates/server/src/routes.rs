use axum::{
    http::StatusCode,
    routing::get,
    Json, Router,
};
use service::movies::MovieService;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::errors::{panic_response, JsonApiError};
use crate::observability;
use crate::openapi::ApiDoc;

pub mod movies;

/// Shared handler state; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub movies: MovieService,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (StatusCode, String) {
    observability::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn fallback() -> JsonApiError {
    JsonApiError::not_found()
}

/// Build the full application router: movie CRUD plus health, metrics and docs.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/movies", get(movies::list_movies).post(movies::create_movie))
        .route(
            "/api/movies/:id",
            get(movies::get_movie)
                .patch(movies::patch_movie)
                .delete(movies::delete_movie),
        )
        .with_state(state);

    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json));

    apply_layers(api.merge(ops).fallback(fallback)).layer(cors)
}

/// Panic capture and request tracing shared by every route.
pub fn apply_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
