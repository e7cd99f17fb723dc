use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::{ServiceError, NOT_FOUND};
use thiserror::Error;
use tracing::error;

/// Error response rendered as `{status, reason}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonApiError {
    status: StatusCode,
    reason: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, reason: impl Into<String>) -> Self {
        Self { status, reason: reason.into() }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND)
    }

    pub fn status(&self) -> StatusCode { self.status }

    pub fn reason(&self) -> &str { &self.reason }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody::new(self.status.as_u16(), self.reason);
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let status = match &e {
            ServiceError::Validation(_) | ServiceError::Conflict(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %e, "service failure");
        }
        Self::new(status, e.reason())
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        Self::new(r.status(), r.body_text())
    }
}

/// Turn a handler panic into a 500 carrying the panic message.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let reason = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal Server Error".to_string()
    };
    error!(%reason, "handler panicked");
    JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, reason).into_response()
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("seed data rejected: {0}")]
    Seed(#[from] ServiceError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status_and_bare_reason() {
        let e: JsonApiError = ServiceError::duplicate_id().into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        assert_eq!(e.reason(), "Movie with this ID already exists");

        let e: JsonApiError = ServiceError::not_found().into();
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
        assert_eq!(e.reason(), "Not Found");

        let e: JsonApiError = ServiceError::Internal("boom".into()).into();
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.reason(), "boom");
    }

    #[test]
    fn panic_payload_becomes_reason() {
        let resp = panic_response(Box::new("exploded"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
