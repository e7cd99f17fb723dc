use thiserror::Error;

pub const DUPLICATE_ID: &str = "Movie with this ID already exists";
pub const NOT_FOUND: &str = "Not Found";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found() -> Self { Self::NotFound(NOT_FOUND.into()) }

    pub fn duplicate_id() -> Self { Self::Conflict(DUPLICATE_ID.into()) }

    /// The client-facing message without the variant prefix.
    pub fn reason(&self) -> &str {
        match self {
            Self::Validation(m) | Self::Conflict(m) | Self::NotFound(m) | Self::Internal(m) => m,
        }
    }
}

impl From<models::ModelError> for ServiceError {
    fn from(e: models::ModelError) -> Self {
        match e {
            models::ModelError::Validation(m) => Self::Validation(m),
        }
    }
}
