use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// First failing field; the message is sent to clients unchanged.
    #[error("{0}")]
    Validation(String),
}
