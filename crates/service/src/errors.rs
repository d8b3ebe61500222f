use thiserror::Error;

/// Outcomes the branch service reports to its callers.
///
/// `InvalidArgument` and `NotFound` carry the human-readable message that
/// ends up in the HTTP body; `Repository` wraps any persistence failure
/// unclassified.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    NotFound(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self { Self::InvalidArgument(msg.into()) }

    pub fn not_found(msg: impl Into<String>) -> Self { Self::NotFound(msg.into()) }

    pub fn repository(err: impl std::fmt::Display) -> Self { Self::Repository(err.to_string()) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::InvalidArgument(_) => 1001,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Repository(_) => 1200,
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => ServiceError::InvalidArgument(msg),
            models::errors::ModelError::Db(msg) => ServiceError::Repository(msg),
        }
    }
}
