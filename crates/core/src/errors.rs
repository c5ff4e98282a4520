use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl StudioError {
    pub fn not_found(what: &str, id: i64) -> Self {
        StudioError::NotFound(format!("{} with ID {} not found", what, id))
    }
}

pub type StudioResult<T> = Result<T, StudioError>;
