use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Invalid(String),

    /// Parent references that would make a record its own ancestor
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Error: {0}")]
    Generic(String),
}

impl From<String> for ExplorerError {
    fn from(error: String) -> Self {
        ExplorerError::Generic(error)
    }
}

impl From<&str> for ExplorerError {
    fn from(error: &str) -> Self {
        ExplorerError::Generic(error.to_string())
    }
}

impl From<Box<dyn std::error::Error>> for ExplorerError {
    fn from(error: Box<dyn std::error::Error>) -> Self {
        ExplorerError::Generic(error.to_string())
    }
}
