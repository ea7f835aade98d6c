use salon_client::ClientError;
use thiserror::Error;

/// Application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("backend error: {0}")]
    Client(#[from] ClientError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("permission denied")]
    Forbidden,

    #[error("validation error: {0}")]
    Validation(String),
}

/// Result alias for application operations
pub type AppResult<T> = std::result::Result<T, AppError>;
