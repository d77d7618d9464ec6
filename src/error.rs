use crate::models::SelectionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgroInsightError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    /// Weather provider answered with a non-success status. The body is kept verbatim.
    #[error("Weather provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Validation(#[from] SelectionError),
}

pub type Result<T> = std::result::Result<T, AgroInsightError>;
