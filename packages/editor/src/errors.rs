//! Error types for the editor

use richtext_model::RawError;
use richtext_styles::ConfigurationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid raw content: {0}")]
    Raw(#[from] RawError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EditorResult<T> = Result<T, EditorError>;
