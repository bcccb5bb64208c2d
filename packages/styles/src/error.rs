//! Error types for style configuration

use crate::registry::StyleFamily;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Style family {0} is enabled but its vocabulary is empty")]
    EmptyVocabulary(StyleFamily),

    #[error("Invalid color in vocabulary: {0}")]
    InvalidColor(String),

    #[error("Invalid font size in vocabulary: {0}")]
    InvalidFontSize(u32),

    #[error("Duplicate {family} value in vocabulary: {value}")]
    DuplicateValue { family: StyleFamily, value: String },
}

impl ConfigurationError {
    pub fn duplicate(family: StyleFamily, value: impl Into<String>) -> Self {
        Self::DuplicateValue {
            family,
            value: value.into(),
        }
    }
}
