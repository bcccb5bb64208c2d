//! Error types for the document model

use thiserror::Error;

pub type RawResult<T> = Result<T, RawError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RawError {
    #[error("Block {block} references unknown entity {key}")]
    UnknownEntity { block: String, key: u32 },

    #[error("Invalid entity key: {0}")]
    InvalidEntityKey(String),
}

impl RawError {
    pub fn unknown_entity(block: impl Into<String>, key: u32) -> Self {
        Self::UnknownEntity {
            block: block.into(),
            key,
        }
    }
}
