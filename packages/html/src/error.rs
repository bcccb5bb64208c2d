use thiserror::Error;

/// Content dropped while importing HTML
///
/// Never fatal: the importer keeps going and returns these alongside the
/// document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    #[error("Unrecognized style declaration `{property}: {value}`")]
    UnrecognizedDeclaration { property: String, value: String },

    #[error("Unsupported element <{0}>")]
    UnsupportedElement(String),

    #[error("Media element <{0}> is disabled")]
    DisabledMedia(String),

    #[error("Media element <{0}> has no source")]
    MissingSource(String),

    #[error("Block data `{0}` is not a JSON object")]
    InvalidBlockData(String),
}

impl ConversionWarning {
    pub fn declaration(property: &str, value: &str) -> Self {
        ConversionWarning::UnrecognizedDeclaration {
            property: property.to_string(),
            value: value.to_string(),
        }
    }
}
