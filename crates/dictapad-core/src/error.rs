use thiserror::Error;

/// Top-level error type for Dictapad.
///
/// The gesture engine and the text normalizer never fail; these variants
/// cover the layers around them (configuration, key names, session scripts).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DictapadError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported language: {0}")]
    InvalidLanguage(String),

    #[error("Unknown key: {0}")]
    InvalidKey(String),

    #[error("Script error on line {line}: {message}")]
    Script { line: usize, message: String },
}

impl From<toml::de::Error> for DictapadError {
    fn from(err: toml::de::Error) -> Self {
        DictapadError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DictapadError {
    fn from(err: toml::ser::Error) -> Self {
        DictapadError::Config(err.to_string())
    }
}

/// A specialized `Result` type for Dictapad operations.
pub type Result<T> = std::result::Result<T, DictapadError>;
