//! Error types for parsing and configuration loading.

use thiserror::Error;

use crate::ValidationError;

/// Errors raised while parsing command-line tokens.
///
/// Every variant is a syntax error in the broad sense: the tokens cannot be
/// turned into a command value against the given schema. Parsing stops at
/// the first one and never returns a partial value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A token is not recognized by the active level or any enclosing level,
    /// or an option deferred to an enclosing level was never claimed.
    #[error("Unexpected argument: '{0}'")]
    UnexpectedArgument(String),

    /// A value-taking option appeared as the last token.
    #[error("Missing value for option: '{0}'")]
    MissingValue(String),

    /// The schema was rejected before any token was consumed.
    #[error("invalid command schema: {0}")]
    InvalidSchema(#[from] ValidationError),

    /// A value was read for a field that does not carry one.
    #[error("field '{0}' has no value to read")]
    NoPendingValue(String),
}

/// Convenience alias for results with [`SyntaxError`].
pub type Result<T> = std::result::Result<T, SyntaxError>;

/// Errors that can occur while loading configuration or schema files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A loaded schema failed validation.
    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] ValidationError),
}
