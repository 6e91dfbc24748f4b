//! Error types for statute structure reconstruction.
//!
//! Only `EmptyInput` is raised by the parsing engine itself. Everything else
//! the engine runs into degrades into a [`Diagnostic`](crate::types::Diagnostic)
//! on the result; the remaining variants belong to configuration loading and
//! output writing.

use thiserror::Error;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum StructureError {
    /// The input text holds nothing but whitespace and bidi controls.
    #[error("Input text is empty: nothing but whitespace to parse")]
    EmptyInput,

    /// A configuration value is out of range or unparsable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A custom heading vocabulary could not be used.
    #[error("Invalid vocabulary for {kind}: {reason}")]
    InvalidVocabulary { kind: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, StructureError>;
