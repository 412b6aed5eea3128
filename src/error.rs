// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReagError>;

/// Failure of a single structured generation call.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Model endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed structured output: {0}")]
    MalformedOutput(String),

    #[error("Model returned no output")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum ReagError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid metadata filter on key '{key}': {message}")]
    InvalidFilter { key: String, message: String },

    #[error("Filtration failed for document '{document}': {source}")]
    Filtration {
        document: String,
        #[source]
        source: GenerationError,
    },

    #[error("Reasoning failed for document '{document}': {source}")]
    Reasoning {
        document: String,
        #[source]
        source: GenerationError,
    },

    #[error("Failed to load documents from {path}: {message}")]
    Loader { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Single error surfaced by `QueryEngine::query`. Wraps whatever aborted the
/// pipeline; no partial results accompany it.
#[derive(Error, Debug)]
#[error("Query failed: {source}")]
pub struct QueryError {
    #[source]
    source: ReagError,
}

impl QueryError {
    pub fn cause(&self) -> &ReagError {
        &self.source
    }

    pub fn into_cause(self) -> ReagError {
        self.source
    }
}

impl From<ReagError> for QueryError {
    fn from(source: ReagError) -> Self {
        Self { source }
    }
}
