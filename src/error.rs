//! Error types for schema transformation, loading and generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the transformation engine.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid identifier at {path}: expected string, got {actual}")]
    InvalidIdentifier { path: String, actual: String },

    #[error("expected object at {path}, got {actual}")]
    NotAnObject { path: String, actual: String },

    #[error("invalid required list at {path}: expected array of strings, got {actual}")]
    InvalidRequired { path: String, actual: String },

    #[error("schema too deep at {path}: nesting exceeds {limit} levels")]
    TooDeep { path: String, limit: usize },

    #[error("invalid URL template '{name}' ({pattern}): {message}")]
    InvalidTemplate {
        name: String,
        pattern: String,
        message: String,
    },
}

impl SchemaError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while reading a schema document or writing generated output.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::InvalidJson { .. } => 2,
            _ => 3,
        }
    }
}

/// Errors from the full load, transform and render flow.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl GenerateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::Load(e) => e.exit_code(),
            GenerateError::Schema(e) => e.exit_code(),
        }
    }
}
