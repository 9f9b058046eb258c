//! Schema sources and generated output.
//!
//! A source string is either a local path or an `http(s)://` URL; both yield
//! a JSON document and a logical name (`card.json` -> `card`) used to name
//! the generated model.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::LoadError;

#[cfg(feature = "remote")]
const FETCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Where a schema document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    File(PathBuf),
    Url(String),
}

impl SchemaSource {
    /// Classify a command-line style source string.
    pub fn parse(source: &str) -> Self {
        if is_url(source) {
            SchemaSource::Url(source.to_string())
        } else {
            SchemaSource::File(PathBuf::from(source))
        }
    }

    /// Read and parse the document.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the source cannot be read or is not JSON.
    /// Without the `remote` feature a URL is reported as `FileNotFound`.
    pub fn load(&self) -> Result<Value, LoadError> {
        match self {
            SchemaSource::File(path) => load_schema(path),
            #[cfg(feature = "remote")]
            SchemaSource::Url(url) => load_schema_url(url),
            #[cfg(not(feature = "remote"))]
            SchemaSource::Url(url) => Err(LoadError::FileNotFound {
                path: PathBuf::from(url),
            }),
        }
    }

    /// File stem of the path, or of the last URL path segment with any
    /// query and fragment removed.
    pub fn logical_name(&self) -> String {
        let last = match self {
            SchemaSource::File(path) => path.as_path(),
            SchemaSource::Url(url) => {
                let end = url.find(['#', '?']).unwrap_or(url.len());
                let trimmed = url[..end].trim_end_matches('/');
                Path::new(trimmed.rsplit('/').next().unwrap_or_default())
            }
        };
        last.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// `true` for `http://` and `https://` sources.
pub fn is_url(source: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| source.starts_with(scheme))
}

/// Read a schema document from disk.
///
/// # Errors
///
/// `LoadError::FileNotFound` for a missing file, `LoadError::ReadError` for
/// other I/O failures, `LoadError::InvalidJson` for malformed content.
pub fn load_schema(path: &Path) -> Result<Value, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::ReadError {
            path: path.to_path_buf(),
            source,
        },
    })?;
    load_schema_str(&text)
}

/// Parse a schema document from text, keeping key order.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` for malformed content.
pub fn load_schema_str(text: &str) -> Result<Value, LoadError> {
    serde_json::from_str(text).map_err(|source| LoadError::InvalidJson { source })
}

/// Fetch a schema document over HTTP.
///
/// # Errors
///
/// Returns `LoadError::NetworkError` on connection failure, a non-success
/// status, or a body that is not JSON.
#[cfg(feature = "remote")]
pub fn load_schema_url(url: &str) -> Result<Value, LoadError> {
    tracing::debug!(url, "fetching schema");
    let fetch = || -> reqwest::Result<Value> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        client.get(url).send()?.error_for_status()?.json()
    };
    fetch().map_err(|source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    })
}

/// Load from a path or URL string.
///
/// # Errors
///
/// See [`SchemaSource::load`].
pub fn load_schema_auto(source: &str) -> Result<Value, LoadError> {
    SchemaSource::parse(source).load()
}

/// Logical name of a path or URL string.
pub fn logical_name(source: &str) -> String {
    SchemaSource::parse(source).logical_name()
}

/// Write generated output, creating parent directories as needed.
///
/// # Errors
///
/// Returns `LoadError::WriteError` if the directory or file cannot be written.
pub fn write_output(path: &Path, content: &str) -> Result<(), LoadError> {
    let write_error = |source| LoadError::WriteError {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, content).map_err(write_error)
}
