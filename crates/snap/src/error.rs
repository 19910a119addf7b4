//! Errors for loading scenes, viewports and settings.
//!
//! Snapping queries themselves never fail: "nothing to snap to" is `None`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing required argument {0}")]
    MissingArgument(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidArgument { name: &'static str, value: String },
}

pub type SnapResult<T> = Result<T, SnapError>;

/// Read a JSON document from disk into `T`.
pub fn load_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> SnapResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| SnapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SnapError::Json {
        what: path.display().to_string(),
        source,
    })
}
