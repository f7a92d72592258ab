//! Error types for link building/decoding and translation merging.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for link operations.
pub type Result<T> = std::result::Result<T, LinkError>;

#[derive(Debug, Error)]
pub enum LinkError {
  /// JSON serialization/deserialization of the chart payload
  #[error("JSON error: {0}")]
  Serialize(#[from] serde_json::Error),

  /// Generated chart URL is longer than the configured limit
  #[error("chart URL is {len} bytes, limit is {max}")]
  UrlTooLong { len: usize, max: usize },

  #[error("invalid URL: {0}")]
  InvalidUrl(String),

  #[error("URL has no `chart` query parameter")]
  MissingChartParam,

  #[error("URL has more than one `chart` query parameter")]
  DuplicateChartParam,
}

#[derive(Debug, Error)]
pub enum MergeError {
  /// Nothing was piped in
  #[error("no input provided; pipe grep output into this command")]
  NoInput,

  #[error("catalog I/O error at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl MergeError {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io { path: path.into(), source }
  }
}
