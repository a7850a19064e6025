//! Error type for `photoshare-client`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
  #[error("invalid base url {url:?}: {reason}")]
  InvalidBaseUrl { url: String, reason: String },

  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  #[error("{method} {path} failed: {source}")]
  Transport {
    method: &'static str,
    path:   String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{method} {path} → {status}")]
  Status {
    method: &'static str,
    path:   String,
    status: StatusCode,
  },

  #[error("deserialising response from {path}: {source}")]
  Decode {
    path:   String,
    #[source]
    source: reqwest::Error,
  },

  #[error("core error: {0}")]
  Core(#[from] photoshare_core::Error),
}

impl HttpError {
  /// The HTTP status the server answered with, if it answered at all.
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Status { status, .. } => Some(*status),
      Self::Transport { source, .. } | Self::Decode { source, .. } => source.status(),
      _ => None,
    }
  }
}

pub type Result<T, E = HttpError> = std::result::Result<T, E>;
