//! Error types for the dashboard feed
//!
//! Errors are split by where they stop:
//! - FetchError: raised inside a fetcher, always converted to a fallback
//! - RunError: config or snapshot write failures that end the run

use std::path::PathBuf;
use thiserror::Error;

/// Failure inside a single source fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token helper failed: {0}")]
    TokenHelper(String),

    #[error("Stored token expired")]
    TokenExpired,

    #[error("Stopped after {pages} pages with records still pending")]
    PageLimit { pages: usize },
}

impl FetchError {
    /// True when the source was never contacted because nothing authorizes it.
    pub fn is_unconfigured(&self) -> bool {
        matches!(
            self,
            FetchError::MissingCredential(_) | FetchError::TokenExpired
        )
    }
}

/// Failure that aborts the whole run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Could not find home directory")]
    NoHomeDir,

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write snapshot to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
