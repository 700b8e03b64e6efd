//! Error types for bucket-clone.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for repository discovery and cloning.
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API request failed ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unsupported clone url: {0}")]
    UnsupportedUrl(String),

    #[error("no ssh clone link for repository {0}")]
    MissingSshUrl(String),

    #[error("failed to clone {url} to {dir}: exit code {code}")]
    CloneFailed {
        url: String,
        dir: PathBuf,
        code: i32,
    },

    #[error("credentials not found: {0}")]
    MissingCredentials(String),
}

/// A specialized Result type for repository discovery and cloning.
pub type Result<T> = std::result::Result<T, Error>;
