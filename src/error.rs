// src/error.rs

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Reasons a page could not be fetched. These are recoverable: the extractor
/// turns them into an empty page instead of propagating them.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error("could not fetch html from {url}, status code: {status}")]
    Status { url: String, status: StatusCode },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Everything that can stop a page from being classified, or a threshold
/// from being calibrated.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("page unreachable: {0}")]
    Unreachable(#[from] FetchError),
    #[error("page has no visible text")]
    EmptyText,
    #[error("profile has {len} entries, at least {min} are needed to score it")]
    InsufficientSignal { len: usize, min: usize },
    #[error("cannot compute an overlap ratio for an empty profile")]
    EmptyProfile,
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to process word table {path}: {source}")]
    Table { path: PathBuf, source: csv::Error },
    #[error("failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
