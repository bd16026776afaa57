// src/errors/mod.rs
use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for swapiprobe operations
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTTP middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    #[error("Invalid header name: {0}")]
    HeaderName(#[from] reqwest::header::InvalidHeaderName),

    #[error("Invalid header value: {0}")]
    HeaderValue(#[from] reqwest::header::InvalidHeaderValue),

    #[error("JSON serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Non-2xx response, carried as a value so callers must handle it.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("Pagination error: {0}")]
    Pagination(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("conformance suite failed: {failed} of {total} checks")]
    SuiteFailed { failed: usize, total: usize },
}

/// Convenience Result type that uses ProbeError
pub type Result<T> = std::result::Result<T, ProbeError>;
