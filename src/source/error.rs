//! Shared error type for the content API. Only transport-level failures live here;
//! unexpected response shapes degrade to empty values instead.

use thiserror::Error;

/// Fatal errors from talking to the remote code library.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to create HTTP client: {source}")]
    ClientBuild { source: reqwest::Error },

    #[error("Invalid header {name:?} in config: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Network error: could not reach {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus {
        status: u16,
        url: String,
        /// Optional context (e.g. "table of contents", "section CH1S1") for programmatic use.
        context: Option<String>,
    },

    #[error("Failed to read response body: {source}")]
    BodyRead { source: reqwest::Error },

    #[error("Response from {url} is not JSON: {reason}")]
    InvalidJson { url: String, reason: String },
}
