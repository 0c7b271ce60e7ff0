use thiserror::Error;

/// Errors surfaced to callers of the analysis engine.
///
/// Provider failures never appear here: they are absorbed by the retrieval
/// coordinator and degrade to fewer candidates (see [`ProviderError`]).
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The document contains no analyzable text after segmentation.
    /// Distinct from "no matches found" — no result is produced at all.
    #[error("document too short or unreadable: {0}")]
    Validation(String),
    /// Invalid engine configuration.
    #[error("invalid analysis config: {0}")]
    InvalidConfig(String),
    /// Malformed static corpus data, rejected at construction time.
    #[error("invalid corpus data: {0}")]
    InvalidCorpus(String),
    /// Unexpected failure inside scoring or aggregation.
    #[error("internal analysis failure: {0}")]
    Internal(String),
}

/// Errors produced inside a single provider adapter.
///
/// These are recovered locally by the retrieval coordinator: the failing
/// provider contributes an empty candidate list for that query and the run
/// continues.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network-level failure (connect, timeout, TLS, body read).
    #[error("request failed: {0}")]
    Http(String),
    /// Non-2xx response from the provider.
    #[error("unexpected status {0}")]
    Status(u16),
    /// Response body could not be parsed into candidates.
    #[error("response parse failed: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err.to_string())
    }
}
