use std::time::Duration;
use thiserror::Error;

/// Failures the fetch step can surface. Everything downstream of a
/// successful fetch is total and cannot fail on well-formed input.
#[derive(Debug, Error)]
pub enum FetchError {
    /// GitHub rate limit exhausted. Recoverable: retry after the delay.
    #[error("rate limited by GitHub, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Organization does not exist or is not visible with this token.
    #[error("organization '{org}' not found or not accessible")]
    NotFound { org: String },

    /// Any other non-success status from the API.
    #[error("GitHub API returned status {status}")]
    Api { status: reqwest::StatusCode },

    #[error("network error talking to GitHub")]
    Network(#[from] reqwest::Error),
}
