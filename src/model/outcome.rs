use std::fmt::Display;

use thiserror::Error;

use super::Package;

/// Fetcher error
#[derive(Error, Debug)]
pub enum FetchError {
    /// The listing API answered with a non-2xx status.
    #[error("HTTP status {0}: {1}")]
    Status(u16, String),

    /// The request never completed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Parsing error: {0}")]
    Parse(String),
}

/// The classified outcome of fetching one page of the listing API.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The page was fetched and decoded, in source order.
    Success(Vec<Package>),

    /// The listing API throttled the request (HTTP 429).
    RateLimited,

    /// The request failed in a way that is worth retrying.
    Transient(FetchError),

    /// The retry budget for the page is exhausted, the page is abandoned.
    Fatal(FetchError),
}

impl Display for FetchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchOutcome::Success(packages) => write!(f, "success ({} packages)", packages.len()),
            FetchOutcome::RateLimited => write!(f, "rate limited"),
            FetchOutcome::Transient(cause) => write!(f, "transient failure: {cause}"),
            FetchOutcome::Fatal(cause) => write!(f, "abandoned after retries: {cause}"),
        }
    }
}
