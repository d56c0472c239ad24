use std::{sync::Arc, time::Duration};

use log::warn;

use crate::{FetchError, FetchOutcome, PageFetcher, PageRequest, Sleeper, StdResult};

/// Number of fetch attempts allowed for one page before it is abandoned.
pub const DEFAULT_RETRY_BUDGET: u32 = 5;

/// Cooldown observed after the listing API answers with HTTP 429.
pub const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(60);

/// Delay observed before retrying a transient failure.
pub const TRANSIENT_RETRY_DELAY: Duration = Duration::from_secs(10);

/// A struct that retries a `PageFetcher` until the page succeeds or its retry
/// budget is exhausted, cooling down longer when the API signals rate limiting.
///
/// Budget exhaustion abandons the page, never the run: the last retryable
/// failure is surfaced as a `Fatal` outcome for the caller to skip.
pub struct FetcherRetrier {
    /// The fetcher to be retried.
    fetcher: Arc<dyn PageFetcher>,

    /// The maximum number of attempts for one page.
    retry_budget: u32,

    /// The cooldown after a rate-limited attempt.
    rate_limit_cooldown: Duration,

    /// The delay after a transient failure.
    retry_delay: Duration,

    /// The sleeper pausing the worker between attempts.
    sleeper: Arc<dyn Sleeper>,
}

impl FetcherRetrier {
    /// Creates a new `FetcherRetrier` instance with the given retry budget and delays.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        retry_budget: u32,
        rate_limit_cooldown: Duration,
        retry_delay: Duration,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            fetcher,
            retry_budget,
            rate_limit_cooldown,
            retry_delay,
            sleeper,
        }
    }
}

#[async_trait::async_trait]
impl PageFetcher for FetcherRetrier {
    /// Retries the request until it succeeds or the retry budget is exhausted.
    async fn fetch(&self, request: &PageRequest) -> StdResult<FetchOutcome> {
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self.fetcher.fetch(request).await {
                Ok(outcome @ (FetchOutcome::Success(_) | FetchOutcome::Fatal(_))) => {
                    return Ok(outcome);
                }
                Ok(FetchOutcome::RateLimited) => {
                    if attempts >= self.retry_budget {
                        return Ok(FetchOutcome::Fatal(FetchError::Status(
                            429,
                            "too many requests".to_string(),
                        )));
                    }
                    warn!(
                        "Rate limited on {request}, cooling down for {:?}",
                        self.rate_limit_cooldown
                    );
                    self.sleeper.sleep(self.rate_limit_cooldown).await;
                }
                Ok(FetchOutcome::Transient(cause)) => {
                    if attempts >= self.retry_budget {
                        return Ok(FetchOutcome::Fatal(cause));
                    }
                    warn!(
                        "Fetch attempt #{attempts} failed for {request}: {cause}, retrying in {:?}",
                        self.retry_delay
                    );
                    self.sleeper.sleep(self.retry_delay).await;
                }
                Err(e) => {
                    if attempts >= self.retry_budget {
                        return Ok(FetchOutcome::Fatal(FetchError::Transport(e.to_string())));
                    }
                    warn!(
                        "Fetch attempt #{attempts} failed for {request}: {e}, retrying in {:?}",
                        self.retry_delay
                    );
                    self.sleeper.sleep(self.retry_delay).await;
                }
            }
        }
    }
}
