use std::time::Duration;

/// A trait for pausing execution, injected so tests observe delays instead of
/// waiting them out.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Sleeper: Sync + Send {
    /// Suspends the current task for the given duration.
    async fn sleep(&self, duration: Duration);
}
