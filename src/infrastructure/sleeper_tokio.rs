use std::time::Duration;

use tokio::time::sleep;

use crate::Sleeper;

/// A `Sleeper` backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        sleep(duration).await;
    }
}
