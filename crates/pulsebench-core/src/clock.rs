// Clock abstraction
//
// Backoff and pacing waits go through this trait so tests can assert the
// exact sleep sequence without waiting on wall-clock time.

use std::time::Duration;

use async_trait::async_trait;

/// Source of suspension for backoff and pacing delays.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production clock backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
