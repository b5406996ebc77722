use tokio::time::{sleep, Duration, Instant};

/// Reserve-next-slot pacer for spacing outbound API calls.
///
/// Best-effort defense against the platform's flood limits on bulk sends;
/// it spaces calls, it does not guarantee the remote never throttles.
#[derive(Debug)]
pub struct IntervalPacer {
    interval: Duration,
    next: Instant,
}

impl IntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Instant::now(),
        }
    }

    /// Reserve the next slot and return the wait required before using it.
    fn reserve(&mut self) -> Duration {
        let now = Instant::now();
        let start = if now >= self.next { now } else { self.next };
        self.next = start + self.interval;
        start.saturating_duration_since(now)
    }

    /// Wait until the next slot is available.
    pub async fn wait(&mut self) {
        let wait = self.reserve();
        if wait > Duration::ZERO {
            sleep(wait).await;
        }
    }
}
