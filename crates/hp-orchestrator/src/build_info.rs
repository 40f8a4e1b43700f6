//! Throttle for the prepare-build-info request.

use std::time::Duration;

use tokio::time::Instant;

/// Sends at most once per interval. A request made inside the interval is
/// remembered and sent once the interval elapses.
#[derive(Debug)]
pub struct BuildInfoThrottle {
    interval: Duration,
    last_sent: Option<Instant>,
    pending: bool,
}

impl BuildInfoThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sent: None,
            pending: false,
        }
    }

    pub fn request(&mut self) {
        self.pending = true;
    }

    /// True when a pending request may go out now; consumes it.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if !self.pending {
            return false;
        }

        let elapsed = self
            .last_sent
            .is_none_or(|at| now.saturating_duration_since(at) >= self.interval);
        if elapsed {
            self.pending = false;
            self.last_sent = Some(now);
        }
        elapsed
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
