//! Health and status polling schedule.
//!
//! The cheap health check runs every tick. The richer status fetch runs on
//! its own adaptive interval and only after a healthy check in the same tick.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct HealthPoller {
    startup_interval: Duration,
    steady_interval: Duration,
    check_in_flight: bool,
    status_in_flight: bool,
    last_status_fetch: Option<Instant>,
}

impl HealthPoller {
    pub fn new(startup_interval: Duration, steady_interval: Duration) -> Self {
        Self {
            startup_interval,
            steady_interval,
            check_in_flight: false,
            status_in_flight: false,
            last_status_fetch: None,
        }
    }

    /// Claim the health-check slot for this tick.
    pub fn try_begin_check(&mut self) -> bool {
        if self.check_in_flight {
            return false;
        }
        self.check_in_flight = true;
        true
    }

    pub fn finish_check(&mut self) {
        self.check_in_flight = false;
    }

    /// 500ms-class interval while booting or just started, steady otherwise.
    pub fn status_interval(&self, booting: bool) -> Duration {
        if booting {
            self.startup_interval
        } else {
            self.steady_interval
        }
    }

    /// Claim the status-fetch slot if the adaptive interval has elapsed.
    pub fn try_begin_status_fetch(&mut self, now: Instant, booting: bool) -> bool {
        if self.status_in_flight {
            return false;
        }

        let due = match self.last_status_fetch {
            Some(at) => now.saturating_duration_since(at) >= self.status_interval(booting),
            None => true,
        };
        if due {
            self.status_in_flight = true;
            self.last_status_fetch = Some(now);
        }
        due
    }

    pub fn finish_status_fetch(&mut self) {
        self.status_in_flight = false;
    }

    /// Fetch status on the very next healthy tick.
    pub fn invalidate_status(&mut self) {
        self.last_status_fetch = None;
    }
}
