use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval};

/// Cadence used until the server's hello supplies the real interval.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

/// Repeating timer driving heartbeat sends.
///
/// The first tick fires one full period after construction or reset, never
/// immediately.
pub struct HeartbeatTimer {
    interval: Interval,
}

impl HeartbeatTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            interval: Self::build(period),
        }
    }

    pub fn reset(&mut self, period: Duration) {
        self.interval = Self::build(period);
    }

    pub async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }

    fn build(period: Duration) -> Interval {
        interval_at(Instant::now() + period, period)
    }
}
