//! Politeness policy for sequential article fetches.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// At most `max_requests` fetches start within any `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchPacing {
    pub max_requests: u32,
    #[serde(rename = "window_ms", with = "duration_ms")]
    pub window: Duration,
}

impl Default for FetchPacing {
    /// One fetch per 100 ms.
    fn default() -> Self {
        Self { max_requests: 1, window: Duration::from_millis(100) }
    }
}

impl FetchPacing {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self { max_requests, window }
    }

    /// No pacing at all.
    pub fn unlimited() -> Self {
        Self { max_requests: u32::MAX, window: Duration::ZERO }
    }

    pub fn pacer(&self) -> Pacer {
        Pacer { policy: *self, started: VecDeque::new() }
    }
}

/// Sliding-window pacer for one batch of fetches.
///
/// Uses tokio's clock, so tests can drive it with a paused runtime.
#[derive(Debug)]
pub struct Pacer {
    policy: FetchPacing,
    started: VecDeque<Instant>,
}

impl Pacer {
    /// Wait until another request may start, then count it.
    pub async fn ready(&mut self) {
        let limit = self.policy.max_requests.max(1) as usize;

        loop {
            let now = Instant::now();
            while self
                .started
                .front()
                .is_some_and(|&start| now.duration_since(start) >= self.policy.window)
            {
                self.started.pop_front();
            }

            match self.started.front() {
                Some(&oldest) if self.started.len() >= limit => {
                    tokio::time::sleep_until(oldest + self.policy.window).await;
                }
                _ => break,
            }
        }

        self.started.push_back(Instant::now());
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
