use chrono::Utc;
use log::{debug, info};
use reqwest::header::HeaderMap;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug)]
struct RateLimit {
    limit: u32,
    remaining: u32,
    reset: i64,
}

/// Tracks the GitHub rate-limit budget from `x-ratelimit-*` response
/// headers and sleeps until the reset when the budget runs out.
pub(crate) struct RateLimiter {
    state: Mutex<RateLimit>,
}

impl RateLimiter {
    /// Starts with an unbounded budget; the first observed response
    /// replaces it with the real one.
    pub fn optimistic() -> Self {
        RateLimiter {
            state: Mutex::new(RateLimit {
                limit: u32::MAX,
                remaining: u32::MAX,
                reset: 0,
            }),
        }
    }

    pub async fn acquire(&self) {
        while let Some(delay) = self.time_to_wait().await {
            info!("rate limit exhausted, sleeping {}s", delay.as_secs());
            tokio::time::sleep(delay).await;
        }
    }

    async fn time_to_wait(&self) -> Option<Duration> {
        let mut state = self.state.lock().await;
        if state.remaining > 0 {
            state.remaining -= 1;
            return None;
        }
        let now = Utc::now().timestamp();
        if state.reset <= now {
            state.remaining = state.limit.saturating_sub(1);
            return None;
        }
        Some(Duration::from_secs((state.reset - now + 1) as u64))
    }

    pub async fn observe(&self, headers: &HeaderMap) {
        let (Some(limit), Some(remaining), Some(reset)) = (
            read_header::<u32>(headers, "x-ratelimit-limit"),
            read_header::<u32>(headers, "x-ratelimit-remaining"),
            read_header::<i64>(headers, "x-ratelimit-reset"),
        ) else {
            return;
        };
        let mut state = self.state.lock().await;
        state.limit = limit;
        // Min `remaining` / max `reset`: a late response from a parallel
        // request may carry stale values.
        state.remaining = remaining.min(state.remaining);
        state.reset = reset.max(state.reset);
        debug!("rate limit updated: {state:?}");
    }
}

fn read_header<T: FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}

/// Tests
