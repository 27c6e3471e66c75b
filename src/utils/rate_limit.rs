// src/utils/rate_limit.rs

//! Sliding-window request limiter.
//!
//! The judge enforces a request budget expressed as "N requests per M
//! seconds"; every remote call goes through [`RateLimiter::acquire`] first.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{AppError, Result};

/// `requests` per `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub requests: u32,
    pub period: Duration,
}

impl FromStr for RateLimit {
    type Err = AppError;

    /// Parse `<requests>/<seconds>`, e.g. `20/10`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AppError::validation(format!("invalid rate limit {s:?}, expected <req>/<sec>"));

        let (requests, seconds) = s.split_once('/').ok_or_else(invalid)?;
        let requests: u32 = requests.trim().parse().map_err(|_| invalid())?;
        let seconds: f64 = seconds.trim().parse().map_err(|_| invalid())?;

        if requests == 0 || !seconds.is_finite() || seconds <= 0.0 {
            return Err(invalid());
        }

        Ok(Self {
            requests,
            period: Duration::from_secs_f64(seconds),
        })
    }
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.requests, self.period.as_secs_f64())
    }
}

/// Limits callers to `limit.requests` acquisitions in any `limit.period`.
#[derive(Debug)]
pub struct RateLimiter {
    limit: RateLimit,
    window: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            window: Mutex::new(VecDeque::with_capacity(limit.requests as usize)),
        }
    }

    pub fn limit(&self) -> RateLimit {
        self.limit
    }

    /// Wait until one more request fits in the window, then record it.
    pub async fn acquire(&self) {
        loop {
            let mut window = self.window.lock().await;
            let now = Instant::now();

            while window
                .front()
                .is_some_and(|&t| now.duration_since(t) >= self.limit.period)
            {
                window.pop_front();
            }

            if window.len() < self.limit.requests as usize {
                window.push_back(now);
                return;
            }

            let oldest = window[0];
            let wait = self.limit.period - now.duration_since(oldest);
            drop(window);

            log::debug!("Rate limit {} reached, waiting {:?}", self.limit, wait);
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_requests_per_seconds() {
        let limit: RateLimit = "20/10".parse().unwrap();
        assert_eq!(limit.requests, 20);
        assert_eq!(limit.period, Duration::from_secs(10));

        let limit: RateLimit = " 3 / 0.5 ".parse().unwrap();
        assert_eq!(limit.period, Duration::from_millis(500));
    }

    #[test]
    fn rejects_malformed_limits() {
        assert!("20".parse::<RateLimit>().is_err());
        assert!("0/10".parse::<RateLimit>().is_err());
        assert!("5/0".parse::<RateLimit>().is_err());
        assert!("a/b".parse::<RateLimit>().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn requests_within_budget_do_not_wait() {
        let limiter = RateLimiter::new("3/10".parse().unwrap());
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn request_over_budget_waits_for_window() {
        let limiter = RateLimiter::new("2/1".parse().unwrap());
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}
