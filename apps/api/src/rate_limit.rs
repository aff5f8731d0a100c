//! Per-IP submission throttle for the résumé endpoint.
//!
//! An explicit injected component rather than a module-level map: `AppState`
//! carries an `Arc<RateLimiter>` and handlers only see `check(key) -> bool`.
//! Entries for expired windows are swept once the map grows past a cap, so a
//! long-lived process does not accumulate one entry per client forever.
//!
//! The count is read and incremented under a single lock, so concurrent
//! requests from one IP cannot overshoot the limit.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;

/// Default policy: 3 submissions per 10-minute sliding window.
pub const DEFAULT_LIMIT: u32 = 3;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10 * 60);

/// Map size that triggers a sweep of expired entries on the next check.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Entry {
    count: u32,
    window_start: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` when the caller identified by `key` is still within its
    /// allowance. A first request (or one after the window elapsed) opens a
    /// fresh window.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if entries.len() > SWEEP_THRESHOLD {
            let window = self.window;
            entries.retain(|_, e| now.duration_since(e.window_start) <= window);
        }

        match entries.get_mut(key) {
            Some(entry) if now.duration_since(entry.window_start) <= self.window => {
                if entry.count >= self.limit {
                    return false;
                }
                entry.count += 1;
                true
            }
            _ => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        count: 1,
                        window_start: now,
                    },
                );
                true
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

/// Best-effort client IP: first hop of `x-forwarded-for`, then `x-real-ip`,
/// falling back to a sentinel for direct/local connections.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
        .unwrap_or_else(|| "local".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(3, DEFAULT_WINDOW);
        let now = Instant::now();
        assert!(limiter.check_at("1.2.3.4", now));
        assert!(limiter.check_at("1.2.3.4", now));
        assert!(limiter.check_at("1.2.3.4", now));
        assert!(!limiter.check_at("1.2.3.4", now));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, DEFAULT_WINDOW);
        let now = Instant::now();
        assert!(limiter.check_at("1.2.3.4", now));
        assert!(!limiter.check_at("1.2.3.4", now));
        assert!(limiter.check_at("5.6.7.8", now));
    }

    #[test]
    fn test_window_elapse_resets_counter() {
        let limiter = RateLimiter::new(3, Duration::from_secs(600));
        let start = Instant::now();
        for _ in 0..3 {
            assert!(limiter.check_at("1.2.3.4", start));
        }
        assert!(!limiter.check_at("1.2.3.4", start));

        let later = start + Duration::from_secs(601);
        assert!(limiter.check_at("1.2.3.4", later));
        // Fresh window: two more still fit.
        assert!(limiter.check_at("1.2.3.4", later));
        assert!(limiter.check_at("1.2.3.4", later));
        assert!(!limiter.check_at("1.2.3.4", later));
    }

    #[test]
    fn test_sweep_bounds_the_map() {
        let limiter = RateLimiter::new(3, Duration::from_secs(600));
        let start = Instant::now();
        for i in 0..=SWEEP_THRESHOLD {
            limiter.check_at(&format!("10.0.0.{i}"), start);
        }
        assert!(limiter.len() > SWEEP_THRESHOLD);

        // All previous windows expired; the next check sweeps them out.
        let later = start + Duration::from_secs(601);
        limiter.check_at("fresh-key", later);
        assert_eq!(limiter.len(), 1);
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        headers.insert("x-real-ip", "10.0.0.2".parse().unwrap());
        assert_eq!(client_ip(&headers), "203.0.113.9");
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "10.0.0.2".parse().unwrap());
        assert_eq!(client_ip(&headers), "10.0.0.2");
    }

    #[test]
    fn test_client_ip_sentinel_without_headers() {
        assert_eq!(client_ip(&HeaderMap::new()), "local");
    }
}
