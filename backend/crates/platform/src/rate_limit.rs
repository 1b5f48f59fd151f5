//! Rate Limiting Infrastructure
//!
//! Common rate limiting abstractions. Storage backends live with the
//! database layer of the consuming crate (fixed-window counters in
//! Postgres); this module only defines the vocabulary.

use std::time::Duration;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// N requests per minute
    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(max_requests, 60)
    }

    /// N requests per hour
    pub fn per_hour(max_requests: u32) -> Self {
        Self::new(max_requests, 3600)
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check and increment rate limit counter for a scope key
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_constructors() {
        let per_min = RateLimitConfig::per_minute(5);
        assert_eq!(per_min.max_requests, 5);
        assert_eq!(per_min.window, Duration::from_secs(60));
        assert_eq!(per_min.window_ms(), 60_000);

        let per_hour = RateLimitConfig::per_hour(100);
        assert_eq!(per_hour.window, Duration::from_secs(3600));
    }

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 10);
        assert_eq!(config.window, Duration::from_secs(60));
    }
}
