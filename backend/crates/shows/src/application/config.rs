//! Application Configuration

use platform::rate_limit::RateLimitConfig;

/// Shows application configuration
#[derive(Debug, Clone)]
pub struct ShowsConfig {
    /// Default listing page size
    pub default_page_size: u32,
    /// Hard cap on per_page
    pub max_page_size: u32,
    /// Maximum artists on one bill
    pub max_lineup: usize,
    /// Duplicate scan window, days either side of the submitted date
    pub dedup_window_days: i64,
    /// Rate limit for show submissions (per client)
    pub submit_rate: RateLimitConfig,
    /// Maximum events per admin import batch
    pub max_import_batch: usize,
}

impl Default for ShowsConfig {
    fn default() -> Self {
        Self {
            default_page_size: 25,
            max_page_size: 100,
            max_lineup: 10,
            dedup_window_days: crate::domain::dedup::DEDUP_WINDOW_DAYS,
            submit_rate: RateLimitConfig::per_hour(20),
            max_import_batch: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShowsConfig::default();
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.max_lineup, 10);
        assert_eq!(config.dedup_window_days, 1);
        assert_eq!(config.max_import_batch, 200);
    }
}
