//! Configuration for the refresh cycle.

use std::time::Duration;

/// Configuration for the buoy cache and its scheduler.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Delay before retrying after a failed refresh, used instead of
    /// waiting for the next publication checkpoint.
    pub retry_interval: Duration,

    /// Upper bound on any single provider call. A call that runs over is
    /// handled like any other transient failure.
    pub fetch_timeout: Duration,

    /// Sources whose name contains any of these, ignoring case, are
    /// dropped on refresh. These groups are not fixed stations (e.g. ship
    /// reports).
    pub excluded_sources: Vec<String>,
}

impl CacheConfig {
    /// Set the retry interval after a failed refresh.
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Set the provider call timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Replace the list of excluded source names.
    pub fn with_excluded_sources<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_sources = names.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a source with this name should be dropped.
    pub fn is_excluded(&self, source_name: &str) -> bool {
        let name = source_name.to_ascii_lowercase();
        self.excluded_sources
            .iter()
            .any(|excluded| name.contains(&excluded.to_ascii_lowercase()))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            retry_interval: Duration::from_secs(60),
            fetch_timeout: Duration::from_secs(30),
            excluded_sources: vec!["ships".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.retry_interval, Duration::from_secs(60));
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.excluded_sources, vec!["ships".to_string()]);
    }

    #[test]
    fn exclusion_ignores_case() {
        let config = CacheConfig::default();
        assert!(config.is_excluded("Ships"));
        assert!(config.is_excluded("SHIPS"));
        assert!(config.is_excluded("ships"));
        assert!(!config.is_excluded("IOOS Partners"));
    }

    #[test]
    fn exclusion_matches_within_name() {
        let config = CacheConfig::default();
        assert!(config.is_excluded("Ships of Opportunity"));
        assert!(config.is_excluded("VOS ships"));
        assert!(config.is_excluded("Marine ShIpS Reports"));
        assert!(!config.is_excluded("Ship"));
        assert!(!config.is_excluded("NDBC Meteorological/Ocean"));
    }

    #[test]
    fn custom_config() {
        let config = CacheConfig::default()
            .with_retry_interval(Duration::from_secs(5))
            .with_fetch_timeout(Duration::from_secs(2))
            .with_excluded_sources(["Ships", "Marine METAR"]);

        assert_eq!(config.retry_interval, Duration::from_secs(5));
        assert_eq!(config.fetch_timeout, Duration::from_secs(2));
        assert!(config.is_excluded("marine metar"));
        assert!(config.is_excluded("ships"));
    }
}
