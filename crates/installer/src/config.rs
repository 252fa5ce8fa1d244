//! Configuration for a download/install run

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Default package repository download endpoint.
pub const DEFAULT_BASE_URL: &str = "https://thunderstore.io/package/download";

/// Configuration for a download/install run.
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    /// Game directory the mods are installed into.
    pub game_dir: PathBuf,
    /// Download cache holding extracted package archives.
    pub cache_dir: PathBuf,
    /// Repository download endpoint.
    pub base_url: Url,
    /// Maximum number of packages fetched and installed at once.
    pub max_concurrent: usize,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// HTTP user agent.
    pub user_agent: String,
}

impl InstallerConfig {
    /// Create a configuration with default repository, timeout, and
    /// concurrency settings.
    pub fn new(game_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            game_dir: game_dir.into(),
            cache_dir: cache_dir.into(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default repository URL is valid"),
            max_concurrent: default_parallelism(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("modstorm/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Override the repository download endpoint.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Override the worker-pool size. Clamped to at least one worker.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Override the HTTP request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Pool size matching the host's parallelism.
fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_repository() {
        let config = InstallerConfig::new("/game", "/cache");
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert!(config.max_concurrent >= 1);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn max_concurrent_is_clamped() {
        let config = InstallerConfig::new("/game", "/cache").with_max_concurrent(0);
        assert_eq!(config.max_concurrent, 1);
    }
}
