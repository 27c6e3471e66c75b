//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::rate_limit::RateLimit;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client and rate limit settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Retry behavior for remote calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Submission history scan settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Archive and state locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Archive rendering options
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Static site options
    #[serde(default)]
    pub site: SiteConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.client.user_agent.trim().is_empty() {
            return Err(AppError::validation("client.user_agent is empty"));
        }
        if self.client.timeout_secs == 0 {
            return Err(AppError::validation("client.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.client.base_url)
            .map_err(|e| AppError::validation(format!("client.base_url: {e}")))?;
        self.client.rate_limit()?;
        if self.retry.max_attempts == 0 {
            return Err(AppError::validation("retry.max_attempts must be > 0"));
        }
        if self.resolver.page_size == 0 {
            return Err(AppError::validation("resolver.page_size must be > 0"));
        }
        if self.resolver.max_pages == 0 {
            return Err(AppError::validation("resolver.max_pages must be > 0"));
        }
        self.archive.timezone()?;
        if self.site.generator.trim().is_empty() {
            return Err(AppError::validation("site.generator is empty"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Site root, also used as the Referer
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// `<requests>/<seconds>`
    #[serde(default = "defaults::rate_limit")]
    pub rate_limit: String,
}

impl ClientConfig {
    /// Parsed rate limit.
    pub fn rate_limit(&self) -> Result<RateLimit> {
        self.rate_limit.parse()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            rate_limit: defaults::rate_limit(),
        }
    }
}

/// Retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Fixed pause between attempts in milliseconds
    #[serde(default = "defaults::cooldown")]
    pub cooldown_ms: u64,
}

impl RetryConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::max_attempts(),
            cooldown_ms: defaults::cooldown(),
        }
    }
}

/// Submission history scan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Submissions requested per page
    #[serde(default = "defaults::page_size")]
    pub page_size: u64,

    /// Upper bound on pages fetched in one run
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
            max_pages: defaults::max_pages(),
        }
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Archive root
    #[serde(default = "defaults::output_dir")]
    pub output_dir: PathBuf,

    /// Holds `submissions.json` and `skip.json`
    #[serde(default = "defaults::state_dir")]
    pub state_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: defaults::output_dir(),
            state_dir: defaults::state_dir(),
        }
    }
}

/// Archive rendering options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// IANA timezone used for solve dates
    #[serde(default = "defaults::timezone")]
    pub timezone: String,

    /// Omit the metadata header from solution files
    #[serde(default)]
    pub pure: bool,
}

impl ArchiveConfig {
    /// Parsed timezone.
    pub fn timezone(&self) -> Result<chrono_tz::Tz> {
        self.timezone
            .parse()
            .map_err(|_| AppError::validation(format!("unknown timezone {:?}", self.timezone)))
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            timezone: defaults::timezone(),
            pure: false,
        }
    }
}

/// Static site options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Archive to read from
    #[serde(default = "defaults::output_dir")]
    pub source_dir: PathBuf,

    /// Where `build` puts the rendered site
    #[serde(default = "defaults::site_dir")]
    pub output_dir: PathBuf,

    /// Where `transform` puts the site source tree
    #[serde(default = "defaults::transform_dir")]
    pub transform_dir: PathBuf,

    /// Static site generator executable
    #[serde(default = "defaults::generator")]
    pub generator: String,

    /// Generator config file passed through as `--config`
    #[serde(default)]
    pub generator_config: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source_dir: defaults::output_dir(),
            output_dir: defaults::site_dir(),
            transform_dir: defaults::transform_dir(),
            generator: defaults::generator(),
            generator_config: None,
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Client defaults
    pub fn base_url() -> String {
        "https://leetcode.com".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; leetcode-dump/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn rate_limit() -> String {
        "20/10".into()
    }

    // Retry defaults
    pub fn max_attempts() -> u32 {
        3
    }
    pub fn cooldown() -> u64 {
        1000
    }

    // Resolver defaults
    pub fn page_size() -> u64 {
        20
    }
    pub fn max_pages() -> u64 {
        1000
    }

    // Path defaults
    pub fn output_dir() -> PathBuf {
        PathBuf::from("leetcode")
    }
    pub fn state_dir() -> PathBuf {
        PathBuf::from(".leetcode-dump")
    }

    // Archive defaults
    pub fn timezone() -> String {
        "Asia/Taipei".into()
    }

    // Site defaults
    pub fn site_dir() -> PathBuf {
        PathBuf::from("site")
    }
    pub fn transform_dir() -> PathBuf {
        PathBuf::from("site-source")
    }
    pub fn generator() -> String {
        "vuepress".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.client.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_rate_limit() {
        let mut config = Config::default();
        config.client.rate_limit = "fast".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_attempts() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_timezone() {
        let mut config = Config::default();
        config.archive.timezone = "Mars/Olympus_Mons".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [client]
            rate_limit = "5/1"

            [resolver]
            max_pages = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.client.rate_limit, "5/1");
        assert_eq!(config.client.base_url, "https://leetcode.com");
        assert_eq!(config.resolver.max_pages, 50);
        assert_eq!(config.resolver.page_size, 20);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn load_or_default_falls_back() {
        let config = Config::load_or_default("does/not/exist.toml");
        assert_eq!(config.paths.output_dir, PathBuf::from("leetcode"));
    }
}
