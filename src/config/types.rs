use crate::url::{report_file_name, OriginPolicy};
use crate::state::CrawlTask;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Main configuration structure for Deadlink
///
/// Every section and key is optional in the TOML file; missing values take
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Whether external pages are fetched and crawled (they are always probed)
    #[serde(rename = "follow-external", default)]
    pub follow_external: bool,

    /// Maximum depth for internal pages (seed = 0)
    #[serde(rename = "max-internal-depth", default = "default_max_internal_depth")]
    pub max_internal_depth: u32,

    /// Maximum depth for external pages when following them
    #[serde(rename = "max-external-depth", default)]
    pub max_external_depth: u32,

    /// Pause after each page (seconds)
    #[serde(rename = "delay", default = "default_delay")]
    pub delay_secs: f64,

    /// Timeout for each liveness probe (seconds)
    #[serde(rename = "timeout", default = "default_timeout")]
    pub timeout_secs: f64,

    /// Timeout for page fetches (seconds); falls back to `timeout`
    #[serde(rename = "page-timeout", default)]
    pub page_timeout_secs: Option<f64>,

    /// Liveness probes allowed in flight at once for a page
    #[serde(rename = "max-concurrent-checks", default = "default_max_concurrent_checks")]
    pub max_concurrent_checks: u32,

    /// How links are classified as internal or external
    #[serde(rename = "origin-policy", default)]
    pub origin_policy: OriginPolicy,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the CSV report; derived from the seed host when absent
    #[serde(rename = "csv-path", default)]
    pub csv_path: Option<String>,

    /// Whether to draw the live status line
    #[serde(default = "default_progress")]
    pub progress: bool,
}

fn default_max_internal_depth() -> u32 {
    5
}

fn default_delay() -> f64 {
    0.05
}

fn default_timeout() -> f64 {
    5.0
}

fn default_max_concurrent_checks() -> u32 {
    1
}

fn default_crawler_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_progress() -> bool {
    true
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            follow_external: false,
            max_internal_depth: default_max_internal_depth(),
            max_external_depth: 0,
            delay_secs: default_delay(),
            timeout_secs: default_timeout(),
            page_timeout_secs: None,
            max_concurrent_checks: default_max_concurrent_checks(),
            origin_policy: OriginPolicy::default(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            progress: default_progress(),
        }
    }
}

impl CrawlerConfig {
    /// Pause between pages
    ///
    /// Values are validated before use; anything unrepresentable collapses to zero.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or(Duration::ZERO)
    }

    /// Timeout for a single liveness probe
    pub fn check_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(Duration::ZERO)
    }

    /// Timeout for a single page fetch
    pub fn page_timeout(&self) -> Duration {
        let secs = self.page_timeout_secs.unwrap_or(self.timeout_secs);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    }

    /// Depth gate: whether a task may be fetched
    ///
    /// A depth equal to the maximum is allowed; one more is rejected. External
    /// tasks are never fetched unless `follow_external` is set.
    pub fn allows(&self, task: &CrawlTask) -> bool {
        if task.origin.is_internal() {
            task.depth <= self.max_internal_depth
        } else {
            self.follow_external && task.depth <= self.max_external_depth
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl OutputConfig {
    /// The CSV report path for a crawl of `seed`
    pub fn csv_path_for(&self, seed: &Url) -> PathBuf {
        match &self.csv_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(report_file_name(seed)),
        }
    }
}
