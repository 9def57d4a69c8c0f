use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Root category crawled when none is configured ("sport")
pub const DEFAULT_CATEGORY: &str = "กีฬา";

/// Directory the default rule set was written against
pub const DEFAULT_BASE_URL: &str = "https://www.yellowpages.co.th";

/// Placeholder replaced by the category label in the output filename pattern
pub const CATEGORY_PLACEHOLDER: &str = "{category}";

/// Longest delay a fetch policy may configure (one day, in seconds)
pub const MAX_DELAY_SECS: f64 = 86_400.0;

/// Main configuration structure for Sumi-Gather
///
/// Every section is optional in the TOML file; missing sections and keys fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub listing: ListingConfig,
    pub detail: DetailConfig,
    pub output: OutputConfig,
}

/// Target directory configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the directory, without a trailing slash
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Root category label crawled when the CLI does not override it
    pub category: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("sumi-gather/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Fetch policy for paginated listing pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Attempts per listing page before it counts as failed
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Fixed sleep after a failed attempt (seconds)
    #[serde(rename = "backoff-delay")]
    pub backoff_delay: f64,

    /// Lower bound of the polite delay before each fetch (seconds)
    #[serde(rename = "min-delay")]
    pub min_delay: f64,

    /// Upper bound of the polite delay before each fetch (seconds)
    #[serde(rename = "max-delay")]
    pub max_delay: f64,

    /// Consecutive empty or failed pages that end a subcategory
    #[serde(rename = "empty-streak-threshold")]
    pub empty_streak_threshold: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_delay: 3.0,
            min_delay: 1.0,
            max_delay: 2.0,
            empty_streak_threshold: 3,
        }
    }
}

impl ListingConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_secs(
            self.max_attempts,
            self.backoff_delay,
            self.min_delay,
            self.max_delay,
        )
    }
}

/// Fetch policy for business detail pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetailConfig {
    /// Attempts per detail page before the item is skipped
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Fixed sleep after a failed attempt (seconds)
    #[serde(rename = "backoff-delay")]
    pub backoff_delay: f64,

    /// Lower bound of the polite delay before each fetch (seconds)
    #[serde(rename = "min-delay")]
    pub min_delay: f64,

    /// Upper bound of the polite delay before each fetch (seconds)
    #[serde(rename = "max-delay")]
    pub max_delay: f64,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            backoff_delay: 2.0,
            min_delay: 0.5,
            max_delay: 1.2,
        }
    }
}

impl DetailConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_secs(
            self.max_attempts,
            self.backoff_delay,
            self.min_delay,
            self.max_delay,
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output filename, `{category}` is replaced by the crawled category
    #[serde(rename = "filename-pattern")]
    pub filename_pattern: String,

    /// Directory the dataset is written into
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename_pattern: format!("yellowpages_{}.csv", CATEGORY_PLACEHOLDER),
            directory: PathBuf::from("."),
        }
    }
}

impl OutputConfig {
    /// Resolves the dataset path for a category
    pub fn dataset_path(&self, category: &str) -> PathBuf {
        self.directory
            .join(self.filename_pattern.replace(CATEGORY_PLACEHOLDER, category))
    }
}

/// Runtime form of a fetch policy, shared by listing and detail fetches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_delay: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Builds a policy from second-valued settings
    ///
    /// Values are expected to be validated already. Negative and NaN delays
    /// become zero; delays above `MAX_DELAY_SECS` are clamped to it.
    pub fn from_secs(max_attempts: u32, backoff: f64, min_delay: f64, max_delay: f64) -> Self {
        Self {
            max_attempts,
            backoff_delay: secs(backoff),
            min_delay: secs(min_delay),
            max_delay: secs(max_delay),
        }
    }

    /// A policy without any sleeping, used where timing is irrelevant
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff_delay: Duration::ZERO,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }
}

fn secs(value: f64) -> Duration {
    if value.is_nan() || value <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(value.min(MAX_DELAY_SECS)).unwrap_or(Duration::ZERO)
}
