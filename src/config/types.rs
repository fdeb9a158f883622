use serde::Deserialize;

/// Default listing page the crawl starts from
pub const DEFAULT_SEED_URL: &str = "https://www.goodbooks.io/people/";

/// Main configuration structure
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
#[serde(default)]
pub struct CrawlerConfig {
    /// People listing URL the crawl starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Domains pages may be fetched from (exact or "*.example.com")
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: DEFAULT_SEED_URL.to_string(),
            allowed_domains: vec!["goodbooks.io".to_string(), "www.goodbooks.io".to_string()],
            max_concurrent_requests: 4,
            request_timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "goodbooks-crawler".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://www.goodbooks.io/".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the people JSON document
    #[serde(rename = "people-path")]
    pub people_path: String,

    /// Path of the books JSON document
    #[serde(rename = "books-path")]
    pub books_path: String,

    /// Directory portraits are saved to
    #[serde(rename = "photos-dir")]
    pub photos_dir: String,

    /// Directory book covers are saved to
    #[serde(rename = "covers-dir")]
    pub covers_dir: String,

    /// SQLite response cache; empty disables caching
    #[serde(rename = "cache-path")]
    pub cache_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            people_path: "people.json".to_string(),
            books_path: "books.json".to_string(),
            photos_dir: "./photos".to_string(),
            covers_dir: "./covers".to_string(),
            cache_path: "./goodbooks_cache.db".to_string(),
        }
    }
}

impl OutputConfig {
    /// Returns true if responses should be cached on disk
    pub fn cache_enabled(&self) -> bool {
        !self.cache_path.is_empty()
    }
}
