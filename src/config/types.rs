use serde::Deserialize;

/// Default upstream endpoint serving paginated pass summaries
pub const DEFAULT_ENDPOINT: &str = "https://www.heavens-above.com/PassSummary.aspx";

/// Main configuration structure for a scrape run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub target: TargetConfig,
    pub observer: ObserverConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Identifies the satellite being scraped
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Satellite catalog id (e.g. 25544 for the ISS)
    #[serde(rename = "sat-id")]
    pub sat_id: u32,

    /// Human-readable name, used only for logging
    #[serde(default)]
    pub name: String,
}

/// Observer location sent to the upstream endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ObserverConfig {
    /// Observer latitude in decimal degrees
    pub latitude: f64,

    /// Observer longitude in decimal degrees
    pub longitude: f64,

    /// Place name in plain UTF-8; percent-encoded at request-build time
    #[serde(rename = "place-name")]
    pub place_name: String,

    /// Observer altitude in metres above sea level
    #[serde(default)]
    pub altitude: i32,

    /// Timezone code the upstream uses to localize pass times (e.g. "ChST")
    pub timezone: String,
}

/// Scrape behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Number of result pages to fetch (1-based page indices)
    #[serde(default = "default_pages")]
    pub pages: u32,

    /// Upstream endpoint; overridable so tests (and a revived iridium
    /// feed) can point the same core elsewhere
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-concurrent-fetches", default = "default_concurrency")]
    pub max_concurrent_fetches: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Overall run deadline in seconds; pages still in flight when it
    /// expires are recorded as transport failures
    #[serde(rename = "run-timeout-secs", default = "default_run_timeout")]
    pub run_timeout_secs: u64,

    /// Attempts per page for transient transport errors
    #[serde(rename = "retry-attempts", default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Delay between retry attempts in milliseconds
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            endpoint: default_endpoint(),
            max_concurrent_fetches: default_concurrency(),
            fetch_timeout_secs: default_fetch_timeout(),
            run_timeout_secs: default_run_timeout(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the per-target JSON file is written under
    #[serde(rename = "data-root")]
    pub data_root: String,
}

/// Session/locale configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Opaque cookie value the upstream requires to serve the expected
    /// locale; obtained out of band (e.g. an interactive browser session)
    #[serde(default)]
    pub cookie: String,
}

fn default_pages() -> u32 {
    4
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_concurrency() -> u32 {
    4
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_run_timeout() -> u64 {
    300
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    500
}
