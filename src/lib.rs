//! Passwatch: a satellite pass-prediction scraper
//!
//! This crate fetches overhead-pass predictions for a satellite from a
//! paginated upstream HTML endpoint, parses each page's pass table into
//! typed records, deduplicates and orders them across pages, and persists
//! the result as one JSON file per target.

pub mod config;
pub mod report;
pub mod scrape;
pub mod sink;

use thiserror::Error;

/// Main error type for passwatch operations
#[derive(Debug, Error)]
pub enum PasswatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid target: satellite id must be positive, got {0}")]
    InvalidTarget(i64),

    #[error("Invalid page: {page} is outside 1..={max}")]
    InvalidPage { page: u32, max: u32 },

    #[error("Failed to write output: {0}")]
    WriteFailed(#[from] sink::SinkError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Page task aborted: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}

/// Result type alias for passwatch operations
pub type Result<T> = std::result::Result<T, PasswatchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use report::{PageOutcome, PageResult, PassRecord, RunStatus, ScrapeReport};
pub use scrape::Orchestrator;
