//! Configuration module for passwatch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use passwatch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Fetching {} pages for satellite {}", config.scrape.pages, config.target.sat_id);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ObserverConfig, OutputConfig, ScrapeConfig, SessionConfig, TargetConfig,
    DEFAULT_ENDPOINT,
};

// Re-export parser functions
pub use parser::load_config;

// Re-export validation entry point and limits
pub use validation::{validate, MAX_PAGES};
