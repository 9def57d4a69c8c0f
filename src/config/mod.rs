//! Configuration module for Sumi-Gather
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: `Config::default()` carries the crawl
//! policy the harvester was tuned with.
//!
//! # Example
//!
//! ```no_run
//! use sumi_gather::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gather.toml")).unwrap();
//! println!("Listing attempts: {}", config.listing.max_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DetailConfig, HttpConfig, ListingConfig, OutputConfig, RetryPolicy, SiteConfig,
    CATEGORY_PLACEHOLDER, DEFAULT_BASE_URL, DEFAULT_CATEGORY, MAX_DELAY_SECS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_category};
