//! Configuration module for the goodbooks crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so the crawler also runs without any file.
//!
//! # Example
//!
//! ```no_run
//! use goodbooks_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawl starts at: {}", config.crawler.seed_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
