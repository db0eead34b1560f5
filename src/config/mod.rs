//! Configuration module for Deadlink
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and validating the seed URL. Command-line flags are layered on top
//! of the loaded values by the binary.
//!
//! # Example
//!
//! ```no_run
//! use deadlink::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("deadlink.toml")).unwrap();
//! println!("Crawler will use max internal depth: {}", config.crawler.max_internal_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_seed};
