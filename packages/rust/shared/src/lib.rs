//! Shared types, error model, and configuration for specsift.
//!
//! This crate is the foundation depended on by all other specsift crates.
//! It provides:
//! - [`SpecsiftError`] — the unified error type
//! - Domain types ([`DocType`], [`DocTypeResult`], [`Page`], [`SpecDocument`])
//! - Configuration ([`AppConfig`], [`CrawlConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CrawlConfig, CrawlSettings, FetchSettings, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{Result, SpecsiftError};
pub use types::{DocType, DocTypeResult, Page, SpecDocument};
