//! Application configuration for specsift.
//!
//! User config lives at `~/.specsift/specsift.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpecsiftError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "specsift.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".specsift";

// ---------------------------------------------------------------------------
// Config structs (matching specsift.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Fetch and rendering settings.
    #[serde(default)]
    pub fetch: FetchSettings,

    /// Crawl policies.
    #[serde(default)]
    pub crawl: CrawlSettings,
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Timeout for static HTTP fetches, in seconds.
    #[serde(default = "default_static_timeout")]
    pub static_timeout_secs: u64,

    /// Idle timeout for rendered (WebDriver) fetches, in seconds.
    #[serde(default = "default_render_timeout")]
    pub render_idle_timeout_secs: u64,

    /// Minimum static body length (chars) to count as real content.
    /// Shorter bodies are treated as client-side shells.
    #[serde(default = "default_min_content_len")]
    pub min_content_len: usize,

    /// WebDriver endpoint used for rendered fetches.
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            static_timeout_secs: default_static_timeout(),
            render_idle_timeout_secs: default_render_timeout(),
            min_content_len: default_min_content_len(),
            webdriver_url: default_webdriver_url(),
        }
    }
}

fn default_static_timeout() -> u64 {
    10
}
fn default_render_timeout() -> u64 {
    30
}
fn default_min_content_len() -> usize {
    300
}
fn default_webdriver_url() -> String {
    "http://localhost:4444".into()
}

/// `[crawl]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSettings {
    /// Hard ceiling on pages visited per crawl pass.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Wall-clock ceiling for a whole crawl pass, in seconds.
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: u64,

    /// Visit only the root URL; skip link extraction entirely.
    #[serde(default)]
    pub single_page: bool,

    /// Enable rendered fetches from the first pass onward.
    #[serde(default)]
    pub allow_render_initially: bool,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_duration_secs: default_max_duration(),
            single_page: false,
            allow_render_initially: false,
        }
    }
}

fn default_max_pages() -> usize {
    500
}
fn default_max_duration() -> u64 {
    300
}

// ---------------------------------------------------------------------------
// Crawl config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime crawl configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Timeout for static HTTP fetches, in seconds.
    pub static_timeout_secs: u64,
    /// Idle timeout for rendered fetches, in seconds.
    pub render_idle_timeout_secs: u64,
    /// Minimum static body length to count as real content.
    pub min_content_len: usize,
    /// WebDriver endpoint for rendered fetches.
    pub webdriver_url: String,
    /// Hard ceiling on pages visited per crawl pass.
    pub max_pages: usize,
    /// Wall-clock ceiling for a whole crawl pass, in seconds.
    pub max_duration_secs: u64,
    /// Visit only the root URL; skip link extraction.
    pub single_page: bool,
    /// Enable rendered fetches from the first pass onward.
    pub allow_render_initially: bool,
}

impl From<&AppConfig> for CrawlConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            static_timeout_secs: config.fetch.static_timeout_secs,
            render_idle_timeout_secs: config.fetch.render_idle_timeout_secs,
            min_content_len: config.fetch.min_content_len,
            webdriver_url: config.fetch.webdriver_url.clone(),
            max_pages: config.crawl.max_pages,
            max_duration_secs: config.crawl.max_duration_secs,
            single_page: config.crawl.single_page,
            allow_render_initially: config.crawl.allow_render_initially,
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.specsift/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SpecsiftError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.specsift/specsift.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SpecsiftError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SpecsiftError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SpecsiftError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SpecsiftError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SpecsiftError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
