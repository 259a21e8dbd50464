//! Configuration management for Resource Viewer

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub browser: BrowserConfig,
    pub loader: LoaderConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Content browser settings
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Where the resource manifest is fetched from (URL or local path)
    pub manifest_location: String,
    /// Bound on the manifest fetch
    pub manifest_timeout: Duration,
    /// Key under which view/like counters are stored
    pub stats_key: String,
    /// Key under which the page-visit counter is stored
    pub page_visits_key: String,
    /// Base URL used to build share links
    pub share_base_url: String,
    pub default_scale: f32,
    pub zoom_step: f32,
    pub min_scale: f32,
}

/// Document loader settings
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Bound on each document open attempt
    pub timeout: Duration,
    /// Bound on availability probes
    pub probe_timeout: Duration,
    /// Try the primary location before the fallback
    pub primary_first: bool,
    /// Number of paginated documents warmed by preload
    pub preload_limit: usize,
    /// Directory that relative locations are resolved against
    pub local_root: PathBuf,
    /// Refuse documents larger than this
    pub max_document_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        BrowserConfig {
            manifest_location: "./data_ai/manifest.json".to_string(),
            manifest_timeout: Duration::from_millis(10_000),
            stats_key: "ai_stats".to_string(),
            page_visits_key: "views_content_viewer".to_string(),
            share_base_url: "http://localhost:3000/".to_string(),
            default_scale: 1.5,
            zoom_step: 0.25,
            min_scale: 0.5,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            timeout: Duration::from_millis(15_000),
            probe_timeout: Duration::from_millis(5_000),
            primary_first: true,
            preload_limit: 3,
            local_root: PathBuf::from("."),
            max_document_bytes: 64 * 1024 * 1024,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            browser: BrowserConfig::default(),
            loader: LoaderConfig::default(),
            database: DatabaseConfig {
                url: "sqlite:./viewer.db".to_string(),
            },
        }
    }
}

/// Errors raised while reading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let browser_defaults = BrowserConfig::default();
        let loader_defaults = LoaderConfig::default();

        Ok(Config {
            server: ServerConfig {
                host: var_or("SERVER_HOST", "0.0.0.0"),
                port: parse_var("SERVER_PORT", 3000)?,
            },
            browser: BrowserConfig {
                manifest_location: var_or("MANIFEST_LOCATION", &browser_defaults.manifest_location),
                manifest_timeout: Duration::from_millis(parse_var("MANIFEST_TIMEOUT_MS", 10_000)?),
                stats_key: var_or("STATS_KEY", &browser_defaults.stats_key),
                page_visits_key: var_or("PAGE_VISITS_KEY", &browser_defaults.page_visits_key),
                share_base_url: var_or("SHARE_BASE_URL", &browser_defaults.share_base_url),
                ..browser_defaults
            },
            loader: LoaderConfig {
                timeout: Duration::from_millis(parse_var("LOADER_TIMEOUT_MS", 15_000)?),
                probe_timeout: Duration::from_millis(parse_var("PROBE_TIMEOUT_MS", 5_000)?),
                primary_first: parse_var("LOADER_PRIMARY_FIRST", true)?,
                preload_limit: parse_var("PRELOAD_LIMIT", loader_defaults.preload_limit)?,
                local_root: PathBuf::from(var_or("LOCAL_ROOT", ".")),
                max_document_bytes: parse_var(
                    "MAX_DOCUMENT_BYTES",
                    loader_defaults.max_document_bytes,
                )?,
            },
            database: DatabaseConfig {
                url: var_or("DATABASE_URL", "sqlite:./viewer.db"),
            },
        })
    }
}
