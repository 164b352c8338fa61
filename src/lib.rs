//! Bike Rental System: client-side core of a bike rental marketplace.
//!
//! The crate keeps a bike listing (search, type/status filters, sort order and
//! page) in sync with the page URL and the backend API, caches fetched pages,
//! debounces typing in the search box, and talks to the backend through an
//! HTTP client that attaches the stored bearer token and refreshes it once
//! when the backend answers 401.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                       │
//! └──────────────────────────────────────────────────────┘
//!                         │
//! ┌──────────────────────────────────────────────────────┐
//! │  Runtime (runtime/)                                  │  ← executes actions,
//! │  - URL updates, fetch queue, debounce clock          │    feeds completions back
//! └──────────────────────────────────────────────────────┘
//!          │                    │                    │
//! ┌────────────────┐   ┌────────────────┐   ┌────────────────┐
//! │ app/           │   │ cache/         │   │ http/          │
//! │ - ListState    │   │ - LRU + TTL    │   │ - ApiClient    │
//! │ - handle_event │   │ - CacheKey     │   │ - refresh      │
//! │ - SearchInput  │   │                │   │ - Transport    │
//! └────────────────┘   └────────────────┘   └────────────────┘
//!          │                                         │
//! ┌──────────────────────────────────────────────────────┐
//! │  domain/ (query, bikes, pages, errors)               │
//! │  storage/ (token store)   infrastructure/ (paths)    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! Read from the environment, optionally over a TOML file:
//!
//! | Variable | File key | Default |
//! |---|---|---|
//! | `BIKE_RENTAL_API_URL` | `api_url` | [`DEFAULT_API_URL`] |
//! | `BIKE_RENTAL_ENABLE_ANALYTICS` | `enable_analytics` | `false` |
//! | `BIKE_RENTAL_ENABLE_DEBUG` | `enable_debug` | `false` |
//! | `BIKE_RENTAL_TRACE_LEVEL` | `trace_level` | `debug` if debug is on, else `info` |
//! | `BIKE_RENTAL_CACHE_CAPACITY` | `cache_capacity` | `64` |
//! | `BIKE_RENTAL_CACHE_TTL_SECS` | `cache_ttl_secs` | `300` (0 = no expiry) |
//! | `BIKE_RENTAL_DATA_DIR` | `data_dir` | platform data dir + `bike-rental` |
//!
//! Flags are on only for the exact string `true`.
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//! use bike_rental::{initialize, Config, Event};
//! use bike_rental::http::ReqwestTransport;
//! use bike_rental::storage::{shared, MemoryTokenStore};
//!
//! let config = Config::from_env();
//! let transport = Rc::new(ReqwestTransport::new(std::time::Duration::from_secs(30))?);
//! let mut runtime = initialize(&config, transport, shared(MemoryTokenStore::default()));
//!
//! runtime.dispatch(Event::Mount { query: "type=Mountain".into() })?;
//! runtime.settle()?;
//! bike_rental::ui::render(&runtime.view());
//! # Ok::<(), bike_rental::BikeRentalError>(())
//! ```

pub mod app;
pub mod cache;
pub mod domain;
pub mod http;
pub mod infrastructure;
pub mod observability;
pub mod runtime;
pub mod storage;
pub mod ui;

pub use app::{handle_event, Action, Event, ListState, SearchInput};
pub use domain::{ApiError, BikeRentalError, Result};
pub use runtime::Runtime;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Deserialize;

use crate::http::{ApiClient, Transport};
use crate::storage::SharedTokenStore;

pub const APP_NAME: &str = "Bike Rental System";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend used when no API URL is configured.
pub const DEFAULT_API_URL: &str = "https://bike-rental-backend-jmhr.onrender.com/api/v1/";

pub const DEFAULT_CACHE_CAPACITY: usize = 64;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Prefix of every configuration environment variable.
pub const ENV_PREFIX: &str = "BIKE_RENTAL_";

/// Immutable client configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL, always ending with `/`.
    pub api_url: String,

    pub enable_analytics: bool,

    /// Turns on debug-level tracing unless `trace_level` says otherwise.
    pub enable_debug: bool,

    /// `EnvFilter` directive, e.g. `info` or `bike_rental=trace`.
    pub trace_level: Option<String>,

    /// Maximum number of cached listing pages.
    pub cache_capacity: usize,

    /// Age after which a cached page is refetched; 0 keeps pages until evicted.
    pub cache_ttl_secs: u64,

    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            enable_analytics: false,
            enable_debug: false,
            trace_level: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            data_dir: None,
        }
    }
}

/// Shape of the optional TOML configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    enable_analytics: Option<bool>,
    enable_debug: Option<bool>,
    trace_level: Option<String>,
    cache_capacity: Option<usize>,
    cache_ttl_secs: Option<u64>,
    data_dir: Option<String>,
}

impl Config {
    /// Builds a configuration from environment-style variables.
    ///
    /// Keys carry the [`ENV_PREFIX`]; unknown keys are ignored and values that
    /// do not parse keep their defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use bike_rental::Config;
    ///
    /// let mut vars = BTreeMap::new();
    /// vars.insert("BIKE_RENTAL_API_URL".to_string(), "http://localhost:8000/api/v1".to_string());
    /// vars.insert("BIKE_RENTAL_ENABLE_DEBUG".to_string(), "true".to_string());
    /// vars.insert("BIKE_RENTAL_ENABLE_ANALYTICS".to_string(), "yes".to_string());
    ///
    /// let config = Config::from_env_map(&vars);
    /// assert_eq!(config.api_url, "http://localhost:8000/api/v1/");
    /// assert!(config.enable_debug);
    /// assert!(!config.enable_analytics);
    /// ```
    #[must_use]
    pub fn from_env_map(vars: &BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        config.overlay_env(vars);
        config
    }

    /// Reads the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_map(&env_vars())
    }

    /// Parses a TOML configuration document over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BikeRentalError::Config`] for malformed TOML or unknown keys.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(contents)
            .map_err(|e| BikeRentalError::Config(format!("invalid configuration file: {e}")))?;
        let mut config = Self::default();
        config.overlay_file(file);
        Ok(config)
    }

    /// Loads the configuration: defaults, then `file` if given, then the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    BikeRentalError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                Self::from_toml_str(&contents)?
            }
            None => Self::default(),
        };
        config.overlay_env(&env_vars());
        Ok(config)
    }

    /// Checks required settings, logging a warning for each missing one.
    ///
    /// Returns `true` when the configuration is usable.
    pub fn validate(&self) -> bool {
        let mut ok = true;
        if self.api_url.trim_end_matches('/').is_empty() {
            tracing::warn!(missing = "api_url", "missing required configuration");
            ok = false;
        } else if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            tracing::warn!(api_url = %self.api_url, "api_url is not an http(s) URL");
            ok = false;
        }
        ok
    }

    /// Filter directive for the tracing subscriber.
    #[must_use]
    pub fn effective_trace_level(&self) -> String {
        match &self.trace_level {
            Some(level) => level.clone(),
            None if self.enable_debug => "debug".to_string(),
            None => "info".to_string(),
        }
    }

    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(infrastructure::default_data_dir)
    }

    fn overlay_env(&mut self, vars: &BTreeMap<String, String>) {
        let get = |key: &str| {
            vars.get(&format!("{ENV_PREFIX}{key}"))
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        if let Some(url) = get("API_URL") {
            self.api_url = with_trailing_slash(url);
        }
        if let Some(flag) = get("ENABLE_ANALYTICS") {
            self.enable_analytics = flag == "true";
        }
        if let Some(flag) = get("ENABLE_DEBUG") {
            self.enable_debug = flag == "true";
        }
        if let Some(level) = get("TRACE_LEVEL") {
            self.trace_level = Some(level.to_string());
        }
        if let Some(capacity) = get("CACHE_CAPACITY").and_then(|v| v.parse().ok()) {
            self.cache_capacity = capacity;
        }
        if let Some(ttl) = get("CACHE_TTL_SECS").and_then(|v| v.parse().ok()) {
            self.cache_ttl_secs = ttl;
        }
        if let Some(dir) = get("DATA_DIR") {
            self.data_dir = Some(infrastructure::expand_tilde(dir));
        }
    }

    fn overlay_file(&mut self, file: FileConfig) {
        if let Some(url) = file.api_url {
            self.api_url = with_trailing_slash(url.trim());
        }
        if let Some(flag) = file.enable_analytics {
            self.enable_analytics = flag;
        }
        if let Some(flag) = file.enable_debug {
            self.enable_debug = flag;
        }
        if file.trace_level.is_some() {
            self.trace_level = file.trace_level;
        }
        if let Some(capacity) = file.cache_capacity {
            self.cache_capacity = capacity;
        }
        if let Some(ttl) = file.cache_ttl_secs {
            self.cache_ttl_secs = ttl;
        }
        if let Some(dir) = file.data_dir {
            self.data_dir = Some(infrastructure::expand_tilde(&dir));
        }
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.is_empty() || url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

fn env_vars() -> BTreeMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .collect()
}

/// Wires a runtime for `config` on the given transport and token store.
pub fn initialize(config: &Config, transport: Rc<dyn Transport>, store: SharedTokenStore) -> Runtime {
    tracing::debug!(
        app = APP_NAME,
        version = APP_VERSION,
        api_url = %config.api_url,
        analytics = config.enable_analytics,
        "initializing bike rental client"
    );
    config.validate();

    let client = ApiClient::new(&config.api_url, transport, store);
    Runtime::new(config, client)
}
