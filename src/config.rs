//! Optional config file loading. Search order: ./ordsync.toml, then
//! $XDG_CONFIG_HOME/ordsync/config.toml (or ~/.config/ordsync/config.toml).
//!
//! The session cookie and browser headers expire; refresh them here from a browser capture.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://library.municode.com";
pub const DEFAULT_BROWSE_URL: &str =
    "https://library.municode.com/sc/great_falls/codes/code_of_ordinances";
pub const DEFAULT_PRODUCT_ID: &str = "13058";
pub const DEFAULT_JOB_ID: &str = "430600";
pub const DEFAULT_OUTPUT: &str = "assets/data/ordinances.json";
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 400;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Browser headers the API expects alongside the cookie. Config `headers` entries override these.
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    ("accept-language", "en-US,en;q=0.9"),
    ("dnt", "1"),
    ("priority", "u=1, i"),
    (
        "referer",
        "https://library.municode.com/sc/great_falls/codes/code_of_ordinances",
    ),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
    ("x-csrf", "1"),
];

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// API origin, e.g. https://library.municode.com.
    pub base_url: Option<String>,
    /// Browse page used to build node links (`?nodeId=` is appended).
    pub browse_url: Option<String>,
    pub job_id: Option<String>,
    pub product_id: Option<String>,
    /// Session cookie copied from a browser request.
    pub cookie: Option<String>,
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
    /// Extra request headers, merged over the built-in browser headers.
    pub headers: Option<BTreeMap<String, String>>,
    /// Pause in milliseconds after each section fetch.
    pub request_delay_ms: Option<u64>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Output file when -o is not set. Relative to CWD.
    pub output: Option<PathBuf>,
}

impl Config {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn browse_url(&self) -> &str {
        self.browse_url.as_deref().unwrap_or(DEFAULT_BROWSE_URL)
    }

    pub fn job_id(&self) -> &str {
        self.job_id.as_deref().unwrap_or(DEFAULT_JOB_ID)
    }

    pub fn product_id(&self) -> &str {
        self.product_id.as_deref().unwrap_or(DEFAULT_PRODUCT_ID)
    }

    pub fn request_delay_ms(&self) -> u64 {
        self.request_delay_ms.unwrap_or(DEFAULT_REQUEST_DELAY_MS)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    /// Built-in browser headers with configured ones applied on top, keyed by lowercase name.
    pub fn request_headers(&self) -> BTreeMap<String, String> {
        let mut merged: BTreeMap<String, String> = DEFAULT_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if let Some(ref extra) = self.headers {
            for (k, v) in extra {
                merged.insert(k.to_ascii_lowercase(), v.clone());
            }
        }
        merged
    }
}

/// Search order: (1) ./ordsync.toml, (2) $XDG_CONFIG_HOME/ordsync/config.toml.
/// Missing file returns Ok(None). Invalid TOML or I/O error reading a present file returns Err.
pub fn load_config() -> Result<Option<Config>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    let mut paths = vec![cwd.join("ordsync.toml")];
    if let Some(d) = dirs::config_dir() {
        paths.push(d.join("ordsync").join("config.toml"));
    }
    for path in &paths {
        if path.exists() {
            let s = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
            let config: Config = toml::from_str(&s)
                .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
            log::debug!("Loaded config from {}", path.display());
            return Ok(Some(config));
        }
    }
    Ok(None)
}
