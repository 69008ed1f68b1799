//! Client configuration: where the API and the served assets live

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Default root for resource requests
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Default root for server-stored image paths
pub const DEFAULT_ASSET_BASE_URL: &str = "http://localhost:5000";

/// Environment key for the API root
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Environment key for the asset root
pub const ASSET_BASE_URL_ENV: &str = "ASSET_BASE_URL";

/// Prefix for the namespaced form of the environment keys
const ENV_PREFIX: &str = "PLACES_";

/// Configuration as written in TOML or the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root for all resource requests
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Root for resolving server-stored image paths
    #[serde(default = "default_asset_base_url")]
    pub asset_base_url: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_asset_base_url() -> String {
    DEFAULT_ASSET_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            asset_base_url: default_asset_base_url(),
        }
    }
}

impl ClientConfig {
    /// Create a config with explicit roots
    pub fn new(api_base_url: impl Into<String>, asset_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            asset_base_url: asset_base_url.into(),
        }
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Self {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Overlay values found through `lookup`
    ///
    /// `PLACES_API_BASE_URL` wins over `API_BASE_URL` (same for the asset
    /// key). Empty values are ignored.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(&format!("{ENV_PREFIX}{key}"))
                .filter(|v| !v.is_empty())
                .or_else(|| lookup(key).filter(|v| !v.is_empty()))
        };
        if let Some(api) = read(API_BASE_URL_ENV) {
            self.api_base_url = api;
        }
        if let Some(asset) = read(ASSET_BASE_URL_ENV) {
            self.asset_base_url = asset;
        }
        self
    }

    /// Validate both roots and produce the resolved endpoints
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        Ok(Endpoints {
            api: parse_root(API_BASE_URL_ENV, &self.api_base_url)?,
            assets: parse_root(ASSET_BASE_URL_ENV, &self.asset_base_url)?,
        })
    }
}

fn parse_root(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            key,
            value: value.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// Validated API and asset roots
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    api: Url,
    assets: Url,
}

impl Endpoints {
    /// Full URL of a resource path, e.g. `/users/login`
    pub fn api_url(&self, path: &str) -> String {
        join(&self.api, path)
    }

    /// Full URL of a server-stored image path, e.g. `uploads/images/a.png`
    pub fn asset_url(&self, path: &str) -> String {
        join(&self.assets, path)
    }

    pub fn api_root(&self) -> &Url {
        &self.api
    }

    pub fn asset_root(&self) -> &Url {
        &self.assets
    }
}

fn join(root: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        root.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
