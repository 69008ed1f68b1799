use places_core::config::{DEFAULT_API_BASE_URL, DEFAULT_ASSET_BASE_URL};
use places_core::ClientConfig;
use serde::{Deserialize, Serialize};

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawPlacesConfig {
    #[serde(default)]
    pub api: RawApiConfig,
}

/// API section as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawApiConfig {
    /// Root for resource requests
    pub base_url: Option<String>,

    /// Root for server-stored image paths
    pub asset_url: Option<String>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlacesConfig {
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root for resource requests
    pub base_url: String,

    /// Root for server-stored image paths
    pub asset_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            asset_url: DEFAULT_ASSET_BASE_URL.to_string(),
        }
    }
}

impl PlacesConfig {
    /// Client settings for the core library
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api.base_url, &self.api.asset_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_server() {
        let config = PlacesConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.asset_url, "http://localhost:5000");
    }

    #[test]
    fn test_serializes_api_section() {
        let toml = toml::to_string_pretty(&PlacesConfig::default()).unwrap();
        assert!(toml.contains("[api]"));
        assert!(toml.contains("base_url = \"http://localhost:5000/api\""));
    }

    #[test]
    fn test_client_config_carries_both_roots() {
        let config = PlacesConfig {
            api: ApiConfig {
                base_url: "https://places.example/api".into(),
                asset_url: "https://cdn.places.example".into(),
            },
        };
        let client = config.client_config();
        assert_eq!(client.api_base_url, "https://places.example/api");
        assert_eq!(client.asset_base_url, "https://cdn.places.example");
    }
}
