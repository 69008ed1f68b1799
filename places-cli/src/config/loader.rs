use super::types::{ApiConfig, PlacesConfig, RawApiConfig, RawPlacesConfig};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

/// Command line values that override every other layer
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub asset_url: Option<String>,
}

impl ConfigLoader {
    /// Load merged configuration (user + project), without env or flags
    pub fn load() -> Result<PlacesConfig> {
        let mut raw = RawPlacesConfig::default();

        // Layer 1: User config
        let user_path = Self::user_config_path();
        if user_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&user_path)?);
        }

        // Layer 2: Project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&project_path)?);
        }

        Ok(Self::finalize(raw))
    }

    /// Every layer: files, then environment, then command line flags
    pub fn resolve(overrides: &Overrides) -> Result<PlacesConfig> {
        let files = Self::load()?;
        Ok(Self::apply(files, |key| std::env::var(key).ok(), overrides))
    }

    /// Overlay environment values and flags on a file-derived config
    pub fn apply(
        config: PlacesConfig,
        env: impl Fn(&str) -> Option<String>,
        overrides: &Overrides,
    ) -> PlacesConfig {
        let client = config.client_config().with_env(env);
        PlacesConfig {
            api: ApiConfig {
                base_url: overrides
                    .api_url
                    .clone()
                    .unwrap_or(client.api_base_url),
                asset_url: overrides
                    .asset_url
                    .clone()
                    .unwrap_or(client.asset_base_url),
            },
        }
    }

    /// Load a single config file; a missing file yields defaults
    pub fn load_from_path(path: &Path) -> Result<PlacesConfig> {
        if !path.exists() {
            return Ok(PlacesConfig::default());
        }
        Ok(Self::finalize(Self::read_raw(path)?))
    }

    fn read_raw(path: &Path) -> Result<RawPlacesConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// User config path (`$XDG_CONFIG_HOME/places/config.toml`)
    pub fn user_config_path() -> PathBuf {
        places_paths::config_dir().join("config.toml")
    }

    /// Get project config path
    /// Can be overridden with PLACES_PROJECT_CONFIG_DIR env var (useful for isolated e2e tests)
    pub fn project_config_path() -> PathBuf {
        match std::env::var("PLACES_PROJECT_CONFIG_DIR") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join("config.toml"),
            _ => PathBuf::from(".places/config.toml"),
        }
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawPlacesConfig, overlay: RawPlacesConfig) -> RawPlacesConfig {
        RawPlacesConfig {
            api: RawApiConfig {
                base_url: overlay.api.base_url.or(base.api.base_url),
                asset_url: overlay.api.asset_url.or(base.api.asset_url),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawPlacesConfig) -> PlacesConfig {
        let defaults = ApiConfig::default();
        PlacesConfig {
            api: ApiConfig {
                base_url: raw.api.base_url.unwrap_or(defaults.base_url),
                asset_url: raw.api.asset_url.unwrap_or(defaults.asset_url),
            },
        }
    }
}
