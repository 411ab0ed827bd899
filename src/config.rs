//! Service configuration: defaults, optional TOML file, environment overrides.
//!
//! ```toml
//! bind_addr = "0.0.0.0:3000"
//! default_limit = 10
//!
//! [seed]
//! url = "https://pokeapi.co/api/v2/pokemon"
//! limit = 650
//! timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::record::DEFAULT_LIMIT;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SEED_URL: &str = "https://pokeapi.co/api/v2/pokemon";
pub const DEFAULT_SEED_LIMIT: u32 = 650;
pub const DEFAULT_SEED_TIMEOUT_SECS: u64 = 30;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "POKEDEX_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },
}

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub bind_addr: String,
    pub default_limit: usize,
    pub seed: SeedConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            default_limit: DEFAULT_LIMIT,
            seed: SeedConfig::default(),
        }
    }
}

/// Where and how the seed fetches its listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub url: Url,
    pub limit: u32,
    pub timeout_secs: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_SEED_URL).expect("default seed url is valid"),
            limit: DEFAULT_SEED_LIMIT,
            timeout_secs: DEFAULT_SEED_TIMEOUT_SECS,
        }
    }
}

impl SeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CatalogConfig {
    /// Load from `$POKEDEX_CONFIG` (if set) and apply `POKEDEX_*` overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Override fields from variables returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("POKEDEX_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(raw) = lookup("POKEDEX_DEFAULT_LIMIT") {
            self.default_limit = parse_env("POKEDEX_DEFAULT_LIMIT", &raw)?;
        }
        if let Some(raw) = lookup("POKEDEX_SEED_URL") {
            self.seed.url = Url::parse(&raw).map_err(|e| ConfigError::Env {
                var: "POKEDEX_SEED_URL",
                message: e.to_string(),
            })?;
        }
        if let Some(raw) = lookup("POKEDEX_SEED_LIMIT") {
            self.seed.limit = parse_env("POKEDEX_SEED_LIMIT", &raw)?;
        }
        if let Some(raw) = lookup("POKEDEX_SEED_TIMEOUT_SECS") {
            self.seed.timeout_secs = parse_env("POKEDEX_SEED_TIMEOUT_SECS", &raw)?;
        }
        Ok(())
    }
}

fn parse_env<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var,
        message: e.to_string(),
    })
}
