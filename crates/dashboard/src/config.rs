//! Runtime configuration. Native builds read the process environment; the
//! wasm build feeds values captured at compile time through the same lookup.

use serde::{Deserialize, Serialize};
use std::env;

use crate::player::STEP_DELAY_S;
use crate::species::DEFAULT_SPECIES;

pub const API_URL_VAR: &str = "ATLAS_API_URL";
pub const WMS_URL_VAR: &str = "ATLAS_WMS_URL";
pub const ION_TOKEN_VAR: &str = "ATLAS_ION_TOKEN";
pub const PLAYER_DELAY_VAR: &str = "ATLAS_PLAYER_DELAY_MS";
pub const SPECIES_VAR: &str = "ATLAS_DEFAULT_SPECIES";
pub const LOG_VAR: &str = "ATLAS_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidUrl { key: &'static str, value: String },
    UnknownSpecies(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidUrl { key, value } => {
                write!(f, "{key} must be an http(s) url, got {value:?}")
            }
            ConfigError::UnknownSpecies(s) => write!(f, "unknown species {s:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    /// Origin serving the catch API and the WMS proxy.
    pub api_base_url: String,
    /// Overrides `{api_base_url}/geo-proxy`.
    pub wms_url: Option<String>,
    pub ion_access_token: Option<String>,
    pub player_delay_ms: u64,
    pub default_species: String,
    /// `tracing` filter directives, e.g. `info,globe=debug`.
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_owned(),
            wms_url: None,
            ion_access_token: None,
            player_delay_ms: (STEP_DELAY_S * 1000.0) as u64,
            default_species: DEFAULT_SPECIES.to_owned(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from `lookup`, falling back to defaults for unset
    /// or blank keys and unparsable numbers.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let api_base_url = match get(API_URL_VAR) {
            Some(url) => checked_url(API_URL_VAR, url)?,
            None => defaults.api_base_url,
        };
        let wms_url = get(WMS_URL_VAR)
            .map(|url| checked_url(WMS_URL_VAR, url))
            .transpose()?;
        let default_species = match get(SPECIES_VAR) {
            Some(s) if crate::species::species(&s).is_none() => {
                return Err(ConfigError::UnknownSpecies(s));
            }
            Some(s) => s,
            None => defaults.default_species,
        };

        Ok(Self {
            api_base_url,
            wms_url,
            ion_access_token: get(ION_TOKEN_VAR),
            player_delay_ms: env_var_u64(&get, PLAYER_DELAY_VAR, defaults.player_delay_ms),
            default_species,
            log_filter: get(LOG_VAR).unwrap_or(defaults.log_filter),
        })
    }

    pub fn player_delay_s(&self) -> f64 {
        self.player_delay_ms as f64 / 1000.0
    }
}

fn checked_url(key: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.trim_end_matches('/').to_owned())
    } else {
        Err(ConfigError::InvalidUrl { key, value })
    }
}

fn env_var_u64(get: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
