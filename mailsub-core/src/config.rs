use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::error::{CoreResult, SubscribeError};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Providers {
    #[serde(default)]
    pub mailchimp: Option<ProviderCfg>,
    #[serde(default)]
    pub klaviyo: Option<ProviderCfg>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProviderCfg {
    /// Name of the environment variable that contains the API key.
    pub api_key_env: String,
    /// Target list on the provider side.
    pub list_id: String,
    /// Overrides the provider's default API base URL.
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct HttpCfg {
    /// User-Agent header (default "mailsub/0.1")
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Optional per-host idle connection pool cap (None = reqwest default)
    #[serde(default)]
    pub pool_max_idle_per_host: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    pub providers: Providers,
    /// HTTP client configuration. Missing → defaults.
    #[serde(default)]
    pub http: HttpCfg,
}

impl Config {
    /// Load a Config from a file path (JSON or TOML by extension). If the
    /// extension is missing or unrecognized, try JSON first, then TOML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let s = std::str::from_utf8(&bytes).map_err(|e| {
            SubscribeError::Configuration(format!("{} is not utf-8: {e}", path.display()))
        })?;
        let parse_json = |s: &str| {
            serde_json::from_str::<Self>(s)
                .map_err(|e| SubscribeError::Configuration(format!("invalid json config: {e}")))
        };
        let parse_toml = |s: &str| {
            toml::from_str::<Self>(s)
                .map_err(|e| SubscribeError::Configuration(format!("invalid toml config: {e}")))
        };
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => parse_json(s),
            Some("toml") => parse_toml(s),
            _ => parse_json(s).or_else(|_| parse_toml(s)),
        }
    }
}
