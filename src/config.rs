use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::EventKind;
use crate::notification::{DEFAULT_MAX_SHARE_HOPS, DEFAULT_SUMMARIZE_LIMIT};

#[derive(Clone, Default, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub store: StoreConfig,
    pub render: RenderConfig,
    pub messages: MessagesConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub offchain_url: String,
    pub page_size: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub keyspace_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// IANA time zone name used for the date line.
    pub time_zone: String,
    /// strftime pattern for the date line.
    pub date_format: String,
    pub summarize_limit: usize,
    pub max_share_hops: usize,
}

/// Replacement phrases keyed by event kind name.
#[derive(Clone, Default, Debug, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    pub notifications: BTreeMap<EventKind, String>,
    pub activities: BTreeMap<EventKind, String>,
    pub post_sharing: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            offchain_url: "http://localhost:3001".to_string(),
            page_size: 20,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            keyspace_dir: PathBuf::from("subfeed-data"),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            time_zone: "UTC".to_string(),
            date_format: "%b %-d, %Y %-I:%M %p".to_string(),
            summarize_limit: DEFAULT_SUMMARIZE_LIMIT,
            max_share_hops: DEFAULT_MAX_SHARE_HOPS,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Config> {
        Ok(toml::from_str(text)?)
    }
    /// Built-in defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        Config::from_toml(&text)
            .with_context(|| format!("unable to parse config file {}", path.display()))
    }
}
