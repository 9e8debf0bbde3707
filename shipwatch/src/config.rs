//! Configuration
//!
//! Settings come from the process environment, optionally seeded from a
//! `.env` file, plus a JSON file listing the zones to watch:
//!
//! ```json
//! {
//!   "zones": [
//!     { "id": "harbour", "name": "Harbour", "polygon": [[10.0, 59.0], [10.1, 59.0], [10.1, 59.1]] }
//!   ]
//! }
//! ```
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATA_DIR` | `./data` |
//! | `CACHE_DURATION` | `60` |
//! | `BARENTSWATCH_ENABLED` | `true` |
//! | `BARENTSWATCH_CLIENT_ID` | empty |
//! | `BARENTSWATCH_CLIENT_SECRET` | empty |
//! | `LOOKBACK_HOURS` | `3` |
//! | `PERSIST_MINUTES` | `10` |
//! | `MIN_SPEED` | `0.5` |
//! | `EXCLUDE_CATEGORIES` | `Unknown` |
//! | `STILL_IN_ZONE_SECS` | `5` |

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use shipwatch_core::{TrackerSettings, Zone};

use crate::client::Credentials;

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_CACHE_DURATION: u64 = 60;
const LOCAL_CONFIG_FILE: &str = "config/config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
    #[error("Cannot load {}: {message}", path.display())]
    Env { path: PathBuf, message: String },
}

#[derive(Debug, Clone)]
pub struct BarentswatchConfig {
    pub enabled: bool,
    pub client_id: String,
    pub client_secret: String,
    pub settings: TrackerSettings,
}

impl BarentswatchConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.client_id.clone(), self.client_secret.clone())
    }

    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Seconds between polling cycles in loop mode
    pub cache_duration: u64,
    pub barentswatch: BarentswatchConfig,
    pub zones: Vec<Zone>,
    /// Where the zones were read from, if anywhere
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    zones: Vec<Zone>,
}

impl Config {
    /// Load `.env`, read the environment, then read the zones file
    pub fn load(env_path: Option<&Path>, config_path: Option<&Path>) -> Result<Config, ConfigError> {
        load_env_file(env_path)?;
        let mut config = Config::from_lookup(|key| std::env::var(key).ok())?;
        config.load_zones(config_path)?;
        Ok(config)
    }

    /// Build from any key lookup; zones are left empty
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = TrackerSettings::default();

        let settings = TrackerSettings {
            lookback_hours: parse_or(&lookup, "LOOKBACK_HOURS", defaults.lookback_hours)?,
            persist_minutes: parse_or(&lookup, "PERSIST_MINUTES", defaults.persist_minutes)?,
            min_speed: parse_or(&lookup, "MIN_SPEED", defaults.min_speed)?,
            still_in_zone_secs: parse_or(&lookup, "STILL_IN_ZONE_SECS", defaults.still_in_zone_secs)?,
            exclude_categories: match lookup("EXCLUDE_CATEGORIES") {
                Some(list) => split_list(&list),
                None => defaults.exclude_categories,
            },
        };

        Ok(Config {
            data_dir: lookup("DATA_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            cache_duration: parse_or(&lookup, "CACHE_DURATION", DEFAULT_CACHE_DURATION)?,
            barentswatch: BarentswatchConfig {
                enabled: parse_bool(&lookup, "BARENTSWATCH_ENABLED", true)?,
                client_id: lookup("BARENTSWATCH_CLIENT_ID").unwrap_or_default(),
                client_secret: lookup("BARENTSWATCH_CLIENT_SECRET").unwrap_or_default(),
                settings,
            },
            zones: Vec::new(),
            config_file: None,
        })
    }

    /// Read zones from `path`, or from the first default location that exists.
    ///
    /// No file at all leaves the zone list empty.
    pub fn load_zones(&mut self, path: Option<&Path>) -> Result<(), ConfigError> {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_file) else {
            log::warn!("No config file found, no zones configured");
            return Ok(());
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        self.zones = parse_zones(&text).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?;

        log::info!("Loaded {} zones from {}", self.zones.len(), path.display());
        self.config_file = Some(path);
        Ok(())
    }

    /// Zone with the given id, or the first zone when `id` is `None`
    pub fn zone(&self, id: Option<&str>) -> Option<&Zone> {
        match id {
            Some(id) => self.zones.iter().find(|z| z.id == id),
            None => self.zones.first(),
        }
    }

    pub fn tracker_settings(&self) -> TrackerSettings {
        self.barentswatch.settings.clone()
    }
}

fn parse_zones(text: &str) -> Result<Vec<Zone>, serde_json::Error> {
    let file: ConfigFile = serde_json::from_str(text)?;
    Ok(file.zones)
}

fn load_env_file(path: Option<&Path>) -> Result<(), ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let local = PathBuf::from(".env");
            if !local.exists() {
                return Ok(());
            }
            local
        }
    };

    // Variables already in the environment are not overridden
    dotenv::from_path(&path).map_err(|e| ConfigError::Env {
        path: path.clone(),
        message: e.to_string(),
    })?;
    log::debug!("Loaded environment from {}", path.display());
    Ok(())
}

fn default_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    ProjectDirs::from("", "", "shipwatch")
        .map(|dirs| dirs.config_dir().join("config.json"))
        .filter(|p| p.exists())
}

fn parse_or<F, V>(lookup: &F, key: &str, default: V) -> Result<V, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    V: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(s) if s.trim().is_empty() => Ok(default),
        Some(s) => s.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: s,
        }),
    }
}

fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: s,
            }),
        },
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}
