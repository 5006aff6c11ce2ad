//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::domain::session::MAX_TOTAL_WEIGHT;
use crate::storage::database::default_database_path;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "STAGETRACK_CONFIG_DIR";

/// Stagetrack configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub audit: AuditConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Actor recorded when the caller does not name one
    pub default_actor: String,
    /// Maximum number of log entries fetched per project
    pub log_fetch_limit: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub max_total_weight: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                database_path: default_database_path(),
                max_connections: 5,
            },
            audit: AuditConfig {
                default_actor: "System".to_string(),
                log_fetch_limit: 1000,
            },
            schedule: ScheduleConfig {
                max_total_weight: MAX_TOTAL_WEIGHT,
            },
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var(CONFIG_DIR_ENV) {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("stagetrack")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or the defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.max_connections == 0 {
            return Err(anyhow!("storage.max_connections must be at least 1"));
        }
        if self.audit.default_actor.trim().is_empty() {
            return Err(anyhow!("audit.default_actor must not be empty"));
        }
        if self.audit.log_fetch_limit < 1 {
            return Err(anyhow!("audit.log_fetch_limit must be at least 1"));
        }
        if !self.schedule.max_total_weight.is_finite() || self.schedule.max_total_weight <= 0.0 {
            return Err(anyhow!("schedule.max_total_weight must be a positive number"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "storage.database_path" => Ok(self.storage.database_path.display().to_string()),
            "storage.max_connections" => Ok(self.storage.max_connections.to_string()),

            "audit.default_actor" => Ok(self.audit.default_actor.clone()),
            "audit.log_fetch_limit" => Ok(self.audit.log_fetch_limit.to_string()),

            "schedule.max_total_weight" => Ok(self.schedule.max_total_weight.to_string()),

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `stagetrack config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "storage.database_path" => {
                if value.trim().is_empty() {
                    return Err(anyhow!("Database path must not be empty"));
                }
                self.storage.database_path = PathBuf::from(value);
            }
            "storage.max_connections" => {
                let max: u32 = value
                    .parse()
                    .with_context(|| format!("Invalid max_connections value: {}", value))?;
                if max == 0 {
                    return Err(anyhow!("max_connections must be at least 1"));
                }
                self.storage.max_connections = max;
            }

            "audit.default_actor" => {
                if value.trim().is_empty() {
                    return Err(anyhow!("Default actor must not be empty"));
                }
                self.audit.default_actor = value.trim().to_string();
            }
            "audit.log_fetch_limit" => {
                let limit: i64 = value
                    .parse()
                    .with_context(|| format!("Invalid log_fetch_limit value: {}", value))?;
                if limit < 1 {
                    return Err(anyhow!("log_fetch_limit must be at least 1"));
                }
                self.audit.log_fetch_limit = limit;
            }

            "schedule.max_total_weight" => {
                let max: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid max_total_weight value: {}", value))?;
                if !max.is_finite() || max <= 0.0 {
                    return Err(anyhow!("max_total_weight must be a positive number"));
                }
                self.schedule.max_total_weight = max;
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `stagetrack config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "storage.database_path",
            "storage.max_connections",
            "audit.default_actor",
            "audit.log_fetch_limit",
            "schedule.max_total_weight",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}
