//! Configuration for the bet calculator.

use serde::{Deserialize, Serialize};

/// Largest JRA field.
pub const MAX_FIELD_SIZE: u8 = 18;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Betting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingConfig {
    /// Stake per combination when a request gives none
    #[serde(default = "default_unit_stake")]
    pub unit_stake: u32,
    /// Smallest accepted stake (JRA sells in 100-yen units)
    #[serde(default = "default_min_stake")]
    pub min_stake: u32,
    /// Number of runners when a request gives none
    #[serde(default = "default_field_size")]
    pub field_size: u8,
}

fn default_unit_stake() -> u32 {
    100
}

fn default_min_stake() -> u32 {
    100
}

fn default_field_size() -> u8 {
    MAX_FIELD_SIZE
}

impl Default for BettingConfig {
    fn default() -> Self {
        Self {
            unit_stake: default_unit_stake(),
            min_stake: default_min_stake(),
            field_size: default_field_size(),
        }
    }
}

impl BettingConfig {
    /// Requested stake, or the default, raised to at least `min_stake`.
    pub fn normalize_stake(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.unit_stake).max(self.min_stake)
    }

    /// Requested field size, or the default, clamped to 1..=18.
    pub fn field_size_or(&self, requested: Option<u8>) -> u8 {
        requested
            .unwrap_or(self.field_size)
            .clamp(1, MAX_FIELD_SIZE)
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub betting: BettingConfig,
}

impl AppConfig {
    /// Load configuration from environment and config file
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (KEIBA_SERVER__PORT, KEIBA_BETTING__UNIT_STAKE)
            .add_source(
                config::Environment::with_prefix("KEIBA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.betting.unit_stake, 100);
        assert_eq!(config.betting.min_stake, 100);
        assert_eq!(config.betting.field_size, 18);
    }

    #[test]
    fn test_normalize_stake() {
        let betting = BettingConfig::default();
        assert_eq!(betting.normalize_stake(None), 100);
        assert_eq!(betting.normalize_stake(Some(50)), 100);
        assert_eq!(betting.normalize_stake(Some(0)), 100);
        assert_eq!(betting.normalize_stake(Some(300)), 300);
    }

    #[test]
    fn test_field_size_or() {
        let betting = BettingConfig::default();
        assert_eq!(betting.field_size_or(None), 18);
        assert_eq!(betting.field_size_or(Some(10)), 10);
        assert_eq!(betting.field_size_or(Some(0)), 1);
        assert_eq!(betting.field_size_or(Some(30)), 18);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"betting": {"unit_stake": 500}}"#).unwrap();
        assert_eq!(config.betting.unit_stake, 500);
        assert_eq!(config.betting.min_stake, 100);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
