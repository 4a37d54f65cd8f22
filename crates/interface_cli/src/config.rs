//! CLI configuration

use anyhow::anyhow;
use core_kernel::Timezone;
use serde::Deserialize;

/// Configuration for the reconciliation jobs
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Path to the store snapshot JSON
    pub snapshot_path: String,
    /// Business timezone name (IANA)
    pub timezone: String,
    /// Log level
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "ventas-snapshot.json".to_string(),
            timezone: "America/Caracas".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from the environment (`VENTAS_*`), falling back
    /// to the defaults above
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = CliConfig::default();
        config::Config::builder()
            .set_default("snapshot_path", defaults.snapshot_path)?
            .set_default("timezone", defaults.timezone)?
            .set_default("log_level", defaults.log_level)?
            .add_source(config::Environment::with_prefix("VENTAS"))
            .build()?
            .try_deserialize()
    }

    /// Parses the configured business timezone
    pub fn business_timezone(&self) -> anyhow::Result<Timezone> {
        self.timezone
            .parse()
            .map_err(|_| anyhow!("'{}' is not a valid timezone", self.timezone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.timezone, "America/Caracas");
        assert!(config.business_timezone().is_ok());
    }

    #[test]
    fn test_bad_timezone_is_reported() {
        let config = CliConfig {
            timezone: "Mars/Olympus".to_string(),
            ..CliConfig::default()
        };
        assert!(config.business_timezone().is_err());
    }
}
