//! Simulation settings read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors in simulation settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but does not parse.
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// How a simulation run is set up.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Level file to load.
    pub level_path: PathBuf,
    /// Seed override; the level decides when absent.
    pub seed: Option<u64>,
    /// Fixed frame rate.
    pub tick_hz: u32,
    /// Currency the player starts with.
    pub starting_currency: u32,
    /// Wall of simulated time after which the run stops.
    pub max_duration: Duration,
}

impl SimConfig {
    pub const DEFAULT_LEVEL_PATH: &str = "levels/canyon_run.yaml";
    pub const DEFAULT_TICK_HZ: u32 = 60;
    pub const DEFAULT_STARTING_CURRENCY: u32 = 100;
    pub const DEFAULT_MAX_SECS: u64 = 600;

    /// Reads `LEVEL_PATH`, `SEED`, `TICK_HZ`, `STARTING_CURRENCY` and
    /// `MAX_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from any variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a value that does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let level_path = lookup("LEVEL_PATH")
            .map_or_else(|| PathBuf::from(Self::DEFAULT_LEVEL_PATH), PathBuf::from);
        let seed = parse(&lookup, "SEED", "an unsigned 64-bit integer")?;
        let tick_hz = parse(&lookup, "TICK_HZ", "a positive integer")?
            .unwrap_or(Self::DEFAULT_TICK_HZ);
        if tick_hz == 0 {
            return Err(ConfigError::Invalid {
                name: "TICK_HZ",
                expected: "a positive integer",
                value: "0".to_owned(),
            });
        }
        let starting_currency = parse(&lookup, "STARTING_CURRENCY", "an unsigned integer")?
            .unwrap_or(Self::DEFAULT_STARTING_CURRENCY);
        let max_secs = parse(&lookup, "MAX_SECS", "an unsigned integer")?
            .unwrap_or(Self::DEFAULT_MAX_SECS);

        Ok(Self {
            level_path,
            seed,
            tick_hz,
            starting_currency,
            max_duration: Duration::from_secs(max_secs),
        })
    }

    /// Length of one frame.
    #[must_use]
    pub fn frame(&self) -> Duration {
        Duration::from_secs(1) / self.tick_hz
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    name,
                    expected,
                    value,
                })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<SimConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        SimConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.level_path, PathBuf::from("levels/canyon_run.yaml"));
        assert_eq!(config.seed, None);
        assert_eq!(config.tick_hz, 60);
        assert_eq!(config.max_duration, Duration::from_secs(600));
    }

    #[test]
    fn test_reads_overrides() {
        let config = config(&[("SEED", "42"), ("TICK_HZ", "20"), ("LEVEL_PATH", "x.yaml")]).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.frame(), Duration::from_millis(50));
        assert_eq!(config.level_path, PathBuf::from("x.yaml"));
    }

    #[test]
    fn test_rejects_unparsable_seed() {
        match config(&[("SEED", "abc")]).unwrap_err() {
            ConfigError::Invalid { name, value, .. } => {
                assert_eq!(name, "SEED");
                assert_eq!(value, "abc");
            }
        }
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        assert!(config(&[("TICK_HZ", "0")]).is_err());
    }
}
