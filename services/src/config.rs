//! Runtime configuration read from the environment (and `.env` when present).

use std::{env, time::Duration};

use shared::{ConfigError, directions, radar};

#[derive(Debug, Clone)]
pub struct Config {
    /// Routing is disabled when this is absent.
    pub directions_api_key: Option<String>,
    pub directions_base_url: String,
    pub radar_metadata_url: String,
    pub directions_timeout: Duration,
    pub radar_refresh: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directions_api_key: None,
            directions_base_url: directions::DEFAULT_BASE_URL.to_string(),
            radar_metadata_url: radar::DEFAULT_METADATA_URL.to_string(),
            directions_timeout: Duration::from_secs(30),
            radar_refresh: Duration::from_secs(radar::REFRESH_INTERVAL_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Self {
            directions_api_key: non_empty("DIRECTIONS_API_KEY"),
            directions_base_url: non_empty("DIRECTIONS_BASE_URL")
                .unwrap_or(defaults.directions_base_url),
            radar_metadata_url: non_empty("RADAR_METADATA_URL")
                .unwrap_or(defaults.radar_metadata_url),
            directions_timeout: match non_empty("DIRECTIONS_TIMEOUT_SECS") {
                Some(value) => parse_secs("DIRECTIONS_TIMEOUT_SECS", value)?,
                None => defaults.directions_timeout,
            },
            radar_refresh: match non_empty("RADAR_REFRESH_SECS") {
                Some(value) => parse_secs("RADAR_REFRESH_SECS", value)?,
                None => defaults.radar_refresh,
            },
        })
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.directions_api_key
            .as_deref()
            .ok_or(ConfigError::Missing("DIRECTIONS_API_KEY"))
    }
}

fn parse_secs(key: &'static str, value: String) -> Result<Duration, ConfigError> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.directions_api_key, None);
        assert_eq!(config.directions_base_url, directions::DEFAULT_BASE_URL);
        assert_eq!(config.radar_refresh, Duration::from_secs(600));
        assert_eq!(config.directions_timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_key_disables_routing_without_failing() {
        let config = Config::from_lookup(lookup(&[("DIRECTIONS_API_KEY", "  ")])).unwrap();
        assert_eq!(
            config.require_api_key(),
            Err(ConfigError::Missing("DIRECTIONS_API_KEY"))
        );
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DIRECTIONS_API_KEY", "secret"),
            ("DIRECTIONS_BASE_URL", "http://127.0.0.1:9000/v2/directions"),
            ("DIRECTIONS_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.require_api_key(), Ok("secret"));
        assert_eq!(config.directions_base_url, "http://127.0.0.1:9000/v2/directions");
        assert_eq!(config.directions_timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_invalid_durations() {
        let err = Config::from_lookup(lookup(&[("RADAR_REFRESH_SECS", "often")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "RADAR_REFRESH_SECS",
                value: "often".into()
            }
        );
        assert!(Config::from_lookup(lookup(&[("DIRECTIONS_TIMEOUT_SECS", "0")])).is_err());
    }
}
