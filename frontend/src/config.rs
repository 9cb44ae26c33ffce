//! Build-time configuration, baked in with `option_env!`.

use shared::{ConfigError, directions};

const DEFAULT_STYLE_URL: &str = "https://api.maptiler.com/maps/outdoor-v2/style.json";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    map_access_token: Option<String>,
    directions_api_key: Option<String>,
    style_url: Option<String>,
    directions_base_url: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl AppConfig {
    pub fn new(
        map_access_token: Option<&str>,
        directions_api_key: Option<&str>,
        style_url: Option<&str>,
        directions_base_url: Option<&str>,
    ) -> Self {
        Self {
            map_access_token: non_empty(map_access_token),
            directions_api_key: non_empty(directions_api_key),
            style_url: non_empty(style_url),
            directions_base_url: non_empty(directions_base_url),
        }
    }

    pub fn from_build_env() -> Self {
        Self::new(
            option_env!("MAP_ACCESS_TOKEN"),
            option_env!("DIRECTIONS_API_KEY"),
            option_env!("MAP_STYLE_URL"),
            option_env!("DIRECTIONS_BASE_URL"),
        )
    }

    pub fn map_access_token(&self) -> Result<&str, ConfigError> {
        self.map_access_token
            .as_deref()
            .ok_or(ConfigError::Missing("MAP_ACCESS_TOKEN"))
    }

    pub fn directions_api_key(&self) -> Result<&str, ConfigError> {
        self.directions_api_key
            .as_deref()
            .ok_or(ConfigError::Missing("DIRECTIONS_API_KEY"))
    }

    /// Style URL with the access token appended as the `key` query parameter.
    pub fn style_url(&self) -> Result<String, ConfigError> {
        let token = self.map_access_token()?;
        let base = self.style_url.as_deref().unwrap_or(DEFAULT_STYLE_URL);
        let separator = if base.contains('?') { '&' } else { '?' };
        Ok(format!("{base}{separator}key={token}"))
    }

    pub fn directions_base_url(&self) -> &str {
        self.directions_base_url
            .as_deref()
            .unwrap_or(directions::DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// Every missing setting, for the persistent banner.
    pub fn problems(&self) -> Vec<ConfigError> {
        [
            self.map_access_token().err(),
            self.directions_api_key().err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_count_as_missing() {
        let config = AppConfig::new(Some("  "), Some(""), None, None);
        assert_eq!(
            config.problems(),
            vec![
                ConfigError::Missing("MAP_ACCESS_TOKEN"),
                ConfigError::Missing("DIRECTIONS_API_KEY"),
            ]
        );
        assert!(config.style_url().is_err());
    }

    #[test]
    fn complete_config_has_no_problems() {
        let config = AppConfig::new(Some("tok"), Some("key"), None, None);
        assert!(config.problems().is_empty());
        assert_eq!(config.directions_api_key(), Ok("key"));
    }

    #[test]
    fn style_url_carries_token() {
        let config = AppConfig::new(Some("tok"), None, None, None);
        assert_eq!(
            config.style_url().unwrap(),
            format!("{DEFAULT_STYLE_URL}?key=tok")
        );

        let custom = AppConfig::new(Some("tok"), None, Some("https://tiles.test/style.json?v=2"), None);
        assert_eq!(
            custom.style_url().unwrap(),
            "https://tiles.test/style.json?v=2&key=tok"
        );
    }

    #[test]
    fn base_url_defaults_and_trims() {
        let config = AppConfig::default();
        assert_eq!(config.directions_base_url(), directions::DEFAULT_BASE_URL);

        let custom = AppConfig::new(None, None, None, Some("http://localhost:8080/v2/directions/"));
        assert_eq!(custom.directions_base_url(), "http://localhost:8080/v2/directions");
    }
}
