use crate::domain::model::SchemaMode;
use crate::domain::ports::ConfigProvider;
use crate::domain::view::MapSettings;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    validate_positive_number, validate_range, validate_source, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "alumni-map.toml";

pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vTLW2kvPGc83XLEV3qANk88LnS_NIOrVUnimDD0SyVpCcc3lI8xS4EXQRuMZ_2HpNpbZjgXI2sSGqa4/pub?output=csv";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub map: MapSettings,
    pub view: ViewConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Published CSV URL or a local file path.
    pub url: String,
    pub refresh_interval_secs: u64,
    pub timeout_seconds: u64,
    pub schema: SchemaMode,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SHEET_URL.to_string(),
            refresh_interval_secs: 300,
            timeout_seconds: 30,
            schema: SchemaMode::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Entries shown in the side list.
    pub list_limit: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { list_limit: 15 }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHEET_URL})；未定義的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_source("source.url", &self.source.url)?;
        validate_positive_number(
            "source.refresh_interval_secs",
            self.source.refresh_interval_secs,
            1,
        )?;
        validate_positive_number("source.timeout_seconds", self.source.timeout_seconds, 1)?;
        validate_positive_number("view.list_limit", self.view.list_limit as u64, 1)?;

        let map = &self.map;
        validate_range("map.min_zoom", map.min_zoom, 0, 22)?;
        validate_range("map.max_zoom", map.max_zoom, map.min_zoom, 22)?;
        validate_range("map.zoom", map.zoom, map.min_zoom, map.max_zoom)?;
        validate_range("map.focus_zoom", map.focus_zoom, map.min_zoom, map.max_zoom)?;
        validate_range("map.fit_max_zoom", map.fit_max_zoom, map.min_zoom, map.max_zoom)?;
        validate_range("map.center.lat", map.center.lat, -90.0, 90.0)?;
        validate_range("map.center.lng", map.center.lng, -180.0, 180.0)?;

        let bounds = &map.max_bounds;
        if bounds.south_west.lat > bounds.north_east.lat
            || bounds.south_west.lng > bounds.north_east.lng
        {
            return Err(AppError::ConfigValidationError {
                field: "map.max_bounds".to_string(),
                message: "south-west corner must come first".to_string(),
            });
        }
        if !bounds.contains(map.center) {
            return Err(AppError::ConfigValidationError {
                field: "map.center".to_string(),
                message: "center lies outside map.max_bounds".to_string(),
            });
        }

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn source(&self) -> &str {
        &self.source.url
    }

    fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.source.refresh_interval_secs)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds)
    }

    fn schema_mode(&self) -> SchemaMode {
        self.source.schema
    }

    fn map_settings(&self) -> MapSettings {
        self.map
    }

    fn list_limit(&self) -> usize {
        self.view.list_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::LatLng;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.refresh_interval(), Duration::from_secs(300));
        assert_eq!(config.list_limit(), 15);
        assert_eq!(config.schema_mode(), SchemaMode::Auto);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [source]
            url = "alumni.csv"
            schema = "localized"

            [map]
            center = [59.93, 30.33]
            "#,
        )
        .unwrap();

        assert_eq!(config.source.url, "alumni.csv");
        assert_eq!(config.source.schema, SchemaMode::Localized);
        assert_eq!(config.source.refresh_interval_secs, 300);
        assert_eq!(config.map.center, LatLng::new(59.93, 30.33));
        assert_eq!(config.map.zoom, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("ALUMNI_MAP_TEST_SHEET", "https://example.com/sheet.csv");
        let config = AppConfig::from_toml_str(
            "[source]\nurl = \"${ALUMNI_MAP_TEST_SHEET}\"\n",
        )
        .unwrap();
        assert_eq!(config.source.url, "https://example.com/sheet.csv");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = AppConfig::default();
        config.source.refresh_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.map.zoom = 20;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.source.url = "ftp://example.com/sheet.csv".to_string();
        assert!(config.validate().is_err());

        assert!(AppConfig::from_toml_str("[source]\nschema = \"klingon\"\n").is_err());
    }
}
