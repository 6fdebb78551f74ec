use crate::adapters::{FileCatalogSource, HttpCatalogSource};
use crate::core::refresh::DEFAULT_REFRESH_INTERVAL;
use crate::core::resolver::{MatchSettings, DEFAULT_FUZZY_THRESHOLD};
use crate::core::substitution::DEFAULT_CATEGORY_LIMIT;
use crate::domain::ports::CatalogSource;
use crate::utils::error::{CartMatchError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub endpoint: Option<String>,
    pub file: Option<String>,
    pub timeout_seconds: Option<u64>,
    #[serde(default = "default_refresh_interval_seconds")]
    pub refresh_interval_seconds: u64,
    pub headers: Option<HashMap<String, String>>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            file: None,
            timeout_seconds: None,
            refresh_interval_seconds: default_refresh_interval_seconds(),
            headers: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    #[serde(default = "default_category_candidate_limit")]
    pub category_candidate_limit: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            category_candidate_limit: default_category_candidate_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    #[serde(default)]
    pub json: bool,
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

fn default_refresh_interval_seconds() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

fn default_fuzzy_threshold() -> f64 {
    DEFAULT_FUZZY_THRESHOLD
}

fn default_category_candidate_limit() -> usize {
    DEFAULT_CATEGORY_LIMIT
}

impl EngineConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CartMatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CATALOG_TOKEN})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CartMatchError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        match (&self.catalog.endpoint, &self.catalog.file) {
            (Some(endpoint), None) => validation::validate_endpoint_url("catalog.endpoint", endpoint)?,
            (None, Some(file)) => validation::validate_file_path("catalog.file", file)?,
            (Some(_), Some(_)) => {
                return Err(CartMatchError::ConfigValidationError {
                    field: "catalog".to_string(),
                    message: "set either catalog.endpoint or catalog.file, not both".to_string(),
                })
            }
            (None, None) => {
                return Err(CartMatchError::MissingConfigError {
                    field: "catalog.endpoint or catalog.file".to_string(),
                })
            }
        }

        validation::validate_at_least(
            "catalog.refresh_interval_seconds",
            self.catalog.refresh_interval_seconds,
            1,
        )?;
        if let Some(timeout) = self.catalog.timeout_seconds {
            validation::validate_at_least("catalog.timeout_seconds", timeout, 1)?;
        }

        validation::validate_range("matching.fuzzy_threshold", self.matching.fuzzy_threshold, 0.0, 1.0)?;
        validation::validate_at_least(
            "matching.category_candidate_limit",
            self.matching.category_candidate_limit as u64,
            1,
        )?;

        if let Some(level) = &self.logging.level {
            validation::validate_one_of("logging.level", level, LOG_LEVELS)?;
        }

        Ok(())
    }

    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            fuzzy_threshold: self.matching.fuzzy_threshold,
            category_candidate_limit: self.matching.category_candidate_limit,
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.catalog.refresh_interval_seconds)
    }

    pub fn catalog_source(&self) -> Result<Arc<dyn CatalogSource>> {
        if let Some(endpoint) = &self.catalog.endpoint {
            let mut source = HttpCatalogSource::new(endpoint.clone());
            if let Some(headers) = &self.catalog.headers {
                source = source.with_headers(headers.clone());
            }
            if let Some(timeout) = self.catalog.timeout_seconds {
                source = source.with_timeout(Duration::from_secs(timeout));
            }
            return Ok(Arc::new(source));
        }

        if let Some(file) = &self.catalog.file {
            return Ok(Arc::new(FileCatalogSource::new(file)));
        }

        Err(CartMatchError::MissingConfigError {
            field: "catalog.endpoint or catalog.file".to_string(),
        })
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[catalog]
endpoint = "https://catalog.example.com/products"
timeout_seconds = 5
refresh_interval_seconds = 120

[catalog.headers]
Accept = "application/json"

[matching]
fuzzy_threshold = 0.8
category_candidate_limit = 5

[logging]
level = "debug"
json = true
"#;

        let config = EngineConfig::from_toml_str(toml_content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.refresh_interval(), Duration::from_secs(120));
        assert_eq!(config.match_settings().fuzzy_threshold, 0.8);
        assert_eq!(config.match_settings().category_candidate_limit, 5);
        assert!(config.logging.json);
        assert_eq!(
            config.catalog_source().unwrap().describe(),
            "http(https://catalog.example.com/products)"
        );
    }

    #[test]
    fn test_defaults_apply_when_sections_are_missing() {
        let config = EngineConfig::from_toml_str("[catalog]\nfile = \"catalog.json\"\n").unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.refresh_interval(), Duration::from_secs(600));
        assert_eq!(config.match_settings(), MatchSettings::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CART_MATCH_TEST_ENDPOINT", "https://test.catalog.com");

        let config =
            EngineConfig::from_toml_str("[catalog]\nendpoint = \"${CART_MATCH_TEST_ENDPOINT}\"\n")
                .unwrap();
        assert_eq!(
            config.catalog.endpoint.as_deref(),
            Some("https://test.catalog.com")
        );

        std::env::remove_var("CART_MATCH_TEST_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let missing = EngineConfig::default();
        assert!(matches!(
            missing.validate(),
            Err(CartMatchError::MissingConfigError { .. })
        ));

        let both = EngineConfig::from_toml_str(
            "[catalog]\nendpoint = \"https://a.example\"\nfile = \"b.json\"\n",
        )
        .unwrap();
        assert!(both.validate().is_err());

        let bad_threshold = EngineConfig::from_toml_str(
            "[catalog]\nfile = \"b.json\"\n[matching]\nfuzzy_threshold = 1.2\n",
        )
        .unwrap();
        assert!(bad_threshold.validate().is_err());

        let bad_interval = EngineConfig::from_toml_str(
            "[catalog]\nfile = \"b.json\"\nrefresh_interval_seconds = 0\n",
        )
        .unwrap();
        assert!(bad_interval.validate().is_err());
    }

    #[test]
    fn test_logging_level_must_be_known() {
        let quiet = EngineConfig::from_toml_str(
            "[catalog]\nfile = \"b.json\"\n[logging]\nlevel = \"Warn\"\n",
        )
        .unwrap();
        assert!(quiet.validate().is_ok());
        assert_eq!(quiet.logging.level.as_deref(), Some("Warn"));
        assert!(!quiet.logging.json);

        let unknown = EngineConfig::from_toml_str(
            "[catalog]\nfile = \"b.json\"\n[logging]\nlevel = \"chatty\"\n",
        )
        .unwrap();
        assert!(matches!(
            unknown.validate(),
            Err(CartMatchError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[catalog]\nendpoint = \"http://localhost:8080/catalog\"\n")
            .unwrap();

        let config = EngineConfig::from_file(temp_file.path()).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = EngineConfig::from_toml_str("[catalog\n").unwrap_err();
        assert!(matches!(err, CartMatchError::ConfigValidationError { .. }));
    }
}
