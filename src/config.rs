use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{I18nError, I18nResult};

/// Verbosity level for logging during fallback resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbosityLevel {
    /// No fallback logging
    Silent = 0,
    /// Log only when fallbacks are used (default)
    #[default]
    Normal = 1,
    /// Log detailed information about fallback resolution
    Verbose = 2,
}

/// Engine settings.
///
/// Every field is optional in JSON:
///
/// ```json
/// {
///     "default_locale": "en",
///     "locale": "pt-br",
///     "cache_ttl_ms": 3600000,
///     "verbosity": "verbose"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub default_locale: String,
    /// Active locale; the default locale when unset
    pub locale: Option<String>,
    pub cache_ttl_ms: u64,
    pub cache_enabled: bool,
    pub analytics_enabled: bool,
    pub verbosity: VerbosityLevel,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            default_locale: "en".to_string(),
            locale: None,
            cache_ttl_ms: 24 * 60 * 60 * 1000,
            cache_enabled: true,
            analytics_enabled: true,
            verbosity: VerbosityLevel::Normal,
        }
    }
}

impl TranslatorConfig {
    pub fn from_json_str(json: &str) -> I18nResult<Self> {
        let config: TranslatorConfig = serde_json::from_str(json)
            .map_err(|e| I18nError::Config(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> I18nResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| I18nError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: TranslatorConfig =
            serde_json::from_str(&content).map_err(|source| I18nError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> I18nResult<()> {
        if self.default_locale.trim().is_empty() {
            return Err(I18nError::Config("default_locale is empty".to_string()));
        }
        if self.cache_ttl_ms == 0 {
            return Err(I18nError::Config("cache_ttl_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}
