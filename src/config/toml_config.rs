use crate::config::site::{ClientEnv, ImageConfig, SiteConfig, API_URL_ENV};
use crate::core::ConfigProvider;
use crate::utils::error::{ApiError, Result};
use crate::utils::validation::{validate_one_of, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub env: ClientEnv,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ApiError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, process_env)
    }

    /// Like `from_toml_str`, resolving `${VAR}` through `lookup`.
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed = Self::substitute_env_vars(content, lookup)?;

        toml::from_str(&processed).map_err(|e| ApiError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the looked-up value. Unset variables stay
    /// verbatim so validation can point at them.
    fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ApiError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Fills `api.base_url` from `NEXT_PUBLIC_API_URL` when the file left it
    /// out or left it as an unresolved placeholder.
    pub fn with_env_fallback(self) -> Self {
        self.with_base_url_fallback(process_env)
    }

    pub fn with_base_url_fallback<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let unresolved = self
            .api
            .base_url
            .as_deref()
            .map_or(true, |url| url.trim().is_empty() || url.contains("${"));

        if unresolved {
            if let Some(value) = lookup(API_URL_ENV) {
                tracing::debug!("Using {} for api.base_url", API_URL_ENV);
                self.api.base_url = Some(value);
            }
        }
        self
    }

    pub fn site(&self) -> SiteConfig {
        SiteConfig {
            images: self.images.clone(),
            env: self.env.clone(),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(base_url) = &self.api.base_url {
            validate_url("api.base_url", base_url)?;
        }

        validate_one_of(
            "logging.level",
            &self.logging.level,
            &["trace", "debug", "info", "warn", "error"],
        )?;

        self.site().validate()
    }
}

impl ConfigProvider for AppConfig {
    fn api_base_url(&self) -> Option<&str> {
        self.api.base_url.as_deref()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
