#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use std::time::Duration;

use crate::adapters::ollama::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::matching::MatchingSettings;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Resolved runtime settings, whatever their source.
pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn cors_enabled(&self) -> bool;
    fn llm_enabled(&self) -> bool;
    fn ollama_url(&self) -> &str;
    fn model(&self) -> &str;
    fn llm_timeout(&self) -> Duration;
    fn dataset_path(&self) -> Option<&str>;
    fn matching_settings(&self) -> &MatchingSettings;
    fn monitoring_enabled(&self) -> bool;
    fn json_logs(&self) -> bool;

    fn log_format(&self) -> LogFormat {
        LogFormat::from_json_flag(self.json_logs())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors: bool,
    pub llm_enabled: bool,
    pub ollama_url: String,
    pub model: String,
    pub llm_timeout_secs: u64,
    pub dataset_path: Option<String>,
    pub matching: MatchingSettings,
    pub monitoring: bool,
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors: false,
            llm_enabled: true,
            ollama_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            dataset_path: None,
            matching: MatchingSettings::default(),
            monitoring: false,
            json_logs: false,
        }
    }
}

impl AppConfig {
    pub fn from_toml(toml: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            host: toml.server.host.clone().unwrap_or(defaults.host),
            port: toml.server.port.unwrap_or(defaults.port),
            cors: toml.server.cors.unwrap_or(defaults.cors),
            llm_enabled: toml.llm.enabled.unwrap_or(defaults.llm_enabled),
            ollama_url: toml.llm.base_url.clone().unwrap_or(defaults.ollama_url),
            model: toml.llm.model.clone().unwrap_or(defaults.model),
            llm_timeout_secs: toml.llm.timeout_seconds.unwrap_or(defaults.llm_timeout_secs),
            dataset_path: toml.data.dataset_path.clone(),
            matching: toml.matching.to_settings(),
            monitoring: toml.monitoring.enabled.unwrap_or(defaults.monitoring),
            json_logs: toml.monitoring.json_logs.unwrap_or(defaults.json_logs),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ConfigProvider for AppConfig {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn cors_enabled(&self) -> bool {
        self.cors
    }

    fn llm_enabled(&self) -> bool {
        self.llm_enabled
    }

    fn ollama_url(&self) -> &str {
        &self.ollama_url
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    fn dataset_path(&self) -> Option<&str> {
        self.dataset_path.as_deref()
    }

    fn matching_settings(&self) -> &MatchingSettings {
        &self.matching
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitoring
    }

    fn json_logs(&self) -> bool {
        self.json_logs
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.host)?;
        validation::validate_positive_number("server.port", self.port as usize, 1)?;
        validation::validate_url("llm.base_url", &self.ollama_url)?;
        validation::validate_non_empty_string("llm.model", &self.model)?;
        validation::validate_positive_number(
            "llm.timeout_seconds",
            self.llm_timeout_secs as usize,
            1,
        )?;
        if let Some(path) = &self.dataset_path {
            validation::validate_path("data.dataset_path", path)?;
        }
        self.matching.validate()
    }
}
