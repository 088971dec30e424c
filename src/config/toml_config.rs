use crate::core::matching::MatchingSettings;
use crate::utils::error::{Result, TalentError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerSection,
    pub llm: LlmSection,
    pub data: DataSection,
    pub matching: MatchingSection,
    pub monitoring: MonitoringSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    pub dataset_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingSection {
    pub max_position_matches: Option<usize>,
    pub recommendation_window: Option<usize>,
    pub high_match_threshold: Option<f64>,
    pub medium_match_threshold: Option<f64>,
}

impl MatchingSection {
    /// Fills unset fields from the defaults.
    pub fn to_settings(&self) -> MatchingSettings {
        let defaults = MatchingSettings::default();
        MatchingSettings {
            max_position_matches: self
                .max_position_matches
                .unwrap_or(defaults.max_position_matches),
            recommendation_window: self
                .recommendation_window
                .unwrap_or(defaults.recommendation_window),
            high_match_threshold: self
                .high_match_threshold
                .unwrap_or(defaults.high_match_threshold),
            medium_match_threshold: self
                .medium_match_threshold
                .unwrap_or(defaults.medium_match_threshold),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringSection {
    pub enabled: Option<bool>,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TalentError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TalentError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TalentError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.llm.base_url {
            crate::utils::validation::validate_url("llm.base_url", url)?;
        }
        if let Some(model) = &self.llm.model {
            crate::utils::validation::validate_non_empty_string("llm.model", model)?;
        }
        if let Some(path) = &self.data.dataset_path {
            crate::utils::validation::validate_path("data.dataset_path", path)?;
        }
        if let Some(port) = self.server.port {
            crate::utils::validation::validate_positive_number("server.port", port as usize, 1)?;
        }
        self.matching.to_settings().validate()
    }
}

impl Validate for MatchingSettings {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::{validate_positive_number, validate_range};

        validate_positive_number("matching.max_position_matches", self.max_position_matches, 1)?;
        validate_positive_number(
            "matching.recommendation_window",
            self.recommendation_window,
            1,
        )?;
        validate_range(
            "matching.high_match_threshold",
            self.high_match_threshold,
            0.0,
            100.0,
        )?;
        validate_range(
            "matching.medium_match_threshold",
            self.medium_match_threshold,
            0.0,
            self.high_match_threshold,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
host = "0.0.0.0"
port = 9000
cors = true

[llm]
enabled = true
base_url = "http://ollama:11434"
model = "mistral:7b"
timeout_seconds = 30

[data]
dataset_path = "./data/talent.json"

[matching]
max_position_matches = 10
high_match_threshold = 85.0

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.port, Some(9000));
        assert_eq!(config.llm.model.as_deref(), Some("mistral:7b"));
        assert_eq!(config.data.dataset_path.as_deref(), Some("./data/talent.json"));
        assert_eq!(config.monitoring.json_logs, None);

        let settings = config.matching.to_settings();
        assert_eq!(settings.max_position_matches, 10);
        assert_eq!(settings.recommendation_window, 3);
        assert_eq!(settings.high_match_threshold, 85.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.server.host.is_none());
        assert_eq!(config.matching.to_settings(), MatchingSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TFO_TEST_OLLAMA_URL", "http://gpu-box:11434");

        let toml_content = r#"
[llm]
base_url = "${TFO_TEST_OLLAMA_URL}"
model = "${TFO_TEST_UNSET_MODEL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.llm.base_url.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(config.llm.model.as_deref(), Some("${TFO_TEST_UNSET_MODEL}"));

        std::env::remove_var("TFO_TEST_OLLAMA_URL");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = TomlConfig::from_toml_str("[llm]\nbase_url = \"not-a-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let inverted = TomlConfig::from_toml_str(
            "[matching]\nhigh_match_threshold = 40.0\nmedium_match_threshold = 60.0\n",
        )
        .unwrap();
        assert!(inverted.validate().is_err());

        let zero_limit =
            TomlConfig::from_toml_str("[matching]\nmax_position_matches = 0\n").unwrap();
        assert!(zero_limit.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let err = TomlConfig::from_toml_str("[server\nport = 1").unwrap_err();
        assert!(matches!(err, TalentError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 8123\n[monitoring]\njson_logs = true\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.port, Some(8123));
        assert_eq!(config.monitoring.json_logs, Some(true));
    }
}
