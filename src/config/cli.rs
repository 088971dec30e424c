use clap::Parser;
use serde::{Deserialize, Serialize};

use super::{AppConfig, TomlConfig};
use crate::utils::error::Result;
use crate::utils::validation::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "talent-flow")]
#[command(about = "Talent matching chatbot API backed by a local Ollama model")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Ollama model name, e.g. llama3.2:latest
    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub ollama_url: Option<String>,

    /// JSON dataset with employees, requisitions and skill ontology
    #[arg(long)]
    pub dataset: Option<String>,

    /// Answer from rules only, never call the LLM
    #[arg(long)]
    pub no_llm: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Loads the TOML file when given, then applies flags on top.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let toml = TomlConfig::from_file(path)?;
                toml.validate()?;
                AppConfig::from_toml(&toml)
            }
            None => AppConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(url) = &self.ollama_url {
            config.ollama_url = url.clone();
        }
        if let Some(dataset) = &self.dataset {
            config.dataset_path = Some(dataset.clone());
        }
        if self.no_llm {
            config.llm_enabled = false;
        }
        if self.monitor {
            config.monitoring = true;
        }
        if self.json_logs {
            config.json_logs = true;
        }
    }
}
