// Adapters layer: concrete implementations of the domain ports (dataset, LLM runtime).

pub mod ollama;
pub mod seed;

use crate::domain::model::{Dataset, Employee, Requisition, SkillOntology};
use crate::domain::ports::{ChatMessage, LlmClient, ResponseFormat, TalentRepository};
use crate::utils::error::{Result, TalentError};
use async_trait::async_trait;

pub use ollama::OllamaClient;

/// Read-only repository over a dataset held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    dataset: Dataset,
}

impl InMemoryRepository {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Loads the dataset at `path`, or the bundled demo data when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let dataset = match path {
            Some(path) => {
                tracing::info!("📂 Loading talent dataset from {}", path);
                Dataset::from_json_file(path)?
            }
            None => {
                tracing::info!("📂 Using built-in demo dataset");
                seed::builtin_dataset()
            }
        };
        tracing::info!(
            "📂 Dataset ready: {} employees, {} requisitions",
            dataset.employees.len(),
            dataset.requisitions.len()
        );
        Ok(Self::new(dataset))
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new(seed::builtin_dataset())
    }
}

impl TalentRepository for InMemoryRepository {
    fn employees(&self) -> &[Employee] {
        &self.dataset.employees
    }

    fn requisitions(&self) -> &[Requisition] {
        &self.dataset.requisitions
    }

    fn skill_ontology(&self) -> &SkillOntology {
        &self.dataset.skill_ontology
    }
}

/// LLM stand-in for when the runtime is switched off; every call fails so callers
/// take their rule-based path.
#[derive(Debug, Clone, Default)]
pub struct OfflineLlm;

#[async_trait]
impl LlmClient for OfflineLlm {
    async fn chat(&self, _messages: &[ChatMessage], _format: ResponseFormat) -> Result<String> {
        Err(TalentError::llm("LLM is disabled"))
    }

    fn model_name(&self) -> &str {
        "offline"
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_repository_defaults_to_builtin_dataset() {
        let repo = InMemoryRepository::load(None).unwrap();
        assert_eq!(repo.employees().len(), 5);
        assert_eq!(repo.open_requisitions().len(), 4);
        assert_eq!(repo.available_employees().len(), 4);
        assert_eq!(repo.find_employee("EMP004").unwrap().name, "Sneha Desai");
        assert!(repo.find_employee("EMP999").is_none());
    }

    #[test]
    fn test_repository_loads_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        let content = serde_json::json!({
            "employees": [],
            "requisitions": [{
                "requisition_id": "REQ100",
                "project_name": "Payments",
                "role_title": "Backend Developer",
                "status": "CLOSED",
                "start_date": "2025-01-01",
                "required_skills": [],
                "location": "Remote",
                "experience_level": "Mid",
                "hiring_type": "EXTERNAL"
            }]
        });
        file.write_all(content.to_string().as_bytes()).unwrap();

        let repo = InMemoryRepository::load(file.path().to_str()).unwrap();
        assert_eq!(repo.requisitions().len(), 1);
        assert!(repo.open_requisitions().is_empty());
        assert!(repo.skill_ontology().is_empty());
    }

    #[test]
    fn test_repository_missing_file_is_io_error() {
        let err = InMemoryRepository::load(Some("/nonexistent/talent.json")).unwrap_err();
        assert!(matches!(err, TalentError::IoError(_)));
    }

    #[test]
    fn test_offline_llm_always_fails() {
        let llm = OfflineLlm;
        let result = tokio_test::block_on(
            llm.chat(&[ChatMessage::user("hello")], ResponseFormat::Text),
        );
        assert!(matches!(result, Err(TalentError::LlmError { .. })));
        assert!(!llm.is_enabled());
    }
}
