use crate::domain::model::{Employee, Requisition, SkillOntology};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Read access to the talent dataset.
pub trait TalentRepository: Send + Sync {
    fn employees(&self) -> &[Employee];
    fn requisitions(&self) -> &[Requisition];
    fn skill_ontology(&self) -> &SkillOntology;

    fn find_employee(&self, employee_id: &str) -> Option<&Employee> {
        self.employees()
            .iter()
            .find(|e| e.employee_id == employee_id)
    }

    fn open_requisitions(&self) -> Vec<&Requisition> {
        self.requisitions().iter().filter(|r| r.is_open()).collect()
    }

    fn available_employees(&self) -> Vec<&Employee> {
        self.employees()
            .iter()
            .filter(|e| e.current_status.is_available())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    /// The runtime is asked to constrain its output to a JSON document.
    Json,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], format: ResponseFormat) -> Result<String>;

    fn model_name(&self) -> &str;

    fn is_enabled(&self) -> bool {
        true
    }
}
