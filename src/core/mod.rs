pub mod agents;
pub mod chatbot;
pub mod matching;
pub mod query_parser;
pub mod scoring;
pub mod workflow;

pub use crate::domain::ports::{LlmClient, TalentRepository};
pub use crate::utils::error::Result;
pub use agents::AgentOrchestrator;
pub use chatbot::TalentChatbot;
pub use matching::{MatchEngine, MatchingSettings};
pub use workflow::ChatWorkflow;
