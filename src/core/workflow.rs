//! Two-agent conversational workflow with per-thread memory.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::ports::{ChatMessage, LlmClient, ResponseFormat};
use crate::utils::error::{Result, TalentError};

const KNOWLEDGE_PROMPT: &str =
    "You are a knowledgeable assistant. Answer clearly and concisely.";
const MATH_PROMPT: &str =
    "You are a careful math assistant. Work through calculations step by step and state the final answer.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAgent {
    KnowledgeAgent,
    MathAgent,
}

impl WorkflowAgent {
    fn system_prompt(self) -> &'static str {
        match self {
            WorkflowAgent::KnowledgeAgent => KNOWLEDGE_PROMPT,
            WorkflowAgent::MathAgent => MATH_PROMPT,
        }
    }
}

impl fmt::Display for WorkflowAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowAgent::KnowledgeAgent => f.write_str("knowledge_agent"),
            WorkflowAgent::MathAgent => f.write_str("math_agent"),
        }
    }
}

/// Any Unicode numeral, not only ASCII digits, sends the message to the math agent.
pub fn route_message(message: &str) -> WorkflowAgent {
    if message.chars().any(char::is_numeric) || message.to_lowercase().contains("math") {
        WorkflowAgent::MathAgent
    } else {
        WorkflowAgent::KnowledgeAgent
    }
}

/// In-memory message history per thread id.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    threads: Arc<RwLock<HashMap<String, Vec<ChatMessage>>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `message` and returns the thread as it now stands.
    pub async fn append(&self, thread_id: &str, message: ChatMessage) -> Vec<ChatMessage> {
        let mut threads = self.threads.write().await;
        let history = threads.entry(thread_id.to_string()).or_default();
        history.push(message);
        history.clone()
    }

    pub async fn history(&self, thread_id: &str) -> Vec<ChatMessage> {
        self.threads
            .read()
            .await
            .get(thread_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn thread_count(&self) -> usize {
        self.threads.read().await.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowReply {
    pub thread_id: String,
    pub agent: WorkflowAgent,
    pub reply: String,
    /// Messages stored for the thread, user and assistant combined.
    pub turns: usize,
}

#[derive(Clone)]
pub struct ChatWorkflow {
    llm: Arc<dyn LlmClient>,
    store: ConversationStore,
}

impl ChatWorkflow {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self::with_store(llm, ConversationStore::new())
    }

    pub fn with_store(llm: Arc<dyn LlmClient>, store: ConversationStore) -> Self {
        Self { llm, store }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub async fn invoke(&self, thread_id: &str, message: &str) -> Result<WorkflowReply> {
        if thread_id.trim().is_empty() {
            return Err(TalentError::ValidationError {
                message: "thread_id must not be empty".to_string(),
            });
        }
        if message.trim().is_empty() {
            return Err(TalentError::ValidationError {
                message: "message must not be empty".to_string(),
            });
        }

        let history = self.store.append(thread_id, ChatMessage::user(message)).await;
        let agent = route_message(message);
        tracing::info!("🧵 Thread {} routed to {}", thread_id, agent);

        let mut prompt = Vec::with_capacity(history.len() + 1);
        prompt.push(ChatMessage::system(agent.system_prompt()));
        prompt.extend(history);

        let reply = self.llm.chat(&prompt, ResponseFormat::Text).await?;
        let turns = self
            .store
            .append(thread_id, ChatMessage::assistant(reply.clone()))
            .await
            .len();

        Ok(WorkflowReply {
            thread_id: thread_id.to_string(),
            agent,
            reply,
            turns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::OfflineLlm;
    use crate::domain::ports::ChatRole;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Echoes the number of messages it was sent and records the prompts.
    #[derive(Default)]
    struct CountingLlm {
        prompts: Mutex<Vec<Vec<ChatMessage>>>,
    }

    #[async_trait]
    impl LlmClient for CountingLlm {
        async fn chat(&self, messages: &[ChatMessage], _format: ResponseFormat) -> Result<String> {
            self.prompts.lock().unwrap().push(messages.to_vec());
            Ok(format!("seen {}", messages.len()))
        }

        fn model_name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_route_message() {
        assert_eq!(route_message("what is 2 + 2"), WorkflowAgent::MathAgent);
        assert_eq!(route_message("I like MATH puzzles"), WorkflowAgent::MathAgent);
        assert_eq!(route_message("who wrote Hamlet?"), WorkflowAgent::KnowledgeAgent);
        assert_eq!(route_message(""), WorkflowAgent::KnowledgeAgent);
    }

    #[test]
    fn test_route_message_non_ascii_digits() {
        assert_eq!(route_message("what is ٣ + ٤"), WorkflowAgent::MathAgent);
        assert_eq!(route_message("square of x²"), WorkflowAgent::MathAgent);
        assert_eq!(route_message("tell me about Paris"), WorkflowAgent::KnowledgeAgent);
    }

    #[tokio::test]
    async fn test_invoke_keeps_thread_history() {
        let llm = Arc::new(CountingLlm::default());
        let workflow = ChatWorkflow::new(llm.clone());

        let first = workflow.invoke("t1", "hello").await.unwrap();
        assert_eq!(first.agent, WorkflowAgent::KnowledgeAgent);
        assert_eq!(first.reply, "seen 2");
        assert_eq!(first.turns, 2);

        let second = workflow.invoke("t1", "now add 3 and 4").await.unwrap();
        assert_eq!(second.agent, WorkflowAgent::MathAgent);
        assert_eq!(second.reply, "seen 4");
        assert_eq!(second.turns, 4);

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts[1][0].role, ChatRole::System);
        assert_eq!(prompts[1][0].content, MATH_PROMPT);
        assert_eq!(prompts[1][2].content, "seen 2");
    }

    #[tokio::test]
    async fn test_threads_are_isolated() {
        let workflow = ChatWorkflow::new(Arc::new(CountingLlm::default()));

        workflow.invoke("a", "hi").await.unwrap();
        let other = workflow.invoke("b", "hi").await.unwrap();

        assert_eq!(other.turns, 2);
        assert_eq!(workflow.store().thread_count().await, 2);
    }

    #[tokio::test]
    async fn test_llm_failure_keeps_only_user_message() {
        let workflow = ChatWorkflow::new(Arc::new(OfflineLlm));

        let err = workflow.invoke("t1", "hello").await.unwrap_err();
        assert!(matches!(err, TalentError::LlmError { .. }));

        let history = workflow.store().history("t1").await;
        assert_eq!(history, vec![ChatMessage::user("hello")]);
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected() {
        let workflow = ChatWorkflow::new(Arc::new(CountingLlm::default()));

        assert!(matches!(
            workflow.invoke(" ", "hello").await,
            Err(TalentError::ValidationError { .. })
        ));
        assert!(matches!(
            workflow.invoke("t1", "").await,
            Err(TalentError::ValidationError { .. })
        ));
        assert_eq!(workflow.store().thread_count().await, 0);
    }
}
