//! LLM-driven agent orchestration.
//!
//! A query is handled in three steps: pick an agent, gather the data it needs,
//! then let the agent answer. Every step that asks the LLM has a rule-based
//! fallback backed by [`MatchEngine`], so the service keeps answering when the
//! model is slow, down, or returns something unparseable.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::matching::{
    CandidateSearch, CandidateSearchOutcome, Clarification, MatchEngine, PositionSearch,
    SkillRecommendation,
};
use crate::core::query_parser::{extract_action_items, parse_skill_requirements};
use crate::domain::model::{Employee, Requisition, SkillOntology, SkillRequirement};
use crate::domain::ports::{ChatMessage, LlmClient, ResponseFormat};
use crate::utils::error::{Result, TalentError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    EmployeeAdvisor,
    StaffingConsultant,
    SkillAnalyst,
    #[serde(other)]
    GeneralAssistant,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::EmployeeAdvisor,
        AgentKind::StaffingConsultant,
        AgentKind::SkillAnalyst,
        AgentKind::GeneralAssistant,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AgentKind::EmployeeAdvisor => "employee_advisor",
            AgentKind::StaffingConsultant => "staffing_consultant",
            AgentKind::SkillAnalyst => "skill_analyst",
            AgentKind::GeneralAssistant => "general_assistant",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AgentKind::EmployeeAdvisor => {
                "Helps employees find suitable positions and career opportunities"
            }
            AgentKind::StaffingConsultant => {
                "Assists managers in finding suitable employees for open positions"
            }
            AgentKind::SkillAnalyst => "Analyzes skill gaps and provides training recommendations",
            AgentKind::GeneralAssistant => "Handles general queries and routing",
        }
    }

    pub fn capabilities(self) -> &'static [&'static str] {
        match self {
            AgentKind::EmployeeAdvisor => &["find_positions", "skill_analysis", "career_guidance"],
            AgentKind::StaffingConsultant => &[
                "employee_search",
                "skill_matching",
                "staffing_recommendations",
            ],
            AgentKind::SkillAnalyst => &["skill_gap_analysis", "training_recommendations"],
            AgentKind::GeneralAssistant => &["greeting", "routing", "basic_info"],
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Employee,
    Consultant,
    Manager,
    TscConsultant,
    #[serde(other)]
    Other,
}

impl UserRole {
    pub fn is_employee_side(self) -> bool {
        matches!(self, UserRole::Employee | UserRole::Consultant)
    }

    pub fn is_manager_side(self) -> bool {
        matches!(self, UserRole::Manager | UserRole::TscConsultant)
    }
}

impl FromStr for UserRole {
    type Err = TalentError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_uppercase().as_str() {
            "EMPLOYEE" => UserRole::Employee,
            "CONSULTANT" => UserRole::Consultant,
            "MANAGER" => UserRole::Manager,
            "TSC_CONSULTANT" => UserRole::TscConsultant,
            _ => UserRole::Other,
        })
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserRole::Employee => "EMPLOYEE",
            UserRole::Consultant => "CONSULTANT",
            UserRole::Manager => "MANAGER",
            UserRole::TscConsultant => "TSC_CONSULTANT",
            UserRole::Other => "OTHER",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSelection {
    pub selected_agent: AgentKind,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub required_data: Vec<String>,
}

impl AgentSelection {
    fn rule(agent: AgentKind, confidence: f64, reasoning: &str) -> Self {
        Self {
            selected_agent: agent,
            confidence,
            reasoning: reasoning.to_string(),
            required_data: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DataNeeds {
    #[serde(default)]
    needed_data: Vec<String>,
}

/// Data handed to an agent alongside the query.
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub query: String,
    pub user_role: UserRole,
    pub employee_id: Option<String>,
    pub timestamp: DateTime<Local>,
    pub employee: Option<Employee>,
    pub all_employees: Vec<Employee>,
    pub requisitions: Vec<Requisition>,
    pub skill_ontology: Option<SkillOntology>,
}

impl AgentContext {
    fn new(query: &str, user_role: UserRole, employee_id: Option<&str>) -> Self {
        Self {
            query: query.to_string(),
            user_role,
            employee_id: employee_id.map(str::to_string),
            timestamp: Local::now(),
            employee: None,
            all_employees: Vec::new(),
            requisitions: Vec::new(),
            skill_ontology: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvisorResponse {
    #[serde(rename = "type")]
    pub response_type: &'static str,
    pub llm_response: String,
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffingResponse {
    #[serde(rename = "type")]
    pub response_type: &'static str,
    pub llm_response: String,
    pub search_criteria: Vec<SkillRequirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_matches: Option<CandidateSearch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillAnalysisResponse {
    #[serde(rename = "type")]
    pub response_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_response: Option<String>,
    pub recommendations: Vec<SkillRecommendation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentInfo {
    pub name: AgentKind,
    pub description: &'static str,
    pub capabilities: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneralResponse {
    #[serde(rename = "type")]
    pub response_type: &'static str,
    pub response: String,
    pub agents: Vec<AgentInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AgentOutput {
    Advisor(AdvisorResponse),
    Staffing(StaffingResponse),
    SkillAnalysis(SkillAnalysisResponse),
    General(GeneralResponse),
    Positions(PositionSearch),
    Candidates(CandidateSearchOutcome),
    Guidance(Clarification),
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    pub selected_agent: AgentKind,
    pub agent_metadata: AgentSelection,
    /// True when the agent answered from rules instead of the LLM.
    pub used_fallback: bool,
    #[serde(flatten)]
    pub output: AgentOutput,
}

const AGENT_SELECTOR_PROMPT: &str = "You are an intelligent agent selector for a Talent Management chatbot. \
Analyze the user query and select the most appropriate agent to handle it.

Available Agents:
1. employee_advisor - For employees seeking positions, career guidance, skill matching
2. staffing_consultant - For managers searching for employees, staffing needs
3. skill_analyst - For skill analysis, gap identification, training recommendations
4. general_assistant - For greetings, basic questions, routing

Respond with a JSON object containing:
- selected_agent: the chosen agent name
- confidence: confidence score (0-1)
- reasoning: brief explanation
- required_data: list of data needed from our system";

const DATA_NEEDS_PROMPT: &str = "Analyze the query and determine what data is needed from our system.
Available data types:
- employee_data: Employee profiles, skills, status
- requisition_data: Open positions, requirements
- skill_ontology: Skill relationships, categories
- matching_data: Pre-calculated matches

Respond with JSON: {\"needed_data\": [\"data_type1\", \"data_type2\"]}";

const EMPLOYEE_ADVISOR_PROMPT: &str = "You are an Employee Career Advisor. Help employees find suitable positions and provide career guidance.

Available data:
- Employee profile with skills, experience, status
- Open positions with requirements
- Skill ontology for career pathing

Provide:
1. Personalized position recommendations
2. Match analysis with reasoning
3. Career advice and next steps
4. Skill development suggestions

Be encouraging and professional.";

const STAFFING_CONSULTANT_PROMPT: &str = "You are a Staffing Consultant. Help managers find suitable employees for open positions.

Available data:
- Employee database with skills, availability, performance
- Open positions with detailed requirements
- Skill matching capabilities

Provide:
1. Best-fit employee recommendations
2. Detailed match analysis
3. Availability assessment
4. Staffing strategy recommendations

Be analytical and business-focused.";

const SKILL_REQUIREMENTS_PROMPT: &str = "Extract skill requirements from the query and return as structured JSON.
Format: {\"requirements\": [{\"skill_name\": \"Java\", \"min_experience\": 5, \"required_level\": \"ADVANCED\", \"priority\": \"HIGH/MEDIUM/LOW\"}]}";

const SKILL_ANALYST_PROMPT: &str = "You are a Skill Analyst. Identify skill gaps between an employee's profile and the open positions, \
and recommend concrete training to close them. Consider emerging technologies and realistic career progression paths.";

const GENERAL_ASSISTANT_PROMPT: &str = "You are the front desk of a Talent Management chatbot. Greet the user, answer basic questions \
briefly, and explain which specialist can help them next.";

const EMPLOYEE_FALLBACK_HELP: &str = "I can help you find positions matching your skills. \
Please try queries like 'Find open positions' or 'Check positions for Java skills'";

const STAFFING_SAMPLE_SIZE: usize = 3;

async fn chat_json<T: DeserializeOwned>(llm: &dyn LlmClient, system: &str, user: &str) -> Result<T> {
    let raw = llm
        .chat(
            &[ChatMessage::system(system), ChatMessage::user(user)],
            ResponseFormat::Json,
        )
        .await?;
    Ok(serde_json::from_str(&raw)?)
}

/// Accepts either a bare array of requirements or an object wrapping one.
fn requirements_from_value(value: serde_json::Value) -> Result<Vec<SkillRequirement>> {
    let array = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(map) => map
            .into_values()
            .find(|v| v.is_array())
            .ok_or_else(|| TalentError::ProcessingError {
                message: "LLM requirements object contains no list".to_string(),
            })?,
        other => {
            return Err(TalentError::ProcessingError {
                message: format!("Unexpected requirements payload: {}", other),
            })
        }
    };
    Ok(serde_json::from_value(array)?)
}

pub struct AgentOrchestrator {
    llm: Arc<dyn LlmClient>,
    engine: MatchEngine,
}

impl AgentOrchestrator {
    pub fn new(llm: Arc<dyn LlmClient>, engine: MatchEngine) -> Self {
        Self { llm, engine }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn llm(&self) -> &dyn LlmClient {
        self.llm.as_ref()
    }

    fn log_fallback(&self, stage: &str, err: &TalentError) {
        if self.llm.is_enabled() {
            tracing::warn!("⚠️ {} fell back to rules: {}", stage, err);
        } else {
            tracing::debug!("{} using rules (LLM disabled)", stage);
        }
    }

    async fn ask(&self, system: &str, user: String) -> Result<String> {
        self.llm
            .chat(
                &[ChatMessage::system(system), ChatMessage::user(user)],
                ResponseFormat::Text,
            )
            .await
    }

    pub async fn process_query(
        &self,
        user_role: UserRole,
        query: &str,
        employee_id: Option<&str>,
    ) -> Result<AgentResponse> {
        let selection = self.select_agent(query, user_role, employee_id).await;
        let agent = selection.selected_agent;
        tracing::info!(
            "🧭 Selected agent {} (confidence {:.2}) for {} query",
            agent,
            selection.confidence,
            user_role
        );

        let context = self.gather_context(query, user_role, employee_id).await;
        tracing::debug!(
            "🧭 Context: employee={}, employees={}, requisitions={}, ontology={}",
            context.employee.is_some(),
            context.all_employees.len(),
            context.requisitions.len(),
            context.skill_ontology.is_some()
        );

        let (output, used_fallback) = match agent {
            AgentKind::EmployeeAdvisor => self.run_employee_advisor(query, &context).await?,
            AgentKind::StaffingConsultant => self.run_staffing_consultant(query, &context).await?,
            AgentKind::SkillAnalyst => self.run_skill_analyst(query, &context).await?,
            AgentKind::GeneralAssistant => self.run_general_assistant(query, &context).await,
        };

        Ok(AgentResponse {
            selected_agent: agent,
            agent_metadata: selection,
            used_fallback,
            output,
        })
    }

    pub async fn select_agent(
        &self,
        query: &str,
        user_role: UserRole,
        employee_id: Option<&str>,
    ) -> AgentSelection {
        let user_context = format!(
            "User Role: {}\nQuery: {}\nEmployee ID: {}",
            user_role,
            query,
            employee_id.unwrap_or("Not provided")
        );

        match chat_json::<AgentSelection>(self.llm.as_ref(), AGENT_SELECTOR_PROMPT, &user_context)
            .await
        {
            Ok(selection) => selection,
            Err(e) => {
                self.log_fallback("Agent selection", &e);
                fallback_agent_selection(query, user_role)
            }
        }
    }

    pub async fn gather_context(
        &self,
        query: &str,
        user_role: UserRole,
        employee_id: Option<&str>,
    ) -> AgentContext {
        let mut context = AgentContext::new(query, user_role, employee_id);
        let repo = self.engine.repository();
        let prompt = format!("Query: {}, User Role: {}", query, user_role);

        match chat_json::<DataNeeds>(self.llm.as_ref(), DATA_NEEDS_PROMPT, &prompt).await {
            Ok(needs) => {
                match employee_id {
                    Some(id) => context.employee = repo.find_employee(id).cloned(),
                    None => context.all_employees = repo.employees().to_vec(),
                }
                if needs.needed_data.iter().any(|d| d == "requisition_data") {
                    context.requisitions = repo.open_requisitions().into_iter().cloned().collect();
                }
                if needs.needed_data.iter().any(|d| d == "skill_ontology") {
                    context.skill_ontology = Some(repo.skill_ontology().clone());
                }
            }
            Err(e) => {
                self.log_fallback("Context gathering", &e);
                self.fallback_context(&mut context);
            }
        }

        context
    }

    fn fallback_context(&self, context: &mut AgentContext) {
        let repo = self.engine.repository();
        let query = context.query.to_lowercase();

        if context.user_role.is_employee_side() {
            if let Some(id) = &context.employee_id {
                context.employee = repo.find_employee(id).cloned();
            }
            context.requisitions = repo.open_requisitions().into_iter().cloned().collect();
        } else if context.user_role.is_manager_side()
            && ["find", "search", "employee"].iter().any(|t| query.contains(t))
        {
            context.all_employees = repo.employees().to_vec();
            context.skill_ontology = Some(repo.skill_ontology().clone());
        }
    }

    async fn run_employee_advisor(
        &self,
        query: &str,
        context: &AgentContext,
    ) -> Result<(AgentOutput, bool)> {
        let employee = context.employee.as_ref();
        let user_prompt = format!(
            "Employee: {}\nCurrent Status: {}\nSkills: {}\n\nOpen Positions: {}\n\nEmployee Query: {}\n\n\
             Please provide personalized recommendations and analysis.",
            employee.map(|e| e.name.as_str()).unwrap_or("Unknown"),
            employee
                .map(|e| e.current_status.to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            match employee {
                Some(e) => serde_json::to_string(&e.skills)?,
                None => "No data".to_string(),
            },
            serde_json::to_string(&context.requisitions)?,
            query
        );

        match self.ask(EMPLOYEE_ADVISOR_PROMPT, user_prompt).await {
            Ok(llm_response) => {
                let action_items = extract_action_items(&llm_response);
                Ok((
                    AgentOutput::Advisor(AdvisorResponse {
                        response_type: "employee_advisor_response",
                        llm_response,
                        action_items,
                    }),
                    false,
                ))
            }
            Err(e) => {
                self.log_fallback("Employee advisor", &e);
                self.fallback_employee_advisor(query, context)
                    .map(|output| (output, true))
            }
        }
    }

    fn fallback_employee_advisor(&self, query: &str, context: &AgentContext) -> Result<AgentOutput> {
        let employee = context.employee.as_ref().ok_or_else(|| {
            TalentError::not_found(
                "Employee",
                context.employee_id.as_deref().unwrap_or("<none>"),
            )
        })?;

        let lower = query.to_lowercase();
        if lower.contains("open positions") || lower.contains("find jobs") {
            Ok(AgentOutput::Positions(
                self.engine.find_positions_for_employee(employee),
            ))
        } else {
            Ok(AgentOutput::Guidance(Clarification {
                response: EMPLOYEE_FALLBACK_HELP.to_string(),
                employee: Some(employee.name.clone()),
            }))
        }
    }

    async fn run_staffing_consultant(
        &self,
        query: &str,
        context: &AgentContext,
    ) -> Result<(AgentOutput, bool)> {
        let sample: Vec<serde_json::Value> = context
            .all_employees
            .iter()
            .take(STAFFING_SAMPLE_SIZE)
            .map(|e| {
                serde_json::json!({
                    "name": e.name,
                    "skills": e.skills,
                    "status": e.current_status,
                })
            })
            .collect();
        let user_prompt = format!(
            "Available Employees: {}\nOpen Positions: {}\n\nManager Query: {}\n\nEmployee Data Sample: {}\n\n\
             Please provide staffing recommendations and analysis.",
            context.all_employees.len(),
            context.requisitions.len(),
            query,
            serde_json::to_string(&sample)?
        );

        match self.ask(STAFFING_CONSULTANT_PROMPT, user_prompt).await {
            Ok(llm_response) => {
                let search_criteria = self.parse_skill_requirements_ai(query).await;
                let structured_matches = if search_criteria.is_empty() {
                    None
                } else {
                    Some(
                        self.engine
                            .find_employees_for_requirements(search_criteria.clone()),
                    )
                };
                Ok((
                    AgentOutput::Staffing(StaffingResponse {
                        response_type: "staffing_consultant_response",
                        llm_response,
                        search_criteria,
                        structured_matches,
                    }),
                    false,
                ))
            }
            Err(e) => {
                self.log_fallback("Staffing consultant", &e);
                Ok((
                    AgentOutput::Candidates(self.engine.find_employees_by_skills(query)),
                    true,
                ))
            }
        }
    }

    pub async fn parse_skill_requirements_ai(&self, query: &str) -> Vec<SkillRequirement> {
        let parsed = async {
            let value: serde_json::Value =
                chat_json(self.llm.as_ref(), SKILL_REQUIREMENTS_PROMPT, query).await?;
            requirements_from_value(value)
        }
        .await;

        match parsed {
            Ok(requirements) => requirements,
            Err(e) => {
                self.log_fallback("Skill requirement parsing", &e);
                parse_skill_requirements(query)
            }
        }
    }

    async fn run_skill_analyst(
        &self,
        query: &str,
        context: &AgentContext,
    ) -> Result<(AgentOutput, bool)> {
        let recommendations = context
            .employee
            .as_ref()
            .map(|e| self.engine.find_positions_for_employee(e).recommendations)
            .unwrap_or_default();

        let user_prompt = format!(
            "Employee Skills: {}\nOpen Positions: {}\nComputed Gaps: {}\n\nQuery: {}\n\n\
             Provide specific, actionable recommendations.",
            match &context.employee {
                Some(e) => serde_json::to_string(&e.skills)?,
                None => "No data".to_string(),
            },
            context.requisitions.len(),
            serde_json::to_string(&recommendations)?,
            query
        );

        let (llm_response, used_fallback) = match self.ask(SKILL_ANALYST_PROMPT, user_prompt).await
        {
            Ok(text) => (Some(text), false),
            Err(e) => {
                self.log_fallback("Skill analyst", &e);
                (None, true)
            }
        };

        Ok((
            AgentOutput::SkillAnalysis(SkillAnalysisResponse {
                response_type: "skill_analyst_response",
                llm_response,
                recommendations,
            }),
            used_fallback,
        ))
    }

    async fn run_general_assistant(&self, query: &str, context: &AgentContext) -> (AgentOutput, bool) {
        let agents: Vec<AgentInfo> = AgentKind::ALL
            .iter()
            .map(|&kind| AgentInfo {
                name: kind,
                description: kind.description(),
                capabilities: kind.capabilities(),
            })
            .collect();

        let catalogue = agents
            .iter()
            .map(|a| format!("- {}: {}", a.name, a.description))
            .collect::<Vec<_>>()
            .join("\n");
        let user_prompt = format!(
            "User Role: {}\nSpecialists:\n{}\n\nQuery: {}",
            context.user_role, catalogue, query
        );

        let (response, used_fallback) = match self.ask(GENERAL_ASSISTANT_PROMPT, user_prompt).await {
            Ok(text) => (text, false),
            Err(e) => {
                self.log_fallback("General assistant", &e);
                (
                    format!(
                        "Hello! I can route your question to one of these specialists:\n{}",
                        catalogue
                    ),
                    true,
                )
            }
        };

        (
            AgentOutput::General(GeneralResponse {
                response_type: "general_assistant_response",
                response,
                agents,
            }),
            used_fallback,
        )
    }
}

pub fn fallback_agent_selection(query: &str, user_role: UserRole) -> AgentSelection {
    let query = query.to_lowercase();
    let mentions = |terms: &[&str]| terms.iter().any(|t| query.contains(t));

    if user_role.is_employee_side() {
        if mentions(&["position", "job", "opportunity", "role", "project"]) {
            return AgentSelection::rule(
                AgentKind::EmployeeAdvisor,
                0.8,
                "Employee seeking positions",
            );
        }
        if mentions(&["skill", "training", "learn", "improve"]) {
            return AgentSelection::rule(AgentKind::SkillAnalyst, 0.7, "Skill-related query");
        }
    } else if user_role.is_manager_side()
        && mentions(&["find", "search", "employee", "resource", "staff"])
    {
        return AgentSelection::rule(
            AgentKind::StaffingConsultant,
            0.9,
            "Staffing search query",
        );
    }

    AgentSelection::rule(AgentKind::GeneralAssistant, 0.6, "General query")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryRepository, OfflineLlm};
    use crate::core::matching::MatchingSettings;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies in order; fails once the script runs out.
    struct ScriptedLlm {
        replies: Mutex<VecDeque<Result<String>>>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedLlm {
        fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn chat(&self, messages: &[ChatMessage], _format: ResponseFormat) -> Result<String> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TalentError::llm("script exhausted")))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn engine() -> MatchEngine {
        MatchEngine::new(
            Arc::new(InMemoryRepository::default()),
            MatchingSettings::default(),
        )
        .with_reference_date(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap())
    }

    fn ok(s: &str) -> Result<String> {
        Ok(s.to_string())
    }

    #[test]
    fn test_fallback_selection_rules() {
        let pick = |q, role| fallback_agent_selection(q, role).selected_agent;

        assert_eq!(pick("any open job for me?", UserRole::Employee), AgentKind::EmployeeAdvisor);
        assert_eq!(pick("how do I improve?", UserRole::Consultant), AgentKind::SkillAnalyst);
        assert_eq!(pick("search staff for REQ001", UserRole::Manager), AgentKind::StaffingConsultant);
        assert_eq!(pick("hello", UserRole::TscConsultant), AgentKind::GeneralAssistant);
        assert_eq!(pick("find a job", UserRole::Other), AgentKind::GeneralAssistant);

        let selection = fallback_agent_selection("find resources", UserRole::Manager);
        assert_eq!(selection.confidence, 0.9);
    }

    #[test]
    fn test_unknown_agent_name_maps_to_general_assistant() {
        let selection: AgentSelection =
            serde_json::from_str(r#"{"selected_agent": "math_wizard", "confidence": 0.4}"#).unwrap();
        assert_eq!(selection.selected_agent, AgentKind::GeneralAssistant);
        assert!(selection.required_data.is_empty());
    }

    #[test]
    fn test_user_role_parsing() {
        assert_eq!("tsc_consultant".parse::<UserRole>().unwrap(), UserRole::TscConsultant);
        assert_eq!("intern".parse::<UserRole>().unwrap(), UserRole::Other);
        let role: UserRole = serde_json::from_str("\"DIRECTOR\"").unwrap();
        assert_eq!(role, UserRole::Other);
    }

    #[test]
    fn test_requirements_from_wrapped_object() {
        let value = serde_json::json!({
            "requirements": [{"skill_name": "Go", "min_experience": 3, "required_level": "ADVANCED"}]
        });
        let reqs = requirements_from_value(value).unwrap();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].min_experience, 3.0);

        assert!(requirements_from_value(serde_json::json!({"note": "none"})).is_err());
        assert!(requirements_from_value(serde_json::json!("Java")).is_err());
    }

    #[tokio::test]
    async fn test_offline_orchestrator_uses_rules_end_to_end() {
        let orchestrator = AgentOrchestrator::new(Arc::new(OfflineLlm), engine());

        let response = orchestrator
            .process_query(UserRole::Employee, "find open positions for me", Some("EMP001"))
            .await
            .unwrap();

        assert_eq!(response.selected_agent, AgentKind::EmployeeAdvisor);
        assert!(response.used_fallback);
        match response.output {
            AgentOutput::Positions(search) => assert_eq!(search.total_matches, 3),
            other => panic!("expected positions, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_offline_advisor_without_employee_is_not_found() {
        let orchestrator = AgentOrchestrator::new(Arc::new(OfflineLlm), engine());

        let err = orchestrator
            .process_query(UserRole::Employee, "find open positions", Some("EMP404"))
            .await
            .unwrap_err();

        assert!(matches!(err, TalentError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_offline_staffing_consultant_runs_candidate_search() {
        let orchestrator = AgentOrchestrator::new(Arc::new(OfflineLlm), engine());

        let response = orchestrator
            .process_query(UserRole::Manager, "find employees with java", None)
            .await
            .unwrap();

        assert_eq!(response.selected_agent, AgentKind::StaffingConsultant);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["selected_agent"], "staffing_consultant");
        assert_eq!(json["search_criteria"][0]["skill_name"], "Java");
        assert_eq!(json["agent_metadata"]["reasoning"], "Staffing search query");
    }

    #[tokio::test]
    async fn test_llm_advisor_path() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            ok(r#"{"selected_agent": "employee_advisor", "confidence": 0.95, "reasoning": "career", "required_data": ["employee_data"]}"#),
            ok(r#"{"needed_data": ["employee_data", "requisition_data"]}"#),
            ok("Raj is a strong fit for REQ001. You should apply this week. Keep it up."),
        ]));
        let orchestrator = AgentOrchestrator::new(llm.clone(), engine());

        let response = orchestrator
            .process_query(UserRole::Employee, "what should I do next?", Some("EMP001"))
            .await
            .unwrap();

        assert_eq!(llm.call_count(), 3);
        assert!(!response.used_fallback);
        assert_eq!(response.agent_metadata.confidence, 0.95);
        match response.output {
            AgentOutput::Advisor(advice) => {
                assert_eq!(advice.response_type, "employee_advisor_response");
                assert_eq!(advice.action_items, vec!["You should apply this week"]);
            }
            other => panic!("expected advice, got {:?}", other),
        }

        let calls = llm.calls.lock().unwrap();
        let advisor_prompt = &calls[2][1].content;
        assert!(advisor_prompt.contains("Employee: Raj Sharma"));
        assert!(advisor_prompt.contains("REQ004"));
    }

    #[tokio::test]
    async fn test_context_follows_requested_data() {
        let llm = Arc::new(ScriptedLlm::new(vec![ok(r#"{"needed_data": ["skill_ontology"]}"#)]));
        let orchestrator = AgentOrchestrator::new(llm, engine());

        let context = orchestrator
            .gather_context("who knows angular?", UserRole::Manager, None)
            .await;

        assert_eq!(context.all_employees.len(), 5);
        assert!(context.requisitions.is_empty());
        assert!(context.skill_ontology.is_some());
        assert!(context.employee.is_none());
    }

    #[tokio::test]
    async fn test_context_fallback_for_manager_without_search_terms() {
        let orchestrator = AgentOrchestrator::new(Arc::new(OfflineLlm), engine());

        let context = orchestrator
            .gather_context("hello there", UserRole::Manager, None)
            .await;

        assert!(context.all_employees.is_empty());
        assert!(context.skill_ontology.is_none());
    }

    #[tokio::test]
    async fn test_staffing_consultant_uses_llm_requirements() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            ok(r#"{"selected_agent": "staffing_consultant", "confidence": 0.9}"#),
            ok(r#"{"needed_data": []}"#),
            ok("Sneha is your best bet."),
            ok(r#"[{"skill_name": "Spring Boot", "min_experience": 4, "required_level": "ADVANCED", "priority": "HIGH"}]"#),
        ]));
        let orchestrator = AgentOrchestrator::new(llm, engine());

        let response = orchestrator
            .process_query(UserRole::Manager, "need a spring boot engineer", None)
            .await
            .unwrap();

        match response.output {
            AgentOutput::Staffing(staffing) => {
                assert_eq!(staffing.search_criteria[0].skill_name, "Spring Boot");
                assert_eq!(staffing.search_criteria[0].priority.as_deref(), Some("HIGH"));
                let matches = staffing.structured_matches.unwrap();
                assert_eq!(matches.matches[0].employee_id, "EMP004");
                assert_eq!(matches.total_employees_found, 2);
            }
            other => panic!("expected staffing response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_requirement_parsing_falls_back_on_garbage() {
        let llm = Arc::new(ScriptedLlm::new(vec![ok("not json at all")]));
        let orchestrator = AgentOrchestrator::new(llm, engine());

        let reqs = orchestrator
            .parse_skill_requirements_ai("find employees with SQL")
            .await;

        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].skill_name, "SQL");
    }

    #[tokio::test]
    async fn test_skill_analyst_keeps_recommendations_without_llm() {
        let orchestrator = AgentOrchestrator::new(Arc::new(OfflineLlm), engine());

        let response = orchestrator
            .process_query(UserRole::Employee, "which skill should I learn?", Some("EMP001"))
            .await
            .unwrap();

        assert_eq!(response.selected_agent, AgentKind::SkillAnalyst);
        match response.output {
            AgentOutput::SkillAnalysis(analysis) => {
                assert!(analysis.llm_response.is_none());
                assert_eq!(analysis.recommendations[0].skill, "JavaScript");
            }
            other => panic!("expected skill analysis, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_general_assistant_lists_agents() {
        let orchestrator = AgentOrchestrator::new(Arc::new(OfflineLlm), engine());

        let response = orchestrator
            .process_query(UserRole::Other, "hi!", None)
            .await
            .unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "general_assistant_response");
        assert_eq!(json["agents"].as_array().unwrap().len(), 4);
        assert!(json["response"].as_str().unwrap().contains("staffing_consultant"));
    }
}
