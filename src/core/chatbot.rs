use serde::{Deserialize, Serialize};

use crate::core::matching::{
    CandidateSearchOutcome, MatchEngine, PositionSearch, SkillSearchOutcome,
};
use crate::core::query_parser::{
    classify_employee_intent, classify_manager_intent, EmployeeIntent, ManagerIntent,
};
use crate::domain::model::EmployeeStatus;
use crate::utils::error::{Result, TalentError};

pub const OPPORTUNITIES_QUERY: &str = "find open positions matching my skills";

const EMPLOYEE_HELP: &str = "I can help you with:\n\
    1. Finding open positions matching your skills\n\
    2. Checking positions for specific skills\n\
    3. Skill upgrade recommendations\n\n\
    How can I assist you?";

const MANAGER_HELP: &str = "I can help you find employees with specific skill sets. \
    Please specify the skills and experience levels you're looking for.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeHelp {
    pub response: String,
    pub employee: String,
    pub status: EmployeeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerHelp {
    pub response: String,
    pub user_role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmployeeReply {
    Positions(PositionSearch),
    SkillPositions(SkillSearchOutcome),
    Help(EmployeeHelp),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManagerReply {
    Candidates(CandidateSearchOutcome),
    Help(ManagerHelp),
}

/// Keyword-driven chatbot for employees looking for work and managers looking for people.
#[derive(Clone)]
pub struct TalentChatbot {
    engine: MatchEngine,
}

impl TalentChatbot {
    pub fn new(engine: MatchEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn process_employee_query(&self, employee_id: &str, query: &str) -> Result<EmployeeReply> {
        let employee = self
            .engine
            .repository()
            .find_employee(employee_id)
            .ok_or_else(|| TalentError::not_found("Employee", employee_id))?;

        let intent = classify_employee_intent(query);
        tracing::info!("💬 Employee {} query routed to {:?}", employee_id, intent);

        let reply = match intent {
            EmployeeIntent::FindPositions => {
                EmployeeReply::Positions(self.engine.find_positions_for_employee(employee))
            }
            EmployeeIntent::SkillPositions => EmployeeReply::SkillPositions(
                self.engine
                    .find_positions_with_specific_skills(employee, query),
            ),
            EmployeeIntent::Help => EmployeeReply::Help(EmployeeHelp {
                response: EMPLOYEE_HELP.to_string(),
                employee: employee.name.clone(),
                status: employee.current_status,
            }),
        };
        Ok(reply)
    }

    pub fn process_manager_query(&self, user_role: &str, query: &str) -> ManagerReply {
        let intent = classify_manager_intent(query);
        tracing::info!("💬 {} query routed to {:?}", user_role, intent);

        match intent {
            ManagerIntent::FindEmployees => {
                ManagerReply::Candidates(self.engine.find_employees_by_skills(query))
            }
            ManagerIntent::Help => ManagerReply::Help(ManagerHelp {
                response: MANAGER_HELP.to_string(),
                user_role: user_role.to_string(),
            }),
        }
    }

    pub fn employee_opportunities(&self, employee_id: &str) -> Result<EmployeeReply> {
        self.process_employee_query(employee_id, OPPORTUNITIES_QUERY)
    }
}
