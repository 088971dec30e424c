//! Request handlers for `/api/chatbot`.

use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::core::agents::{AgentResponse, UserRole};
use crate::core::chatbot::{EmployeeReply, ManagerReply};
use crate::core::workflow::WorkflowReply;
use crate::utils::error::{Result, TalentError};

#[derive(Debug, Deserialize)]
pub struct EmployeeQueryRequest {
    pub employee_id: String,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct EmployeeQueryResponse {
    pub status: &'static str,
    pub employee_id: String,
    pub query: String,
    pub response: EmployeeReply,
}

#[derive(Debug, Deserialize)]
pub struct ManagerQueryRequest {
    pub user_role: String,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ManagerQueryResponse {
    pub status: &'static str,
    pub user_role: String,
    pub query: String,
    pub response: ManagerReply,
}

#[derive(Debug, Deserialize)]
pub struct AgentQueryRequest {
    pub user_role: UserRole,
    pub query: String,
    #[serde(default)]
    pub employee_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub thread_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub llm_model: String,
    pub llm_enabled: bool,
    pub employees: usize,
    pub open_requisitions: usize,
}

fn require_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(TalentError::ValidationError {
            message: "query must not be empty".to_string(),
        });
    }
    Ok(())
}

/// POST /employee/query
pub async fn employee_query(
    State(state): State<AppState>,
    Json(req): Json<EmployeeQueryRequest>,
) -> Result<Json<EmployeeQueryResponse>> {
    require_query(&req.query)?;
    let response = state
        .chatbot
        .process_employee_query(&req.employee_id, &req.query)?;

    Ok(Json(EmployeeQueryResponse {
        status: "success",
        employee_id: req.employee_id,
        query: req.query,
        response,
    }))
}

/// POST /manager/query
pub async fn manager_query(
    State(state): State<AppState>,
    Json(req): Json<ManagerQueryRequest>,
) -> Result<Json<ManagerQueryResponse>> {
    require_query(&req.query)?;
    let response = state
        .chatbot
        .process_manager_query(&req.user_role, &req.query);

    Ok(Json(ManagerQueryResponse {
        status: "success",
        user_role: req.user_role,
        query: req.query,
        response,
    }))
}

/// GET /employees/:employee_id/opportunities
pub async fn employee_opportunities(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Json<EmployeeReply>> {
    state.chatbot.employee_opportunities(&employee_id).map(Json)
}

/// POST /query
pub async fn agent_query(
    State(state): State<AppState>,
    Json(req): Json<AgentQueryRequest>,
) -> Result<Json<AgentResponse>> {
    require_query(&req.query)?;
    state
        .orchestrator
        .process_query(req.user_role, &req.query, req.employee_id.as_deref())
        .await
        .map(Json)
}

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<WorkflowReply>> {
    state
        .workflow
        .invoke(&req.thread_id, &req.message)
        .await
        .map(Json)
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let repository = state.chatbot.engine().repository();
    let llm = state.orchestrator.llm();

    Json(HealthResponse {
        status: "ok",
        llm_model: llm.model_name().to_string(),
        llm_enabled: llm.is_enabled(),
        employees: repository.employees().len(),
        open_requisitions: repository.open_requisitions().len(),
    })
}
