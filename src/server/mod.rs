//! HTTP API.
//!
//! Routes (all under `/api/chatbot`):
//! - POST /employee/query
//! - POST /manager/query
//! - GET  /employees/:employee_id/opportunities
//! - POST /query
//! - POST /chat
//! - GET  /health

pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::agents::AgentOrchestrator;
use crate::core::chatbot::TalentChatbot;
use crate::core::matching::{MatchEngine, MatchingSettings};
use crate::core::workflow::ChatWorkflow;
use crate::domain::ports::{LlmClient, TalentRepository};
use crate::utils::error::Result;

pub const API_PREFIX: &str = "/api/chatbot";

#[derive(Clone)]
pub struct AppState {
    pub chatbot: TalentChatbot,
    pub orchestrator: Arc<AgentOrchestrator>,
    pub workflow: ChatWorkflow,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn TalentRepository>,
        llm: Arc<dyn LlmClient>,
        settings: MatchingSettings,
    ) -> Self {
        Self::from_engine(MatchEngine::new(repository, settings), llm)
    }

    pub fn from_engine(engine: MatchEngine, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            chatbot: TalentChatbot::new(engine.clone()),
            orchestrator: Arc::new(AgentOrchestrator::new(llm.clone(), engine)),
            workflow: ChatWorkflow::new(llm),
        }
    }
}

pub fn build_router(state: AppState, cors: bool) -> Router {
    let api = Router::new()
        .route("/employee/query", post(handlers::employee_query))
        .route("/manager/query", post(handlers::manager_query))
        .route(
            "/employees/:employee_id/opportunities",
            get(handlers::employee_opportunities),
        )
        .route("/query", post(handlers::agent_query))
        .route("/chat", post(handlers::chat))
        .route("/health", get(handlers::health))
        .with_state(state);

    let router = Router::new()
        .nest(API_PREFIX, api)
        .layer(middleware::from_fn(log_request_timing))
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn log_request_timing(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        "⏱️ {} {} -> {} in {:.4}s",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64()
    );
    response
}

/// Serves until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("🌐 Listening on http://{}{}", addr, API_PREFIX);
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("🛑 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for Ctrl-C: {}", e);
        return;
    }
    tracing::info!("🛑 Shutdown signal received, draining connections");
}
