use anyhow::Result;
use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use talent_flow::core::agents::{AgentKind, AgentOutput, UserRole};
use talent_flow::core::matching::MatchingSettings;
use talent_flow::{AgentOrchestrator, InMemoryRepository, MatchEngine, OllamaClient};

fn ollama_reply(content: &str) -> serde_json::Value {
    json!({
        "model": "llama3.2:latest",
        "message": {"role": "assistant", "content": content},
        "done": true
    })
}

fn orchestrator_for(server: &MockServer) -> AgentOrchestrator {
    let llm = OllamaClient::new(&server.base_url(), "llama3.2:latest", Duration::from_secs(5));
    let engine = MatchEngine::new(
        Arc::new(InMemoryRepository::default()),
        MatchingSettings::default(),
    )
    .with_reference_date(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
    AgentOrchestrator::new(Arc::new(llm), engine)
}

#[tokio::test]
async fn test_employee_advisor_through_ollama() -> Result<()> {
    let server = MockServer::start();

    let selector = server.mock(|when, then| {
        when.method(POST)
            .path("/api/chat")
            .body_contains("intelligent agent selector");
        then.status(200).json_body(ollama_reply(
            r#"{"selected_agent": "employee_advisor", "confidence": 0.92, "reasoning": "career question", "required_data": ["employee_data"]}"#,
        ));
    });
    let data_needs = server.mock(|when, then| {
        when.method(POST)
            .path("/api/chat")
            .body_contains("determine what data is needed");
        then.status(200)
            .json_body(ollama_reply(r#"{"needed_data": ["employee_data", "requisition_data"]}"#));
    });
    let advisor = server.mock(|when, then| {
        when.method(POST)
            .path("/api/chat")
            .body_contains("Employee Career Advisor")
            .body_contains("Raj Sharma");
        then.status(200).json_body(ollama_reply(
            "REQ001 is your strongest match. I recommend brushing up on JavaScript. Good luck.",
        ));
    });

    let orchestrator = orchestrator_for(&server);
    let response = orchestrator
        .process_query(UserRole::Employee, "Where should my career go next?", Some("EMP001"))
        .await?;

    selector.assert();
    data_needs.assert();
    advisor.assert();

    assert_eq!(response.selected_agent, AgentKind::EmployeeAdvisor);
    assert!(!response.used_fallback);
    match response.output {
        AgentOutput::Advisor(advice) => {
            assert_eq!(
                advice.action_items,
                vec!["I recommend brushing up on JavaScript"]
            );
        }
        other => panic!("expected advisor output, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_ollama_outage_uses_rule_fallbacks() -> Result<()> {
    let server = MockServer::start();
    let outage = server.mock(|when, then| {
        when.method(POST).path("/api/chat");
        then.status(503).body("model is loading");
    });

    let orchestrator = orchestrator_for(&server);
    let response = orchestrator
        .process_query(
            UserRole::Manager,
            "Find employees with Java 5+ years, React 2+ years, Angular 3+ years",
            None,
        )
        .await?;

    // selection, context and the consultant each try once
    outage.assert_hits(3);
    assert_eq!(response.selected_agent, AgentKind::StaffingConsultant);
    assert!(response.used_fallback);

    let body = serde_json::to_value(&response)?;
    assert_eq!(body["total_employees_found"], 4);
    assert_eq!(body["matches"][0]["employee_id"], "EMP002");
    Ok(())
}

#[tokio::test]
async fn test_malformed_selection_json_falls_back() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/chat")
            .body_contains("intelligent agent selector");
        then.status(200).json_body(ollama_reply("I think the skill analyst fits best"));
    });

    let orchestrator = orchestrator_for(&server);
    let selection = orchestrator
        .select_agent("How do I improve my Angular skill?", UserRole::Consultant, Some("EMP001"))
        .await;

    assert_eq!(selection.selected_agent, AgentKind::SkillAnalyst);
    assert_eq!(selection.confidence, 0.7);
    Ok(())
}
