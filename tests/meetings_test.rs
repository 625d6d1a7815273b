use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::Router;
use axum_test::TestServer;
use confab::services::llm::{LlmError, SummaryModel};
use confab::services::summarizer::Summarizer;
use confab::{config, modules, AppState};
use serde_json::json;

struct StubModel;

#[async_trait]
impl SummaryModel for StubModel {
    async fn generate(&self, _system_prompt: &str, _prompt: &str) -> Result<String, LlmError> {
        Ok("stub summary".to_string())
    }
}

async fn setup_test_server() -> TestServer {
    dotenvy::dotenv().ok();

    let db = config::database::connect().await;
    let redis = config::redis::connect().await;
    let summarizer = Summarizer::new(db.clone(), redis.clone(), Arc::new(StubModel));

    let state = AppState { db, redis, summarizer };

    let app = Router::new()
        .merge(modules::agents::routes::routes())
        .merge(modules::meetings::routes::routes())
        .with_state(state);

    TestServer::new(app).unwrap()
}

async fn create_agent(server: &TestServer) -> String {
    let response = server
        .post("/api/agents")
        .json(&json!({
            "name": "Meeting Fixture Agent",
            "instructions": "Assist with the meeting.",
            "user_id": "user-1"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_meeting_starts_pending_with_no_summary() {
    let server = setup_test_server().await;
    let agent_id = create_agent(&server).await;

    let response = server
        .post("/api/meetings")
        .json(&json!({
            "name": "Weekly sync",
            "user_id": "user-1",
            "agent_id": agent_id
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert!(!body["id"].as_str().unwrap().is_empty());
    assert_eq!(body["name"], "Weekly sync");
    assert_eq!(body["status"], "pending");
    assert!(body["summary"].is_null());
    assert!(body["transcript_url"].is_null());
}

#[tokio::test]
async fn test_create_meeting_unknown_agent_fails() {
    let server = setup_test_server().await;

    let response = server
        .post("/api/meetings")
        .json(&json!({
            "name": "Weekly sync",
            "user_id": "user-1",
            "agent_id": "no-such-agent"
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_meeting_empty_name_fails() {
    let server = setup_test_server().await;

    let response = server
        .post("/api/meetings")
        .json(&json!({
            "name": "",
            "user_id": "user-1",
            "agent_id": "a1"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_meeting_not_found() {
    let server = setup_test_server().await;

    let response = server.get("/api/meetings/does-not-exist").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_meetings_with_status_filter() {
    let server = setup_test_server().await;
    let agent_id = create_agent(&server).await;

    server
        .post("/api/meetings")
        .json(&json!({
            "name": "Filtered meeting",
            "user_id": "user-1",
            "agent_id": agent_id
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.get("/api/meetings?status=pending").await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    let data = body["data"].as_array().unwrap();
    assert!(!data.is_empty());
    assert!(data.iter().all(|m| m["status"] == "pending"));
}

#[tokio::test]
async fn test_list_meetings_invalid_status_fails() {
    let server = setup_test_server().await;

    let response = server.get("/api/meetings?status=archived").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_meetings_by_agent() {
    let server = setup_test_server().await;
    let agent_id = create_agent(&server).await;

    server
        .post("/api/meetings")
        .json(&json!({
            "name": "Agent-scoped meeting",
            "user_id": "user-1",
            "agent_id": agent_id
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .get(&format!("/api/meetings?agent_id={}", agent_id))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["agent_id"], agent_id.as_str());
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_update_meeting_status() {
    let server = setup_test_server().await;
    let agent_id = create_agent(&server).await;

    let create_response = server
        .post("/api/meetings")
        .json(&json!({
            "name": "To cancel",
            "user_id": "user-1",
            "agent_id": agent_id
        }))
        .await;

    create_response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = create_response.json();
    let id = created["id"].as_str().unwrap();

    let update_response = server
        .put(&format!("/api/meetings/{}", id))
        .json(&json!({ "status": "cancelled" }))
        .await;

    update_response.assert_status(StatusCode::OK);

    let get_response = server.get(&format!("/api/meetings/{}", id)).await;
    let fetched: serde_json::Value = get_response.json();
    assert_eq!(fetched["status"], "cancelled");
}

#[tokio::test]
async fn test_update_meeting_invalid_status_fails() {
    let server = setup_test_server().await;

    let response = server
        .put("/api/meetings/some-id")
        .json(&json!({ "status": "archived" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_meeting() {
    let server = setup_test_server().await;
    let agent_id = create_agent(&server).await;

    let create_response = server
        .post("/api/meetings")
        .json(&json!({
            "name": "To delete",
            "user_id": "user-1",
            "agent_id": agent_id
        }))
        .await;

    create_response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = create_response.json();
    let id = created["id"].as_str().unwrap();

    let delete_response = server.delete(&format!("/api/meetings/{}", id)).await;
    delete_response.assert_status(StatusCode::OK);

    let get_response = server.get(&format!("/api/meetings/{}", id)).await;
    get_response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_processing_webhook_unknown_meeting_fails() {
    let server = setup_test_server().await;

    let response = server
        .post("/api/webhooks/processing")
        .json(&json!({
            "meeting_id": "does-not-exist",
            "transcript_url": "http://127.0.0.1:9/transcript.jsonl"
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_processing_webhook_invalid_url_fails() {
    let server = setup_test_server().await;

    let response = server
        .post("/api/webhooks/processing")
        .json(&json!({
            "meeting_id": "m1",
            "transcript_url": "not a url"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_processing_webhook_accepts_and_marks_processing() {
    let server = setup_test_server().await;
    let agent_id = create_agent(&server).await;

    let create_response = server
        .post("/api/meetings")
        .json(&json!({
            "name": "Processed meeting",
            "user_id": "user-1",
            "agent_id": agent_id
        }))
        .await;

    create_response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = create_response.json();
    let id = created["id"].as_str().unwrap();

    // Unreachable transcript URL: the webhook still accepts, the
    // background run fails, and the meeting stays in processing.
    let response = server
        .post("/api/webhooks/processing")
        .json(&json!({
            "meeting_id": id,
            "transcript_url": "http://127.0.0.1:9/transcript.jsonl"
        }))
        .await;

    response.assert_status(StatusCode::ACCEPTED);

    let get_response = server.get(&format!("/api/meetings/{}", id)).await;
    let fetched: serde_json::Value = get_response.json();
    assert_eq!(fetched["status"], "processing");
    assert!(!fetched["transcript_url"].is_null());
}
