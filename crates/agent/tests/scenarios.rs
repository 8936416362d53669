//! End-to-end command scenarios.
//!
//! Each test wires a scripted reasoning provider and the real platform
//! client against a simulated remote store, then drives one command
//! through `AdminAgent`.

use async_trait::async_trait;
use recordpilot_agent::{AdminAgent, IntentResolver, Reasoner};
use recordpilot_core::error::ProviderError;
use recordpilot_core::message::ConversationTurn;
use recordpilot_core::provider::{CompletionRequest, CompletionResponse, Provider};
use recordpilot_platform::{Credentials, PlatformClient, RetryPolicy};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct ScriptedProvider {
    replies: Mutex<Vec<String>>,
    calls: Mutex<usize>,
}

impl ScriptedProvider {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        *self.calls.lock().unwrap() += 1;
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .expect("ScriptedProvider: no more replies");
        Ok(CompletionResponse {
            content: reply,
            model: "mock-model".into(),
            usage: None,
        })
    }
}

fn agent(provider: Arc<ScriptedProvider>) -> AdminAgent {
    let client = PlatformClient::new(
        Credentials::new("admin", "secret"),
        Duration::from_secs(5),
        RetryPolicy::none(),
    )
    .unwrap();
    AdminAgent::new(
        IntentResolver::new(Reasoner::new(provider, "mock-model")),
        Arc::new(client),
    )
}

/// Fails the test on drop if the store sees any request at all.
async fn untouched_store() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn scenario_find_user_by_email() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/sys_user"))
        .and(query_param("sysparm_query", "email=admin@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{
                "sys_id": "6816f79cc0a8016401c5a33be04be441",
                "user_name": "admin",
                "email": "admin@example.com"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ScriptedProvider::new(&[
        "Thought: look the user up by email\nACTION: table_query\nACTION INPUT: sys_user|email=admin@example.com",
    ]);

    let text = agent(provider)
        .execute_command("Find the user with email admin@example.com", &[], &server.uri())
        .await
        .unwrap();

    assert!(text.contains("\"email\": \"admin@example.com\""));
    assert!(text.contains("6816f79cc0a8016401c5a33be04be441"));
}

#[tokio::test]
async fn scenario_find_user_none_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/sys_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ScriptedProvider::new(&[
        "ACTION: table_query\nACTION INPUT: sys_user|email=nobody@example.com",
    ]);

    let text = agent(provider)
        .execute_command("Find the user with email nobody@example.com", &[], &server.uri())
        .await
        .unwrap();

    assert!(text.contains("No records found."));
}

#[tokio::test]
async fn scenario_create_a_ticket_asks_first() {
    let server = untouched_store().await;
    let provider = ScriptedProvider::new(&[]);

    let text = agent(provider.clone())
        .execute_command("Create a ticket", &[], &server.uri())
        .await
        .unwrap();

    assert!(text.contains("Incident"));
    assert!(text.contains("Change Request"));
    assert!(text.ends_with('?'));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn scenario_clarification_answer_then_create() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/now/table/incident"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "result": {"sys_id": "a1b2c3", "number": "INC0010042"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ScriptedProvider::new(&[
        r#"ACTION: create_record
ACTION INPUT: incident|{"short_description": "Email is down", "urgency": "2"}"#,
    ]);
    let history = vec![
        ConversationTurn::operator("Create a ticket"),
        ConversationTurn::system("Did you mean: Incident, Change Request, or Problem?"),
    ];

    let text = agent(provider.clone())
        .execute_command("An incident, email is down", &history, &server.uri())
        .await
        .unwrap();

    assert!(text.contains("INC0010042"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn scenario_create_p1_incident() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/now/table/incident"))
        .and(body_partial_json(json!({"urgency": "1", "impact": "1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "result": {"sys_id": "9d385017c611228701d22104cc95c371", "number": "INC0010001"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ScriptedProvider::new(&[r#"ACTION: create_record
ACTION INPUT: incident|{"short_description": "Server Outage", "urgency": "1", "impact": "1"}"#]);

    let text = agent(provider)
        .execute_command("Create a P1 incident for a Server Outage", &[], &server.uri())
        .await
        .unwrap();

    assert!(text.contains("9d385017c611228701d22104cc95c371"));
    assert!(text.contains("INC0010001"));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(
        body["short_description"]
            .as_str()
            .unwrap()
            .contains("Server Outage")
    );
}

#[tokio::test]
async fn scenario_update_with_two_parts_is_parse_error() {
    let server = untouched_store().await;
    let provider = ScriptedProvider::new(&[
        "ACTION: update_record\nACTION INPUT: incident|{\"state\": \"2\"}",
    ]);

    let text = agent(provider)
        .run_command("Set the incident to In Progress", &[], &server.uri())
        .await;

    assert!(text.starts_with("ParseError: update_record: "), "{text}");
    assert!(!text.contains('\n'));
}

#[tokio::test]
async fn scenario_remote_rejection_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/now/table/incident/abc12345"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "No Record found"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ScriptedProvider::new(&[
        "ACTION: update_record\nACTION INPUT: incident|abc12345|{\"state\": \"2\"}",
    ]);

    let text = agent(provider)
        .run_command("Set incident abc12345 to In Progress", &[], &server.uri())
        .await;

    assert!(text.starts_with("RemoteError: 404 - "), "{text}");
    assert!(text.contains("No Record found"));
}
