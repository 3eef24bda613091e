use anyhow::Result;
use crossterm::event::KeyCode;
use reqwest::Client;
use selfagent::cli::{ApiClient, ChatRole, Effect};
use selfagent::http::{HttpClient, HttpDebugConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    body_snapshot, header_snapshot, input_snapshot, new_harness, press, type_text,
};

fn api_for(server: &MockServer) -> ApiClient {
    ApiClient::new(
        HttpClient::new(Client::new(), HttpDebugConfig::disabled()),
        &format!("{}/api", server.uri()),
    )
}

#[test]
fn initial_render_greets_with_persona() -> Result<()> {
    let harness = new_harness(80, 20)?;

    assert_eq!(header_snapshot(&harness)?, "Work Mode: Tutor");
    let body = body_snapshot(&harness)?;
    assert!(body.starts_with(
        "Hello, I am Bob\nI am your Tutor. How can I help with your work today?"
    ));
    assert!(input_snapshot(&harness)?.contains("Message Bob..."));

    Ok(())
}

#[tokio::test]
async fn sent_message_shows_thinking_then_reply() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Hello there"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut harness = new_harness(80, 20)?;
    type_text(&mut harness, "Hi")?;
    assert!(input_snapshot(&harness)?.contains("Hi"));

    let effect = press(&mut harness, KeyCode::Enter)?.expect("send effect");
    let body = body_snapshot(&harness)?;
    assert!(body.starts_with("you> Hi\nAgent is thinking..."));
    assert!(input_snapshot(&harness)?.contains("Message Bob..."));

    harness.run_effect(&api_for(&server), effect).await?;

    let body = body_snapshot(&harness)?;
    assert!(body.starts_with("you> Hi\nai> Hello there"));
    assert!(!body.contains("Agent is thinking..."));
    assert!(!harness.app().in_flight);

    Ok(())
}

#[tokio::test]
async fn failed_chat_shows_notice_without_ai_message() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "AI processing failed"})),
        )
        .mount(&server)
        .await;

    let mut harness = new_harness(80, 20)?;
    type_text(&mut harness, "Hi")?;
    let effect = press(&mut harness, KeyCode::Enter)?.expect("send effect");
    harness.run_effect(&api_for(&server), effect).await?;

    let body = body_snapshot(&harness)?;
    assert!(body.contains("you> Hi"));
    assert!(body.contains("Agent failed to respond: AI processing failed (HTTP 500)"));
    assert!(!body.contains("ai> "));
    let roles: Vec<_> = harness.app().timeline.messages().map(|m| m.role).collect();
    assert_eq!(roles, vec![ChatRole::User]);

    Ok(())
}

#[test]
fn enter_is_ignored_for_blank_input_and_while_waiting() -> Result<()> {
    let mut harness = new_harness(80, 20)?;

    type_text(&mut harness, "  ")?;
    assert_eq!(press(&mut harness, KeyCode::Enter)?, None);

    type_text(&mut harness, "first")?;
    assert!(matches!(
        press(&mut harness, KeyCode::Enter)?,
        Some(Effect::SendChat { .. })
    ));
    type_text(&mut harness, "second")?;
    assert_eq!(press(&mut harness, KeyCode::Enter)?, None);
    assert!(input_snapshot(&harness)?.contains("second"));

    Ok(())
}
