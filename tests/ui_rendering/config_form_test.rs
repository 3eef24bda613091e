use anyhow::Result;
use crossterm::event::KeyCode;
use reqwest::Client;
use selfagent::agent::Persona;
use selfagent::cli::{ApiClient, Effect, View};
use selfagent::http::{HttpClient, HttpDebugConfig};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    body_snapshot, header_snapshot, new_harness, press, press_ctrl, status_snapshot, type_text,
};

fn api_for(server: &MockServer) -> ApiClient {
    ApiClient::new(
        HttpClient::new(Client::new(), HttpDebugConfig::disabled()),
        &format!("{}/api", server.uri()),
    )
}

#[test]
fn f2_opens_form_with_current_persona() -> Result<()> {
    let mut harness = new_harness(80, 20)?;
    press(&mut harness, KeyCode::F(2))?;

    assert_eq!(header_snapshot(&harness)?, "Configure Agent");
    let body = body_snapshot(&harness)?;
    assert!(body.contains("Agent Name"));
    assert!(body.contains("Bob"));
    assert!(body.contains("Role / Persona"));
    assert!(body.contains("Tutor"));
    assert!(body.contains("Be concise"));
    assert!(status_snapshot(&harness)?.contains("Ctrl-S save"));

    Ok(())
}

#[tokio::test]
async fn saving_switches_to_chat_with_confirmation() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/agent"))
        .and(body_json(json!({
            "name": "Bob", "role": "Reviewer", "instructions": "Be concise"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Bob", "role": "Reviewer", "instructions": "Be concise"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut harness = new_harness(80, 20)?;
    press(&mut harness, KeyCode::F(2))?;
    press(&mut harness, KeyCode::Tab)?;
    for _ in 0.."Tutor".len() {
        press(&mut harness, KeyCode::Backspace)?;
    }
    type_text(&mut harness, "Reviewer")?;

    let effect = press_ctrl(&mut harness, 's')?.expect("save effect");
    assert_eq!(
        effect,
        Effect::SavePersona(Persona::new("Bob", "Reviewer", "Be concise"))
    );
    harness.run_effect(&api_for(&server), effect).await?;

    assert_eq!(harness.app().view, View::Chat);
    assert_eq!(header_snapshot(&harness)?, "Work Mode: Reviewer");
    assert!(
        status_snapshot(&harness)?.starts_with("Agent Updated! It will now behave differently.")
    );

    Ok(())
}

#[tokio::test]
async fn failed_save_stays_on_form() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/agent"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "Agent store unavailable"})),
        )
        .mount(&server)
        .await;

    let mut harness = new_harness(80, 20)?;
    press(&mut harness, KeyCode::F(2))?;
    let effect = press_ctrl(&mut harness, 's')?.expect("save effect");
    harness.run_effect(&api_for(&server), effect).await?;

    assert_eq!(harness.app().view, View::Config);
    assert_eq!(header_snapshot(&harness)?, "Configure Agent");
    assert!(status_snapshot(&harness)?.contains("Agent store unavailable"));

    Ok(())
}
