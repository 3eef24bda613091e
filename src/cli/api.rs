use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::agent::Persona;
use crate::http::{HttpClient, HttpResponseData};

/// Talks to the selfagent HTTP API on behalf of the terminal client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatPayload<'a> {
    message: &'a str,
    #[serde(rename = "agentConfig")]
    agent_config: &'a Persona,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    reply: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiClient {
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    pub async fn get_agent(&self) -> Result<Persona> {
        let url = self.url("agent");
        let resp = self
            .http
            .get(&url)
            .await
            .with_context(|| format!("GET {url} failed"))?;
        decode(resp)
    }

    pub async fn save_agent(&self, persona: &Persona) -> Result<Persona> {
        let url = self.url("agent");
        let resp = self
            .http
            .post_json(&url, None, persona)
            .await
            .with_context(|| format!("POST {url} failed"))?;
        decode(resp)
    }

    pub async fn chat(&self, message: &str, persona: &Persona) -> Result<String> {
        let url = self.url("chat");
        let payload = ChatPayload {
            message,
            agent_config: persona,
        };
        let resp = self
            .http
            .post_json(&url, None, &payload)
            .await
            .with_context(|| format!("POST {url} failed"))?;
        decode::<ChatReply>(resp).map(|body| body.reply)
    }
}

fn decode<T: DeserializeOwned>(resp: HttpResponseData) -> Result<T> {
    if !resp.is_success() {
        match serde_json::from_str::<ErrorBody>(&resp.body) {
            Ok(body) => bail!("{} (HTTP {})", body.error, resp.status),
            Err(_) => bail!("HTTP {}", resp.status),
        }
    }
    serde_json::from_str(&resp.body).context("unexpected response body")
}
