use super::debug::HttpDebugConfig;
use reqwest::{Client, Request};
use serde::Serialize;
use std::fmt;
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// Status and body of a completed exchange. Non-2xx statuses are not errors here;
/// callers decide what they mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponseData {
    pub status: u16,
    pub body: String,
}

impl HttpResponseData {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP shared by the model provider and the terminal client.
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    debug: HttpDebugConfig,
    sink: DebugSink,
}

#[derive(Clone)]
enum DebugSink {
    Tracing,
    #[cfg(test)]
    Memory(Arc<Mutex<Vec<String>>>),
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    pub fn new(inner: Client, debug: HttpDebugConfig) -> Self {
        Self {
            inner,
            debug,
            sink: DebugSink::Tracing,
        }
    }

    #[cfg(test)]
    fn capturing(debug: HttpDebugConfig) -> (Self, Arc<Mutex<Vec<String>>>) {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let client = Self {
            inner: Client::new(),
            debug,
            sink: DebugSink::Memory(Arc::clone(&captured)),
        };
        (client, captured)
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponseData, reqwest::Error> {
        let request = self.inner.get(url).build()?;
        self.send(request, "").await
    }

    /// POSTs `payload` as JSON, with `Authorization: Bearer` when a token is given.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        payload: &T,
    ) -> Result<HttpResponseData, reqwest::Error> {
        let mut builder = self.inner.post(url).json(payload);
        if let Some(token) = bearer_token {
            builder = builder.bearer_auth(token);
        }
        let request = builder.build()?;

        let logged_body = if self.debug.enabled {
            serde_json::to_string(payload).unwrap_or_default()
        } else {
            String::new()
        };
        self.send(request, &logged_body).await
    }

    async fn send(
        &self,
        request: Request,
        logged_body: &str,
    ) -> Result<HttpResponseData, reqwest::Error> {
        if self.debug.enabled {
            self.emit(self.debug.request_lines(
                request.method(),
                request.url(),
                request.headers(),
                logged_body,
            ));
        }

        let response = self.inner.execute(request).await.inspect_err(|err| {
            tracing::warn!(error = %err, "outbound request failed");
        })?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if self.debug.enabled {
            self.emit(self.debug.response_lines(status, &headers, &body));
        }
        Ok(HttpResponseData { status, body })
    }

    fn emit(&self, lines: Vec<String>) {
        match &self.sink {
            // `http_debug` is the opt-in, so these pass the default filter.
            DebugSink::Tracing => {
                for line in lines {
                    tracing::info!(target: "selfagent::http", "{line}");
                }
            }
            #[cfg(test)]
            DebugSink::Memory(captured) => {
                if let Ok(mut captured) = captured.lock() {
                    captured.extend(lines);
                }
            }
        }
    }
}
