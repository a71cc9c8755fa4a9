//! Minimal Ollama chat client for quiz generation.
//!
//! One non-streaming `POST {base_url}/api/chat` per call, prompt as the sole
//! user message, bounded by a timeout. When the bound is hit the request future
//! is dropped, which cancels the in-flight request. No retries.
//!
//! Calls are instrumented and log model name, latency and response size (not contents).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::config::ModelSettings;

#[derive(Debug, Error)]
pub enum TransportFailure {
  #[error("model call timed out after {0:?}")]
  Timeout(Duration),
  #[error("model backend returned HTTP {status}: {body}")]
  Status { status: u16, body: String },
  #[error("model request failed: {0}")]
  Request(String),
  #[error("could not decode model response: {0}")]
  Decode(String),
  #[error("model response had no text")]
  MissingText,
}

impl TransportFailure {
  pub fn is_timeout(&self) -> bool {
    matches!(self, TransportFailure::Timeout(_))
  }

  pub fn status_code(&self) -> Option<u16> {
    match self {
      TransportFailure::Status { status, .. } => Some(*status),
      _ => None,
    }
  }
}

/// Anything that turns a prompt into raw model text.
#[async_trait]
pub trait ModelClient: Send + Sync {
  async fn complete(&self, prompt: &str) -> Result<String, TransportFailure>;

  /// Short label for logs.
  fn name(&self) -> &str;
}

#[derive(Clone, Debug)]
pub struct OllamaClient {
  client: reqwest::Client,
  pub base_url: String,
  pub model: String,
  pub timeout: Duration,
}

impl OllamaClient {
  /// Construct the client unless the model is disabled; a client that fails to build is logged and skipped.
  pub fn from_settings(settings: &ModelSettings) -> Option<Self> {
    if !settings.enabled {
      return None;
    }
    match reqwest::Client::builder().build() {
      Ok(client) => Some(Self::with_client(client, settings)),
      Err(e) => {
        error!(target: "quizgen_backend", error = %e, "Failed to build HTTP client for Ollama");
        None
      }
    }
  }

  pub fn with_client(client: reqwest::Client, settings: &ModelSettings) -> Self {
    Self {
      client,
      base_url: settings.base_url.trim_end_matches('/').to_string(),
      model: settings.model.clone(),
      timeout: settings.timeout,
    }
  }

  async fn chat(&self, prompt: &str) -> Result<String, TransportFailure> {
    let url = format!("{}/api/chat", self.base_url);
    let req = ChatRequest {
      model: &self.model,
      messages: vec![ChatMessageReq { role: "user", content: prompt }],
      stream: false,
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "quizgen-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let body = extract_ollama_error(&body).unwrap_or(body);
      return Err(TransportFailure::Status { status, body });
    }

    let body: ChatResponse = res.json().await.map_err(|e| TransportFailure::Decode(e.to_string()))?;
    body.text().ok_or(TransportFailure::MissingText)
  }
}

#[async_trait]
impl ModelClient for OllamaClient {
  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn complete(&self, prompt: &str) -> Result<String, TransportFailure> {
    let start = Instant::now();
    let result = bounded(self.timeout, self.chat(prompt)).await;
    let elapsed = start.elapsed();
    match &result {
      Ok(text) => info!(?elapsed, response_len = text.len(), "Model response received"),
      Err(e) => error!(?elapsed, error = %e, "Model call failed"),
    }
    result
  }

  fn name(&self) -> &str {
    &self.model
  }
}

/// Runs `call` for at most `limit`. On expiry the call future is dropped, not detached.
async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, TransportFailure>
where
  F: std::future::Future<Output = Result<T, TransportFailure>>,
{
  match tokio::time::timeout(limit, call).await {
    Ok(r) => r,
    Err(_) => Err(TransportFailure::Timeout(limit)),
  }
}

impl From<reqwest::Error> for TransportFailure {
  fn from(e: reqwest::Error) -> Self {
    TransportFailure::Request(e.to_string())
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessageReq<'a>>,
  stream: bool,
}
#[derive(Serialize)]
struct ChatMessageReq<'a> { role: &'a str, content: &'a str }

/// `/api/chat` answers with `message.content`; `/api/generate`-style bodies use `response`.
#[derive(Deserialize)]
struct ChatResponse {
  #[serde(default)] message: Option<ChatMessageResp>,
  #[serde(default)] response: Option<String>,
}
#[derive(Deserialize)]
struct ChatMessageResp { #[serde(default)] content: Option<String> }

impl ChatResponse {
  fn text(self) -> Option<String> {
    self.message
      .and_then(|m| m.content)
      .filter(|s| !s.trim().is_empty())
      .or(self.response)
      .filter(|s| !s.trim().is_empty())
  }
}

/// Ollama reports errors as `{"error": "..."}`.
fn extract_ollama_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EObj { error: String }
  serde_json::from_str::<EObj>(body).ok().map(|e| e.error)
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::{http::StatusCode, routing::post, Json, Router};
  use serde_json::{json, Value};
  use std::sync::atomic::{AtomicBool, Ordering};
  use std::sync::Arc;
  use tokio::net::TcpListener;

  /// Sets its flag when dropped, i.e. when the future holding it is cancelled or finishes.
  struct DropFlag(Arc<AtomicBool>);

  impl Drop for DropFlag {
    fn drop(&mut self) {
      self.0.store(true, Ordering::SeqCst);
    }
  }

  async fn wait_for(flag: &AtomicBool, within: Duration) -> bool {
    let deadline = Instant::now() + within;
    while Instant::now() < deadline {
      if flag.load(Ordering::SeqCst) {
        return true;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    flag.load(Ordering::SeqCst)
  }

  async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
      axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
  }

  fn client_for(base_url: String, timeout: Duration) -> OllamaClient {
    OllamaClient::from_settings(&ModelSettings {
      enabled: true,
      base_url,
      model: "quiz-test".into(),
      timeout,
    })
    .expect("client")
  }

  #[tokio::test]
  async fn sends_single_user_message_without_streaming() {
    let app = Router::new().route("/api/chat", post(|Json(body): Json<Value>| async move {
      let echo = format!(
        "{}|{}|{}|{}",
        body["model"].as_str().unwrap_or_default(),
        body["stream"],
        body["messages"].as_array().map(|m| m.len()).unwrap_or_default(),
        body["messages"][0]["content"].as_str().unwrap_or_default(),
      );
      assert_eq!(body["messages"][0]["role"], "user");
      Json(json!({ "model": "quiz-test", "message": { "role": "assistant", "content": echo }, "done": true }))
    }));
    let client = client_for(serve(app).await, Duration::from_secs(5));
    let text = client.complete("make a quiz").await.expect("ok");
    assert_eq!(text, "quiz-test|false|1|make a quiz");
  }

  #[tokio::test]
  async fn falls_back_to_response_field() {
    let app = Router::new().route("/api/chat", post(|| async { Json(json!({ "response": "{\"title\":\"T\"}" })) }));
    let client = client_for(serve(app).await, Duration::from_secs(5));
    assert_eq!(client.complete("p").await.expect("ok"), "{\"title\":\"T\"}");
  }

  #[tokio::test]
  async fn error_status_is_reported_with_code() {
    let app = Router::new().route("/api/chat", post(|| async {
      (StatusCode::NOT_FOUND, Json(json!({ "error": "model 'quiz-test' not found" })))
    }));
    let client = client_for(serve(app).await, Duration::from_secs(5));
    let err = client.complete("p").await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert!(err.to_string().contains("not found"));
  }

  #[tokio::test]
  async fn expired_bound_drops_the_call() {
    let dropped = Arc::new(AtomicBool::new(false));
    let finished = Arc::new(AtomicBool::new(false));
    let call = {
      let (dropped, finished) = (dropped.clone(), finished.clone());
      async move {
        let _guard = DropFlag(dropped);
        tokio::time::sleep(Duration::from_secs(5)).await;
        finished.store(true, Ordering::SeqCst);
        Ok::<_, TransportFailure>("late".to_string())
      }
    };
    let err = bounded(Duration::from_millis(20), call).await.unwrap_err();
    assert!(err.is_timeout());
    assert!(dropped.load(Ordering::SeqCst), "call future should be dropped on timeout");
    assert!(!finished.load(Ordering::SeqCst));
  }

  #[tokio::test]
  async fn bound_passes_through_fast_results() {
    let out = bounded(Duration::from_secs(1), async { Ok::<_, TransportFailure>(7) }).await;
    assert_eq!(out.expect("in time"), 7);
  }

  #[tokio::test]
  async fn slow_backend_times_out_and_request_is_cancelled() {
    let dropped = Arc::new(AtomicBool::new(false));
    let finished = Arc::new(AtomicBool::new(false));
    let app = {
      let (dropped, finished) = (dropped.clone(), finished.clone());
      Router::new().route("/api/chat", post(move |Json(_): Json<Value>| {
        let (dropped, finished) = (dropped.clone(), finished.clone());
        async move {
          let _guard = DropFlag(dropped);
          tokio::time::sleep(Duration::from_secs(5)).await;
          finished.store(true, Ordering::SeqCst);
          Json(json!({ "response": "too late" }))
        }
      }))
    };
    let client = client_for(serve(app).await, Duration::from_millis(100));
    let start = Instant::now();
    let err = client.complete("p").await.unwrap_err();
    assert!(err.is_timeout(), "got {err:?}");
    assert!(start.elapsed() < Duration::from_secs(3));
    // The client drops the connection; the server then abandons the handler.
    assert!(wait_for(&dropped, Duration::from_secs(2)).await, "in-flight request was not cancelled");
    assert!(!finished.load(Ordering::SeqCst));
  }

  #[tokio::test]
  async fn empty_text_is_missing() {
    let app = Router::new().route("/api/chat", post(|| async { Json(json!({ "message": { "content": "  " } })) }));
    let client = client_for(serve(app).await, Duration::from_secs(5));
    assert!(matches!(client.complete("p").await, Err(TransportFailure::MissingText)));
  }

  #[tokio::test]
  async fn unreachable_backend_is_a_request_failure() {
    // bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = client_for(format!("http://{addr}"), Duration::from_secs(5));
    assert!(matches!(client.complete("p").await, Err(TransportFailure::Request(_))));
  }

  #[test]
  fn disabled_settings_build_no_client() {
    let settings = ModelSettings {
      enabled: false,
      base_url: "http://localhost:11434".into(),
      model: "m".into(),
      timeout: Duration::from_secs(1),
    };
    assert!(OllamaClient::from_settings(&settings).is_none());
  }
}
