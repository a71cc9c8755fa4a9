//! Quizgen · Quiz Generator Backend
//!
//! - Axum HTTP API: generate a multiple-choice quiz for a topic, keep created quizzes in memory
//! - Local model via Ollama; built-in fallback quizzes whenever the model fails
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   OLLAMA_BASE_URL     : default "http://localhost:11434"
//!   OLLAMA_MODEL        : default "llama3.2"
//!   OLLAMA_TIMEOUT_SECS : per-generation bound, default 25
//!   OLLAMA_ENABLED      : "false"/"0"/"off" serves fallback quizzes only
//!   CORS_ORIGINS        : comma-separated allowed origins (default: local dev origins)
//!   AGENT_CONFIG_PATH   : path to TOML config (prompt template + model overrides)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod config;
mod domain;
mod error;
mod extract;
mod fallback;
mod generator;
mod logic;
mod ollama;
mod prompt;
mod protocol;
mod routes;
mod state;
mod store;
mod telemetry;
mod util;
mod validate;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared application state (quiz generator, in-memory quiz list).
  let state = Arc::new(AppState::new());

  // HTTP router with routes, CORS and tracing layers.
  let app = build_router(state);

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "quizgen_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "quizgen_backend", "HTTP server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(target: "quizgen_backend", error = %e, "Failed to listen for Ctrl-C; running until killed");
    std::future::pending::<()>().await;
  }
  info!(target: "quizgen_backend", "Shutdown signal received");
}
