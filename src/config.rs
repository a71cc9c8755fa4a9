//! Loading agent configuration (prompt template + model settings) from TOML,
//! and the environment-driven settings layered on top of it.
//!
//! Example file:
//! ```toml
//! [prompts]
//! quiz_user_template = "Write {count} questions about {topic} ..."
//!
//! [model]
//! base_url = "http://localhost:11434"
//! model = "llama3.2"
//! timeout_secs = 25
//! ```
//! Environment variables win over the file.

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 25;
pub const DEFAULT_CORS_ORIGINS: [&str; 4] = [
  "http://localhost:5173",
  "http://localhost:3000",
  "http://127.0.0.1:5173",
  "http://127.0.0.1:3000",
];

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AgentConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub model: ModelCfg,
}

/// Optional model overrides accepted in TOML.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct ModelCfg {
  #[serde(default)] pub base_url: Option<String>,
  #[serde(default)] pub model: Option<String>,
  #[serde(default)] pub timeout_secs: Option<u64>,
  #[serde(default)] pub enabled: Option<bool>,
}

/// Prompt sent to the model. `{topic}` and `{count}` are substituted.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  pub quiz_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      quiz_user_template: concat!(
        "Create a multiple-choice quiz with exactly {count} questions about \"{topic}\".\n",
        "Respond with ONLY a JSON object in exactly this shape:\n",
        "{\n",
        "  \"title\": \"<quiz title>\",\n",
        "  \"questions\": [\n",
        "    {\n",
        "      \"question\": \"<question text>\",\n",
        "      \"options\": [\"<option A>\", \"<option B>\", \"<option C>\", \"<option D>\"],\n",
        "      \"correctAnswer\": <index of the correct option, 0-3>\n",
        "    }\n",
        "  ]\n",
        "}\n",
        "Rules:\n",
        "- \"questions\" must contain exactly {count} items.\n",
        "- Every question has exactly 4 options and one correct answer.\n",
        "- \"correctAnswer\" is a number from 0 to 3.\n",
        "- Do not add explanations, markdown, code fences or any text outside the JSON object.",
      )
      .into(),
    }
  }
}

/// Resolved model connection settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelSettings {
  pub enabled: bool,
  pub base_url: String,
  pub model: String,
  pub timeout: Duration,
}

impl ModelSettings {
  /// Env > TOML > defaults.
  pub fn resolve(cfg: &ModelCfg, env: impl Fn(&str) -> Option<String>) -> Self {
    let enabled = env("OLLAMA_ENABLED")
      .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "off" | "no"))
      .or(cfg.enabled)
      .unwrap_or(true);
    let base_url = env("OLLAMA_BASE_URL")
      .or_else(|| cfg.base_url.clone())
      .unwrap_or_else(|| DEFAULT_BASE_URL.into())
      .trim_end_matches('/')
      .to_string();
    let model = env("OLLAMA_MODEL")
      .or_else(|| cfg.model.clone())
      .unwrap_or_else(|| DEFAULT_MODEL.into());
    let timeout_secs = match env("OLLAMA_TIMEOUT_SECS") {
      Some(raw) => match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(secs),
        _ => {
          warn!(target: "quizgen_backend", %raw, "Ignoring invalid OLLAMA_TIMEOUT_SECS");
          None
        }
      },
      None => None,
    };
    let timeout_secs = timeout_secs.or(cfg.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS);

    Self { enabled, base_url, model, timeout: Duration::from_secs(timeout_secs) }
  }

  pub fn from_env(cfg: &ModelCfg) -> Self {
    Self::resolve(cfg, |k| std::env::var(k).ok())
  }
}

/// CORS origins from CORS_ORIGINS (comma separated), else the local dev origins.
pub fn cors_origins_from_env() -> Vec<String> {
  parse_origins(std::env::var("CORS_ORIGINS").ok().as_deref())
}

fn parse_origins(raw: Option<&str>) -> Vec<String> {
  let parsed: Vec<String> = raw
    .unwrap_or_default()
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect();
  if parsed.is_empty() {
    DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()
  } else {
    parsed
  }
}

/// Attempt to load `AgentConfig` from AGENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_agent_config_from_env() -> Option<AgentConfig> {
  let path = std::env::var("AGENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AgentConfig>(&s) {
      Ok(cfg) => {
        info!(target: "quizgen_backend", %path, "Loaded agent config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quizgen_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quizgen_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |k| map.get(k).cloned()
  }

  #[test]
  fn defaults_without_env_or_file() {
    let s = ModelSettings::resolve(&ModelCfg::default(), env_of(&[]));
    assert!(s.enabled);
    assert_eq!(s.base_url, DEFAULT_BASE_URL);
    assert_eq!(s.model, DEFAULT_MODEL);
    assert_eq!(s.timeout, Duration::from_secs(25));
  }

  #[test]
  fn env_wins_over_file() {
    let cfg = ModelCfg {
      base_url: Some("http://file:1".into()),
      model: Some("from-file".into()),
      timeout_secs: Some(5),
      enabled: Some(true),
    };
    let s = ModelSettings::resolve(&cfg, env_of(&[
      ("OLLAMA_MODEL", "from-env"),
      ("OLLAMA_BASE_URL", "http://env:2/"),
      ("OLLAMA_ENABLED", "off"),
    ]));
    assert_eq!(s.model, "from-env");
    assert_eq!(s.base_url, "http://env:2");
    assert_eq!(s.timeout, Duration::from_secs(5));
    assert!(!s.enabled);
  }

  #[test]
  fn invalid_timeout_falls_back() {
    let s = ModelSettings::resolve(&ModelCfg::default(), env_of(&[("OLLAMA_TIMEOUT_SECS", "soon")]));
    assert_eq!(s.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    let s = ModelSettings::resolve(&ModelCfg::default(), env_of(&[("OLLAMA_TIMEOUT_SECS", "0")]));
    assert_eq!(s.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
  }

  #[test]
  fn toml_overrides_parse() {
    let cfg: AgentConfig = toml::from_str(
      "[prompts]\nquiz_user_template = \"{count} about {topic}\"\n[model]\nmodel = \"mistral\"\ntimeout_secs = 10\n",
    )
    .expect("toml");
    assert_eq!(cfg.prompts.quiz_user_template, "{count} about {topic}");
    assert_eq!(cfg.model.model.as_deref(), Some("mistral"));
    assert_eq!(cfg.model.timeout_secs, Some(10));
  }

  #[test]
  fn cors_origins_parse() {
    assert_eq!(parse_origins(None).len(), 4);
    assert_eq!(parse_origins(Some(" ")).len(), 4);
    assert_eq!(parse_origins(Some("http://a.test, http://b.test")), vec!["http://a.test", "http://b.test"]);
  }
}
