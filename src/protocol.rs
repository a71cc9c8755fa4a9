//! Public protocol structs for the HTTP endpoints (serde ready).
//! Field names follow what the front end already sends and reads (camelCase).

use serde::{Deserialize, Serialize};

use crate::domain::{Quiz, QuizOrigin};

/// Default when the client omits `questionCount` (matches the front end's initial value).
pub const DEFAULT_QUESTION_COUNT: i64 = 5;

fn default_question_count() -> i64 { DEFAULT_QUESTION_COUNT }

#[derive(Debug, Deserialize)]
pub struct CreateQuizIn {
  pub topic: String,
  #[serde(rename = "questionCount", default = "default_question_count")]
  pub question_count: i64,
}

#[derive(Debug, Serialize)]
pub struct CreateQuizOut {
  pub success: bool,
  pub message: String,
  pub id: String,
  pub source: QuizOrigin,
  pub data: Quiz,
}

#[derive(Debug, Deserialize)]
pub struct ScoreIn {
  /// Selected option per question, in order; `null` for unanswered.
  pub answers: Vec<Option<usize>>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ScoreOut {
  pub correct: usize,
  pub total: usize,
  pub percent: u32,
}

#[derive(Serialize)]
pub struct HealthOut {
  pub ok: bool,
  #[serde(rename = "modelEnabled")]
  pub model_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
  pub success: bool,
  pub message: String,
}
