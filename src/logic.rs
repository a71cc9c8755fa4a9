//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Bounds-checking generation requests (the pipeline itself trusts its input)
//!   - Generating + storing a quiz
//!   - Replacing a stored quiz with a client-supplied one (same shape rules as model
//!     output, at most MAX_QUESTIONS questions)
//!   - Scoring a set of answers

use serde_json::Value;
use tracing::{info, instrument};

use crate::domain::{Quiz, QuizOrigin, MAX_QUESTIONS, MIN_QUESTIONS};
use crate::error::ApiError;
use crate::protocol::ScoreOut;
use crate::state::AppState;
use crate::store::StoredQuiz;
use crate::validate::validate;

/// Non-blank topic, count within bounds. Returns the trimmed topic and the count.
pub fn check_generation_request(topic: &str, count: i64) -> Result<(String, usize), ApiError> {
  let topic = topic.trim();
  if topic.is_empty() {
    return Err(ApiError::BadRequest("Please enter a topic".into()));
  }
  if count < MIN_QUESTIONS as i64 || count > MAX_QUESTIONS as i64 {
    return Err(ApiError::BadRequest(format!(
      "Please enter a number of questions between {MIN_QUESTIONS} and {MAX_QUESTIONS}"
    )));
  }
  Ok((topic.to_string(), count as usize))
}

#[instrument(level = "info", skip(state), fields(%topic, count = count))]
pub async fn create_quiz(state: &AppState, topic: &str, count: usize) -> StoredQuiz {
  let generated = state.generator.generate(topic, count).await;
  let origin = generated.origin;
  let stored = state.quizzes.create(generated.quiz, origin).await;
  info!(target: "quiz", id = %stored.id, %origin, questions = stored.quiz.questions.len(), "Quiz created");
  stored
}

#[instrument(level = "info", skip(state, body), fields(%id))]
pub async fn replace_quiz(state: &AppState, id: &str, body: &Value) -> Result<StoredQuiz, ApiError> {
  let supplied = body.get("questions").and_then(Value::as_array).map_or(0, Vec::len);
  if supplied > MAX_QUESTIONS {
    return Err(ApiError::BadRequest(format!(
      "A quiz can have at most {MAX_QUESTIONS} questions (got {supplied})"
    )));
  }
  let quiz = validate(body, MAX_QUESTIONS)?;
  state
    .quizzes
    .update(id, quiz, QuizOrigin::Manual)
    .await
    .ok_or_else(|| ApiError::NotFound(id.to_string()))
}

/// Percentage of matching answers, rounded. Extra answers are ignored, missing ones count as wrong.
pub fn score_answers(quiz: &Quiz, answers: &[Option<usize>]) -> ScoreOut {
  let total = quiz.questions.len();
  let correct = quiz
    .questions
    .iter()
    .zip(answers)
    .filter(|(q, a)| **a == Some(q.correct_answer))
    .count();
  let percent = if total == 0 { 0 } else { ((correct as f64 / total as f64) * 100.0).round() as u32 };
  ScoreOut { correct, total, percent }
}
