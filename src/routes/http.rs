//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::{rejection::JsonRejection, Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use serde_json::Value;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;
use crate::store::StoredQuiz;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, model_enabled: state.generator.has_model() })
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_quiz(
  State(state): State<Arc<AppState>>,
  body: Result<Json<CreateQuizIn>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateQuizOut>), ApiError> {
  let Json(body) = body?;
  let (topic, count) = check_generation_request(&body.topic, body.question_count)?;
  let stored = create_quiz(&state, &topic, count).await;
  info!(target: "quiz", %topic, count, id = %stored.id, source = %stored.source, "HTTP quiz served");
  Ok((
    StatusCode::CREATED,
    Json(CreateQuizOut {
      success: true,
      message: "Quiz created successfully".into(),
      id: stored.id,
      source: stored.source,
      data: stored.quiz,
    }),
  ))
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_quizzes(State(state): State<Arc<AppState>>) -> Json<Vec<StoredQuiz>> {
  Json(state.quizzes.list().await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<StoredQuiz>, ApiError> {
  state.quizzes.get(&id).await.map(Json).ok_or(ApiError::NotFound(id))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_put_quiz(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<StoredQuiz>, ApiError> {
  let Json(body) = body?;
  let stored = replace_quiz(&state, &id, &body).await?;
  info!(target: "quiz", %id, questions = stored.quiz.questions.len(), "HTTP quiz replaced");
  Ok(Json(stored))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_quiz(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  if state.quizzes.delete(&id).await {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(id))
  }
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_score(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  body: Result<Json<ScoreIn>, JsonRejection>,
) -> Result<Json<ScoreOut>, ApiError> {
  let Json(body) = body?;
  let stored = state.quizzes.get(&id).await.ok_or_else(|| ApiError::NotFound(id.clone()))?;
  let score = score_answers(&stored.quiz, &body.answers);
  info!(target: "quiz", %id, correct = score.correct, total = score.total, percent = score.percent, "HTTP score computed");
  Ok(Json(score))
}
