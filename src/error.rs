//! HTTP error type. Pipeline failures never get here (they end in a fallback
//! quiz); this only covers bad requests and unknown ids.

use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;
use tracing::warn;

use crate::protocol::ErrorOut;
use crate::validate::ValidationFailure;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),
  #[error("quiz '{0}' not found")]
  NotFound(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    warn!(target: "quizgen_backend", %status, error = %self, "Request rejected");
    (status, Json(ErrorOut { success: false, message: self.to_string() })).into_response()
  }
}

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self {
    ApiError::BadRequest(e.body_text())
  }
}

impl From<ValidationFailure> for ApiError {
  fn from(e: ValidationFailure) -> Self {
    ApiError::BadRequest(e.to_string())
  }
}
