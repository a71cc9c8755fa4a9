//! Quiz generation pipeline: prompt -> model -> extract -> validate, with the
//! fallback bank as the universal safety net.
//!
//! Every stage returns an explicit `Result`; `generate` matches each failure kind
//! and turns it into a fallback quiz, so callers always get something usable.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::domain::{Quiz, QuizOrigin};
use crate::extract::{extract, ExtractionFailure};
use crate::fallback::FallbackBank;
use crate::ollama::{ModelClient, TransportFailure};
use crate::prompt::PromptBuilder;
use crate::util::trunc_for_log;
use crate::validate::{validate, ValidationFailure};

const LOG_PREVIEW_BYTES: usize = 400;

#[derive(Debug, Error)]
pub enum GenerationFailure {
  #[error("model disabled")]
  ModelDisabled,
  #[error(transparent)]
  Transport(#[from] TransportFailure),
  #[error(transparent)]
  Extraction(#[from] ExtractionFailure),
  #[error(transparent)]
  Validation(#[from] ValidationFailure),
}

impl GenerationFailure {
  pub fn stage(&self) -> &'static str {
    match self {
      GenerationFailure::ModelDisabled => "disabled",
      GenerationFailure::Transport(_) => "transport",
      GenerationFailure::Extraction(_) => "extraction",
      GenerationFailure::Validation(_) => "validation",
    }
  }
}

/// A quiz plus the path that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedQuiz {
  pub quiz: Quiz,
  pub origin: QuizOrigin,
}

#[derive(Clone)]
pub struct QuizGenerator {
  model: Option<Arc<dyn ModelClient>>,
  prompts: PromptBuilder,
  bank: Arc<FallbackBank>,
}

impl QuizGenerator {
  pub fn new(model: Option<Arc<dyn ModelClient>>, prompts: PromptBuilder, bank: Arc<FallbackBank>) -> Self {
    Self { model, prompts, bank }
  }

  pub fn has_model(&self) -> bool {
    self.model.is_some()
  }

  /// Always resolves to a quiz, reporting which path produced it.
  #[instrument(level = "info", skip(self), fields(%topic, count = count))]
  pub async fn generate(&self, topic: &str, count: usize) -> GeneratedQuiz {
    match self.try_generate(topic, count).await {
      Ok(quiz) => {
        info!(target: "quiz", %topic, served = quiz.questions.len(), origin = "model", "Quiz generated by model");
        GeneratedQuiz { quiz, origin: QuizOrigin::Model }
      }
      Err(failure) => {
        match &failure {
          GenerationFailure::ModelDisabled => {
            debug!(target: "quiz", %topic, "Model disabled; serving fallback");
          }
          GenerationFailure::Transport(e) => {
            warn!(target: "quiz", %topic, stage = failure.stage(), timeout = e.is_timeout(), status = ?e.status_code(), error = %e, "Model call failed; serving fallback");
          }
          GenerationFailure::Extraction(e) => {
            warn!(target: "quiz", %topic, stage = failure.stage(), error = %e, "No JSON in model output; serving fallback");
          }
          GenerationFailure::Validation(e) => {
            warn!(target: "quiz", %topic, stage = failure.stage(), reason = e.reason(), error = %e, "Model quiz failed validation; serving fallback");
          }
        }
        GeneratedQuiz { quiz: self.bank.select(topic, count), origin: QuizOrigin::Fallback }
      }
    }
  }

  /// The pipeline proper, without the safety net.
  pub async fn try_generate(&self, topic: &str, count: usize) -> Result<Quiz, GenerationFailure> {
    let model = self.model.as_ref().ok_or(GenerationFailure::ModelDisabled)?;
    let prompt = self.prompts.build(topic, count);
    let raw = model.complete(&prompt).await?;
    debug!(target: "quiz", model = model.name(), raw = %trunc_for_log(&raw, LOG_PREVIEW_BYTES), "Raw model output");
    let candidate = extract(&raw)?;
    Ok(validate(&candidate, count)?)
  }
}
