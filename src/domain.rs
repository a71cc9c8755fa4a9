//! Domain models used by the backend: quiz, question, and where a quiz came from.

use serde::{Deserialize, Serialize};

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// Bounds the HTTP boundary enforces on `questionCount`.
pub const MIN_QUESTIONS: usize = 1;
pub const MAX_QUESTIONS: usize = 20;

/// A single multiple-choice question. `correct_answer` indexes `options`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub question: String,
  pub options: Vec<String>,
  #[serde(rename = "correctAnswer")]
  pub correct_answer: usize,
}

/// A titled, ordered set of questions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
  pub title: String,
  pub questions: Vec<Question>,
}

/// Which path produced a quiz?
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuizOrigin {
  Model,     // generated by the language model and validated
  Fallback,  // built-in bank (model disabled or failed)
  Manual,    // replaced by a client through PUT
}

impl std::fmt::Display for QuizOrigin {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      QuizOrigin::Model => f.write_str("model"),
      QuizOrigin::Fallback => f.write_str("fallback"),
      QuizOrigin::Manual => f.write_str("manual"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn question_uses_camel_case_answer_field() {
    let q = Question {
      question: "2 + 2?".into(),
      options: vec!["3".into(), "4".into(), "5".into(), "22".into()],
      correct_answer: 1,
    };
    let v = serde_json::to_value(&q).expect("serialize");
    assert_eq!(v["correctAnswer"], 1);
    assert!(v.get("correct_answer").is_none());
  }

  #[test]
  fn origin_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&QuizOrigin::Fallback).unwrap(), "\"fallback\"");
    assert_eq!(QuizOrigin::Model.to_string(), "model");
  }
}
