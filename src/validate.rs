//! Shape checks that turn an extracted JSON candidate into a typed `Quiz`.
//!
//! Top-level checks run first (`title`, then `questions`); an absent or
//! mistyped top-level field is a `missing_field` failure. Then the question
//! list is truncated to the requested count, then each kept question is
//! checked. Failures name the offending field path, e.g. `questions[1].options`.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{Question, Quiz, OPTION_COUNT};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationFailure {
  #[error("field `{field}` is missing or has the wrong type")]
  MissingField { field: String },
  #[error("invalid field `{field}`: {reason}")]
  InvalidField { field: String, reason: String },
  #[error("quiz has no questions")]
  NoQuestions,
}

impl ValidationFailure {
  /// Short machine-readable reason, handy as a log field.
  pub fn reason(&self) -> &'static str {
    match self {
      ValidationFailure::MissingField { .. } => "missing_field",
      ValidationFailure::InvalidField { .. } => "invalid_field",
      ValidationFailure::NoQuestions => "no_questions",
    }
  }
}

/// Validate `candidate` and keep at most `requested` questions (never pads).
pub fn validate(candidate: &Value, requested: usize) -> Result<Quiz, ValidationFailure> {
  let obj = candidate.as_object().ok_or_else(|| invalid("$", "expected a JSON object"))?;

  let title = match obj.get("title") {
    Some(Value::String(s)) => s,
    _ => return Err(missing("title")),
  };
  let questions = match obj.get("questions") {
    Some(Value::Array(a)) => a,
    _ => return Err(missing("questions")),
  };

  if title.trim().is_empty() {
    return Err(invalid("title", "must not be empty"));
  }

  let kept: Vec<Question> = questions
    .iter()
    .take(requested)
    .enumerate()
    .map(|(i, q)| validate_question(i, q))
    .collect::<Result<_, _>>()?;

  if kept.is_empty() {
    return Err(ValidationFailure::NoQuestions);
  }

  Ok(Quiz { title: title.clone(), questions: kept })
}

fn validate_question(i: usize, v: &Value) -> Result<Question, ValidationFailure> {
  let path = |f: &str| format!("questions[{i}].{f}");
  let obj: &Map<String, Value> = v.as_object().ok_or_else(|| invalid(&format!("questions[{i}]"), "expected an object"))?;

  let question = match obj.get("question") {
    None | Some(Value::Null) => return Err(missing(&path("question"))),
    Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
    Some(Value::String(_)) => return Err(invalid(&path("question"), "must not be empty")),
    Some(_) => return Err(invalid(&path("question"), "expected a string")),
  };

  let options = match obj.get("options") {
    None | Some(Value::Null) => return Err(missing(&path("options"))),
    Some(Value::Array(a)) => a,
    Some(_) => return Err(invalid(&path("options"), "expected an array")),
  };
  if options.len() != OPTION_COUNT {
    return Err(invalid(&path("options"), &format!("expected {OPTION_COUNT} options, got {}", options.len())));
  }
  let options = options
    .iter()
    .map(|o| o.as_str().map(str::to_string))
    .collect::<Option<Vec<_>>>()
    .ok_or_else(|| invalid(&path("options"), "every option must be a string"))?;

  let correct_answer = match obj.get("correctAnswer") {
    None | Some(Value::Null) => return Err(missing(&path("correctAnswer"))),
    Some(Value::Number(n)) => n
      .as_u64()
      .filter(|&n| (n as usize) < OPTION_COUNT)
      .ok_or_else(|| invalid(&path("correctAnswer"), &format!("{n} is not an index in 0..{OPTION_COUNT}")))?,
    Some(_) => return Err(invalid(&path("correctAnswer"), "expected an integer")),
  };

  Ok(Question { question, options, correct_answer: correct_answer as usize })
}

fn missing(field: &str) -> ValidationFailure {
  ValidationFailure::MissingField { field: field.to_string() }
}

fn invalid(field: &str, reason: &str) -> ValidationFailure {
  ValidationFailure::InvalidField { field: field.to_string(), reason: reason.to_string() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn qv(text: &str) -> Value {
    json!({ "question": text, "options": ["a", "b", "c", "d"], "correctAnswer": 0 })
  }

  #[test]
  fn truncates_to_requested_count() {
    let cand = json!({ "title": "T", "questions": [qv("q1"), qv("q2"), qv("q3")] });
    let quiz = validate(&cand, 2).unwrap();
    assert_eq!(quiz.title, "T");
    let texts: Vec<_> = quiz.questions.iter().map(|q| q.question.as_str()).collect();
    assert_eq!(texts, ["q1", "q2"]);
  }

  #[test]
  fn never_pads_short_lists() {
    let cand = json!({ "title": "T", "questions": [qv("only")] });
    assert_eq!(validate(&cand, 5).unwrap().questions.len(), 1);
  }

  #[test]
  fn top_level_fields_checked_in_order() {
    let err = validate(&json!({}), 3).unwrap_err();
    assert_eq!(err, ValidationFailure::MissingField { field: "title".into() });
    assert_eq!(err.reason(), "missing_field");

    let err = validate(&json!({ "title": "T" }), 3).unwrap_err();
    assert_eq!(err, ValidationFailure::MissingField { field: "questions".into() });
  }

  #[test]
  fn mistyped_top_level_fields_count_as_missing() {
    let err = validate(&json!({ "title": 7, "questions": [] }), 3).unwrap_err();
    assert_eq!(err, ValidationFailure::MissingField { field: "title".into() });
    assert_eq!(err.reason(), "missing_field");

    let err = validate(&json!({ "title": "T", "questions": {} }), 3).unwrap_err();
    assert_eq!(err, ValidationFailure::MissingField { field: "questions".into() });
    assert_eq!(err.reason(), "missing_field");
  }

  #[test]
  fn empty_question_list_is_rejected() {
    let err = validate(&json!({ "title": "T", "questions": [] }), 3).unwrap_err();
    assert_eq!(err, ValidationFailure::NoQuestions);
  }

  #[test]
  fn malformed_question_names_its_field() {
    let cand = json!({ "title": "T", "questions": [
      qv("fine"),
      { "question": "bad", "options": ["a", "b"], "correctAnswer": 0 },
    ]});
    let err = validate(&cand, 2).unwrap_err();
    assert!(matches!(err, ValidationFailure::InvalidField { ref field, .. } if field == "questions[1].options"));

    let cand = json!({ "title": "T", "questions": [{ "question": "q", "options": ["a", "b", "c", "d"] }] });
    assert_eq!(
      validate(&cand, 1).unwrap_err(),
      ValidationFailure::MissingField { field: "questions[0].correctAnswer".into() }
    );

    let cand = json!({ "title": "T", "questions": [{ "question": "q", "options": ["a", "b", "c", "d"], "correctAnswer": 4 }] });
    assert!(matches!(validate(&cand, 1).unwrap_err(), ValidationFailure::InvalidField { ref field, .. } if field == "questions[0].correctAnswer"));

    let cand = json!({ "title": "T", "questions": [{ "question": "q", "options": ["a", "b", "c", "d"], "correctAnswer": "1" }] });
    assert!(matches!(validate(&cand, 1).unwrap_err(), ValidationFailure::InvalidField { .. }));
  }

  #[test]
  fn malformed_questions_past_the_cut_are_ignored() {
    let cand = json!({ "title": "T", "questions": [qv("q1"), { "question": "broken" }] });
    assert_eq!(validate(&cand, 1).unwrap().questions.len(), 1);
  }

  #[test]
  fn extra_fields_are_tolerated() {
    let cand = json!({ "title": "T", "difficulty": "easy", "questions": [
      { "question": "q", "options": ["a", "b", "c", "d"], "correctAnswer": 3, "explanation": "because" }
    ]});
    let quiz = validate(&cand, 1).unwrap();
    assert_eq!(quiz.questions[0].correct_answer, 3);
  }
}
