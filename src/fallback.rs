//! Built-in fallback quizzes.
//!
//! The bank is the safety net of the generation pipeline: whenever the model is
//! disabled, unreachable, or answers with something we cannot use, the quiz is
//! served from here. Buckets are keyed by topic keywords and every entry is a
//! complete, valid question. Built once at startup, read-only afterwards.

use tracing::{debug, instrument};

use crate::domain::{Question, Quiz};
use crate::util::capitalize_first;

/// Topic buckets, in match priority order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Bucket {
  #[default]
  JavaScript,
  Python,
  History,
}

impl Bucket {
  /// Case-insensitive keyword match. Unmatched topics land in the default bucket.
  pub fn for_topic(topic: &str) -> Bucket {
    let t = topic.to_lowercase();
    if t.contains("javascript") || t.contains("js") {
      Bucket::JavaScript
    } else if t.contains("python") {
      Bucket::Python
    } else if t.contains("history") || t.contains("world war") || t.contains("ancient") {
      Bucket::History
    } else {
      Bucket::default()
    }
  }
}

#[derive(Clone, Debug)]
pub struct FallbackBank {
  javascript: Vec<Question>,
  python: Vec<Question>,
  history: Vec<Question>,
}

impl FallbackBank {
  /// The built-in bank: five questions per bucket.
  pub fn builtin() -> Self {
    Self {
      javascript: vec![
        q("Which keyword declares a block-scoped variable that cannot be reassigned?", ["var", "let", "const", "static"], 2),
        q("What does `typeof null` return in JavaScript?", ["\"null\"", "\"object\"", "\"undefined\"", "\"number\""], 1),
        q("Which method adds one or more elements to the end of an array?", ["push()", "pop()", "shift()", "concat()"], 0),
        q("What is the result of `2 + \"2\"` in JavaScript?", ["4", "\"22\"", "NaN", "TypeError"], 1),
        q("Which operator checks both value and type equality?", ["==", "=", "===", "!="], 2),
      ],
      python: vec![
        q("Which keyword defines a function in Python?", ["func", "def", "function", "lambda"], 1),
        q("What is the output of `len([1, 2, 3])`?", ["2", "3", "4", "Error"], 1),
        q("Which of these types is immutable?", ["list", "dict", "set", "tuple"], 3),
        q("How do you start a comment in Python?", ["//", "<!--", "#", "--"], 2),
        q("What does `range(3)` produce when converted to a list?", ["[1, 2, 3]", "[0, 1, 2]", "[0, 1, 2, 3]", "[3]"], 1),
      ],
      history: vec![
        q("In which year did World War II end?", ["1943", "1944", "1945", "1946"], 2),
        q("Which ancient civilization built the pyramids of Giza?", ["Romans", "Greeks", "Egyptians", "Persians"], 2),
        q("Who was the first President of the United States?", ["Thomas Jefferson", "George Washington", "John Adams", "Abraham Lincoln"], 1),
        q("The fall of which wall in 1989 symbolized the end of the Cold War?", ["Hadrian's Wall", "The Great Wall", "The Berlin Wall", "The Western Wall"], 2),
        q("Which empire was ruled by Julius Caesar?", ["Ottoman Empire", "Roman Empire", "Mongol Empire", "British Empire"], 1),
      ],
    }
  }

  pub fn bucket(&self, bucket: Bucket) -> &[Question] {
    match bucket {
      Bucket::JavaScript => &self.javascript,
      Bucket::Python => &self.python,
      Bucket::History => &self.history,
    }
  }

  /// Deterministic fallback quiz for `topic`: the first `min(requested, bucket size)`
  /// questions of the matching bucket, titled "<Topic> Quiz". Never fails.
  #[instrument(level = "debug", skip(self), fields(%topic, requested = requested))]
  pub fn select(&self, topic: &str, requested: usize) -> Quiz {
    let bucket = Bucket::for_topic(topic);
    let questions: Vec<Question> = self.bucket(bucket).iter().take(requested).cloned().collect();
    debug!(target: "quiz", ?bucket, served = questions.len(), "Fallback bucket selected");
    Quiz {
      title: format!("{} Quiz", capitalize_first(topic.trim())),
      questions,
    }
  }
}

impl Default for FallbackBank {
  fn default() -> Self { Self::builtin() }
}

fn q(question: &str, options: [&str; 4], correct_answer: usize) -> Question {
  Question {
    question: question.into(),
    options: options.iter().map(|o| o.to_string()).collect(),
    correct_answer,
  }
}
