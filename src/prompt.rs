//! Renders the instruction text sent to the model.

use crate::config::Prompts;
use crate::util::fill_template;

#[derive(Clone, Debug, Default)]
pub struct PromptBuilder {
  prompts: Prompts,
}

impl PromptBuilder {
  pub fn new(prompts: Prompts) -> Self {
    Self { prompts }
  }

  /// Deterministic: same `(topic, count)` always yields the same prompt.
  pub fn build(&self, topic: &str, count: usize) -> String {
    let count = count.to_string();
    fill_template(&self.prompts.quiz_user_template, &[("topic", topic), ("count", &count)])
  }
}
