//! Quiz repository: the in-memory list of created quizzes.
//!
//! The HTTP layer owns an `Arc<dyn QuizRepository>`; the generation pipeline
//! never touches it. Nothing here survives a restart. The store is bounded:
//! once full, creating a quiz evicts the oldest one.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::{Quiz, QuizOrigin};

pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredQuiz {
  pub id: String,
  pub source: QuizOrigin,
  pub quiz: Quiz,
}

#[async_trait]
pub trait QuizRepository: Send + Sync {
  async fn create(&self, quiz: Quiz, source: QuizOrigin) -> StoredQuiz;
  async fn get(&self, id: &str) -> Option<StoredQuiz>;
  /// All quizzes, oldest first.
  async fn list(&self) -> Vec<StoredQuiz>;
  /// Replace the quiz under `id`; None if unknown.
  async fn update(&self, id: &str, quiz: Quiz, source: QuizOrigin) -> Option<StoredQuiz>;
  /// True if something was removed.
  async fn delete(&self, id: &str) -> bool;
}

#[derive(Default)]
struct Inner {
  by_id: HashMap<String, StoredQuiz>,
  order: VecDeque<String>,
}

pub struct InMemoryQuizRepository {
  inner: RwLock<Inner>,
  capacity: usize,
}

impl InMemoryQuizRepository {
  pub fn new() -> Self {
    Self::with_capacity(DEFAULT_CAPACITY)
  }

  /// Keeps at most `capacity` quizzes (at least one).
  pub fn with_capacity(capacity: usize) -> Self {
    Self { inner: RwLock::new(Inner::default()), capacity: capacity.max(1) }
  }
}

impl Default for InMemoryQuizRepository {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
  #[instrument(level = "debug", skip(self, quiz), fields(title = %quiz.title, %source))]
  async fn create(&self, quiz: Quiz, source: QuizOrigin) -> StoredQuiz {
    let stored = StoredQuiz { id: Uuid::new_v4().to_string(), source, quiz };
    let mut inner = self.inner.write().await;
    while inner.order.len() >= self.capacity {
      let Some(oldest) = inner.order.pop_front() else { break };
      inner.by_id.remove(&oldest);
      info!(target: "quizgen_backend", id = %oldest, capacity = self.capacity, "Store full; evicted oldest quiz");
    }
    inner.order.push_back(stored.id.clone());
    inner.by_id.insert(stored.id.clone(), stored.clone());
    debug!(target: "quizgen_backend", id = %stored.id, total = inner.order.len(), "Quiz stored");
    stored
  }

  async fn get(&self, id: &str) -> Option<StoredQuiz> {
    self.inner.read().await.by_id.get(id).cloned()
  }

  async fn list(&self) -> Vec<StoredQuiz> {
    let inner = self.inner.read().await;
    inner.order.iter().filter_map(|id| inner.by_id.get(id).cloned()).collect()
  }

  #[instrument(level = "debug", skip(self, quiz), fields(%id))]
  async fn update(&self, id: &str, quiz: Quiz, source: QuizOrigin) -> Option<StoredQuiz> {
    let mut inner = self.inner.write().await;
    let entry = inner.by_id.get_mut(id)?;
    entry.quiz = quiz;
    entry.source = source;
    Some(entry.clone())
  }

  #[instrument(level = "debug", skip(self), fields(%id))]
  async fn delete(&self, id: &str) -> bool {
    let mut inner = self.inner.write().await;
    if inner.by_id.remove(id).is_none() {
      return false;
    }
    inner.order.retain(|o| o != id);
    true
  }
}
