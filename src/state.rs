//! Application state: the quiz generator (model client, prompts, fallback bank)
//! and the quiz repository.
//!
//! If the model is disabled every quiz comes from the fallback bank.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{cors_origins_from_env, load_agent_config_from_env, ModelSettings};
use crate::fallback::FallbackBank;
use crate::generator::QuizGenerator;
use crate::ollama::{ModelClient, OllamaClient};
use crate::prompt::PromptBuilder;
use crate::store::{InMemoryQuizRepository, QuizRepository};

#[derive(Clone)]
pub struct AppState {
    pub generator: QuizGenerator,
    pub quizzes: Arc<dyn QuizRepository>,
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Build state from env: load config, build the fallback bank, init the model client.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        // Load TOML config if provided (prompt template + model overrides).
        let cfg = load_agent_config_from_env().unwrap_or_default();
        let settings = ModelSettings::from_env(&cfg.model);

        let model: Option<Arc<dyn ModelClient>> = match OllamaClient::from_settings(&settings) {
            Some(client) => {
                info!(target: "quizgen_backend", base_url = %client.base_url, model = %client.model, timeout = ?client.timeout, "Ollama enabled.");
                Some(Arc::new(client))
            }
            None => {
                info!(target: "quizgen_backend", "Ollama disabled. Every quiz comes from the fallback bank.");
                None
            }
        };

        let generator = QuizGenerator::new(model, PromptBuilder::new(cfg.prompts), Arc::new(FallbackBank::builtin()));
        let cors_origins = cors_origins_from_env();
        info!(target: "quizgen_backend", origins = ?cors_origins, "CORS origins");

        Self::with_parts(generator, Arc::new(InMemoryQuizRepository::new()), cors_origins)
    }

    pub fn with_parts(generator: QuizGenerator, quizzes: Arc<dyn QuizRepository>, cors_origins: Vec<String>) -> Self {
        Self { generator, quizzes, cors_origins }
    }
}
