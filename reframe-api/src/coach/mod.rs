//! Coaching service
//!
//! Wraps a generative-language model with the two coaching operations:
//! problem analysis and journal reflection. Both operations always produce
//! a usable answer: any failure (transport, API status, unparsable output,
//! missing fields) is logged and replaced by static fallback advice.

pub mod fallback;
pub mod gemini;
pub mod parse;
pub mod prompts;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use reframe_common::models::{Analysis, Reflection};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Coaching errors. Never reach HTTP clients; they select the fallback.
#[derive(Debug, Error)]
pub enum CoachError {
    #[error("Gemini API key is not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Gemini API error {0}: {1}")]
    Api(u16, String),

    #[error("No response from Gemini API")]
    EmptyResponse,

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// A text-in, text-out language model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, CoachError>;
}

/// Problem analysis and journal reflection on top of a [`LanguageModel`]
#[derive(Clone)]
pub struct Coach {
    model: Arc<dyn LanguageModel>,
}

impl Coach {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Analyze a recurring problem into the five advice fields
    pub async fn analyze_problem(&self, problem: &str, duration: &str, impact: &str) -> Analysis {
        match self.try_analyze_problem(problem, duration, impact).await {
            Ok(analysis) => {
                debug!("Problem analysis generated");
                analysis
            }
            Err(e) => {
                warn!("Error analyzing problem, using fallback advice: {}", e);
                fallback::analysis()
            }
        }
    }

    async fn try_analyze_problem(
        &self,
        problem: &str,
        duration: &str,
        impact: &str,
    ) -> Result<Analysis, CoachError> {
        let prompt = prompts::analysis_prompt(problem, duration, impact);
        let response = self.model.generate(&prompt).await?;
        parse::parse_analysis(&response)
    }

    /// Reflect on a journal entry
    pub async fn reflect_on_journal(&self, content: &str) -> Reflection {
        match self.try_reflect_on_journal(content).await {
            Ok(reflection) => {
                debug!("Journal reflection generated");
                reflection
            }
            Err(e) => {
                warn!("Error reflecting on journal, using fallback reflection: {}", e);
                fallback::reflection()
            }
        }
    }

    async fn try_reflect_on_journal(&self, content: &str) -> Result<Reflection, CoachError> {
        let prompt = prompts::reflection_prompt(content);
        let response = self.model.generate(&prompt).await?;
        parse::parse_reflection(&response)
    }
}
