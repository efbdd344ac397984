//! Gemini generative-language API client
//!
//! One request per prompt:
//! `POST {base_url}/models/{model}:generateContent?key={api_key}`
//! with body `{"contents":[{"parts":[{"text": prompt}]}]}`.

use async_trait::async_trait;
use reframe_common::config::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{CoachError, LanguageModel};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a client. `api_key = None` yields a client whose every call
    /// fails with [`CoachError::MissingApiKey`].
    pub fn new(config: &GeminiConfig, api_key: Option<String>) -> Result<Self, CoachError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoachError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, CoachError> {
        let api_key = self.api_key.as_deref().ok_or(CoachError::MissingApiKey)?;

        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Querying Gemini API");

        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| CoachError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string());
            return Err(CoachError::Api(status.as_u16(), reason));
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CoachError::InvalidFormat(e.to_string()))?;

        let text = data
            .candidates
            .into_iter()
            .next()
            .ok_or(CoachError::EmptyResponse)?
            .content
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(CoachError::EmptyResponse)?;

        debug!(response_len = text.len(), "Gemini API responded");
        Ok(text)
    }
}
