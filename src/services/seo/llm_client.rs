// src/services/seo/llm_client.rs
// DOCUMENTATION: Generative-AI API client
// PURPOSE: Send one prompt to a generateContent endpoint and return the reply text

use crate::config::Config;
use crate::errors::DirectoryError;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// LLM API client
/// DOCUMENTATION: Cheap to clone; clones share the HTTP pool and rate limiter
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    limiter: Arc<DirectLimiter>,
}

#[derive(Debug, Deserialize, Serialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Serialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize, Serialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize, Serialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: String, model: String, requests_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            limiter: Arc::new(RateLimiter::direct(Quota::per_minute(per_minute))),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.llm_api_key.clone(),
            config.llm_api_url.clone(),
            config.llm_model.clone(),
            config.llm_requests_per_minute,
        )
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a prompt and return the concatenated text of the first candidate
    /// DOCUMENTATION: Waits on the shared rate limiter before every call.
    /// No retries: 429 maps to RateLimitExceeded, other failures to ExternalApiError
    pub async fn generate(&self, prompt: &str) -> Result<String, DirectoryError> {
        if !self.is_configured() {
            return Err(DirectoryError::ExternalApiError(
                "LLM API key not configured".to_string(),
            ));
        }

        self.limiter.until_ready().await;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 0.7,
                "maxOutputTokens": 2048
            }
        });

        log::debug!("LLM request to model {} ({} chars)", self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("LLM request failed: {}", e);
                DirectoryError::ExternalApiError(format!("LLM request failed: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            log::warn!("LLM API rate limit hit");
            return Err(DirectoryError::RateLimitExceeded);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            log::error!("LLM API returned {}: {}", status, text);
            return Err(DirectoryError::ExternalApiError(format!(
                "LLM API returned {}",
                status
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse LLM response: {}", e);
            DirectoryError::ExternalApiError(format!("Invalid LLM response: {}", e))
        })?;

        reply_text(parsed)
    }
}

fn reply_text(response: GenerateResponse) -> Result<String, DirectoryError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(DirectoryError::ExternalApiError(
            "LLM returned an empty reply".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"title\":" }, { "text": "\"x\"}" }] }
            }]
        }))
        .unwrap();

        assert_eq!(reply_text(response).unwrap(), "{\"title\":\"x\"}");
    }

    #[test]
    fn test_empty_reply_is_an_error() {
        let response: GenerateResponse = serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(matches!(
            reply_text(response),
            Err(DirectoryError::ExternalApiError(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = LlmClient::from_config(&Config::for_tests());
        assert!(!client.is_configured());

        let err = client.generate("prompt").await.unwrap_err();
        match err {
            DirectoryError::ExternalApiError(msg) => assert_eq!(msg, "LLM API key not configured"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_zero_rate_is_clamped() {
        let client = LlmClient::new(String::new(), "http://x/".to_string(), "m".to_string(), 0);
        assert_eq!(client.base_url, "http://x");
        assert_eq!(client.model(), "m");
    }
}
