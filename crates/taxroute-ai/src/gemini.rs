//! Gemini `generateContent` client implementing [`SemanticMatcher`].

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use taxroute_core::AgencyExtraction;
use tracing::info;

use crate::config::MatcherConfig;
use crate::error::MatchError;
use crate::matcher::{MatchRequest, SemanticMatcher};
use crate::prompt::{SYSTEM_PROMPT, build_user_prompt, parse_extraction, response_schema};

/// HTTP client for the Gemini generative language API.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client from configuration. Fails without an API key.
    pub fn new(config: MatcherConfig) -> Result<Self, MatchError> {
        let api_key = config
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(MatchError::MissingApiKey)?;
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn request_body(request: &MatchRequest) -> serde_json::Value {
        json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_PROMPT }] },
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_user_prompt(request) }]
            }],
            "generationConfig": {
                "temperature": 0.0,
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }
}

/// Concatenated text of the first candidate, if it has any.
fn response_text(response: GenerateResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    (!text.trim().is_empty()).then_some(text)
}

#[async_trait]
impl SemanticMatcher for GeminiClient {
    async fn extract(&self, request: &MatchRequest) -> Result<AgencyExtraction, MatchError> {
        let url = self.endpoint();
        info!(model = %self.model, excerpt_bytes = request.reference_excerpt.len(), "requesting agency extraction");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(request))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MatchError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let response: GenerateResponse = resp.json().await?;
        let text = response_text(response).ok_or(MatchError::EmptyResponse)?;
        let extraction = parse_extraction(&text)?;
        info!(
            agency_code = %extraction.agency_code,
            province = %extraction.province,
            "extraction complete"
        );
        Ok(extraction)
    }
}
