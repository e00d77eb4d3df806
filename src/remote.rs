// ABOUTME: Remote text structuring through the Gemini generateContent API
// ABOUTME: Sends a prompt and parses the heading/subheading/content JSON reply

use crate::errors::{CarouselError, Result};
use crate::generate::TextStructurer;
use crate::splitter::SplitText;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;

const SYSTEM_PROMPT: &str = "You are an expert content editor. Given a paragraph, split it into three parts: a concise heading (max 10 words), a subheading (max 20 words), and the remaining content. Return ONLY a valid JSON object with keys: heading, subheading, content. Do not include any explanations, markdown, or code block. Example: {\"heading\": \"...\", \"subheading\": \"...\", \"content\": \"...\"}";

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Connection settings for the remote text service
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            timeout_ms: 30000, // 30 seconds
        }
    }
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
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StructuredReply {
    heading: String,
    subheading: String,
    content: String,
}

/// Blocking client for the Gemini `generateContent` endpoint.
/// Failures are reported once; nothing is retried.
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
}

impl GeminiClient {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(CarouselError::ConfigError(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }

        let mut endpoint = Url::parse(&format!(
            "{}/models/{}:generateContent",
            config.api_base.trim_end_matches('/'),
            config.model
        ))
        .map_err(|e| CarouselError::ConfigError(format!("Invalid API base URL: {}", e)))?;
        endpoint
            .query_pairs_mut()
            .append_pair("key", config.api_key.trim());

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, endpoint })
    }

    fn payload(prompt: &str) -> serde_json::Value {
        let safety: Vec<serde_json::Value> = SAFETY_CATEGORIES
            .iter()
            .map(|category| json!({ "category": category, "threshold": "BLOCK_NONE" }))
            .collect();

        json!({
            "contents": [{ "parts": [{ "text": format!("{}\n\n{}", SYSTEM_PROMPT, prompt) }] }],
            "safetySettings": safety,
            "generationConfig": { "responseMimeType": "application/json" },
        })
    }
}

/// Pull the structured reply out of a raw `generateContent` response body
fn parse_reply(body: &str) -> Result<SplitText> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| CarouselError::Remote(format!("Malformed response: {}", e)))?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| CarouselError::Remote("Unexpected response structure".to_string()))?;

    let reply: StructuredReply = serde_json::from_str(text.trim())
        .map_err(|e| CarouselError::Remote(format!("Reply is not the expected JSON: {}", e)))?;

    Ok(SplitText::new(reply.heading, reply.subheading, reply.content))
}

impl TextStructurer for GeminiClient {
    fn structure(&self, prompt: &str) -> Result<SplitText> {
        info!("Requesting slide structure from {}", self.endpoint.path());

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&Self::payload(prompt))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            warn!("Remote text service returned {}", status);
            return Err(CarouselError::Remote(format!("HTTP {}: {}", status, body)));
        }

        debug!("Remote reply: {} bytes", body.len());
        parse_reply(&body)
    }
}
