//! Minimal OpenAI chat-completions client for the two AI features this
//! service exposes: drafting a listing description and summarizing a
//! listing's reviews.
//!
//! Unlike geocoding there is no degraded fallback for these features;
//! failures surface to the caller as errors.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: String,
}

/// OpenAI chat-completions client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom base URL (for proxies or test doubles).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Draft a short listing description from the listing's basic details.
    pub async fn generate_listing_description(
        &self,
        title: &str,
        location: &str,
        country: &str,
        category: Option<&str>,
        price: Option<f64>,
    ) -> Result<String> {
        let price = price
            .map(|p| p.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let prompt = format!(
            "Write a short, attractive listing description for a place to stay.\n\n\
             Title: {title}\n\
             Location: {location}, {country}\n\
             Category: {}\n\
             Price per night: {price}\n\n\
             Keep it friendly, professional, and under 120 words.",
            category.unwrap_or("Property"),
        );

        self.chat(&prompt, 0.7, 150).await
    }

    /// Summarize guest reviews into a few sentences.
    pub async fn summarize_reviews(&self, comments: &[String]) -> Result<String> {
        let reviews_text = comments
            .iter()
            .enumerate()
            .map(|(i, comment)| format!("Review {}: {}", i + 1, comment))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Summarize the following guest reviews.\n\
             Be concise, balanced, and helpful for future guests.\n\
             Limit to 3-4 sentences.\n\n\
             {reviews_text}"
        );

        self.chat(&prompt, 0.4, 120).await
    }

    /// Single-turn chat completion returning the assistant's text.
    async fn chat(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String> {
        let start = std::time::Instant::now();

        let request = ChatRequest {
            model: MODEL.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature,
            max_tokens,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(std::time::Duration::from_secs(30))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                anyhow!("OpenAI request failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI API error");
            return Err(anyhow!("OpenAI API error: {}", error_text));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("No response from OpenAI"))?;

        debug!(
            model = MODEL,
            duration_ms = start.elapsed().as_millis(),
            "OpenAI chat completion"
        );

        Ok(content)
    }
}
