//! Free-text order parsing via an external AI model.
//!
//! The pipeline treats parsing as an opaque boundary: raw customer text in,
//! a [`ParsedOrder`] out, or a hard failure - a parse failure never creates
//! an order.
//!
//! # Environment Variables
//!
//! - `OPENROUTER_API_KEY`: required for the OpenRouter implementation
//! - `OPENROUTER_MODEL`: model to use (default: anthropic/claude-sonnet-4)

use async_trait::async_trait;
use intake_models::ParsedOrder;
use thiserror::Error;
use tracing::debug;

/// Default model to use for extraction.
pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4";

/// OpenRouter API endpoint.
const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// System prompt for the extraction model.
const SYSTEM_PROMPT: &str = r#"You extract structured order data from customer messages.
Reply with a single JSON object and nothing else, shaped exactly as:
{"items": [{"name": "<product name>", "quantity": <positive integer>}],
 "delivery_address": "<address or null>",
 "contact_email": "<email or null>",
 "contact_phone": "<phone or null>"}

Rules:
- Keep product names as the customer wrote them
- Quantities are positive integers; default to 1 when not stated
- Use null for any field the message does not mention
- Never invent items or contact details"#;

/// Errors that can occur while parsing order text.
#[derive(Debug, Error)]
pub enum ParserError {
    /// OpenRouter API key not set in the environment.
    #[error("OpenRouter API key not set. Set OPENROUTER_API_KEY environment variable.")]
    NoApiKey,

    /// The HTTP request itself failed.
    #[error("parser request failed: {0}")]
    RequestFailed(String),

    /// The model response was not usable structured data.
    #[error("parser returned unusable output: {0}")]
    Malformed(String),
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Boundary contract: raw message text to structured order data.
#[async_trait]
pub trait OrderParser: Send + Sync {
    /// Extracts order data from a customer message.
    ///
    /// Any malformed model output fails with [`ParserError::Malformed`];
    /// the caller must not create an order in that case.
    async fn parse(&self, raw_text: &str) -> Result<ParsedOrder>;
}

/// Parser backed by the OpenRouter chat completions API.
pub struct OpenRouterParser {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenRouterParser {
    /// Creates a parser with an explicit key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Creates a parser from `OPENROUTER_API_KEY` / `OPENROUTER_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY").map_err(|_| ParserError::NoApiKey)?;
        let model =
            std::env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self::new(api_key, model))
    }
}

#[async_trait]
impl OrderParser for OpenRouterParser {
    async fn parse(&self, raw_text: &str) -> Result<ParsedOrder> {
        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": raw_text}
            ],
            "max_tokens": 500
        });

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ParserError::RequestFailed(e.to_string()))?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ParserError::Malformed(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ParserError::Malformed("no content in response".to_string()))?;

        debug!(model = %self.model, "Parser response received");
        decode_parsed_order(content)
    }
}

/// Decodes model output into a [`ParsedOrder`], tolerating a markdown code
/// fence around the JSON.
pub fn decode_parsed_order(content: &str) -> Result<ParsedOrder> {
    let json = strip_code_fence(content);
    let parsed: ParsedOrder =
        serde_json::from_str(json).map_err(|e| ParserError::Malformed(e.to_string()))?;

    if parsed.items.is_empty() {
        return Err(ParserError::Malformed("no items extracted".to_string()));
    }

    Ok(parsed)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
