use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::json;

use super::{ChatRequest, Provider, ProviderFuture};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1/messages";
pub(crate) const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

#[derive(Debug, Clone)]
pub struct Claude {
    key: String,
    model: String,
}

impl Claude {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.model = model;
        }
        self
    }
}

impl Provider for Claude {
    fn complete(&self, request: ChatRequest) -> ProviderFuture {
        let provider = self.clone();
        Box::pin(async move {
            let client = reqwest::Client::new();
            let url = base_url();

            let body = json!({
                "model": provider.model,
                "max_tokens": request.max_output_tokens,
                "temperature": request.temperature,
                "system": request.system,
                "messages": [
                    {"role": "user", "content": request.user}
                ]
            });

            let response = client
                .post(&url)
                .header("x-api-key", provider.key.clone())
                .header("anthropic-version", "2023-06-01")
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            if !status.is_success() {
                return Err(anyhow!(
                    "Claude API error ({}): {}",
                    status,
                    extract_claude_error(&text).unwrap_or(text)
                ));
            }
            extract_text_blocks(&text)
        })
    }
}

fn base_url() -> String {
    std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

fn extract_text_blocks(text: &str) -> Result<String> {
    let payload: ClaudeResponse =
        serde_json::from_str(text).with_context(|| "failed to parse Claude response JSON")?;
    let blocks: Vec<&str> = payload
        .content
        .iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text.as_deref())
        .collect();
    if blocks.is_empty() {
        return Err(anyhow!("no text content returned from Claude"));
    }
    Ok(blocks.join("\n"))
}

fn extract_claude_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<ClaudeError>,
    }

    #[derive(Deserialize)]
    struct ClaudeError {
        #[serde(rename = "type")]
        kind: Option<String>,
        message: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let error = parsed.error?;
    match (error.message, error.kind) {
        (Some(message), Some(kind)) => Some(format!("{} (type: {})", message, kind)),
        (Some(message), None) => Some(message),
        (None, Some(kind)) => Some(format!("type: {}", kind)),
        (None, None) => Some("unknown error".to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    #[serde(default)]
    content: Vec<ClaudeContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ClaudeContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}
