use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::json;

use super::{ChatRequest, Provider, ProviderFuture};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub(crate) const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Debug, Clone)]
pub struct OpenAI {
    key: String,
    model: String,
}

impl OpenAI {
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

impl Provider for OpenAI {
    fn complete(&self, request: ChatRequest) -> ProviderFuture {
        let provider = self.clone();
        Box::pin(async move {
            let client = reqwest::Client::new();
            let url = format!("{}/chat/completions", base_url());

            let body = json!({
                "model": provider.model,
                "messages": [
                    {"role": "system", "content": request.system},
                    {"role": "user", "content": request.user}
                ],
                "temperature": request.temperature,
                "max_tokens": request.max_output_tokens
            });

            let response = client
                .post(&url)
                .bearer_auth(provider.key.clone())
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            if !status.is_success() {
                return Err(anyhow!(
                    "OpenAI API error ({}): {}",
                    status,
                    extract_openai_error(&text).unwrap_or(text)
                ));
            }
            extract_message_content(&text)
        })
    }
}

fn base_url() -> String {
    std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

fn extract_message_content(text: &str) -> Result<String> {
    let payload: OpenAIResponse =
        serde_json::from_str(text).with_context(|| "failed to parse OpenAI response JSON")?;
    let content = payload
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_deref())
        .ok_or_else(|| anyhow!("no completion returned from OpenAI"))?;
    if content.trim().is_empty() {
        return Err(anyhow!("OpenAI returned an empty completion"));
    }
    Ok(content.to_string())
}

fn extract_openai_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<OpenAIError>,
    }

    #[derive(Deserialize)]
    struct OpenAIError {
        message: Option<String>,
        #[serde(rename = "type")]
        kind: Option<String>,
        code: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let error = parsed.error?;
    let mut parts = Vec::new();
    if let Some(message) = error.message {
        if !message.trim().is_empty() {
            parts.push(message);
        }
    }
    if let Some(kind) = error.kind {
        if !kind.trim().is_empty() {
            parts.push(format!("type: {}", kind));
        }
    }
    if let Some(code) = error.code {
        if !code.trim().is_empty() {
            parts.push(format!("code: {}", code));
        }
    }
    if parts.is_empty() {
        Some("unknown error".to_string())
    } else {
        Some(parts.join(" | "))
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}
