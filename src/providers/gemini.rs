use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::json;

use super::{ChatRequest, Provider, ProviderFuture};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub(crate) const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct Gemini {
    key: String,
    model: String,
}

impl Gemini {
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

impl Provider for Gemini {
    fn complete(&self, request: ChatRequest) -> ProviderFuture {
        let provider = self.clone();
        Box::pin(async move {
            let client = reqwest::Client::new();
            let url = format!("{}/{}:generateContent", base_url(), provider.model);

            let body = json!({
                "systemInstruction": {"parts": [{"text": request.system}]},
                "contents": [
                    {"role": "user", "parts": [{"text": request.user}]}
                ],
                "generationConfig": {
                    "temperature": request.temperature,
                    "maxOutputTokens": request.max_output_tokens
                }
            });

            let response = client
                .post(&url)
                .header("x-goog-api-key", provider.key.clone())
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            if !status.is_success() {
                return Err(anyhow!(
                    "Gemini API error ({}): {}",
                    status,
                    extract_gemini_error(&text).unwrap_or(text)
                ));
            }
            extract_candidate_text(&text)
        })
    }
}

fn base_url() -> String {
    std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

fn extract_candidate_text(text: &str) -> Result<String> {
    let payload: GeminiResponse =
        serde_json::from_str(text).with_context(|| "failed to parse Gemini response JSON")?;
    let candidate = payload
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .ok_or_else(|| anyhow!("no candidate returned from Gemini"))?;

    let parts: Vec<&str> = candidate
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();
    if parts.is_empty() {
        return Err(anyhow!("no text content returned from Gemini"));
    }
    Ok(parts.join(""))
}

fn extract_gemini_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<GeminiError>,
    }

    #[derive(Deserialize)]
    struct GeminiError {
        message: Option<String>,
        status: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let error = parsed.error?;
    match (error.message, error.status) {
        (Some(message), Some(status)) => Some(format!("{} (status: {})", message, status)),
        (Some(message), None) => Some(message),
        (None, Some(status)) => Some(format!("status: {}", status)),
        (None, None) => Some("unknown error".to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_candidate_parts() {
        let payload = r#"{"candidates":[{"content":{"parts":[{"text":"**Congee**"},{"text":" - plain rice porridge"}]}}]}"#;
        let text = extract_candidate_text(payload).unwrap();
        assert_eq!(text, "**Congee** - plain rice porridge");
    }

    #[test]
    fn missing_candidates_is_an_error() {
        assert!(extract_candidate_text(r#"{"candidates":[]}"#).is_err());
    }

    #[test]
    fn error_body_is_summarized() {
        let body = r#"{"error":{"message":"quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let message = extract_gemini_error(body).unwrap();
        assert_eq!(message, "quota exceeded (status: RESOURCE_EXHAUSTED)");
    }
}
