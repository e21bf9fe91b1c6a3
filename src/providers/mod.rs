use anyhow::{Result, anyhow};
use std::future::Future;
use std::pin::Pin;

mod claude;
mod gemini;
mod openai;

pub use claude::Claude;
pub use gemini::Gemini;
pub use openai::OpenAI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    Gemini,
    Claude,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Claude => "claude",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderSelection {
    pub provider: ProviderKind,
    pub requested_model: Option<String>,
}

/// A single system/user message pair with the sampling parameters the
/// calling service fixes. Providers return the raw generated text.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

pub type ProviderFuture = Pin<Box<dyn Future<Output = Result<String>> + Send>>;

pub trait Provider: Clone + Send + Sync {
    fn complete(&self, request: ChatRequest) -> ProviderFuture;
}

#[derive(Debug, Clone)]
pub enum ProviderImpl {
    OpenAI(OpenAI),
    Gemini(Gemini),
    Claude(Claude),
}

impl Provider for ProviderImpl {
    fn complete(&self, request: ChatRequest) -> ProviderFuture {
        match self {
            ProviderImpl::OpenAI(provider) => provider.complete(request),
            ProviderImpl::Gemini(provider) => provider.complete(request),
            ProviderImpl::Claude(provider) => provider.complete(request),
        }
    }
}

pub fn build_provider(provider: ProviderKind, key: String, model: Option<&str>) -> ProviderImpl {
    match provider {
        ProviderKind::OpenAI => {
            ProviderImpl::OpenAI(OpenAI::new(key).with_model(model.unwrap_or_default()))
        }
        ProviderKind::Gemini => {
            ProviderImpl::Gemini(Gemini::new(key).with_model(model.unwrap_or_default()))
        }
        ProviderKind::Claude => {
            ProviderImpl::Claude(Claude::new(key).with_model(model.unwrap_or_default()))
        }
    }
}

pub fn resolve_provider_selection(
    model_arg: Option<&str>,
    override_key: Option<&str>,
) -> Result<ProviderSelection> {
    match model_arg {
        Some(model) => parse_model_arg(model),
        None => default_provider_selection(override_key),
    }
}

pub fn resolve_key(provider: ProviderKind, override_key: Option<&str>) -> Result<String> {
    if let Some(key) = override_key {
        return Ok(key.to_string());
    }

    match provider {
        ProviderKind::OpenAI => get_env("OPENAI_API_KEY"),
        ProviderKind::Gemini => get_env("GEMINI_API_KEY").or_else(|| get_env("GOOGLE_API_KEY")),
        ProviderKind::Claude => get_env("ANTHROPIC_API_KEY"),
    }
    .ok_or_else(|| anyhow!("API key not found for provider"))
}

fn default_provider_selection(override_key: Option<&str>) -> Result<ProviderSelection> {
    if get_env("OPENAI_API_KEY").is_some() {
        return Ok(ProviderSelection {
            provider: ProviderKind::OpenAI,
            requested_model: None,
        });
    }

    if get_env("GEMINI_API_KEY").is_some() || get_env("GOOGLE_API_KEY").is_some() {
        return Ok(ProviderSelection {
            provider: ProviderKind::Gemini,
            requested_model: None,
        });
    }

    if get_env("ANTHROPIC_API_KEY").is_some() {
        return Ok(ProviderSelection {
            provider: ProviderKind::Claude,
            requested_model: None,
        });
    }

    if override_key.is_some() {
        return Ok(ProviderSelection {
            provider: ProviderKind::OpenAI,
            requested_model: None,
        });
    }

    Err(anyhow!(
        "no API keys found (checked OPENAI_API_KEY, GEMINI_API_KEY/GOOGLE_API_KEY, ANTHROPIC_API_KEY)"
    ))
}

fn parse_model_arg(model_arg: &str) -> Result<ProviderSelection> {
    let raw = model_arg.trim();
    if raw.is_empty() {
        return Err(anyhow!("model argument is empty"));
    }

    let lower = raw.to_lowercase();
    if let Some(provider) = provider_from_name(&lower) {
        return Ok(ProviderSelection {
            provider,
            requested_model: None,
        });
    }

    if let Some((provider, model)) = parse_provider_model_pair(raw) {
        return Ok(ProviderSelection {
            provider,
            requested_model: model,
        });
    }

    Err(anyhow!(
        "unable to infer provider from model '{}'. Use provider:model (openai:, gemini:, claude:)",
        raw
    ))
}

fn parse_provider_model_pair(input: &str) -> Option<(ProviderKind, Option<String>)> {
    let (provider_part, model_part) = input.split_once(':')?;
    let provider = provider_from_name(&provider_part.to_lowercase())?;
    let model = if model_part.trim().is_empty() {
        None
    } else {
        Some(model_part.trim().to_string())
    };
    Some((provider, model))
}

fn provider_from_name(name: &str) -> Option<ProviderKind> {
    match name {
        "openai" => Some(ProviderKind::OpenAI),
        "gemini" | "google" => Some(ProviderKind::Gemini),
        "claude" | "anthropic" => Some(ProviderKind::Claude),
        _ => None,
    }
}

fn get_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_provider_name() {
        let selection = parse_model_arg("claude").unwrap();
        assert_eq!(selection.provider, ProviderKind::Claude);
        assert!(selection.requested_model.is_none());
    }

    #[test]
    fn parses_provider_model_pair() {
        let selection = parse_model_arg("openai:gpt-4").unwrap();
        assert_eq!(selection.provider, ProviderKind::OpenAI);
        assert_eq!(selection.requested_model.as_deref(), Some("gpt-4"));
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(parse_model_arg("mistral:large").is_err());
        assert!(parse_model_arg("   ").is_err());
    }

    #[test]
    fn pair_with_empty_model_keeps_default() {
        let selection = parse_model_arg("gemini:").unwrap();
        assert_eq!(selection.provider, ProviderKind::Gemini);
        assert!(selection.requested_model.is_none());
    }
}
