use tracing::warn;

use crate::error::ServiceError;
use crate::prompts;
use crate::providers::{ChatRequest, Provider};
use crate::settings::Settings;

/// Low temperature: literal fidelity over creativity.
pub const TRANSLATION_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
}

/// Translation Service. Independent of the planner; the two never call each
/// other and share no state.
#[derive(Debug, Clone)]
pub struct PlanTranslator<P: Provider + Clone> {
    provider: P,
    settings: Settings,
}

impl<P: Provider + Clone> PlanTranslator<P> {
    pub fn new(provider: P, settings: Settings) -> Self {
        Self { provider, settings }
    }

    pub async fn translate(
        &self,
        text: &str,
        language_name: &str,
    ) -> Result<Translation, ServiceError> {
        if text.trim().is_empty() || language_name.trim().is_empty() {
            return Err(ServiceError::invalid_input("Missing text or language"));
        }

        let system = prompts::render_translation_system(language_name.trim())
            .map_err(ServiceError::TranslationFailed)?;

        let request = ChatRequest {
            system,
            user: text.to_string(),
            temperature: TRANSLATION_TEMPERATURE,
            max_output_tokens: self.settings.translation_max_tokens,
        };

        let translated = self.provider.complete(request).await.map_err(|err| {
            warn!("translation failed: {:#}", err);
            ServiceError::TranslationFailed(err)
        })?;
        Ok(Translation { text: translated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderFuture;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone)]
    struct TestProvider {
        response: String,
        calls: Arc<AtomicUsize>,
        last_request: Arc<std::sync::Mutex<Option<ChatRequest>>>,
    }

    impl TestProvider {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                calls: Arc::new(AtomicUsize::new(0)),
                last_request: Arc::new(std::sync::Mutex::new(None)),
            }
        }
    }

    impl Provider for TestProvider {
        fn complete(&self, request: ChatRequest) -> ProviderFuture {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            let response = self.response.clone();
            Box::pin(async move { Ok(response) })
        }
    }

    #[tokio::test]
    async fn empty_text_fails_without_a_provider_call() {
        let provider = TestProvider::new("translated");
        let calls = provider.calls.clone();
        let translator = PlanTranslator::new(provider, Settings::default());
        let err = translator.translate("", "Korean").await.unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_language_fails_without_a_provider_call() {
        let provider = TestProvider::new("translated");
        let calls = provider.calls.clone();
        let translator = PlanTranslator::new(provider, Settings::default());
        let err = translator.translate("meal plan", "  ").await.unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn user_content_is_the_literal_text() {
        let provider = TestProvider::new("translated");
        let last_request = provider.last_request.clone();
        let translator = PlanTranslator::new(provider, Settings::default());
        let result = translator
            .translate("**Breakfast Ideas**\n- Congee", "Cantonese")
            .await
            .unwrap();
        assert_eq!(result.text, "translated");

        let request = last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.user, "**Breakfast Ideas**\n- Congee");
        assert!(request.system.contains("into Cantonese"));
        assert_eq!(request.temperature, TRANSLATION_TEMPERATURE);
    }

    #[tokio::test]
    async fn provider_failure_maps_to_translation_failed() {
        #[derive(Clone)]
        struct FailingProvider;

        impl Provider for FailingProvider {
            fn complete(&self, _request: ChatRequest) -> ProviderFuture {
                Box::pin(async { Err(anyhow::anyhow!("timed out")) })
            }
        }

        let translator = PlanTranslator::new(FailingProvider, Settings::default());
        let err = translator.translate("plan", "Korean").await.unwrap_err();
        assert!(matches!(err, ServiceError::TranslationFailed(_)));
    }
}
