use tracing::warn;

use crate::diet::DietRules;
use crate::error::ServiceError;
use crate::prompts;
use crate::providers::{ChatRequest, Provider};
use crate::settings::Settings;

/// Moderate temperature: varied meal suggestions that stay on-topic.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone)]
pub struct MealPlan {
    pub text: String,
}

/// Meal Plan Generation Service. Stateless per request; the only suspension
/// point is the single provider call.
#[derive(Debug, Clone)]
pub struct MealPlanner<P: Provider + Clone> {
    provider: P,
    settings: Settings,
    rules: DietRules,
}

impl<P: Provider + Clone> MealPlanner<P> {
    pub fn new(provider: P, settings: Settings, rules: DietRules) -> Self {
        Self {
            provider,
            settings,
            rules,
        }
    }

    pub fn rules(&self) -> &DietRules {
        &self.rules
    }

    pub async fn generate(
        &self,
        culture: &str,
        dietary_restrictions: Option<&str>,
    ) -> Result<MealPlan, ServiceError> {
        let culture = culture.trim();
        if culture.is_empty() {
            return Err(ServiceError::invalid_input(
                "Please specify your cultural background",
            ));
        }

        let system =
            prompts::render_meal_plan_system(&self.rules).map_err(ServiceError::GenerationFailed)?;
        let user = prompts::render_meal_plan_user(culture, dietary_restrictions)
            .map_err(ServiceError::GenerationFailed)?;

        let request = ChatRequest {
            system,
            user,
            temperature: GENERATION_TEMPERATURE,
            max_output_tokens: self.settings.generation_max_tokens,
        };

        // The generated text is returned unmodified; the grounding text in
        // the system prompt is the only compliance control.
        let text = self.provider.complete(request).await.map_err(|err| {
            warn!("meal plan generation failed: {:#}", err);
            ServiceError::GenerationFailed(err)
        })?;
        Ok(MealPlan { text })
    }
}
