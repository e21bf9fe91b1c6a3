use axum::http::StatusCode;

use crate::error::ServiceError;
use crate::planner::MealPlanner;
use crate::providers::{self, ProviderImpl};
use crate::settings::Settings;
use crate::translator::PlanTranslator;

use super::models::{
    GenerateMealsRequest, GenerateMealsResponse, TranslateRequest, TranslateResponse,
};
use super::state::ServerState;

#[derive(Debug)]
pub(crate) struct ServerError {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl ServerError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for ServerError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => ServerError::bad_request(message),
            // Upstream generation failed; the caller gets the generic
            // message, details were already logged at the service layer.
            failure => Self {
                status: StatusCode::BAD_GATEWAY,
                message: failure.to_string(),
            },
        }
    }
}

pub(crate) async fn generate_request(
    state: &ServerState,
    request: GenerateMealsRequest,
) -> Result<GenerateMealsResponse, ServerError> {
    let culture = request.culture.unwrap_or_default();
    if culture.trim().is_empty() {
        return Err(ServerError::bad_request(
            "Please specify your cultural background",
        ));
    }

    let provider = resolve_provider(&state.settings)?;
    let planner = MealPlanner::new(provider, state.settings.clone(), state.rules.clone());
    let plan = planner
        .generate(&culture, request.dietary_restrictions.as_deref())
        .await?;
    Ok(GenerateMealsResponse {
        meal_plan_text: plan.text,
    })
}

pub(crate) async fn translate_request(
    state: &ServerState,
    request: TranslateRequest,
) -> Result<TranslateResponse, ServerError> {
    let text = request.text.unwrap_or_default();
    let language_name = request.language_name.unwrap_or_default();
    if text.trim().is_empty() || language_name.trim().is_empty() {
        return Err(ServerError::bad_request("Missing text or language"));
    }

    let provider = resolve_provider(&state.settings)?;
    let translator = PlanTranslator::new(provider, state.settings.clone());
    let translation = translator.translate(&text, &language_name).await?;
    Ok(TranslateResponse {
        translated_text: translation.text,
    })
}

fn resolve_provider(settings: &Settings) -> Result<ProviderImpl, ServerError> {
    let selection = providers::resolve_provider_selection(settings.default_model.as_deref(), None)
        .map_err(|err| ServerError::internal(err.to_string()))?;
    let key = providers::resolve_key(selection.provider, None)
        .map_err(|err| ServerError::internal(err.to_string()))?;
    Ok(providers::build_provider(
        selection.provider,
        key,
        selection.requested_model.as_deref(),
    ))
}
