use serde::{Deserialize, Serialize};

use crate::cultures::DialectOption;

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct GenerateMealsRequest {
    pub(crate) culture: Option<String>,
    pub(crate) dietary_restrictions: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateMealsResponse {
    pub(crate) meal_plan_text: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct TranslateRequest {
    pub(crate) text: Option<String>,
    pub(crate) language_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TranslateResponse {
    pub(crate) translated_text: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct CultureQuery {
    pub(crate) culture: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CultureResponse {
    pub(crate) dialects: Option<Vec<DialectOption>>,
    pub(crate) default_language_code: String,
    pub(crate) preferred_language_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DietRulesResponse {
    pub(crate) allowed: Vec<String>,
    pub(crate) avoid: Vec<String>,
    pub(crate) tips: Vec<String>,
    pub(crate) grounding_text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_uses_camel_case_fields() {
        let request: GenerateMealsRequest = serde_json::from_str(
            r#"{"culture":"Korean","dietaryRestrictions":"no shellfish"}"#,
        )
        .unwrap();
        assert_eq!(request.culture.as_deref(), Some("Korean"));
        assert_eq!(request.dietary_restrictions.as_deref(), Some("no shellfish"));
    }

    #[test]
    fn missing_fields_deserialize_to_none() {
        let request: GenerateMealsRequest = serde_json::from_str("{}").unwrap();
        assert!(request.culture.is_none());
        assert!(request.dietary_restrictions.is_none());
    }

    #[test]
    fn responses_serialize_with_contract_field_names() {
        let value = serde_json::to_value(GenerateMealsResponse {
            meal_plan_text: "plan".to_string(),
        })
        .unwrap();
        assert_eq!(value["mealPlanText"], "plan");

        let value = serde_json::to_value(TranslateResponse {
            translated_text: "translated".to_string(),
        })
        .unwrap();
        assert_eq!(value["translatedText"], "translated");
    }
}
