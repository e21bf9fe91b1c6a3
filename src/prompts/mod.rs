use anyhow::{Context, Result};
use tera::{Context as TeraContext, Tera};

use crate::diet::DietRules;

const MEAL_PLAN_SYSTEM_TEMPLATE: &str = include_str!("templates/meal_plan_system.tera");
const MEAL_PLAN_USER_TEMPLATE: &str = include_str!("templates/meal_plan_user.tera");
const TRANSLATE_SYSTEM_TEMPLATE: &str = include_str!("templates/translate_system.tera");

/// System-role instruction for meal plan generation. Embeds the full
/// grounding text so the model's output space is constrained by the
/// allow/avoid lists.
pub fn render_meal_plan_system(rules: &DietRules) -> Result<String> {
    let mut context = TeraContext::new();
    context.insert("grounding_text", &rules.grounding_text());
    Tera::one_off(MEAL_PLAN_SYSTEM_TEMPLATE, &context, false)
        .with_context(|| "failed to render meal plan system prompt")
}

/// User-role instruction naming the culture and optional restrictions and
/// requesting the structured four-category plan.
pub fn render_meal_plan_user(culture: &str, restrictions: Option<&str>) -> Result<String> {
    let mut context = TeraContext::new();
    context.insert("culture", culture);
    let restrictions = restrictions.map(str::trim).filter(|value| !value.is_empty());
    context.insert("restrictions", &restrictions);
    Tera::one_off(MEAL_PLAN_USER_TEMPLATE, &context, false)
        .with_context(|| "failed to render meal plan user prompt")
}

/// System-role instruction for translating a generated plan into the named
/// language while keeping its structure.
pub fn render_translation_system(language_name: &str) -> Result<String> {
    let mut context = TeraContext::new();
    context.insert("language_name", language_name);
    Tera::one_off(TRANSLATE_SYSTEM_TEMPLATE, &context, false)
        .with_context(|| "failed to render translation system prompt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_contains_every_avoid_item() {
        let rules = DietRules::load().unwrap();
        let prompt = render_meal_plan_system(&rules).unwrap();
        for item in &rules.avoid {
            assert!(prompt.contains(item), "missing avoid item {:?}", item);
        }
        assert!(prompt.contains("Never suggest foods from the \"avoid\" list."));
    }

    #[test]
    fn user_prompt_names_the_culture() {
        let prompt = render_meal_plan_user("Korean", None).unwrap();
        assert!(prompt.contains("Patient's cultural background: Korean"));
        assert!(prompt.contains("Be specific to the Korean cuisine."));
        assert!(!prompt.contains("Additional dietary restrictions"));
    }

    #[test]
    fn user_prompt_appends_restrictions_verbatim() {
        let prompt = render_meal_plan_user("Indian", Some("vegetarian, no eggs")).unwrap();
        assert!(prompt.contains("Additional dietary restrictions: vegetarian, no eggs"));
    }

    #[test]
    fn blank_restrictions_are_omitted() {
        let prompt = render_meal_plan_user("Thai", Some("   ")).unwrap();
        assert!(!prompt.contains("Additional dietary restrictions"));
    }

    #[test]
    fn translation_prompt_names_the_language() {
        let prompt = render_translation_system("Cantonese").unwrap();
        assert!(prompt.contains("into Cantonese."));
        assert!(prompt.contains("Keep the formatting"));
    }
}
