use anyhow::{Result, anyhow};
use std::path::Path;

pub mod cultures;
pub mod diet;
mod error;
pub mod logging;
mod planner;
pub mod prompts;
mod providers;
pub mod server;
pub mod settings;
mod translator;

pub use error::ServiceError;
pub use planner::{GENERATION_TEMPERATURE, MealPlan, MealPlanner};
pub use providers::{
    ChatRequest, Claude, Gemini, OpenAI, Provider, ProviderImpl, ProviderKind, build_provider,
    resolve_key, resolve_provider_selection,
};
pub use translator::{PlanTranslator, TRANSLATION_TEMPERATURE, Translation};

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub culture: Option<String>,
    pub restrictions: Option<String>,
    pub translate_to: Option<String>,
    pub model: Option<String>,
    pub key: Option<String>,
    pub settings_path: Option<String>,
    pub show_cultures: bool,
    pub show_diet_rules: bool,
}

/// One-shot mode: generate a plan for a culture, optionally translate it,
/// or print one of the informational listings.
pub async fn run(config: Config) -> Result<String> {
    let settings_path = config.settings_path.as_deref().map(Path::new);
    let settings = settings::load_settings(settings_path)?;
    let registry = cultures::CultureRegistry::load()?;
    let rules = diet::DietRules::load()?;

    if config.show_cultures || config.show_diet_rules {
        return Ok(format_show_output(&config, &registry, &rules));
    }

    let culture = config
        .culture
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow!("culture is required (use --culture)"))?;

    let model_arg = config
        .model
        .as_deref()
        .or(settings.default_model.as_deref());
    let selection = providers::resolve_provider_selection(model_arg, config.key.as_deref())?;
    let key = providers::resolve_key(selection.provider, config.key.as_deref())?;
    let provider =
        providers::build_provider(selection.provider, key, selection.requested_model.as_deref());

    let planner = MealPlanner::new(provider.clone(), settings.clone(), rules);
    let plan = planner
        .generate(culture, config.restrictions.as_deref())
        .await?;

    let translate_to = config
        .translate_to
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let Some(language_name) = translate_to else {
        return Ok(plan.text);
    };

    let plan_translator = PlanTranslator::new(provider, settings);
    let translation = plan_translator.translate(&plan.text, language_name).await?;

    let mut output = plan.text;
    output.push_str("\n\n---\n\n");
    output.push_str(&translation.text);
    Ok(output)
}

fn format_show_output(
    config: &Config,
    registry: &cultures::CultureRegistry,
    rules: &diet::DietRules,
) -> String {
    let mut sections = Vec::new();

    if config.show_cultures {
        let mut lines = Vec::new();
        for name in registry.culture_names() {
            let display = match registry.dialects_for(&name) {
                Some(options) => options
                    .iter()
                    .map(|option| format!("{} ({})", option.name, option.code))
                    .collect::<Vec<_>>()
                    .join(", "),
                None => registry.default_language_code(&name).to_string(),
            };
            lines.push(format!("{}\t{}", name, display));
        }
        sections.push(lines.join("\n"));
    }

    if config.show_diet_rules {
        sections.push(rules.grounding_text());
    }

    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_cultures_lists_dialects_and_defaults() {
        let registry = cultures::CultureRegistry::load().unwrap();
        let rules = diet::DietRules::load().unwrap();
        let config = Config {
            show_cultures: true,
            ..Config::default()
        };
        let output = format_show_output(&config, &registry, &rules);
        assert!(output.contains("korean\tko-KR"));
        assert!(output.contains("chinese\tMandarin (Simplified) (zh-CN)"));
    }

    #[test]
    fn show_diet_rules_prints_grounding_text() {
        let registry = cultures::CultureRegistry::load().unwrap();
        let rules = diet::DietRules::load().unwrap();
        let config = Config {
            show_diet_rules: true,
            ..Config::default()
        };
        let output = format_show_output(&config, &registry, &rules);
        assert!(output.contains("FOODS TO AVOID:"));
    }
}
