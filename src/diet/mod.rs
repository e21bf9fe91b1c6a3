use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Low-residue (low-fiber) diet rules for colonoscopy/endoscopy prep.
/// Typically followed 3-5 days before the procedure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DietRules {
    pub allowed: Vec<String>,
    pub avoid: Vec<String>,
    pub tips: Vec<String>,
}

impl DietRules {
    pub fn load() -> Result<Self> {
        let raw = include_str!("diet_rules.json");
        let rules: DietRules =
            serde_json::from_str(raw).with_context(|| "failed to parse diet rules data")?;
        if rules.allowed.is_empty() || rules.avoid.is_empty() || rules.tips.is_empty() {
            return Err(anyhow!("diet rules data has an empty section"));
        }
        Ok(rules)
    }

    /// Renders the allow/avoid/tips block embedded verbatim into every
    /// generation system prompt. The avoid list in this text is the only
    /// compliance control the generation path has.
    pub fn grounding_text(&self) -> String {
        let mut sections = Vec::new();
        sections.push("LOW-RESIDUE DIET RULES (for colonoscopy/endoscopy prep):".to_string());
        sections.push(render_section("ALLOWED FOODS:", &self.allowed));
        sections.push(render_section("FOODS TO AVOID:", &self.avoid));
        sections.push(render_section("IMPORTANT TIPS:", &self.tips));
        sections.join("\n\n")
    }
}

fn render_section(header: &str, items: &[String]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(header.to_string());
    for item in items {
        lines.push(format!("- {}", item));
    }
    lines.join("\n")
}
