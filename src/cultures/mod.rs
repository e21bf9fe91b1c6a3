use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fallback when a culture appears in neither table.
pub const FALLBACK_LANGUAGE_CODE: &str = "en-US";

/// A selectable language variant for a culture. `code` is a BCP-47-style tag
/// consumed by translation and speech synthesis downstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DialectOption {
    pub name: String,
    pub code: String,
}

/// Static culture-to-language tables. Keys are normalized (lowercased,
/// trimmed) culture names. A culture is listed in `dialects` when it has
/// several selectable variants, in `defaults` when it has exactly one code;
/// the two tables are disjoint.
#[derive(Debug, Clone)]
pub struct CultureRegistry {
    dialects: HashMap<String, Vec<DialectOption>>,
    defaults: HashMap<String, String>,
}

impl CultureRegistry {
    pub fn load() -> Result<Self> {
        let raw = include_str!("cultures.json");
        let parsed: CultureData =
            serde_json::from_str(raw).with_context(|| "failed to parse culture language data")?;
        Ok(CultureRegistry {
            dialects: parsed.dialects,
            defaults: parsed.defaults,
        })
    }

    /// Ordered dialect options for a culture, or `None` when the culture has
    /// no dialect entry. The first option is the default selection.
    pub fn dialects_for(&self, culture: &str) -> Option<&[DialectOption]> {
        self.dialects
            .get(&normalize_culture(culture))
            .map(Vec::as_slice)
    }

    /// Single language code for a culture without dialect options. Unknown,
    /// empty, or unnormalizable input falls back to `en-US`.
    pub fn default_language_code(&self, culture: &str) -> &str {
        self.defaults
            .get(&normalize_culture(culture))
            .map(String::as_str)
            .unwrap_or(FALLBACK_LANGUAGE_CODE)
    }

    /// Code to use when no explicit dialect choice has been made: the first
    /// dialect entry when the culture has dialects, else the default-table
    /// code, else `en-US`.
    pub fn preferred_language_code(&self, culture: &str) -> &str {
        match self.dialects_for(culture).and_then(|options| options.first()) {
            Some(option) => option.code.as_str(),
            None => self.default_language_code(culture),
        }
    }

    pub fn culture_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .dialects
            .keys()
            .chain(self.defaults.keys())
            .cloned()
            .collect();
        names.sort();
        names
    }
}

fn normalize_culture(culture: &str) -> String {
    culture.trim().to_lowercase()
}

#[derive(Debug, Deserialize)]
struct CultureData {
    dialects: HashMap<String, Vec<DialectOption>>,
    defaults: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CultureRegistry {
        CultureRegistry::load().unwrap()
    }

    #[test]
    fn chinese_dialects_keep_configured_order() {
        let registry = registry();
        let dialects = registry.dialects_for("Chinese").unwrap();
        let expected = [
            ("Mandarin (Simplified)", "zh-CN"),
            ("Cantonese", "zh-HK"),
            ("Mandarin (Traditional/Taiwan)", "zh-TW"),
        ];
        assert_eq!(dialects.len(), expected.len());
        for (option, (name, code)) in dialects.iter().zip(expected) {
            assert_eq!(option.name, name);
            assert_eq!(option.code, code);
        }
    }

    #[test]
    fn lookup_is_case_and_whitespace_insensitive() {
        let registry = registry();
        assert!(registry.dialects_for("  MIDDLE EASTERN ").is_some());
        assert_eq!(registry.default_language_code(" Korean "), "ko-KR");
    }

    #[test]
    fn unknown_culture_falls_back() {
        let registry = registry();
        assert!(registry.dialects_for("Atlantis").is_none());
        assert_eq!(registry.default_language_code("Atlantis"), "en-US");
        assert_eq!(registry.preferred_language_code("Atlantis"), "en-US");
    }

    #[test]
    fn empty_input_is_accepted() {
        let registry = registry();
        assert!(registry.dialects_for("").is_none());
        assert_eq!(registry.default_language_code(""), "en-US");
        assert_eq!(registry.default_language_code("   "), "en-US");
    }

    #[test]
    fn default_table_hits() {
        let registry = registry();
        assert_eq!(registry.default_language_code("Italian"), "it-IT");
        assert_eq!(registry.default_language_code("japanese"), "ja-JP");
    }

    #[test]
    fn preferred_code_takes_first_dialect() {
        let registry = registry();
        assert_eq!(registry.preferred_language_code("Chinese"), "zh-CN");
        assert_eq!(registry.preferred_language_code("Spanish"), "es-ES");
        assert_eq!(registry.preferred_language_code("Korean"), "ko-KR");
    }

    #[test]
    fn tables_are_disjoint() {
        let registry = registry();
        for name in registry.dialects.keys() {
            assert!(
                !registry.defaults.contains_key(name),
                "{:?} appears in both tables",
                name
            );
        }
    }
}
