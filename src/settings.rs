use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8787";
pub const DEFAULT_GENERATION_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TRANSLATION_MAX_TOKENS: u32 = 2500;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_addr: String,
    pub generation_max_tokens: u32,
    pub translation_max_tokens: u32,
    pub default_model: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            generation_max_tokens: DEFAULT_GENERATION_MAX_TOKENS,
            translation_max_tokens: DEFAULT_TRANSLATION_MAX_TOKENS,
            default_model: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    server: Option<ServerSettings>,
    generation: Option<GenerationSettings>,
    translation: Option<TranslationSettings>,
    system: Option<SystemSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSettings {
    addr: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerationSettings {
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct TranslationSettings {
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct SystemSettings {
    model: Option<String>,
}

pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    ensure_home_settings_file()?;

    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("settings.toml"));
    ordered_paths.push(PathBuf::from("settings.local.toml"));

    if let Some(home) = home_dir() {
        ordered_paths.push(home.join("settings.toml"));
        ordered_paths.push(home.join("settings.local.toml"));
    }

    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            let parsed: SettingsFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
            settings.merge(parsed);
        }
    }

    Ok(settings)
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(server) = incoming.server {
            if let Some(addr) = server.addr {
                if !addr.trim().is_empty() {
                    self.server_addr = addr;
                }
            }
        }
        if let Some(generation) = incoming.generation {
            if let Some(tokens) = generation.max_output_tokens {
                if tokens > 0 {
                    self.generation_max_tokens = tokens;
                }
            }
        }
        if let Some(translation) = incoming.translation {
            if let Some(tokens) = translation.max_output_tokens {
                if tokens > 0 {
                    self.translation_max_tokens = tokens;
                }
            }
        }
        if let Some(system) = incoming.system {
            if let Some(model) = system.model {
                if !model.trim().is_empty() {
                    self.default_model = Some(model);
                }
            }
        }
    }
}

fn ensure_home_settings_file() -> Result<()> {
    let Some(home) = home_dir() else {
        return Ok(());
    };
    fs::create_dir_all(&home)
        .with_context(|| format!("failed to create settings directory: {}", home.display()))?;
    let path = home.join("settings.toml");
    if !path.exists() {
        fs::write(&path, DEFAULT_SETTINGS_TOML)
            .with_context(|| format!("failed to write settings: {}", path.display()))?;
    }
    Ok(())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().and_then(|home| {
        let home = home.trim();
        if home.is_empty() {
            None
        } else {
            Some(Path::new(home).join(".llm-mealplan-rust"))
        }
    })
}
