//! Persistent application settings (JSON file in app data directory).

use std::fs;
use std::path::{Path, PathBuf};

use auris_core::recognizer::SessionConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct AppSettings {
    pub language_hint: String,
    pub prompt: String,
    pub max_candidates: usize,
    pub partial_results: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language_hint: "auto".into(),
            prompt: "Speak now...".into(),
            max_candidates: 5,
            partial_results: false,
        }
    }
}

impl AppSettings {
    pub fn normalize(&mut self) {
        self.language_hint = normalize_language_hint(&self.language_hint);
        self.prompt = normalize_prompt(&self.prompt);
        self.max_candidates = self.max_candidates.clamp(1, 10);
    }

    /// Build the per-session recognizer configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            language: language_tag(&self.language_hint),
            prompt: self.prompt.clone(),
            max_candidates: self.max_candidates,
            free_form: true,
            partial_results: self.partial_results,
        }
    }
}

pub fn normalize_language_hint(raw: &str) -> String {
    match raw.trim().to_ascii_lowercase().as_str() {
        "en" | "eng" | "english" => "english".into(),
        "tr" | "tur" | "turkish" => "turkish".into(),
        "de" | "ger" | "german" => "german".into(),
        _ => "auto".into(),
    }
}

fn language_tag(hint: &str) -> Option<String> {
    match hint {
        "english" => Some("en-US".into()),
        "turkish" => Some("tr-TR".into()),
        "german" => Some("de-DE".into()),
        _ => None,
    }
}

pub fn normalize_prompt(raw: &str) -> String {
    let normalized = raw.trim();
    if normalized.is_empty() {
        "Speak now...".into()
    } else {
        normalized.into()
    }
}

pub fn default_settings_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Lattice Labs")
            .join("Auris")
            .join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
                    .join(".local")
                    .join("share")
            })
            .join("auris")
            .join("settings.json")
    }
}

pub fn load_settings(path: &Path) -> AppSettings {
    let mut settings = fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<AppSettings>(&raw).ok())
        .unwrap_or_default();
    settings.normalize();
    settings
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(std::io::Error::other)?;
    fs::write(path, json)
}
