use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::puzzle::{Mode, PLACEHOLDER};

pub const LOCALES: &[&str] = &["fr", "en"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_lexicon")]
    pub lexicon: String,
    #[serde(default = "default_mode")]
    pub mode: Mode,
    #[serde(default = "default_placeholder")]
    pub placeholder: char,
    #[serde(default = "default_timer_secs")]
    pub timer_secs: u64,
    #[serde(default = "default_auto_timer")]
    pub auto_timer: bool,
    #[serde(default = "default_auto_images")]
    pub auto_images: bool,
    #[serde(default = "default_image_delay_ms")]
    pub image_delay_ms: u64,
    #[serde(default = "default_lookups_enabled")]
    pub lookups_enabled: bool,
    #[serde(default = "default_wiki_language")]
    pub wiki_language: String,
    #[serde(default = "default_wiki_topic_hint")]
    pub wiki_topic_hint: String,
}

fn default_locale() -> String {
    "fr".to_string()
}
fn default_theme() -> String {
    "clinic".to_string()
}
fn default_lexicon() -> String {
    "anatomie".to_string()
}
fn default_mode() -> Mode {
    Mode::Flashcard
}
fn default_placeholder() -> char {
    PLACEHOLDER
}
fn default_timer_secs() -> u64 {
    30
}
fn default_auto_timer() -> bool {
    false
}
fn default_auto_images() -> bool {
    true
}
fn default_image_delay_ms() -> u64 {
    1000
}
fn default_lookups_enabled() -> bool {
    true
}
fn default_wiki_language() -> String {
    "fr".to_string()
}
fn default_wiki_topic_hint() -> String {
    "anatomie".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            theme: default_theme(),
            lexicon: default_lexicon(),
            mode: default_mode(),
            placeholder: default_placeholder(),
            timer_secs: default_timer_secs(),
            auto_timer: default_auto_timer(),
            auto_images: default_auto_images(),
            image_delay_ms: default_image_delay_ms(),
            lookups_enabled: default_lookups_enabled(),
            wiki_language: default_wiki_language(),
            wiki_topic_hint: default_wiki_topic_hint(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("anatolexic")
            .join("config.toml")
    }

    /// Clamp numeric ranges and reset values the app cannot use.
    pub fn validate(&mut self) {
        if !LOCALES.contains(&self.locale.as_str()) {
            self.locale = default_locale();
        }
        self.timer_secs = self.timer_secs.clamp(5, 600);
        self.image_delay_ms = self.image_delay_ms.min(10_000);
        if self.placeholder.is_alphanumeric() || self.placeholder.is_whitespace() {
            self.placeholder = default_placeholder();
        }
        if self.wiki_language.is_empty()
            || !self.wiki_language.chars().all(|c| c.is_ascii_lowercase())
        {
            self.wiki_language = default_wiki_language();
        }
        if self.lexicon.trim().is_empty() {
            self.lexicon = default_lexicon();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.locale, "fr");
        assert_eq!(config.mode, Mode::Flashcard);
        assert_eq!(config.placeholder, '_');
        assert_eq!(config.timer_secs, 30);
        assert!(!config.auto_timer);
        assert!(config.auto_images);
        assert_eq!(config.image_delay_ms, 1000);
    }

    #[test]
    fn test_config_partial_file_keeps_defaults() {
        let toml_str = r#"
locale = "en"
mode = "scramble"
timer_secs = 45
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.locale, "en");
        assert_eq!(config.mode, Mode::Scramble);
        assert_eq!(config.timer_secs, 45);
        assert_eq!(config.lexicon, "anatomie");
        assert!(config.lookups_enabled);
    }

    #[test]
    fn test_validate_clamps_and_resets() {
        let mut config = Config {
            locale: "de".to_string(),
            timer_secs: 0,
            image_delay_ms: 60_000,
            placeholder: 'x',
            wiki_language: "FR!".to_string(),
            lexicon: "  ".to_string(),
            ..Config::default()
        };
        config.validate();
        assert_eq!(config.locale, "fr");
        assert_eq!(config.timer_secs, 5);
        assert_eq!(config.image_delay_ms, 10_000);
        assert_eq!(config.placeholder, '_');
        assert_eq!(config.wiki_language, "fr");
        assert_eq!(config.lexicon, "anatomie");
    }

    #[test]
    fn test_save_then_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            locale: "en".to_string(),
            auto_timer: true,
            placeholder: '•',
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.locale, "en");
        assert!(loaded.auto_timer);
        assert_eq!(loaded.placeholder, '•');
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.lexicon, "anatomie");
    }

    #[test]
    fn test_load_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timer_secs = \"soon\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
