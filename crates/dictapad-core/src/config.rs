use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DictapadError, Result};
use crate::haptics::HapticPulse;
use crate::types::Language;

/// Top-level configuration for Dictapad.
///
/// Loaded from `~/.dictapad/config.toml` by default. Every section is
/// optional; missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictapadConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    #[serde(default)]
    pub text: TextConfig,
}

impl DictapadConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DictapadConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DictapadError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Virtual keyboard timing and gesture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// How long the delete key must be held before auto-repeat starts.
    pub initial_delay_ms: u64,
    /// Interval between auto-repeated character deletions.
    pub repeat_interval_ms: u64,
    /// Leftward drag distance that deletes a word.
    pub word_threshold: f64,
    /// Pulse length for a word deletion.
    pub word_haptic_ms: u64,
    /// Pulse length for a character key tap.
    pub key_haptic_ms: u64,
    /// Request haptic pulses at all.
    pub haptics_enabled: bool,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            repeat_interval_ms: 100,
            word_threshold: 35.0,
            word_haptic_ms: 20,
            key_haptic_ms: 5,
            haptics_enabled: true,
        }
    }
}

impl KeyboardConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn repeat_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic.
        Duration::from_millis(self.repeat_interval_ms.max(1))
    }

    /// Pulse length for the given kind of feedback.
    pub fn haptic_duration(&self, kind: HapticPulse) -> Duration {
        match kind {
            HapticPulse::KeyTap => Duration::from_millis(self.key_haptic_ms),
            HapticPulse::WordDelete => Duration::from_millis(self.word_haptic_ms),
        }
    }
}

/// Text normalization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Default dictation language.
    pub language: Language,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = DictapadConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.keyboard.initial_delay_ms, 500);
        assert_eq!(config.keyboard.repeat_interval_ms, 100);
        assert_eq!(config.keyboard.word_threshold, 35.0);
        assert_eq!(config.keyboard.word_haptic_ms, 20);
        assert_eq!(config.keyboard.key_haptic_ms, 5);
        assert!(config.keyboard.haptics_enabled);
        assert_eq!(config.text.language, Language::En);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[keyboard]
initial_delay_ms = 400
repeat_interval_ms = 80
word_threshold = 50.0
haptics_enabled = false

[text]
language = "es"
"#;
        let file = create_temp_config(content);
        let config = DictapadConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.keyboard.initial_delay_ms, 400);
        assert_eq!(config.keyboard.repeat_interval_ms, 80);
        assert_eq!(config.keyboard.word_threshold, 50.0);
        assert!(!config.keyboard.haptics_enabled);
        // Unset fields keep their defaults.
        assert_eq!(config.keyboard.word_haptic_ms, 20);
        assert_eq!(config.text.language, Language::Es);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let file = create_temp_config("[general]\nlog_level = \"warn\"\n");
        let config = DictapadConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.keyboard, KeyboardConfig::default());
    }

    #[test]
    fn test_load_invalid_language_fails() {
        let file = create_temp_config("[text]\nlanguage = \"de\"\n");
        let result = DictapadConfig::load(file.path());
        assert!(matches!(result, Err(DictapadError::Config(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = DictapadConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_load_or_default_invalid_toml() {
        let file = create_temp_config("this is [[[ not toml");
        let config = DictapadConfig::load_or_default(file.path());
        assert_eq!(config.keyboard.initial_delay_ms, 500);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = DictapadConfig::default();
        config.text.language = Language::Fr;
        config.keyboard.word_threshold = 42.5;
        config.save(&path).unwrap();

        let reloaded = DictapadConfig::load(&path).unwrap();
        assert_eq!(reloaded.text.language, Language::Fr);
        assert_eq!(reloaded.keyboard.word_threshold, 42.5);
    }

    #[test]
    fn test_keyboard_durations() {
        let config = KeyboardConfig::default();
        assert_eq!(config.initial_delay(), Duration::from_millis(500));
        assert_eq!(config.repeat_interval(), Duration::from_millis(100));
        assert_eq!(
            config.haptic_duration(HapticPulse::WordDelete),
            Duration::from_millis(20)
        );
        assert_eq!(
            config.haptic_duration(HapticPulse::KeyTap),
            Duration::from_millis(5)
        );
    }

    #[test]
    fn test_zero_repeat_interval_is_clamped() {
        let config = KeyboardConfig {
            repeat_interval_ms: 0,
            ..KeyboardConfig::default()
        };
        assert_eq!(config.repeat_interval(), Duration::from_millis(1));
    }
}
