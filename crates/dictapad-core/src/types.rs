use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DictapadError;

/// Dictation language. Selects the language-specific normalization rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Es, Language::Fr];

    /// Short code used in config files and on the command line.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
        }
    }

    /// Human-readable name, in the language itself.
    pub fn label(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::Fr => "Français",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = DictapadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "es" | "spanish" | "español" => Ok(Language::Es),
            "fr" | "french" | "français" => Ok(Language::Fr),
            other => Err(DictapadError::InvalidLanguage(other.to_string())),
        }
    }
}

/// A discrete edit the host applies to its document, in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditCommand {
    /// Insert a single character at the cursor.
    Char(char),
    /// Delete the character before the cursor.
    Backspace,
    /// Delete the word before the cursor.
    DeleteWord,
    /// Insert a line break.
    Enter,
    /// Insert a space.
    Space,
    /// Flip the case of the word before the cursor.
    ToggleCase,
}

impl fmt::Display for EditCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditCommand::Char(c) => write!(f, "CHAR({c:?})"),
            EditCommand::Backspace => write!(f, "BACKSPACE"),
            EditCommand::DeleteWord => write!(f, "DELETE_WORD"),
            EditCommand::Enter => write!(f, "ENTER"),
            EditCommand::Space => write!(f, "SPACE"),
            EditCommand::ToggleCase => write!(f, "TOGGLE_CASE"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
