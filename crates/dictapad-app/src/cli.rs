//! CLI argument definitions for the Dictapad application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dictapad_core::Language;

/// Dictapad: dictation cleanup and virtual keyboard editing.
#[derive(Parser, Debug)]
#[command(name = "dictapad", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Normalize one dictated fragment and print it.
    Normalize {
        /// Dictation language (en, es, fr). Defaults to the configured one.
        #[arg(short = 'L', long = "lang")]
        lang: Option<Language>,

        /// Existing document text the fragment will follow.
        #[arg(short = 'p', long = "previous", default_value = "")]
        previous: String,

        /// The dictated fragment.
        fragment: String,
    },

    /// Run a session script against a live keyboard and document.
    ///
    /// One step per line: `say <text>`, `key <name>`, `press <x>`,
    /// `move <x>`, `release`, `wait <ms>`, `lang <code>`. Lines starting
    /// with `#` are comments.
    Session {
        /// Initial dictation language (en, es, fr). Defaults to the configured one.
        #[arg(short = 'L', long = "lang")]
        lang: Option<Language>,

        /// Script file. Reads stdin when omitted.
        #[arg(short = 's', long = "script")]
        script: Option<PathBuf>,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > DICTAPAD_CONFIG env var > platform default (~/.dictapad/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("DICTAPAD_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".dictapad").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".dictapad").join("config.toml");
    }
    PathBuf::from("config.toml")
}
