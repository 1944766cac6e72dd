//! Dictapad application binary - composition root.
//!
//! 1. Parse CLI arguments
//! 2. Load configuration from TOML
//! 3. Initialize tracing at the resolved log level
//! 4. Normalize a single fragment, or run a session script against a live
//!    gesture deletion engine, key pad and document

mod cli;
mod session;

use std::io::Read;
use std::sync::Arc;

use clap::Parser;

use dictapad_core::{DictapadConfig, HapticFeedback, NoopHaptics};
use dictapad_text::normalize;

use crate::cli::{CliArgs, Command};
use crate::session::TracingHaptics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing exists so its log level can apply; the
    // outcome is logged once the subscriber is up.
    let config_file = args.resolve_config_path();
    let loaded = DictapadConfig::load(&config_file);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => DictapadConfig::default(),
    };

    // Tracing. Logs go to stderr so stdout carries only the resulting text.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Dictapad v{}", env!("CARGO_PKG_VERSION"));
    match loaded {
        Ok(_) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Err(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Config not loaded, using defaults"
        ),
    }

    match args.command {
        Command::Normalize {
            lang,
            previous,
            fragment,
        } => {
            let language = lang.unwrap_or(config.text.language);
            let normalized = normalize(&fragment, &previous, language);
            println!("{normalized}");
        }
        Command::Session { lang, script } => {
            let source = match &script {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let steps = session::parse_script(&source)?;
            tracing::info!(steps = steps.len(), "Session script parsed");

            let haptics: Arc<dyn HapticFeedback> = if config.keyboard.haptics_enabled {
                Arc::new(TracingHaptics)
            } else {
                Arc::new(NoopHaptics)
            };
            let language = lang.unwrap_or(config.text.language);
            let document = session::run_script(&steps, &config, language, haptics).await;
            println!("{}", document.text());
        }
    }

    Ok(())
}
