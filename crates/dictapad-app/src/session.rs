//! Scripted editing session.
//!
//! Stands in for the touch UI: each script line is a pointer event on the
//! delete key, a simple key tap, a dictated fragment, or a pause. Keyboard
//! commands are applied to the document in emission order, and every
//! fragment is normalized against the text before the cursor.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use dictapad_core::{DictapadConfig, DictapadError, EditCommand, HapticFeedback, HapticPulse, Language, Result};
use dictapad_keyboard::{GestureDeletionEngine, Key, KeyPad};
use dictapad_text::Document;

/// One line of a session script.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    /// A dictated fragment, verbatim (leading spaces included).
    Say(String),
    Key(Key),
    Press(f64),
    Move(f64),
    Release,
    Wait(Duration),
    Lang(Language),
}

/// Parse a session script. Blank lines and `#` comments are skipped.
pub fn parse_script(source: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let line = line.trim_start();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let script_err = |message: String| DictapadError::Script {
            line: line_no,
            message,
        };

        let step = match verb {
            "say" => ScriptStep::Say(rest.to_string()),
            "key" => ScriptStep::Key(
                rest.trim()
                    .parse()
                    .map_err(|e: DictapadError| script_err(e.to_string()))?,
            ),
            "press" => ScriptStep::Press(parse_coordinate(rest).map_err(script_err)?),
            "move" => ScriptStep::Move(parse_coordinate(rest).map_err(script_err)?),
            "release" => ScriptStep::Release,
            "wait" => {
                let ms: u64 = rest
                    .trim()
                    .parse()
                    .map_err(|_| script_err(format!("expected milliseconds, got '{}'", rest.trim())))?;
                ScriptStep::Wait(Duration::from_millis(ms))
            }
            "lang" => ScriptStep::Lang(
                rest.trim()
                    .parse()
                    .map_err(|e: DictapadError| script_err(e.to_string()))?,
            ),
            other => return Err(script_err(format!("unknown step '{}'", other))),
        };
        steps.push(step);
    }

    Ok(steps)
}

fn parse_coordinate(s: &str) -> std::result::Result<f64, String> {
    let s = s.trim();
    s.parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .ok_or_else(|| format!("expected a coordinate, got '{}'", s))
}

/// Haptics that only log the request.
#[derive(Debug, Default)]
pub struct TracingHaptics;

impl HapticFeedback for TracingHaptics {
    fn pulse(&self, kind: HapticPulse, duration: Duration) {
        tracing::debug!(?kind, duration_ms = duration.as_millis() as u64, "Haptic pulse");
    }
}

/// Run `steps` against a fresh document and return it.
///
/// Must be called inside a tokio runtime: the delete key's auto-repeat runs
/// on tokio timers and `wait` steps sleep on them.
pub async fn run_script(
    steps: &[ScriptStep],
    config: &DictapadConfig,
    language: Language,
    haptics: Arc<dyn HapticFeedback>,
) -> Document {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let engine = GestureDeletionEngine::new(config.keyboard.clone(), tx.clone(), haptics.clone());
    let keypad = KeyPad::new(config.keyboard.clone(), tx, haptics);

    let mut document = Document::new();
    let mut language = language;
    let mut applied = 0usize;

    for step in steps {
        match step {
            ScriptStep::Say(fragment) => {
                applied += drain_commands(&mut rx, &mut document);
                let inserted = document.insert_dictation(fragment, language);
                tracing::debug!(%language, inserted = %inserted, "Dictation inserted");
            }
            ScriptStep::Key(key) => keypad.tap(*key),
            ScriptStep::Press(x) => engine.on_press(*x),
            ScriptStep::Move(x) => engine.on_move(*x),
            ScriptStep::Release => engine.on_release(),
            ScriptStep::Wait(duration) => tokio::time::sleep(*duration).await,
            ScriptStep::Lang(next) => {
                tracing::info!(from = %language, to = %next, "Dictation language changed");
                language = *next;
            }
        }
        applied += drain_commands(&mut rx, &mut document);
    }

    // A script that ends with the key still held releases it.
    engine.on_release();
    applied += drain_commands(&mut rx, &mut document);

    tracing::info!(
        steps = steps.len(),
        commands = applied,
        chars = document.text().chars().count(),
        "Session finished"
    );
    document
}

fn drain_commands(rx: &mut mpsc::UnboundedReceiver<EditCommand>, document: &mut Document) -> usize {
    let mut count = 0;
    while let Ok(command) = rx.try_recv() {
        document.apply(&command);
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use dictapad_core::NoopHaptics;

    async fn run(source: &str) -> String {
        let steps = parse_script(source).unwrap();
        let document = run_script(
            &steps,
            &DictapadConfig::default(),
            Language::En,
            Arc::new(NoopHaptics),
        )
        .await;
        document.text().to_string()
    }

    #[test]
    fn test_parse_script() {
        let steps = parse_script(
            "# warm up\n\nsay  hello there\nkey space\npress 120.5\nmove -3\nrelease\nwait 250\nlang fr\n",
        )
        .unwrap();

        assert_eq!(
            steps,
            vec![
                ScriptStep::Say(" hello there".to_string()),
                ScriptStep::Key(Key::Space),
                ScriptStep::Press(120.5),
                ScriptStep::Move(-3.0),
                ScriptStep::Release,
                ScriptStep::Wait(Duration::from_millis(250)),
                ScriptStep::Lang(Language::Fr),
            ]
        );
    }

    #[test]
    fn test_parse_script_crlf() {
        let steps = parse_script("release\r\nkey .\r\n").unwrap();
        assert_eq!(steps, vec![ScriptStep::Release, ScriptStep::Key(Key::Char('.'))]);
    }

    #[test]
    fn test_parse_errors_report_line() {
        let cases = [
            ("release\npress abc", 2),
            ("fly", 1),
            ("\n\nkey shift", 3),
            ("lang de", 1),
            ("wait soon", 1),
            ("move NaN", 1),
        ];
        for (source, expected_line) in cases {
            match parse_script(source) {
                Err(DictapadError::Script { line, .. }) => assert_eq!(line, expected_line, "{source}"),
                other => panic!("Expected script error for {:?}, got {:?}", source, other),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dictation_and_keys() {
        let text = run("key h\nkey i\nkey .\nsay  how are you\nkey ?\n").await;
        assert_eq!(text, "hi. How are you?");
    }

    #[tokio::test(start_paused = true)]
    async fn test_tap_delete_removes_one_char() {
        let text = run("say hello world.\npress 100\nrelease\n").await;
        assert_eq!(text, "Hello world");
    }

    #[tokio::test(start_paused = true)]
    async fn test_held_delete_auto_repeats() {
        let text = run("say hello world.\npress 100\nwait 950\nrelease\n").await;
        assert_eq!(text, "Hello w");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drag_deletes_words() {
        let text = run("say i think it works\npress 200\nmove 150\nmove 100\nwait 1000\nrelease\n").await;
        assert_eq!(text, "I think ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreleased_key_is_released_at_end() {
        let text = run("say abc\npress 0\n").await;
        assert_eq!(text, "Ab");
    }

    #[tokio::test(start_paused = true)]
    async fn test_language_switch() {
        let text = run("lang es\nsay hola¿qué tal ?\n").await;
        assert_eq!(text, "Hola ¿qué tal?");
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_before_dictation_are_applied_first() {
        let text = run("say done\nkey .\nsay next\n").await;
        assert_eq!(text, "Done.Next");
    }
}
