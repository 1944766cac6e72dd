//! Simple (non-gesture) keys of the virtual keyboard.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::mpsc;

use dictapad_core::config::KeyboardConfig;
use dictapad_core::{DictapadError, EditCommand, HapticFeedback, HapticPulse};

/// Digits shown on the optional number row.
pub const NUMBER_ROW: [char; 10] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '0'];

/// Symbols on the scrollable strip above the action row.
pub const SYMBOL_ROW: [char; 25] = [
    ':', ';', '*', '-', '_', '¡', '!', '¿', '?', '#', '@', '&', '€', '\'', '|', '[', ']', '(',
    ')', '{', '}', '/', '\\', '<', '>',
];

/// A tap on a key that is not the delete key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Any character key: digits, symbols, `.` and `,`.
    Char(char),
    Space,
    Enter,
    /// The `Aa` key.
    ToggleCase,
}

impl Key {
    /// The command this key sends to the host.
    pub fn command(&self) -> EditCommand {
        match self {
            Key::Char(c) => EditCommand::Char(*c),
            Key::Space => EditCommand::Space,
            Key::Enter => EditCommand::Enter,
            Key::ToggleCase => EditCommand::ToggleCase,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Space => write!(f, "space"),
            Key::Enter => write!(f, "enter"),
            Key::ToggleCase => write!(f, "case"),
        }
    }
}

impl FromStr for Key {
    type Err = DictapadError;

    /// Parses `space`, `enter`, `case` (or `aa`), or a single character.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "space" => return Ok(Key::Space),
            "enter" => return Ok(Key::Enter),
            "case" | "aa" | "Aa" => return Ok(Key::ToggleCase),
            _ => {}
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Key::Char(c)),
            _ => Err(DictapadError::InvalidKey(s.to_string())),
        }
    }
}

/// Sends simple key taps to the host, with a short pulse on character keys.
pub struct KeyPad {
    config: KeyboardConfig,
    commands: mpsc::UnboundedSender<EditCommand>,
    haptics: Arc<dyn HapticFeedback>,
}

impl KeyPad {
    pub fn new(
        config: KeyboardConfig,
        commands: mpsc::UnboundedSender<EditCommand>,
        haptics: Arc<dyn HapticFeedback>,
    ) -> Self {
        Self {
            config,
            commands,
            haptics,
        }
    }

    /// Handle one tap.
    pub fn tap(&self, key: Key) {
        let command = key.command();
        tracing::trace!(%key, %command, "Key tapped");
        if self.commands.send(command).is_err() {
            tracing::debug!(%key, "Command receiver dropped, key discarded");
        }

        if matches!(key, Key::Char(_)) && self.config.haptics_enabled {
            let kind = HapticPulse::KeyTap;
            self.haptics.pulse(kind, self.config.haptic_duration(kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingHaptics {
        pulses: Mutex<Vec<(HapticPulse, Duration)>>,
    }

    impl HapticFeedback for RecordingHaptics {
        fn pulse(&self, kind: HapticPulse, duration: Duration) {
            self.pulses.lock().unwrap().push((kind, duration));
        }
    }

    fn keypad() -> (
        KeyPad,
        mpsc::UnboundedReceiver<EditCommand>,
        Arc<RecordingHaptics>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let haptics = Arc::new(RecordingHaptics::default());
        let pad = KeyPad::new(KeyboardConfig::default(), tx, haptics.clone());
        (pad, rx, haptics)
    }

    #[test]
    fn test_key_commands() {
        assert_eq!(Key::Char('.').command(), EditCommand::Char('.'));
        assert_eq!(Key::Space.command(), EditCommand::Space);
        assert_eq!(Key::Enter.command(), EditCommand::Enter);
        assert_eq!(Key::ToggleCase.command(), EditCommand::ToggleCase);
    }

    #[test]
    fn test_key_from_str() {
        assert_eq!("space".parse::<Key>().unwrap(), Key::Space);
        assert_eq!("enter".parse::<Key>().unwrap(), Key::Enter);
        assert_eq!("Aa".parse::<Key>().unwrap(), Key::ToggleCase);
        assert_eq!("¿".parse::<Key>().unwrap(), Key::Char('¿'));
        assert_eq!("7".parse::<Key>().unwrap(), Key::Char('7'));
    }

    #[test]
    fn test_key_from_str_rejects_unknown() {
        assert!(matches!(
            "shift".parse::<Key>(),
            Err(DictapadError::InvalidKey(_))
        ));
        assert!("".parse::<Key>().is_err());
    }

    #[test]
    fn test_key_display_parses_back() {
        for key in [Key::Space, Key::Enter, Key::ToggleCase, Key::Char('€')] {
            assert_eq!(key.to_string().parse::<Key>().unwrap(), key);
        }
    }

    #[test]
    fn test_key_tables() {
        assert_eq!(NUMBER_ROW.len(), 10);
        assert!(SYMBOL_ROW.contains(&'¿'));
        assert!(SYMBOL_ROW.contains(&'¡'));
        assert!(!SYMBOL_ROW.contains(&'.'));
    }

    #[test]
    fn test_char_tap_emits_and_pulses() {
        let (pad, mut rx, haptics) = keypad();
        pad.tap(Key::Char(','));

        assert_eq!(rx.try_recv().unwrap(), EditCommand::Char(','));
        assert_eq!(
            *haptics.pulses.lock().unwrap(),
            vec![(HapticPulse::KeyTap, Duration::from_millis(5))]
        );
    }

    #[test]
    fn test_action_keys_do_not_pulse() {
        let (pad, mut rx, haptics) = keypad();
        pad.tap(Key::Space);
        pad.tap(Key::Enter);
        pad.tap(Key::ToggleCase);

        assert_eq!(rx.try_recv().unwrap(), EditCommand::Space);
        assert_eq!(rx.try_recv().unwrap(), EditCommand::Enter);
        assert_eq!(rx.try_recv().unwrap(), EditCommand::ToggleCase);
        assert!(haptics.pulses.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tap_after_receiver_dropped() {
        let (pad, rx, haptics) = keypad();
        drop(rx);
        pad.tap(Key::Char('a'));
        // Feedback still happens; the edit is just lost.
        assert_eq!(haptics.pulses.lock().unwrap().len(), 1);
    }
}
