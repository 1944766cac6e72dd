//! Haptic feedback capability.
//!
//! The keyboard asks for short vibration pulses as feedback. Platforms
//! without a vibration motor plug in [`NoopHaptics`]; a missing capability
//! never changes which edit commands are emitted.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The reason a pulse was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticPulse {
    /// A simple character key was tapped.
    KeyTap,
    /// A drag on the delete key removed a word.
    WordDelete,
}

/// Best-effort vibration output.
pub trait HapticFeedback: Send + Sync {
    /// Request a single pulse of the given length.
    fn pulse(&self, kind: HapticPulse, duration: Duration);
}

/// Haptics for environments that have none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHaptics;

impl HapticFeedback for NoopHaptics {
    fn pulse(&self, _kind: HapticPulse, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_noop_haptics_accepts_pulses() {
        let haptics: Arc<dyn HapticFeedback> = Arc::new(NoopHaptics);
        haptics.pulse(HapticPulse::KeyTap, Duration::from_millis(5));
        haptics.pulse(HapticPulse::WordDelete, Duration::from_millis(20));
    }

    #[test]
    fn test_pulse_kind_serialization() {
        let json = serde_json::to_string(&HapticPulse::WordDelete).unwrap();
        assert_eq!(json, "\"word_delete\"");
    }
}
