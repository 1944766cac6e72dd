//! Delete-key gesture state machine.
//!
//! One pointer contact on the delete key is a session:
//! - Idle -> DeletingChar (press)
//! - DeletingChar(Waiting) -> DeletingChar(Repeating) (initial delay elapsed)
//! - DeletingChar -> DeletingWord (leftward drag past the threshold)
//! - DeletingChar | DeletingWord -> Idle (release, leave, capture loss)
//!
//! Every transition function is total. Calls that make no sense in the
//! current state return no effects and leave the state untouched. Timers are
//! never owned here: the machine asks for them through [`Effect`] values and
//! the driver in [`crate::engine`] carries them out.

use std::fmt;

use dictapad_core::{EditCommand, HapticPulse};

/// Deletion granularity of an open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeletionMode {
    Char,
    Word,
}

impl fmt::Display for DeletionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletionMode::Char => write!(f, "Char"),
            DeletionMode::Word => write!(f, "Word"),
        }
    }
}

/// Auto-repeat progress while deleting characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharPhase {
    /// Pressed, initial delay still pending.
    Waiting,
    /// Initial delay elapsed, deleting on every repeat tick.
    Repeating,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeletionState {
    /// No pointer on the delete key.
    Idle,
    /// Deleting single characters.
    DeletingChar { reference_x: f64, phase: CharPhase },
    /// Deleting whole words. Never goes back to `DeletingChar`.
    DeletingWord { reference_x: f64 },
}

impl fmt::Display for DeletionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletionState::Idle => write!(f, "Idle"),
            DeletionState::DeletingChar { phase, .. } => write!(f, "DeletingChar({phase:?})"),
            DeletionState::DeletingWord { .. } => write!(f, "DeletingWord"),
        }
    }
}

/// Side effect requested by a transition, in the order it must happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a command to the host.
    Emit(EditCommand),
    /// Start the initial-delay timer that leads into auto-repeat.
    ArmRepeat,
    /// Stop the initial-delay or auto-repeat timer.
    CancelRepeat,
    /// Ask for a vibration pulse.
    Haptic(HapticPulse),
    /// Update the presentation signal.
    SetActive(bool),
}

/// The gesture state machine for the delete key.
#[derive(Debug, Clone)]
pub struct DeletionMachine {
    state: DeletionState,
    word_threshold: f64,
}

impl DeletionMachine {
    /// Create an idle machine. A leftward drag longer than `word_threshold`
    /// deletes a word.
    pub fn new(word_threshold: f64) -> Self {
        Self {
            state: DeletionState::Idle,
            word_threshold: word_threshold.abs(),
        }
    }

    pub fn state(&self) -> DeletionState {
        self.state
    }

    /// Whether a session is open.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, DeletionState::Idle)
    }

    /// Mode of the open session, `None` when idle.
    pub fn mode(&self) -> Option<DeletionMode> {
        match self.state {
            DeletionState::Idle => None,
            DeletionState::DeletingChar { .. } => Some(DeletionMode::Char),
            DeletionState::DeletingWord { .. } => Some(DeletionMode::Word),
        }
    }

    /// Pointer down on the delete key. Ignored while a session is open.
    pub fn press(&mut self, x: f64) -> Vec<Effect> {
        match self.state {
            DeletionState::Idle => {
                self.state = DeletionState::DeletingChar {
                    reference_x: x,
                    phase: CharPhase::Waiting,
                };
                vec![
                    Effect::SetActive(true),
                    Effect::Emit(EditCommand::Backspace),
                    Effect::ArmRepeat,
                ]
            }
            _ => Vec::new(),
        }
    }

    /// Pointer moved to `x` while captured.
    pub fn move_to(&mut self, x: f64) -> Vec<Effect> {
        match self.state {
            DeletionState::Idle => Vec::new(),
            DeletionState::DeletingChar { reference_x, .. } => {
                if !self.crossed(reference_x, x) {
                    return Vec::new();
                }
                self.state = DeletionState::DeletingWord { reference_x: x };
                vec![
                    Effect::CancelRepeat,
                    Effect::Emit(EditCommand::DeleteWord),
                    Effect::Haptic(HapticPulse::WordDelete),
                ]
            }
            DeletionState::DeletingWord { reference_x } => {
                if !self.crossed(reference_x, x) {
                    return Vec::new();
                }
                self.state = DeletionState::DeletingWord { reference_x: x };
                vec![
                    Effect::Emit(EditCommand::DeleteWord),
                    Effect::Haptic(HapticPulse::WordDelete),
                ]
            }
        }
    }

    /// Pointer released, left the key, or lost capture. Idempotent.
    pub fn release(&mut self) -> Vec<Effect> {
        let previous = std::mem::replace(&mut self.state, DeletionState::Idle);
        match previous {
            DeletionState::Idle => Vec::new(),
            DeletionState::DeletingChar { .. } => {
                vec![Effect::CancelRepeat, Effect::SetActive(false)]
            }
            DeletionState::DeletingWord { .. } => vec![Effect::SetActive(false)],
        }
    }

    /// The initial delay elapsed.
    pub fn delay_elapsed(&mut self) -> Vec<Effect> {
        if let DeletionState::DeletingChar {
            reference_x,
            phase: CharPhase::Waiting,
        } = self.state
        {
            self.state = DeletionState::DeletingChar {
                reference_x,
                phase: CharPhase::Repeating,
            };
        }
        Vec::new()
    }

    /// An auto-repeat interval elapsed.
    pub fn repeat_tick(&mut self) -> Vec<Effect> {
        match self.state {
            DeletionState::DeletingChar {
                phase: CharPhase::Repeating,
                ..
            } => vec![Effect::Emit(EditCommand::Backspace)],
            _ => Vec::new(),
        }
    }

    fn crossed(&self, reference_x: f64, x: f64) -> bool {
        x - reference_x < -self.word_threshold
    }
}

impl Default for DeletionMachine {
    fn default() -> Self {
        Self::new(35.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
