//! Dictapad Keyboard crate - Virtual keyboard input: delete-key gestures and simple keys.
//!
//! The delete key runs a gesture state machine: a tap deletes one character,
//! holding it auto-repeats, and dragging left escalates to whole-word deletion
//! (Idle -> DeletingChar -> DeletingWord -> Idle). All keys report to the host
//! as an ordered stream of [`dictapad_core::EditCommand`]s.

pub mod engine;
pub mod keys;
pub mod state;

pub use engine::{DeletionSession, GestureDeletionEngine};
pub use keys::{Key, KeyPad, NUMBER_ROW, SYMBOL_ROW};
pub use state::{CharPhase, DeletionMachine, DeletionMode, DeletionState, Effect};
