//! Gesture deletion engine driving the delete-key state machine.
//!
//! The `GestureDeletionEngine` feeds pointer events into a [`DeletionMachine`]
//! and carries out the effects it returns: commands go to the host over an
//! ordered channel, the active flag goes out on a `watch` channel, and the
//! initial-delay/auto-repeat timer runs as one tokio task per session.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

use dictapad_core::config::KeyboardConfig;
use dictapad_core::{EditCommand, HapticFeedback, HapticPulse};

use crate::state::{DeletionMachine, DeletionMode, DeletionState, Effect};

/// Bookkeeping for one continuous contact with the delete key.
#[derive(Debug, Clone)]
pub struct DeletionSession {
    /// Unique identifier for this session.
    pub id: Uuid,
    /// When the pointer went down.
    pub start_time: DateTime<Utc>,
    /// Where the pointer went down.
    pub start_x: f64,
    /// Character deletions emitted so far.
    pub chars_deleted: u32,
    /// Word deletions emitted so far.
    pub words_deleted: u32,
}

impl DeletionSession {
    fn new(start_x: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time: Utc::now(),
            start_x,
            chars_deleted: 0,
            words_deleted: 0,
        }
    }

    /// Milliseconds since the pointer went down.
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.start_time).num_milliseconds()
    }
}

struct Inner {
    machine: DeletionMachine,
    session: Option<DeletionSession>,
    timer: Option<JoinHandle<()>>,
}

struct EngineCore {
    inner: Mutex<Inner>,
    config: KeyboardConfig,
    commands: mpsc::UnboundedSender<EditCommand>,
    active: watch::Sender<bool>,
    haptics: Arc<dyn HapticFeedback>,
}

impl EngineCore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The state is plain data and every transition leaves it consistent,
        // so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Carry out `effects` under the lock. Haptic requests are returned
    /// instead of fired; pass them to [`EngineCore::pulse`] once the guard
    /// is dropped.
    #[must_use]
    fn apply(self: &Arc<Self>, inner: &mut Inner, effects: Vec<Effect>) -> Vec<HapticPulse> {
        let mut pulses = Vec::new();
        for effect in effects {
            match effect {
                Effect::Emit(command) => {
                    if let Some(session) = inner.session.as_mut() {
                        match command {
                            EditCommand::Backspace => session.chars_deleted += 1,
                            EditCommand::DeleteWord => session.words_deleted += 1,
                            _ => {}
                        }
                    }
                    tracing::trace!(%command, "Emitting edit command");
                    if self.commands.send(command).is_err() {
                        tracing::debug!("Command receiver dropped, edit discarded");
                    }
                }
                Effect::ArmRepeat => {
                    if let Some(session_id) = inner.session.as_ref().map(|s| s.id) {
                        inner.timer = self.spawn_repeat(session_id);
                    }
                }
                Effect::CancelRepeat => {
                    if let Some(timer) = inner.timer.take() {
                        timer.abort();
                    }
                }
                Effect::Haptic(kind) => {
                    if self.config.haptics_enabled {
                        pulses.push(kind);
                    }
                }
                Effect::SetActive(active) => {
                    self.active.send_replace(active);
                }
            }
        }
        pulses
    }

    /// Fire haptics collected by [`EngineCore::apply`]. Must not be called
    /// with the state lock held.
    fn pulse(&self, pulses: Vec<HapticPulse>) {
        for kind in pulses {
            self.haptics.pulse(kind, self.config.haptic_duration(kind));
        }
    }

    fn spawn_repeat(self: &Arc<Self>, session_id: Uuid) -> Option<JoinHandle<()>> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => Some(handle.spawn(run_repeat(Arc::clone(self), session_id))),
            Err(_) => {
                tracing::warn!(
                    session_id = %session_id,
                    "No tokio runtime available, auto-repeat disabled for this session"
                );
                None
            }
        }
    }

    /// Run a timer-driven transition for `session_id`.
    ///
    /// Returns whether the timer should keep running. A timer that outlived
    /// its session never touches the machine.
    fn step(
        self: &Arc<Self>,
        session_id: Uuid,
        transition: fn(&mut DeletionMachine) -> Vec<Effect>,
    ) -> bool {
        let (keep_running, pulses) = {
            let mut inner = self.lock();
            if inner.session.as_ref().map(|s| s.id) != Some(session_id) {
                return false;
            }
            let effects = transition(&mut inner.machine);
            let pulses = self.apply(&mut inner, effects);
            (inner.machine.mode() == Some(DeletionMode::Char), pulses)
        };
        self.pulse(pulses);
        keep_running
    }
}

async fn run_repeat(core: Arc<EngineCore>, session_id: Uuid) {
    tokio::time::sleep(core.config.initial_delay()).await;
    if !core.step(session_id, DeletionMachine::delay_elapsed) {
        return;
    }
    tracing::debug!(session_id = %session_id, "Delete key auto-repeat started");

    let period = core.config.repeat_interval();
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if !core.step(session_id, DeletionMachine::repeat_tick) {
            return;
        }
    }
}

/// Translates pointer events on the delete key into edit commands.
///
/// Pointer handlers never fail: presses during an open session, moves
/// without a session and repeated releases are ignored. Auto-repeat needs a
/// tokio runtime; without one a press still deletes a single character.
pub struct GestureDeletionEngine {
    core: Arc<EngineCore>,
}

impl std::fmt::Debug for GestureDeletionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.core.lock();
        f.debug_struct("GestureDeletionEngine")
            .field("state", &inner.machine.state())
            .field("session", &inner.session)
            .field("has_timer", &inner.timer.is_some())
            .finish()
    }
}

impl GestureDeletionEngine {
    /// Create an idle engine that sends its commands to `commands`.
    pub fn new(
        config: KeyboardConfig,
        commands: mpsc::UnboundedSender<EditCommand>,
        haptics: Arc<dyn HapticFeedback>,
    ) -> Self {
        let (active, _) = watch::channel(false);
        let machine = DeletionMachine::new(config.word_threshold);
        Self {
            core: Arc::new(EngineCore {
                inner: Mutex::new(Inner {
                    machine,
                    session: None,
                    timer: None,
                }),
                config,
                commands,
                active,
                haptics,
            }),
        }
    }

    /// Pointer down on the delete key at horizontal position `x`.
    pub fn on_press(&self, x: f64) {
        let pulses = {
            let mut inner = self.core.lock();
            if inner.machine.is_active() {
                tracing::debug!(x, "Delete key pressed during an open session, ignored");
                return;
            }

            let session = DeletionSession::new(x);
            tracing::info!(session_id = %session.id, x, "Delete session started");
            inner.session = Some(session);

            let effects = inner.machine.press(x);
            self.core.apply(&mut inner, effects)
        };
        self.core.pulse(pulses);
    }

    /// Pointer moved to `x` while captured by the delete key.
    pub fn on_move(&self, x: f64) {
        let pulses = {
            let mut inner = self.core.lock();
            let before = inner.machine.mode();
            let effects = inner.machine.move_to(x);
            if effects.is_empty() {
                return;
            }

            if before == Some(DeletionMode::Char) {
                if let Some(session) = inner.session.as_ref() {
                    tracing::debug!(session_id = %session.id, x, "Delete session switched to word mode");
                }
            }
            self.core.apply(&mut inner, effects)
        };
        self.core.pulse(pulses);
    }

    /// Pointer released, left the key, lost capture, or was cancelled.
    pub fn on_release(&self) {
        let pulses = {
            let mut inner = self.core.lock();
            let effects = inner.machine.release();
            let pulses = self.core.apply(&mut inner, effects);

            if let Some(session) = inner.session.take() {
                tracing::info!(
                    session_id = %session.id,
                    elapsed_ms = session.elapsed_ms(),
                    chars_deleted = session.chars_deleted,
                    words_deleted = session.words_deleted,
                    "Delete session ended"
                );
            }
            pulses
        };
        self.core.pulse(pulses);
    }

    /// Whether the delete key is currently held.
    pub fn is_active(&self) -> bool {
        self.core.lock().machine.is_active()
    }

    /// Mode of the open session, `None` when idle.
    pub fn mode(&self) -> Option<DeletionMode> {
        self.core.lock().machine.mode()
    }

    pub fn state(&self) -> DeletionState {
        self.core.lock().machine.state()
    }

    /// A clone of the open session, if any.
    pub fn current_session(&self) -> Option<DeletionSession> {
        self.core.lock().session.clone()
    }

    /// Presentation signal: `true` while the delete key is held.
    pub fn subscribe_active(&self) -> watch::Receiver<bool> {
        self.core.active.subscribe()
    }
}

impl Drop for GestureDeletionEngine {
    fn drop(&mut self) {
        if let Some(timer) = self.core.lock().timer.take() {
            timer.abort();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
