//! Visibility trigger events for Prism
//!
//! Every source that wants to change the overlay's visibility (global hotkey,
//! focus-loss notification, tray item, IPC command) builds a `ToggleEvent` at
//! the trigger site and submits it to the controller channel. Each event is
//! consumed exactly once and then dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Process-wide sequence counter, diagnostics only
static NEXT_SEQ: AtomicU64 = AtomicU64::new(1);

/// What raised a visibility event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The global hotkey was pressed
    HotkeyPressed,
    /// The overlay window lost input focus, for any reason including our own
    /// `hide()` call
    FocusLost,
    /// An external collaborator (tray item, IPC command) asked to show
    ShowRequested,
    /// An external collaborator asked to hide (Escape in the frontend)
    HideRequested,
}

/// One visibility event, tagged with a monotonic sequence number and the
/// instant it was raised. Both extra fields are for diagnostics; transition
/// decisions never read them.
#[derive(Debug, Clone, Copy)]
pub struct ToggleEvent {
    pub trigger: Trigger,
    pub seq: u64,
    pub raised_at: Instant,
}

impl ToggleEvent {
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            seq: NEXT_SEQ.fetch_add(1, Ordering::Relaxed),
            raised_at: Instant::now(),
        }
    }
}
