//! Visibility state machine for the Prism overlay
//!
//! Three independent sources race to change the overlay's visibility: the
//! global hotkey fires on its own dispatch context, the window system delivers
//! focus-loss notifications on the UI loop, and tray/IPC requests arrive from
//! wherever Tauri runs their handlers. All of them funnel into one unbounded
//! channel drained by a single task, so transitions are applied one at a time,
//! in arrival order, against the controller's own committed state.
//!
//! Hiding the window makes the OS emit a focus-loss notification for the hide
//! we just issued. The `Hidden` x `FocusLost` row is a no-op precisely so that
//! echo is absorbed without debouncing or suppression flags.

use tokio::sync::mpsc;

use crate::events::{ToggleEvent, Trigger};
use crate::overlay::OverlayWindow;

/// Committed visibility of the overlay window.
///
/// Authoritative for all transition decisions; the OS view (`is_visible`) may
/// lag behind and is only compared for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityState {
    Visible,
    Hidden,
}

/// Cloneable submission side of the controller channel.
#[derive(Clone)]
pub struct VisibilityHandle {
    tx: mpsc::UnboundedSender<ToggleEvent>,
}

impl VisibilityHandle {
    /// Raise a trigger. Events submitted after the controller task has gone
    /// away are dropped; a late command during teardown is expected, not an
    /// error.
    pub fn submit(&self, trigger: Trigger) {
        if self.tx.send(ToggleEvent::new(trigger)).is_err() {
            tracing::trace!(?trigger, "visibility controller gone, event dropped");
        }
    }
}

/// Create the controller channel. The receiver side is handed to [`run`].
pub fn channel() -> (VisibilityHandle, mpsc::UnboundedReceiver<ToggleEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (VisibilityHandle { tx }, rx)
}

/// The state machine. Owns the committed state and the window handle; lives
/// inside the consumer task and is never shared.
pub struct VisibilityController<W: OverlayWindow> {
    window: W,
    state: VisibilityState,
}

impl<W: OverlayWindow> VisibilityController<W> {
    /// The overlay starts out of sight.
    pub fn new(window: W) -> Self {
        Self {
            window,
            state: VisibilityState::Hidden,
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Apply one event against the committed state.
    ///
    /// Window calls are non-blocking commands; the next state is committed
    /// without waiting for the OS to confirm anything.
    pub fn apply(&mut self, event: ToggleEvent) {
        use Trigger::*;
        use VisibilityState::*;

        tracing::trace!(
            seq = event.seq,
            trigger = ?event.trigger,
            state = ?self.state,
            queued_us = event.raised_at.elapsed().as_micros() as u64,
            "applying visibility event"
        );

        self.state = match (self.state, event.trigger) {
            (Hidden, HotkeyPressed) | (Hidden, ShowRequested) => {
                self.window.show();
                self.window.focus();
                Visible
            }
            (Visible, HotkeyPressed) | (Visible, HideRequested) | (Visible, FocusLost) => {
                self.window.hide();
                Hidden
            }
            (Visible, ShowRequested) => {
                // Already visible, just raise it again.
                self.window.focus();
                Visible
            }
            // Includes the focus-loss echo of our own hide(): already hidden,
            // nothing to do.
            (Hidden, FocusLost) | (Hidden, HideRequested) => Hidden,
        };

        let os_visible = self.window.is_visible();
        if os_visible != (self.state == Visible) {
            tracing::debug!(
                seq = event.seq,
                committed = ?self.state,
                os_visible,
                "window visibility lags committed state"
            );
        }
    }
}

/// Drain the channel until every [`VisibilityHandle`] is dropped.
///
/// Returns the controller so callers (tests) can inspect the final state.
pub async fn run<W: OverlayWindow>(
    mut controller: VisibilityController<W>,
    mut rx: mpsc::UnboundedReceiver<ToggleEvent>,
) -> VisibilityController<W> {
    while let Some(event) = rx.recv().await {
        controller.apply(event);
    }
    controller
}

/// Spawn the controller task for `window` and hand back the submission side.
pub fn spawn<W: OverlayWindow>(window: W) -> VisibilityHandle {
    let (handle, rx) = channel();
    tauri::async_runtime::spawn(async move {
        run(VisibilityController::new(window), rx).await;
        tracing::debug!("visibility controller stopped");
    });
    handle
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    /// Records every command the controller issues and mirrors show/hide into
    /// a visible flag like a well-behaved window system.
    #[derive(Clone, Default)]
    struct FakeWindow {
        calls: Arc<Mutex<Vec<&'static str>>>,
        visible: Arc<AtomicBool>,
        focused: Arc<AtomicBool>,
    }

    impl FakeWindow {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().clone()
        }
    }

    impl OverlayWindow for FakeWindow {
        fn show(&self) {
            self.calls.lock().push("show");
            self.visible.store(true, Ordering::SeqCst);
        }

        fn hide(&self) {
            self.calls.lock().push("hide");
            self.visible.store(false, Ordering::SeqCst);
            self.focused.store(false, Ordering::SeqCst);
        }

        fn focus(&self) {
            self.calls.lock().push("focus");
            self.focused.store(true, Ordering::SeqCst);
        }

        fn is_visible(&self) -> bool {
            self.visible.load(Ordering::SeqCst)
        }

        fn is_focused(&self) -> bool {
            self.focused.load(Ordering::SeqCst)
        }
    }

    fn controller() -> (VisibilityController<FakeWindow>, FakeWindow) {
        let window = FakeWindow::default();
        (VisibilityController::new(window.clone()), window)
    }

    fn deliver(controller: &mut VisibilityController<FakeWindow>, triggers: &[Trigger]) {
        for &trigger in triggers {
            controller.apply(ToggleEvent::new(trigger));
        }
    }

    #[test]
    fn focus_loss_while_hidden_is_a_noop() {
        let (mut c, window) = controller();
        deliver(&mut c, &[Trigger::FocusLost]);
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert!(window.calls().is_empty());
    }

    #[test]
    fn hotkey_toggles_back_to_hidden() {
        let (mut c, window) = controller();
        deliver(&mut c, &[Trigger::HotkeyPressed, Trigger::HotkeyPressed]);
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert_eq!(window.calls(), vec!["show", "focus", "hide"]);
    }

    #[test]
    fn focus_loss_hides_the_visible_overlay() {
        let (mut c, window) = controller();
        deliver(&mut c, &[Trigger::HotkeyPressed, Trigger::FocusLost]);
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert_eq!(window.calls(), vec!["show", "focus", "hide"]);
    }

    #[test]
    fn self_inflicted_focus_loss_is_absorbed() {
        // Hiding fires a focus-loss notification for the hide we just issued;
        // the trailing event must not produce further window calls.
        let (mut c, window) = controller();
        deliver(
            &mut c,
            &[
                Trigger::HotkeyPressed,
                Trigger::HotkeyPressed,
                Trigger::FocusLost,
            ],
        );
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert_eq!(window.calls(), vec!["show", "focus", "hide"]);
    }

    #[test]
    fn runs_without_a_hotkey_source() {
        // Hotkey registration can fail for the whole session; focus-loss and
        // external requests keep working regardless.
        let (mut c, window) = controller();
        deliver(&mut c, &[Trigger::ShowRequested, Trigger::FocusLost]);
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert_eq!(window.calls(), vec!["show", "focus", "hide"]);
    }

    #[test]
    fn show_request_refocuses_when_already_visible() {
        let (mut c, window) = controller();
        deliver(&mut c, &[Trigger::ShowRequested, Trigger::ShowRequested]);
        assert_eq!(c.state(), VisibilityState::Visible);
        assert_eq!(window.calls(), vec!["show", "focus", "focus"]);
    }

    #[test]
    fn hide_request_only_acts_when_visible() {
        let (mut c, window) = controller();
        deliver(&mut c, &[Trigger::HideRequested]);
        assert!(window.calls().is_empty());

        deliver(&mut c, &[Trigger::ShowRequested, Trigger::HideRequested]);
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert_eq!(window.calls(), vec!["show", "focus", "hide"]);
    }

    #[tokio::test]
    async fn concurrent_submits_apply_in_some_total_order() {
        // A hotkey press and a focus-loss racing through the channel must be
        // applied as two complete transitions in one of the two serial orders,
        // never interleaved.
        for _ in 0..50 {
            let window = FakeWindow::default();
            let (handle, rx) = channel();
            let task = tokio::spawn(run(VisibilityController::new(window.clone()), rx));

            let h1 = handle.clone();
            let h2 = handle.clone();
            let t1 = std::thread::spawn(move || h1.submit(Trigger::HotkeyPressed));
            let t2 = std::thread::spawn(move || h2.submit(Trigger::FocusLost));
            t1.join().unwrap();
            t2.join().unwrap();
            drop(handle);

            let controller = task.await.unwrap();
            match controller.state() {
                // Hotkey first, then focus-loss hid it again.
                VisibilityState::Hidden => {
                    assert_eq!(window.calls(), vec!["show", "focus", "hide"])
                }
                // Focus-loss first was a no-op, then the hotkey showed it.
                VisibilityState::Visible => assert_eq!(window.calls(), vec!["show", "focus"]),
            }
        }
    }

    #[test]
    fn submits_after_shutdown_are_dropped() {
        let (handle, rx) = channel();
        drop(rx);
        // Must not panic or block; the event is discarded.
        handle.submit(Trigger::HotkeyPressed);
    }
}
