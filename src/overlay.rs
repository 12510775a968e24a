//! Overlay window handle for Prism
//!
//! The single primary window sits behind a small trait so the visibility
//! controller can be exercised without a running window system.

use tauri::{Emitter, WebviewWindow};

/// The one overlay window the controller manages.
///
/// `show`/`hide`/`focus` are idempotent fire-and-forget commands; the OS may
/// apply them with a delay. `is_visible`/`is_focused` are best-effort
/// point-in-time reads, used for diagnostics and never for transition
/// decisions.
pub trait OverlayWindow: Send + 'static {
    fn show(&self);
    fn hide(&self);
    fn focus(&self);
    fn is_visible(&self) -> bool;
    fn is_focused(&self) -> bool;
}

/// Production handle over the Tauri main window.
///
/// Calls against a window that has already been destroyed (late event during
/// shutdown) return errors; those are swallowed here per the fire-and-forget
/// contract.
pub struct OverlayHandle {
    window: WebviewWindow,
}

impl OverlayHandle {
    pub fn new(window: WebviewWindow) -> Self {
        Self { window }
    }
}

impl OverlayWindow for OverlayHandle {
    fn show(&self) {
        let _ = self.window.center();
        let _ = self.window.show();
        let _ = self.window.emit("overlay-shown", ());
    }

    fn hide(&self) {
        let _ = self.window.hide();
        let _ = self.window.emit("overlay-hidden", ());
    }

    fn focus(&self) {
        let _ = self.window.set_focus();
    }

    fn is_visible(&self) -> bool {
        self.window.is_visible().unwrap_or(false)
    }

    fn is_focused(&self) -> bool {
        self.window.is_focused().unwrap_or(false)
    }
}
