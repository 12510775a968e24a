//! Global hotkey registration for Prism
//!
//! Wraps the global-shortcut plugin: parses the configured accelerator and
//! forwards key presses into the visibility controller channel. Registration
//! failure (binding already claimed system-wide, accelerator invalid for the
//! platform) disables hotkey toggling for the session and nothing else.

use tauri::AppHandle;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};
use thiserror::Error;

use crate::events::Trigger;
use crate::visibility::VisibilityHandle;

/// Stock binding, the Option+Space of the original bar.
pub const DEFAULT_HOTKEY: &str = "Alt+Space";

/// Immutable modifier-set + key binding, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    accelerator: String,
}

impl HotkeyBinding {
    pub fn new(accelerator: impl Into<String>) -> Self {
        Self {
            accelerator: accelerator.into(),
        }
    }

    pub fn accelerator(&self) -> &str {
        &self.accelerator
    }

    /// Parse into the plugin's shortcut type.
    pub fn parse(&self) -> Result<Shortcut, HotkeyError> {
        self.accelerator
            .parse()
            .map_err(|_| HotkeyError::InvalidBinding(self.accelerator.clone()))
    }
}

impl Default for HotkeyBinding {
    fn default() -> Self {
        Self::new(DEFAULT_HOTKEY)
    }
}

#[derive(Debug, Error)]
pub enum HotkeyError {
    #[error("invalid hotkey binding `{0}`")]
    InvalidBinding(String),
    #[error("global hotkey registration failed: {0}")]
    RegistrationFailed(#[from] tauri_plugin_global_shortcut::Error),
}

/// Register the global hotkey and route presses into the controller.
///
/// Presses arrive on the plugin's dispatch context, asynchronously to the UI
/// loop. Only the key-down edge is forwarded; a release never toggles.
pub fn register(
    app: &AppHandle,
    binding: &HotkeyBinding,
    visibility: VisibilityHandle,
) -> Result<(), HotkeyError> {
    let shortcut = binding.parse()?;
    app.global_shortcut()
        .on_shortcut(shortcut, move |_app, _shortcut, event| {
            if event.state() == ShortcutState::Pressed {
                visibility.submit(Trigger::HotkeyPressed);
            }
        })?;
    tracing::info!(binding = binding.accelerator(), "global hotkey registered");
    Ok(())
}

/// Best-effort unregistration at shutdown. Failure is logged, never fatal.
pub fn unregister_all(app: &AppHandle) {
    if let Err(e) = app.global_shortcut().unregister_all() {
        tracing::warn!("failed to unregister global hotkeys: {}", e);
    }
}
