//! Tauri IPC command handlers for Prism

use tauri::State;

use crate::events::Trigger;
use crate::state::{AppSettings, AppState};

/// The greeter the demo page calls on Enter.
#[tauri::command]
pub fn greet(name: String) -> String {
    format!("Hello {}!", name)
}

/// Show and focus the overlay.
///
/// Routed through the visibility controller like every other trigger; nothing
/// outside the controller touches the window.
#[tauri::command]
pub fn show_overlay(state: State<'_, AppState>) {
    state.visibility.submit(Trigger::ShowRequested);
}

/// Hide the overlay; the frontend binds Escape to this.
#[tauri::command]
pub fn hide_overlay(state: State<'_, AppState>) {
    state.visibility.submit(Trigger::HideRequested);
}

/// Open a new independent pop-out window.
#[tauri::command]
pub fn pop_out(route: Option<String>, state: State<'_, AppState>) {
    let route = route.unwrap_or_else(|| state.settings.read().popout_route.clone());
    state.dispatcher.on_activate(&route);
}

/// Read-only snapshot of the current settings.
#[tauri::command]
pub fn get_settings(state: State<'_, AppState>) -> AppSettings {
    state.settings.read().clone()
}
