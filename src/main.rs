// Prevents additional console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![allow(dead_code)]

mod commands;
mod events;
mod hotkey;
mod overlay;
mod state;
mod tray;
mod visibility;

use std::sync::Arc;

use parking_lot::RwLock;
use tauri::Manager;

use state::{AppSettings, AppState};

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prism=info".into()),
        )
        .init();

    tracing::info!("Prism starting...");

    tauri::Builder::default()
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .setup(|app| {
            // Menu bar only, no dock icon
            #[cfg(target_os = "macos")]
            {
                app.set_activation_policy(tauri::ActivationPolicy::Accessory);
            }

            let settings = AppSettings::load();
            // Materialize the file on first run so the binding can be edited.
            settings.save();

            let window = app
                .get_webview_window("main")
                .ok_or("main window missing from tauri.conf.json")?;

            // Start out of sight; from here on the controller is the only
            // writer of the window's visibility.
            let _ = window.hide();
            let visibility = visibility::spawn(overlay::OverlayHandle::new(window));

            let binding = hotkey::HotkeyBinding::new(settings.hotkey.as_str());
            if let Err(e) = hotkey::register(app.handle(), &binding, visibility.clone()) {
                // Non-fatal: everything but hotkey toggling keeps working.
                tracing::warn!("hotkey toggling disabled for this session: {}", e);
            }

            tray::setup_tray(app.handle(), visibility.clone())?;

            let dispatcher = Arc::new(tray::TrayMenuDispatcher::new(tray::WebviewSpawner::new(
                app.handle().clone(),
            )));

            app.manage(AppState {
                settings: RwLock::new(settings),
                visibility,
                dispatcher,
            });

            tracing::info!("Prism initialized");
            Ok(())
        })
        .on_window_event(|window, event| {
            // Focus loss on the overlay feeds the controller; this includes
            // the notification the OS emits for our own hide(). Pop-outs are
            // not tracked.
            if window.label() != "main" {
                return;
            }
            if let tauri::WindowEvent::Focused(false) = event {
                if let Some(state) = window.app_handle().try_state::<AppState>() {
                    state.visibility.submit(events::Trigger::FocusLost);
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::greet,
            commands::show_overlay,
            commands::hide_overlay,
            commands::pop_out,
            commands::get_settings,
        ])
        .build(tauri::generate_context!())
        .expect("Error while building Prism")
        .run(|app, event| {
            if let tauri::RunEvent::Exit = event {
                hotkey::unregister_all(app);
            }
        });
}

fn main() {
    run();
}
