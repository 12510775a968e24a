//! System tray for Prism
//!
//! The tray menu has two kinds of entries. "Show Prism" routes through the
//! visibility controller like every other trigger; pop-out items spawn
//! brand-new independent windows that the controller never hears about.

use std::sync::atomic::{AtomicU64, Ordering};

use tauri::{
    menu::{Menu, MenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager, WebviewUrl, WebviewWindowBuilder,
};

use crate::events::Trigger;
use crate::state::AppState;
use crate::visibility::VisibilityHandle;

/// Creates one new window per activation.
pub trait SpawnWindow: Send + Sync + 'static {
    fn spawn(&self, label: &str, route: &str);
}

/// Production spawner over `WebviewWindowBuilder`.
pub struct WebviewSpawner {
    app: AppHandle,
}

impl WebviewSpawner {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl SpawnWindow for WebviewSpawner {
    fn spawn(&self, label: &str, route: &str) {
        let built = WebviewWindowBuilder::new(&self.app, label, WebviewUrl::App(route.into()))
            .title("Prism")
            .build();
        match built {
            // The handle is dropped on purpose: pop-outs own their lifecycle.
            Ok(_) => tracing::debug!(label, route, "pop-out window created"),
            Err(e) => tracing::warn!(label, "failed to create pop-out window: {}", e),
        }
    }
}

/// Maps tray menu activations to new independent windows.
///
/// Stateless with respect to the overlay: holds no visibility handle and
/// keeps no reference to the windows it creates.
pub struct TrayMenuDispatcher<S: SpawnWindow> {
    spawner: S,
    spawned: AtomicU64,
}

impl<S: SpawnWindow> TrayMenuDispatcher<S> {
    pub fn new(spawner: S) -> Self {
        Self {
            spawner,
            spawned: AtomicU64::new(0),
        }
    }

    /// Spawn a new window for `route` under a fresh label.
    pub fn on_activate(&self, route: &str) {
        let n = self.spawned.fetch_add(1, Ordering::Relaxed);
        self.spawner.spawn(&format!("popout-{}", n), route);
    }

    /// Number of windows spawned so far, diagnostics only.
    pub fn spawned(&self) -> u64 {
        self.spawned.load(Ordering::Relaxed)
    }
}

/// Set up the tray icon and menu.
pub fn setup_tray(
    app: &AppHandle,
    visibility: VisibilityHandle,
) -> Result<(), Box<dyn std::error::Error>> {
    let show = MenuItem::with_id(app, "show", "Show Prism", true, None::<&str>)?;
    let popout = MenuItem::with_id(app, "popout", "New Pop-out", true, None::<&str>)?;
    let quit = MenuItem::with_id(app, "quit", "Quit Prism", true, None::<&str>)?;

    let menu = Menu::with_items(app, &[&show, &popout, &quit])?;

    let menu_visibility = visibility.clone();
    let mut builder = TrayIconBuilder::new()
        .menu(&menu)
        .tooltip("Prism")
        .on_menu_event(move |app, event| match event.id.as_ref() {
            "show" => menu_visibility.submit(Trigger::ShowRequested),
            "popout" => {
                if let Some(state) = app.try_state::<AppState>() {
                    let route = state.settings.read().popout_route.clone();
                    state.dispatcher.on_activate(&route);
                }
            }
            "quit" => app.exit(0),
            _ => {}
        })
        .on_tray_icon_event(move |_tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                visibility.submit(Trigger::ShowRequested);
            }
        });

    if let Some(icon) = app.default_window_icon() {
        builder = builder.icon(icon.clone());
    }

    let _tray = builder.build(app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingSpawner {
        labels: Arc<Mutex<Vec<String>>>,
    }

    impl SpawnWindow for RecordingSpawner {
        fn spawn(&self, label: &str, _route: &str) {
            self.labels.lock().push(label.to_string());
        }
    }

    #[test]
    fn activations_spawn_independent_windows() {
        let spawner = RecordingSpawner::default();
        let dispatcher = TrayMenuDispatcher::new(spawner.clone());

        for _ in 0..100 {
            dispatcher.on_activate("/#/page1");
        }

        let labels = spawner.labels.lock();
        assert_eq!(labels.len(), 100);
        let unique: HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), 100);
        assert_eq!(dispatcher.spawned(), 100);
    }
}
