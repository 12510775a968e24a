//! Application state and settings for Prism

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::hotkey::DEFAULT_HOTKEY;
use crate::tray::{TrayMenuDispatcher, WebviewSpawner};
use crate::visibility::VisibilityHandle;

/// User-facing settings, fixed for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub hotkey: String,       // e.g. "Alt+Space"
    pub popout_route: String, // route loaded into tray pop-out windows
    pub theme: String,        // "dark" | "light" | "system"
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            hotkey: DEFAULT_HOTKEY.to_string(),
            popout_route: "/#/page1".to_string(),
            theme: "dark".to_string(),
        }
    }
}

impl AppSettings {
    /// Settings file under the user config directory.
    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("Prism").join("settings.json"))
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// unreadable. A malformed file is logged and ignored.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("malformed settings at {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Best-effort persistence; a failed write only warns.
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            return;
        };
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to serialize settings: {}", e);
                return;
            }
        };
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(e) = fs::write(&path, json) {
            tracing::warn!("failed to write settings to {:?}: {}", path, e);
        }
    }
}

/// Managed Tauri state.
pub struct AppState {
    pub settings: RwLock<AppSettings>,
    pub visibility: VisibilityHandle,
    pub dispatcher: Arc<TrayMenuDispatcher<WebviewSpawner>>,
}
