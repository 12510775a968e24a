pub mod commands;
pub mod events;
pub mod hotkey;
pub mod overlay;
pub mod state;
pub mod tray;
pub mod visibility;
