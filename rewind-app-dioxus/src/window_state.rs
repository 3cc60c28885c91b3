//! Window geometry persistence across launches.

use dioxus::desktop::tao::event::{Event, WindowEvent};
use dioxus::desktop::{use_window, use_wry_event_handler};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Persisted window geometry in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    /// X position of the window's outer bounds
    pub x: i32,
    /// Y position of the window's outer bounds
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowState {
    /// Load window state from the cache file.
    /// Returns `None` if the file doesn't exist or can't be parsed.
    #[must_use]
    pub fn load() -> Option<Self> {
        Self::load_from(&rewind_core::window_state_path())
    }

    fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Self>(&content) {
                Ok(state) if state.width > 0 && state.height > 0 => {
                    info!("Loaded window state from {:?}", path);
                    Some(state)
                }
                Ok(_) => {
                    warn!("Ignoring window state with empty size");
                    None
                }
                Err(e) => {
                    warn!("Failed to parse window state: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read window state file: {}", e);
                None
            }
        }
    }

    /// Save window state to the cache file.
    pub fn save(&self) {
        self.save_to(&rewind_core::window_state_path());
    }

    fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warn!("Failed to create window state directory: {}", e);
            return;
        }

        match serde_json::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = fs::write(path, content) {
                    warn!("Failed to write window state: {}", e);
                } else {
                    info!("Saved window state to {:?}", path);
                }
            }
            Err(e) => {
                warn!("Failed to serialize window state: {}", e);
            }
        }
    }
}

/// Save the window's position and size when the user closes it
pub fn use_window_state_persistence() {
    let window = use_window();

    use_wry_event_handler(move |event, _| {
        let Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            window_id,
            ..
        } = event
        else {
            return;
        };
        if *window_id != window.window.id() {
            return;
        }

        let size = window.window.inner_size();
        match window.window.outer_position() {
            Ok(position) => WindowState {
                x: position.x,
                y: position.y,
                width: size.width,
                height: size.height,
            }
            .save(),
            Err(e) => warn!("Window position unavailable, not saving geometry: {e}"),
        }
    });
}
