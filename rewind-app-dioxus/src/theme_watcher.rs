//! User stylesheet with hot reload.
//!
//! The built-in story styles are written to `~/.config/rewind/theme.css` on first run.
//! Edits to that file are picked up while the story is playing.

use dioxus::prelude::*;
use notify_debouncer_mini::{DebounceEventResult, new_debouncer, notify::RecursiveMode};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Failed to access theme file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to watch theme file: {0}")]
    Watch(#[from] notify_debouncer_mini::notify::Error),
}

/// Built-in story styles
pub const DEFAULT_CSS: &str = include_str!("../assets/default_theme.css");

/// Read the user's theme, seeding it from [`DEFAULT_CSS`] if it does not exist yet
///
/// # Errors
///
/// Returns an error if the theme file cannot be created or read.
pub fn read_or_seed_theme(theme_path: &Path) -> Result<String, ThemeError> {
    if !theme_path.exists() {
        info!("Writing default theme to {}", theme_path.display());
        if let Some(parent) = theme_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(theme_path, DEFAULT_CSS)?;
        return Ok(DEFAULT_CSS.to_string());
    }
    Ok(fs::read_to_string(theme_path)?)
}

/// Reactive stylesheet content that follows the theme file until `cancel_token` fires
#[must_use]
pub fn use_theme_watcher(cancel_token: CancellationToken) -> Signal<String> {
    let mut css = use_signal(|| {
        read_or_seed_theme(&rewind_core::theme_path()).unwrap_or_else(|e| {
            error!("Using built-in theme: {e}");
            DEFAULT_CSS.to_string()
        })
    });

    use_hook(move || {
        spawn(async move {
            if let Err(e) = watch_theme(cancel_token, &mut css).await {
                error!("Theme hot reload disabled: {e}");
            }
        });
    });

    css
}

async fn watch_theme(
    cancel_token: CancellationToken,
    css: &mut Signal<String>,
) -> Result<(), ThemeError> {
    let theme_path = rewind_core::theme_path();
    let (tx, mut rx) = mpsc::channel::<()>(16);

    let mut debouncer = new_debouncer(
        Duration::from_millis(300),
        move |res: DebounceEventResult| {
            if res.is_ok_and(|events| !events.is_empty()) {
                let _ = tx.blocking_send(());
            }
        },
    )?;

    // Watch the directory; editors often replace the file instead of writing it
    let watch_dir = theme_path.parent().unwrap_or(theme_path.as_path()).to_path_buf();
    debouncer
        .watcher()
        .watch(&watch_dir, RecursiveMode::NonRecursive)?;
    info!("Watching {} for style changes", theme_path.display());

    loop {
        tokio::select! {
            () = cancel_token.cancelled() => {
                info!("Theme watcher shutting down");
                break;
            }
            Some(()) = rx.recv() => match fs::read_to_string(&theme_path) {
                Ok(content) => {
                    if *css.peek() != content {
                        info!("Theme changed, reloading styles");
                        css.set(content);
                    }
                }
                Err(e) => warn!("Failed to reload theme: {e}"),
            },
        }
    }

    drop(debouncer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_then_read_user_edits() {
        let dir = std::env::temp_dir().join(format!("rewind-theme-{}", std::process::id()));
        let path = dir.join("theme.css");
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(read_or_seed_theme(&path).unwrap(), DEFAULT_CSS);
        fs::write(&path, "body { color: red; }").unwrap();
        assert_eq!(read_or_seed_theme(&path).unwrap(), "body { color: red; }");

        let _ = fs::remove_dir_all(&dir);
    }
}
