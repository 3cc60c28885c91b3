#![cfg_attr(feature = "bundle", windows_subsystem = "windows")]
mod app;
mod audio_backend;
mod bridge;
mod components;
mod media;
mod notifier;
mod state;
mod theme_watcher;
mod window_state;

use crate::app::App;
use crate::bridge::use_story_engine;
use crate::state::StoryState;
use crate::window_state::{WindowState, use_window_state_persistence};
use dioxus::desktop::tao::dpi::{PhysicalPosition, PhysicalSize};
use dioxus::desktop::{LogicalSize, WindowBuilder};
use dioxus::prelude::*;
use rewind_core::{CoreError, RewindConfig, SlideCatalog, TomlParseError};
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const APP_NAME: &str = "Rewind";

/// Story shipped with the binary, used when no catalog file exists
const DEFAULT_CATALOG: &str = include_str!("../assets/slides.toml");

fn main() {
    // Check config for logging.enabled before full config load
    let file_logging_enabled = check_file_logging_enabled();
    init_tracing(file_logging_enabled);

    let config = match RewindConfig::load_or_create() {
        Ok(config) => config,
        Err(CoreError::ConfigNotFound { path }) => {
            info!("Created configuration template at {}", path.display());
            RewindConfig::default()
        }
        Err(CoreError::ConfigParseError(parse_error)) => {
            show_config_parse_error_dialog(&parse_error, &RewindConfig::config_path());
            std::process::exit(1);
        }
        Err(e) => {
            error!("{e}");
            show_config_error_dialog(&e.to_string(), &RewindConfig::config_path());
            std::process::exit(1);
        }
    };

    let catalog = match load_catalog(&config) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            error!("{e}");
            show_catalog_error_dialog(&e.to_string(), &config.catalog_path());
            std::process::exit(1);
        }
    };
    info!("Loaded {} slides", catalog.len());

    // Runtime for auto-advance timers
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    // Create shared cancellation token for graceful shutdown
    let cancel_token = CancellationToken::new();

    let ctrlc_token = cancel_token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C, shutting down gracefully...");
        ctrlc_token.cancel();
    }) {
        error!("Failed to set Ctrl+C handler: {}", e);
    }

    let saved_window = WindowState::load();

    let window = WindowBuilder::new()
        .with_title(APP_NAME)
        .with_resizable(true)
        .with_min_inner_size(LogicalSize::new(320.0, 480.0))
        .with_inner_size(LogicalSize::new(430.0, 860.0));

    let window = if let Some(state) = saved_window {
        info!(
            "Restoring window geometry: ({}, {}) {}x{}",
            state.x, state.y, state.width, state.height
        );
        window
            .with_position(PhysicalPosition::new(state.x, state.y))
            .with_inner_size(PhysicalSize::new(state.width, state.height))
    } else {
        window
    };

    let media_root = config.assets_dir();
    info!("Serving media from {}", media_root.display());

    let dioxus_config = dioxus::desktop::Config::default()
        .with_window(window)
        .with_disable_context_menu(true)
        .with_custom_protocol(media::MEDIA_SCHEME, move |_webview, request| {
            media::serve(&media_root, &request)
        });

    dioxus::LaunchBuilder::desktop()
        .with_cfg(dioxus_config)
        .with_context(catalog)
        .with_context(config)
        .with_context(runtime.handle().clone())
        .with_context(cancel_token)
        .launch(app);
}

/// Root component that sets up context and renders the app
fn app() -> Element {
    let story = use_context_provider(StoryState::new);

    let catalog: Arc<SlideCatalog> = use_context();
    let config: RewindConfig = use_context();

    // Build the engine and bridge its events to signals
    use_story_engine(catalog, &config, story);
    use_window_state_persistence();

    rsx! {
        document::Title { "{APP_NAME}" },
        App {}
    }
}

/// Load the slide catalog: configured path, then the user override, then the built-in story
fn load_catalog(config: &RewindConfig) -> Result<SlideCatalog, CoreError> {
    let path = config.catalog_path();

    if config.presentation.catalog.is_some() || path.exists() {
        info!("Loading slide catalog from {}", path.display());
        return SlideCatalog::load(&path);
    }

    SlideCatalog::from_toml_str(DEFAULT_CATALOG)
}

/// Show dialog when config file has TOML parsing errors
fn show_config_parse_error_dialog(parse_error: &TomlParseError, config_path: &Path) {
    let message = format!(
        "Your configuration file has a syntax error and cannot be loaded.\n\n\
        Error: {parse_error}\n\n\
        You can either:\n\
        \u{2022} Open the config file and fix the syntax error\n\
        \u{2022} Reset to a fresh configuration template"
    );

    let result = MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Rewind - Configuration Error")
        .set_description(&message)
        .set_buttons(MessageButtons::OkCancelCustom(
            "Open Config".into(),
            "Reset Config".into(),
        ))
        .show();

    match result {
        MessageDialogResult::Custom(button) if button == "Open Config" => {
            open_in_editor(config_path);
        }
        MessageDialogResult::Custom(button) if button == "Reset Config" => {
            if let Err(e) = std::fs::write(config_path, rewind_core::CONFIG_TEMPLATE) {
                error!("Failed to reset config file: {e}");
                MessageDialog::new()
                    .set_level(MessageLevel::Error)
                    .set_title("Rewind - Reset Failed")
                    .set_description(format!("Failed to reset configuration:\n{e}"))
                    .set_buttons(MessageButtons::Ok)
                    .show();
            } else {
                MessageDialog::new()
                    .set_level(MessageLevel::Info)
                    .set_title("Rewind - Configuration Reset")
                    .set_description(
                        "Configuration has been reset to the default template.\n\n\
                        Restart the app to use it.",
                    )
                    .set_buttons(MessageButtons::Ok)
                    .show();
            }
        }
        _ => {}
    }
}

/// Show dialog for configuration values that parse but are out of range
fn show_config_error_dialog(error_message: &str, config_path: &Path) {
    let message = format!(
        "Your configuration file contains an invalid value:\n\n{error_message}\n\n\
        Please fix it and restart the app."
    );

    let result = MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Rewind - Invalid Configuration")
        .set_description(&message)
        .set_buttons(MessageButtons::OkCancelCustom(
            "Open Config".into(),
            "Exit".into(),
        ))
        .show();

    if matches!(result, MessageDialogResult::Custom(ref s) if s == "Open Config") {
        open_in_editor(config_path);
    }
}

/// Show dialog when the slide catalog is malformed; the story cannot start
fn show_catalog_error_dialog(error_message: &str, catalog_path: &Path) {
    let message = format!(
        "The slide catalog could not be loaded:\n\n{error_message}\n\n\
        Catalog: {}",
        catalog_path.display()
    );

    let result = MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Rewind - Slide Catalog Error")
        .set_description(&message)
        .set_buttons(MessageButtons::OkCancelCustom(
            "Open Catalog".into(),
            "Exit".into(),
        ))
        .show();

    if matches!(result, MessageDialogResult::Custom(ref s) if s == "Open Catalog")
        && catalog_path.exists()
    {
        open_in_editor(catalog_path);
    }
}

fn open_in_editor(path: &Path) {
    if let Err(e) = open::that(path) {
        error!("Failed to open {}: {e}", path.display());
    }
}

/// Check if file logging is enabled by reading the config file.
/// This is done before full config loading to set up tracing first.
/// Returns `false` if config doesn't exist or can't be parsed.
fn check_file_logging_enabled() -> bool {
    // Minimal structs to parse just the logging.enabled field
    #[derive(serde::Deserialize)]
    struct PartialConfig {
        #[serde(default)]
        logging: PartialLoggingConfig,
    }
    #[derive(serde::Deserialize, Default)]
    struct PartialLoggingConfig {
        #[serde(default)]
        enabled: bool,
    }

    let config_path = RewindConfig::config_path();
    let Ok(content) = std::fs::read_to_string(&config_path) else {
        return false;
    };

    toml::from_str::<PartialConfig>(&content)
        .map(|c| c.logging.enabled)
        .unwrap_or(false)
}

/// Initialize tracing with console output and optional file logging
fn init_tracing(file_logging_enabled: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer();

    if file_logging_enabled {
        let log_path = rewind_core::paths::log_file_path();

        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match File::create(&log_path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .with(file_layer)
                    .init();

                return;
            }
            Err(e) => {
                eprintln!("Failed to create log file at {}: {e}", log_path.display());
            }
        }
    }

    // Fallback: console only
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    if file_logging_enabled {
        warn!("File logging requested but unavailable, logging to console only");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_story_is_valid() {
        let catalog = SlideCatalog::from_toml_str(DEFAULT_CATALOG).unwrap();
        assert_eq!(catalog.len(), 14);
        assert!(catalog.terminal().is_some_and(|s| s.alternate_track.is_some()));
        assert!(catalog.iter().all(|s| s.track.is_some()));
    }
}
