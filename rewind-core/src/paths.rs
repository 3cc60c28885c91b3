//! Path constants for configuration, content and log files.

use std::path::PathBuf;

/// The name of the configuration directory under ~/.config/
pub const CONFIG_DIR_NAME: &str = "rewind";

/// The name of the main configuration file
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// The name of the optional slide catalog override
pub const CATALOG_FILE_NAME: &str = "slides.toml";

/// The name of the default media directory
pub const ASSETS_DIR_NAME: &str = "assets";

/// The name of the log file written when file logging is enabled
pub const LOG_FILE_NAME: &str = "rewind.log";

/// The name of the user stylesheet
pub const THEME_FILE_NAME: &str = "theme.css";

/// The name of the window geometry cache file (prefixed with . for hidden)
pub const WINDOW_STATE_FILE_NAME: &str = ".window_state.json";

/// Get the configuration directory path (~/.config/rewind/)
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(CONFIG_DIR_NAME)
}

/// Get the config file path (~/.config/rewind/config.toml)
#[must_use]
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Get the slide catalog override path (~/.config/rewind/slides.toml)
#[must_use]
pub fn catalog_path() -> PathBuf {
    config_dir().join(CATALOG_FILE_NAME)
}

/// Get the default media directory (~/.config/rewind/assets/)
#[must_use]
pub fn assets_dir() -> PathBuf {
    config_dir().join(ASSETS_DIR_NAME)
}

/// Get the log file path (~/.config/rewind/rewind.log)
#[must_use]
pub fn log_file_path() -> PathBuf {
    config_dir().join(LOG_FILE_NAME)
}

/// Get the theme file path (~/.config/rewind/theme.css)
#[must_use]
pub fn theme_path() -> PathBuf {
    config_dir().join(THEME_FILE_NAME)
}

/// Get the window state file path (`~/.config/rewind/.window_state.json`)
#[must_use]
pub fn window_state_path() -> PathBuf {
    config_dir().join(WINDOW_STATE_FILE_NAME)
}
