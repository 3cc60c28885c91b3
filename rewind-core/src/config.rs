use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewindConfig {
    #[serde(default)]
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub gestures: GestureConfig,
    #[serde(default)]
    pub proposal: ProposalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Dwell time on every auto-advancing slide
    #[serde(default = "default_auto_advance_ms")]
    pub auto_advance_ms: u64,
    /// Optional slide catalog override; falls back to ~/.config/rewind/slides.toml
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Directory that audio, photo and video asset paths are resolved against
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
}

const fn default_auto_advance_ms() -> u64 {
    20_000
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            auto_advance_ms: default_auto_advance_ms(),
            catalog: None,
            assets_dir: None,
        }
    }
}

impl PresentationConfig {
    #[must_use]
    pub const fn auto_advance(&self) -> Duration {
        Duration::from_millis(self.auto_advance_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Background track volume in `[0.0, 1.0]`
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default)]
    pub start_muted: bool,
    /// Seed for the noise in synthesized effects
    #[serde(default = "default_effects_seed")]
    pub effects_seed: u64,
}

const fn default_volume() -> f32 {
    0.3
}

const fn default_effects_seed() -> u64 {
    0x5EED
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            start_muted: false,
            effects_seed: default_effects_seed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Taps left of this fraction of the surface width navigate back
    #[serde(default = "default_back_zone")]
    pub back_zone: f64,
    /// Minimum drag displacement (logical px) that counts as a swipe
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f64,
    /// Releases that moved less than this are taps, not drags
    #[serde(default = "default_tap_slop")]
    pub tap_slop: f64,
}

const fn default_back_zone() -> f64 {
    0.3
}

const fn default_swipe_threshold() -> f64 {
    50.0
}

const fn default_tap_slop() -> f64 {
    10.0
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            back_zone: default_back_zone(),
            swipe_threshold: default_swipe_threshold(),
            tap_slop: default_tap_slop(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalConfig {
    /// Who gets notified on an affirmative answer. Empty disables the notification.
    #[serde(default)]
    pub recipient: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_body")]
    pub body: String,
    /// Seed for confetti origins
    #[serde(default = "default_confetti_seed")]
    pub confetti_seed: u64,
}

fn default_subject() -> String {
    "She said YES! \u{2764}\u{fe0f}".to_string()
}

fn default_body() -> String {
    "She clicked Yes!".to_string()
}

const fn default_confetti_seed() -> u64 {
    14
}

impl Default for ProposalConfig {
    fn default() -> Self {
        Self {
            recipient: String::new(),
            subject: default_subject(),
            body: default_body(),
            confetti_seed: default_confetti_seed(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
}

impl RewindConfig {
    /// Get the configuration directory path (~/.config/rewind/)
    #[must_use]
    pub fn config_dir() -> PathBuf {
        crate::paths::config_dir()
    }

    /// Get the config file path (~/.config/rewind/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from file or create template on first run
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigNotFound`] after writing the template on first run,
    /// or an error if the file cannot be read, parsed or fails validation.
    pub fn load_or_create() -> Result<Self> {
        Self::load_or_create_at(&Self::config_path())
    }

    /// Same as [`Self::load_or_create`] for an explicit path.
    ///
    /// # Errors
    ///
    /// See [`Self::load_or_create`].
    pub fn load_or_create_at(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::write(config_path, CONFIG_TEMPLATE)?;

            return Err(CoreError::ConfigNotFound {
                path: config_path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(config_path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config document
    ///
    /// # Errors
    ///
    /// Returns an error on TOML syntax errors or out-of-range values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigInvalid`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.presentation.auto_advance_ms == 0 {
            return Err(invalid("presentation.auto_advance_ms must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(invalid("audio.volume must be between 0.0 and 1.0"));
        }
        if !(self.gestures.back_zone > 0.0 && self.gestures.back_zone < 1.0) {
            return Err(invalid("gestures.back_zone must be strictly between 0.0 and 1.0"));
        }
        if !(self.gestures.swipe_threshold.is_finite() && self.gestures.swipe_threshold > 0.0) {
            return Err(invalid("gestures.swipe_threshold must be a positive number"));
        }
        if !(self.gestures.tap_slop.is_finite()
            && self.gestures.tap_slop >= 0.0
            && self.gestures.tap_slop < self.gestures.swipe_threshold)
        {
            return Err(invalid(
                "gestures.tap_slop must be non-negative and below gestures.swipe_threshold",
            ));
        }
        Ok(())
    }

    /// Where the slide catalog should be read from, if anywhere
    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.presentation
            .catalog
            .clone()
            .unwrap_or_else(crate::paths::catalog_path)
    }

    /// Root that slide media paths are resolved against
    #[must_use]
    pub fn assets_dir(&self) -> PathBuf {
        self.presentation
            .assets_dir
            .clone()
            .unwrap_or_else(crate::paths::assets_dir)
    }
}

fn invalid(message: &str) -> CoreError {
    CoreError::ConfigInvalid {
        message: message.to_string(),
    }
}

/// Template written on first run
pub const CONFIG_TEMPLATE: &str = r##"# Rewind Configuration
# ~/.config/rewind/config.toml

[presentation]
# How long each slide stays up before advancing on its own
auto_advance_ms = 20000
# Optional slide catalog; defaults to ~/.config/rewind/slides.toml, then the built-in story
# catalog = "/path/to/slides.toml"
# Directory holding music/, photos/ and videos/ (default ~/.config/rewind/assets)
# assets_dir = "/path/to/assets"

[audio]
volume = 0.3
start_muted = false
effects_seed = 24301

[gestures]
# Taps on the left 30% of the screen go back, everything else goes forward
back_zone = 0.3
# Horizontal drag distance needed to count as a swipe
swipe_threshold = 50.0
# Releases that moved less than this are treated as taps
tap_slop = 10.0

[proposal]
# Address notified when the final question is answered with yes (empty = off)
recipient = ""
subject = "She said YES! ❤️"
body = "She clicked Yes!"
confetti_seed = 14

[logging]
# Write logs to ~/.config/rewind/rewind.log in addition to the console
enabled = false
"##;
