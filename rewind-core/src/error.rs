use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Configuration errors
    #[error("Config file not found at {path}. A template has been created with default values.")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // Slide catalog errors
    #[error("Invalid slide catalog: {reason}")]
    CatalogInvalid { reason: String },

    #[error("Failed to parse slide catalog: {source}")]
    CatalogParseError {
        #[source]
        source: toml::de::Error,
    },

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Failures reported by an [`AudioBackend`](crate::audio::AudioBackend).
///
/// These never escape the [`AudioChannel`](crate::audio::AudioChannel); they are
/// logged and the presentation carries on silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("Audio asset not found: {asset}")]
    AssetMissing { asset: String },

    #[error("Playback rejected for {asset}: {reason}")]
    PlaybackRejected { asset: String, reason: String },

    #[error("Effect playback unsupported: {reason}")]
    EffectUnsupported { reason: String },
}
