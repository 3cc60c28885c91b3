pub mod audio;
pub mod catalog;
pub mod collage;
pub mod config;
pub mod count_up;
pub mod error;
pub mod gesture;
pub mod navigation;
pub mod paths;
pub mod proposal;
pub mod story;
pub mod timer;

#[cfg(test)]
mod testing;

pub use audio::{
    AudioBackend, AudioChannel, EffectBuffer, EffectKind, LoopRequest, UnlockGate, UnlockSource,
};
pub use catalog::{AudioAsset, DateLine, SlideCatalog, SlideDescriptor, SlideKind, Track};
pub use collage::{CardLayout, PhotoCollage, StackedCard};
pub use config::{
    AudioConfig, GestureConfig, LoggingConfig, PresentationConfig, ProposalConfig, RewindConfig,
    CONFIG_TEMPLATE,
};

/// Re-export toml error type for config parsing error handling
pub use toml::de::Error as TomlParseError;
pub use count_up::{COUNT_UP_DURATION, count_up_value, group_thousands};
pub use error::{AudioError, CoreError};
pub use gesture::{GestureInterpreter, NavIntent, PointerInput, drag_opacity};
pub use navigation::{NavState, NavigationController, SlideChange};
pub use paths::{
    CATALOG_FILE_NAME, CONFIG_DIR_NAME, CONFIG_FILE_NAME, LOG_FILE_NAME, THEME_FILE_NAME,
    WINDOW_STATE_FILE_NAME, config_dir, theme_path, window_state_path,
};
pub use proposal::{
    ConfettiBurst, ConfettiFrame, ConfettiOrigin, NoopNotifier, Notifier, ProposalFlow,
    ProposalMood, ProposalState,
};
pub use story::{ProposalView, StoryEngine, StoryEvent, StoryHandle, StoryIntent, StorySnapshot};
pub use timer::{Scheduler, TimerTicket, TokioScheduler};
