//! Static, ordered slide content.
//!
//! A catalog is loaded once, validated once, and shared read-only afterwards.
//! The only structural rule is that the sequence ends in exactly one proposal
//! slide; anything else is a configuration error and the story must not start.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Opaque handle to a loopable audio resource (a path or URI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioAsset(String);

impl AudioAsset {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AudioAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An audio asset plus where to start playing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub asset: AudioAsset,
    #[serde(default)]
    pub start_secs: f64,
}

impl Track {
    pub fn new(asset: impl Into<String>, start_secs: f64) -> Self {
        Self {
            asset: AudioAsset::new(asset),
            start_secs,
        }
    }

    /// Start offset as a duration; invalid offsets collapse to zero.
    #[must_use]
    pub fn start_offset(&self) -> Duration {
        Duration::try_from_secs_f64(self.start_secs).unwrap_or(Duration::ZERO)
    }
}

/// One struck-through or highlighted date on a date-reveal slide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateLine {
    pub text: String,
    #[serde(default)]
    pub struck: bool,
}

/// Slide variants and the content each renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlideKind {
    Intro {
        #[serde(default)]
        top_label: String,
        big_text: String,
        #[serde(default)]
        subtitle: String,
        #[serde(default)]
        video: Option<String>,
    },
    Stat {
        top_label: String,
        number: u64,
        #[serde(default)]
        suffix: String,
        #[serde(default)]
        bottom_label: String,
        #[serde(default)]
        bottom_label_append: Option<String>,
        #[serde(default)]
        emoji: String,
    },
    PhotoCollage {
        photos: Vec<String>,
        #[serde(default)]
        caption: String,
        #[serde(default)]
        subcaption: String,
    },
    Message {
        lines: Vec<String>,
        #[serde(default)]
        background_photo: Option<String>,
    },
    DateReveal {
        intro: String,
        dates: Vec<DateLine>,
    },
    Transition {
        lines: Vec<String>,
    },
    Proposal {
        #[serde(default = "default_question")]
        question: String,
        #[serde(default = "default_celebration_title")]
        celebration_title: String,
        #[serde(default = "default_celebration_subtitle")]
        celebration_subtitle: String,
        #[serde(default = "default_decline_phrases")]
        decline_phrases: Vec<String>,
    },
}

impl SlideKind {
    /// Whether this is the terminal interactive slide
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Proposal { .. })
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Intro { .. } => "intro",
            Self::Stat { .. } => "stat",
            Self::PhotoCollage { .. } => "photo_collage",
            Self::Message { .. } => "message",
            Self::DateReveal { .. } => "date_reveal",
            Self::Transition { .. } => "transition",
            Self::Proposal { .. } => "proposal",
        }
    }
}

fn default_question() -> String {
    "Will you be my Valentine? \u{1f339}".to_string()
}

fn default_celebration_title() -> String {
    "Yay! See you on the 14th! \u{2764}\u{fe0f}".to_string()
}

fn default_celebration_subtitle() -> String {
    "I knew you'd say yes!".to_string()
}

/// Escalating decline labels, in order
#[must_use]
pub fn default_decline_phrases() -> Vec<String> {
    [
        "No",
        "Are you sure? \u{1f97a}",
        "Really sure??",
        "Think again! \u{1f338}",
        "Last chance! \u{2728}",
        "Surely not?",
        "You might regret this! \u{1f9f8}",
        "Give it another thought!",
        "Are you absolutely certain?",
        "This could be a mistake!",
        "Have a heart! \u{2764}\u{fe0f}",
        "Don't be so cold!",
        "Change of heart?",
        "Wouldn't you reconsider?",
        "Is that your final answer?",
        "You're breaking my heart ;(",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Immutable description of one slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideDescriptor {
    /// Position in the sequence, assigned at load
    #[serde(skip)]
    pub index: usize,
    #[serde(flatten)]
    pub kind: SlideKind,
    /// CSS background paint for the slide
    #[serde(default)]
    pub gradient: String,
    #[serde(default)]
    pub track: Option<Track>,
    /// Played only after an affirmative answer on the proposal slide
    #[serde(default)]
    pub alternate_track: Option<Track>,
}

impl SlideDescriptor {
    #[must_use]
    pub fn new(kind: SlideKind) -> Self {
        Self {
            index: 0,
            kind,
            gradient: String::new(),
            track: None,
            alternate_track: None,
        }
    }

    #[must_use]
    pub fn with_track(mut self, track: Track) -> Self {
        self.track = Some(track);
        self
    }

    #[must_use]
    pub fn with_alternate_track(mut self, track: Track) -> Self {
        self.alternate_track = Some(track);
        self
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    /// Everything except the proposal slide advances on its own
    #[must_use]
    pub const fn auto_advance_eligible(&self) -> bool {
        !self.kind.is_terminal()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    slides: Vec<SlideDescriptor>,
}

/// Validated, ordered list of slides
#[derive(Debug, Clone, PartialEq)]
pub struct SlideCatalog {
    slides: Vec<SlideDescriptor>,
}

impl SlideCatalog {
    /// Build a catalog, assigning indices and checking structure.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CatalogInvalid`] if the list is empty, has no proposal
    /// slide, has more than one, or the proposal slide is not last; also if an
    /// alternate track appears anywhere else or a track offset is negative.
    pub fn new(mut slides: Vec<SlideDescriptor>) -> Result<Self> {
        for (index, slide) in slides.iter_mut().enumerate() {
            slide.index = index;
        }

        let Some(last) = slides.last() else {
            return Err(catalog_invalid("catalog has no slides".to_string()));
        };

        let terminals: Vec<usize> = slides
            .iter()
            .filter(|s| s.is_terminal())
            .map(|s| s.index)
            .collect();

        match terminals.as_slice() {
            [] => return Err(catalog_invalid("catalog has no proposal slide".to_string())),
            [only] if *only != last.index => {
                return Err(catalog_invalid(format!(
                    "proposal slide is at position {only} but must be last ({})",
                    last.index
                )));
            }
            [_] => {}
            many => {
                return Err(catalog_invalid(format!(
                    "catalog has {} proposal slides, expected exactly one",
                    many.len()
                )));
            }
        }

        for slide in &slides {
            if slide.alternate_track.is_some() && !slide.is_terminal() {
                return Err(catalog_invalid(format!(
                    "slide {} ({}) has an alternate track; only the proposal slide may",
                    slide.index,
                    slide.kind.name()
                )));
            }
            for track in slide.track.iter().chain(slide.alternate_track.iter()) {
                if !(track.start_secs.is_finite() && track.start_secs >= 0.0) {
                    return Err(catalog_invalid(format!(
                        "slide {} track {} has invalid start offset {}",
                        slide.index, track.asset, track.start_secs
                    )));
                }
            }
        }

        Ok(Self { slides })
    }

    /// Parse a TOML catalog (`[[slides]]` tables with a `kind` tag)
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CatalogParseError`] on malformed TOML or unknown kinds,
    /// or any validation error from [`Self::new`].
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|source| CoreError::CatalogParseError { source })?;
        Self::new(file.slides)
    }

    /// Load a catalog file from disk
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        info!("Loaded {} slides from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false for a validated catalog
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SlideDescriptor> {
        self.slides.get(index)
    }

    /// Index of the last slide
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.slides.len().saturating_sub(1)
    }

    #[must_use]
    pub fn slides(&self) -> &[SlideDescriptor] {
        &self.slides
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlideDescriptor> {
        self.slides.iter()
    }

    /// The terminal proposal slide
    #[must_use]
    pub fn terminal(&self) -> Option<&SlideDescriptor> {
        self.slides.last().filter(|s| s.is_terminal())
    }
}

fn catalog_invalid(reason: String) -> CoreError {
    CoreError::CatalogInvalid { reason }
}
