//! The yes/no finale.
//!
//! Declining is exhaustible: every decline moves to the next phrase and the decline
//! control disappears once the phrases run out. Accepting happens once.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info};

/// Outside capability told about an affirmative answer. Fire-and-forget.
pub trait Notifier {
    fn notify(&self, recipient: &str, subject: &str, body: &str);
}

/// Notifier that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, recipient: &str, _subject: &str, _body: &str) {
        debug!("Notification for {recipient:?} dropped");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalState {
    Asking,
    Celebrating,
}

/// Which character the renderer shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalMood {
    Asking,
    Pleading,
    Celebrating,
}

const ACCEPT_BASE_FONT_PX: u32 = 16;
const ACCEPT_GROWTH_PX: u32 = 20;
const ACCEPT_MAX_FONT_PX: u32 = 120;

#[derive(Debug, Clone)]
pub struct ProposalFlow {
    phrases: Vec<String>,
    rejections: usize,
    state: ProposalState,
}

impl ProposalFlow {
    #[must_use]
    pub const fn new(phrases: Vec<String>) -> Self {
        Self {
            phrases,
            rejections: 0,
            state: ProposalState::Asking,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ProposalState {
        self.state
    }

    #[must_use]
    pub const fn rejections(&self) -> usize {
        self.rejections
    }

    #[must_use]
    pub fn mood(&self) -> ProposalMood {
        match self.state {
            ProposalState::Celebrating => ProposalMood::Celebrating,
            ProposalState::Asking if self.rejections > 0 => ProposalMood::Pleading,
            ProposalState::Asking => ProposalMood::Asking,
        }
    }

    /// Current decline label, or `None` once the control is gone
    #[must_use]
    pub fn decline_label(&self) -> Option<&str> {
        if self.state == ProposalState::Celebrating || self.rejections >= self.phrases.len() {
            return None;
        }
        let last = self.phrases.len() - 1;
        self.phrases.get(self.rejections.min(last)).map(String::as_str)
    }

    /// Whether the decline control is rendered
    #[must_use]
    pub fn can_decline(&self) -> bool {
        self.decline_label().is_some()
    }

    /// Font size of the affirmative control; it grows with every decline
    #[must_use]
    pub fn accept_font_px(&self) -> u32 {
        let rejections = u32::try_from(self.rejections).unwrap_or(u32::MAX);
        ACCEPT_GROWTH_PX
            .saturating_mul(rejections)
            .saturating_add(ACCEPT_BASE_FONT_PX)
            .min(ACCEPT_MAX_FONT_PX)
    }

    /// Register a decline. Returns `false` if the control was already gone.
    pub fn decline(&mut self) -> bool {
        if !self.can_decline() {
            return false;
        }
        self.rejections += 1;
        debug!("Proposal declined {} time(s)", self.rejections);
        true
    }

    /// Register the affirmative answer. Returns `true` only the first time.
    pub fn accept(&mut self) -> bool {
        if self.state == ProposalState::Celebrating {
            return false;
        }
        self.state = ProposalState::Celebrating;
        info!("Proposal accepted after {} decline(s)", self.rejections);
        true
    }
}

/// Where one confetti burst is emitted from, as fractions of the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfettiOrigin {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfettiFrame {
    /// Time since the burst started
    pub at: Duration,
    pub particle_count: u32,
    pub origins: [ConfettiOrigin; 2],
}

/// Celebration burst: two edge emitters on a fixed interval, thinning out linearly
#[derive(Debug, Clone)]
pub struct ConfettiBurst {
    duration: Duration,
    interval: Duration,
    peak_particles: u32,
    rng: StdRng,
}

impl ConfettiBurst {
    pub const DURATION: Duration = Duration::from_secs(5);
    pub const INTERVAL: Duration = Duration::from_millis(250);
    pub const PEAK_PARTICLES: u32 = 50;

    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            duration: Self::DURATION,
            interval: Self::INTERVAL,
            peak_particles: Self::PEAK_PARTICLES,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Particle count for an emission at `at`; zero at and after the end
    #[must_use]
    pub fn particle_count_at(&self, at: Duration) -> u32 {
        let Some(left) = self.duration.checked_sub(at) else {
            return 0;
        };
        let fraction = left.as_secs_f64() / self.duration.as_secs_f64();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = (f64::from(self.peak_particles) * fraction) as u32;
        count
    }

    /// Emission at `at`, or `None` once the burst is over
    pub fn frame_at(&mut self, at: Duration) -> Option<ConfettiFrame> {
        if at >= self.duration {
            return None;
        }
        let left = ConfettiOrigin {
            x: self.rng.gen_range(0.1..0.3),
            y: self.rng.r#gen::<f32>() - 0.2,
        };
        let right = ConfettiOrigin {
            x: self.rng.gen_range(0.7..0.9),
            y: self.rng.r#gen::<f32>() - 0.2,
        };
        Some(ConfettiFrame {
            at,
            particle_count: self.particle_count_at(at),
            origins: [left, right],
        })
    }

    /// Every emission of the burst, first one after one interval
    pub fn frames(mut self) -> impl Iterator<Item = ConfettiFrame> {
        let interval = self.interval;
        (1u32..)
            .map(move |n| interval * n)
            .map_while(move |at| self.frame_at(at))
    }
}
