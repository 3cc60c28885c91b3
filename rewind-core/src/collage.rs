//! Photo collage state: the shuffled stack, its cycling top card, the grid overlay
//! and the full-screen viewer.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::time::Duration;

/// How long each photo stays on top while the grid is closed
pub const CYCLE_INTERVAL: Duration = Duration::from_secs(3);

/// Transform of one card in the stack, in degrees and logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardLayout {
    pub rotate: f32,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

/// Bottom to top. Deeper stacks reuse the last entry.
pub const STACK_LAYOUTS: [CardLayout; 4] = [
    CardLayout { rotate: -8.0, x: -30.0, y: 10.0, scale: 0.92 },
    CardLayout { rotate: 5.0, x: 25.0, y: -15.0, scale: 0.95 },
    CardLayout { rotate: -3.0, x: -10.0, y: -5.0, scale: 0.97 },
    CardLayout { rotate: 0.0, x: 0.0, y: 0.0, scale: 1.0 },
];

/// Where a card sits right now
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackedCard {
    /// Index into [`PhotoCollage::photos`]
    pub photo: usize,
    /// 0 is the bottom, `len - 1` is on top
    pub depth: usize,
    pub layout: CardLayout,
}

#[derive(Debug, Clone)]
pub struct PhotoCollage {
    photos: Vec<String>,
    top: usize,
    grid_open: bool,
    viewing: Option<usize>,
}

impl PhotoCollage {
    /// Shuffle `photos` with a seeded RNG; the last photo after shuffling starts on top
    #[must_use]
    pub fn new(mut photos: Vec<String>, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        photos.shuffle(&mut rng);
        let top = photos.len().saturating_sub(1);
        Self {
            photos,
            top,
            grid_open: false,
            viewing: None,
        }
    }

    #[must_use]
    pub fn photos(&self) -> &[String] {
        &self.photos
    }

    #[must_use]
    pub const fn top(&self) -> usize {
        self.top
    }

    #[must_use]
    pub const fn is_grid_open(&self) -> bool {
        self.grid_open
    }

    #[must_use]
    pub const fn viewing(&self) -> Option<usize> {
        self.viewing
    }

    #[must_use]
    pub fn viewing_photo(&self) -> Option<&str> {
        self.viewing
            .and_then(|i| self.photos.get(i))
            .map(String::as_str)
    }

    /// Rotate the top card. Frozen while the grid is open.
    pub fn cycle(&mut self) -> bool {
        if self.grid_open || self.photos.is_empty() {
            return false;
        }
        self.top = (self.top + 1) % self.photos.len();
        true
    }

    /// Stack position of photo `i` for the current top card
    #[must_use]
    pub fn depth_of(&self, i: usize) -> usize {
        let n = self.photos.len();
        if n == 0 {
            return 0;
        }
        (n - 1) - ((self.top + n - i % n) % n)
    }

    #[must_use]
    pub fn cards(&self) -> Vec<StackedCard> {
        (0..self.photos.len())
            .map(|photo| {
                let depth = self.depth_of(photo);
                let layout = STACK_LAYOUTS
                    .get(depth)
                    .copied()
                    .unwrap_or(STACK_LAYOUTS[STACK_LAYOUTS.len() - 1]);
                StackedCard {
                    photo,
                    depth,
                    layout,
                }
            })
            .collect()
    }

    /// Returns `true` if the grid was closed before
    pub fn open_grid(&mut self) -> bool {
        !std::mem::replace(&mut self.grid_open, true)
    }

    /// Close the grid and any open viewer. Returns `true` if the grid was open.
    pub fn close_grid(&mut self) -> bool {
        self.viewing = None;
        std::mem::replace(&mut self.grid_open, false)
    }

    pub fn view(&mut self, i: usize) {
        if self.grid_open && i < self.photos.len() {
            self.viewing = Some(i);
        }
    }

    pub fn close_viewer(&mut self) {
        self.viewing = None;
    }

    pub fn view_next(&mut self) {
        let n = self.photos.len();
        if let Some(i) = self.viewing.as_mut() {
            *i = (*i + 1) % n;
        }
    }

    pub fn view_prev(&mut self) {
        let n = self.photos.len();
        if let Some(i) = self.viewing.as_mut() {
            *i = (*i + n - 1) % n;
        }
    }
}
