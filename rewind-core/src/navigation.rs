//! Slide position, pause sources and the auto-advance timer.
//!
//! Every public transition ends in [`NavigationController::sync_timer`], which makes
//! the armed timer match `eligible && !paused && !overlay_open`. The timer slot holds
//! an [`ArmedTimer`], so replacing or clearing it cancels the old callback.

use crate::catalog::{SlideCatalog, SlideDescriptor};
use crate::timer::{ArmedTimer, Scheduler, TimerTicket};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Observable navigation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// Timer running on an eligible slide
    Running,
    /// The user is holding the surface
    PausedByHold,
    /// A renderer overlay is open
    PausedByOverlay,
    /// On the proposal slide; auto-advance is off for good
    Terminal,
}

/// A navigation that actually moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChange {
    pub from: usize,
    pub to: usize,
}

impl SlideChange {
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        self.to > self.from
    }
}

pub struct NavigationController {
    catalog: Arc<SlideCatalog>,
    scheduler: Box<dyn Scheduler>,
    auto_advance: Duration,
    current_index: usize,
    paused: bool,
    overlay_open: bool,
    timer: Option<ArmedTimer>,
    next_generation: u64,
}

impl NavigationController {
    /// Create a controller positioned on the first slide with its timer armed
    pub fn new(
        catalog: Arc<SlideCatalog>,
        scheduler: Box<dyn Scheduler>,
        auto_advance: Duration,
    ) -> Self {
        let mut controller = Self {
            catalog,
            scheduler,
            auto_advance,
            current_index: 0,
            paused: false,
            overlay_open: false,
            timer: None,
            next_generation: 0,
        };
        controller.sync_timer();
        controller
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_slide(&self) -> Option<&SlideDescriptor> {
        self.catalog.get(self.current_index)
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<SlideCatalog> {
        &self.catalog
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub const fn is_overlay_open(&self) -> bool {
        self.overlay_open
    }

    #[must_use]
    pub const fn auto_advance(&self) -> Duration {
        self.auto_advance
    }

    /// Whether the proposal slide is showing
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.current_slide().is_some_and(SlideDescriptor::is_terminal)
    }

    #[must_use]
    pub fn state(&self) -> NavState {
        if self.is_terminal() {
            NavState::Terminal
        } else if self.overlay_open {
            NavState::PausedByOverlay
        } else if self.paused {
            NavState::PausedByHold
        } else {
            NavState::Running
        }
    }

    /// Ticket of the pending auto-advance, if armed
    #[must_use]
    pub fn armed_ticket(&self) -> Option<TimerTicket> {
        self.timer.as_ref().map(ArmedTimer::ticket)
    }

    /// The condition the armed timer must mirror
    #[must_use]
    pub fn timer_should_run(&self) -> bool {
        let eligible = self
            .current_slide()
            .is_some_and(SlideDescriptor::auto_advance_eligible);
        eligible && !self.paused && !self.overlay_open
    }

    pub fn go_next(&mut self) -> Option<SlideChange> {
        let target = (self.current_index + 1).min(self.catalog.last_index());
        self.move_to(target)
    }

    pub fn go_prev(&mut self) -> Option<SlideChange> {
        let target = self.current_index.saturating_sub(1);
        self.move_to(target)
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            trace!("Hold pause {}", if paused { "on" } else { "off" });
            self.paused = paused;
        }
        self.sync_timer();
    }

    pub fn set_overlay_open(&mut self, open: bool) {
        if self.overlay_open != open {
            debug!("Overlay {}", if open { "opened" } else { "closed" });
            self.overlay_open = open;
        }
        self.sync_timer();
    }

    /// Handle an expiration. Stale tickets are ignored.
    pub fn on_timer_fired(&mut self, ticket: TimerTicket) -> Option<SlideChange> {
        if self.armed_ticket() != Some(ticket) {
            trace!("Ignoring stale auto-advance {ticket}");
            return None;
        }
        self.timer = None;
        debug!("Auto-advancing from slide {}", self.current_index);
        let change = self.go_next();
        if change.is_none() {
            self.sync_timer();
        }
        change
    }

    fn move_to(&mut self, target: usize) -> Option<SlideChange> {
        if target == self.current_index {
            return None;
        }
        let change = SlideChange {
            from: self.current_index,
            to: target,
        };
        self.current_index = target;
        debug!("Slide {} -> {}", change.from, change.to);

        // A new slide always gets a fresh dwell period
        self.timer = None;
        self.sync_timer();
        Some(change)
    }

    fn sync_timer(&mut self) {
        match (self.timer_should_run(), self.timer.is_some()) {
            (true, false) => {
                self.next_generation += 1;
                let ticket = TimerTicket::new(self.next_generation);
                self.timer = Some(ArmedTimer::arm(
                    self.scheduler.as_ref(),
                    self.auto_advance,
                    ticket,
                ));
                trace!("Armed auto-advance {ticket} for {:?}", self.auto_advance);
            }
            (false, true) => {
                self.timer = None;
                trace!("Cancelled auto-advance");
            }
            _ => {}
        }
    }
}

impl std::fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationController")
            .field("current_index", &self.current_index)
            .field("paused", &self.paused)
            .field("overlay_open", &self.overlay_open)
            .field("timer", &self.armed_ticket())
            .finish_non_exhaustive()
    }
}
