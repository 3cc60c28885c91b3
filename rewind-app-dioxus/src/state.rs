use dioxus::prelude::*;
use rewind_core::{NavState, ProposalView, StoryHandle, StoryIntent, StorySnapshot};

/// Story display state as granular signals, fed by the engine bridge.
#[derive(Clone, Copy)]
pub struct StoryState {
    /// Index of the slide on screen
    pub index: Signal<usize>,
    pub nav_state: Signal<NavState>,
    /// Whether the auto-advance countdown is running
    pub dwell_running: Signal<bool>,
    /// Bumped every time the countdown restarts, used to restart the progress animation
    pub dwell_epoch: Signal<u64>,
    pub unlocked: Signal<bool>,
    pub muted: Signal<bool>,
    pub proposal: Signal<Option<ProposalView>>,
    /// Confetti seed once the answer was yes
    pub celebration: Signal<Option<u64>>,
    /// Live horizontal drag offset of the surface
    pub drag_offset: Signal<f64>,
    /// Intent sender, present once the engine is up
    pub handle: Signal<Option<StoryHandle>>,
}

impl StoryState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: Signal::new(0),
            nav_state: Signal::new(NavState::Running),
            dwell_running: Signal::new(false),
            dwell_epoch: Signal::new(0),
            unlocked: Signal::new(false),
            muted: Signal::new(false),
            proposal: Signal::new(None),
            celebration: Signal::new(None),
            drag_offset: Signal::new(0.0),
            handle: Signal::new(None),
        }
    }

    /// Reset every signal from an engine snapshot
    pub fn load_snapshot(&mut self, snapshot: StorySnapshot) {
        self.index.set(snapshot.index);
        self.nav_state.set(snapshot.nav_state);
        self.set_dwell(snapshot.dwell_running);
        self.unlocked.set(snapshot.unlocked);
        self.muted.set(snapshot.muted);
        self.proposal.set(Some(snapshot.proposal));
    }

    /// Record a countdown start or stop
    pub fn set_dwell(&mut self, running: bool) {
        self.dwell_running.set(running);
        if running {
            let epoch = *self.dwell_epoch.peek();
            self.dwell_epoch.set(epoch.wrapping_add(1));
        }
    }

    /// Forward an intent to the engine
    pub fn send(&self, intent: StoryIntent) {
        if let Some(handle) = self.handle.peek().as_ref() {
            handle.send(intent);
        }
    }

    pub fn set_slide(&mut self, index: usize) {
        self.index.set(index);
        self.drag_offset.set(0.0);
    }
}

impl Default for StoryState {
    fn default() -> Self {
        Self::new()
    }
}
