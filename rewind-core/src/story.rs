//! The engine that ties navigation, gestures, audio and the proposal together.
//!
//! A [`StoryEngine`] is driven from one place: the [`StoryEngine::run`] loop consumes
//! intents from the surface and expirations from the scheduler in arrival order, and
//! publishes what changed as [`StoryEvent`]s.

use crate::audio::{AudioBackend, AudioChannel, UnlockSource};
use crate::catalog::{SlideCatalog, SlideKind};
use crate::config::{ProposalConfig, RewindConfig};
use crate::gesture::{GestureInterpreter, NavIntent, PointerInput};
use crate::navigation::{NavState, NavigationController, SlideChange};
use crate::proposal::{Notifier, ProposalFlow, ProposalMood, ProposalState};
use crate::timer::{Scheduler, TimerTicket};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// Something the presentation surface asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoryIntent {
    Next,
    Prev,
    Pointer(PointerInput),
    /// A renderer opened or closed its overlay
    SetOverlay(bool),
    /// First user gesture seen by the unlock listeners
    Unlock(UnlockSource),
    ToggleMute,
    Decline,
    Accept,
    /// Decorative pop, e.g. opening the photo grid
    Pop,
}

/// Render-facing view of the proposal flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalView {
    pub state: ProposalState,
    pub mood: ProposalMood,
    pub rejections: usize,
    pub decline_label: Option<String>,
    pub accept_font_px: u32,
}

impl From<&ProposalFlow> for ProposalView {
    fn from(flow: &ProposalFlow) -> Self {
        Self {
            state: flow.state(),
            mood: flow.mood(),
            rejections: flow.rejections(),
            decline_label: flow.decline_label().map(str::to_string),
            accept_font_px: flow.accept_font_px(),
        }
    }
}

/// Events emitted by the story engine
#[derive(Debug, Clone, PartialEq)]
pub enum StoryEvent {
    SlideChanged { from: usize, to: usize },
    NavStateChanged(NavState),
    /// The auto-advance countdown was restarted (`true`) or stopped (`false`)
    Dwell { running: bool },
    AudioUnlocked(UnlockSource),
    MuteChanged(bool),
    ProposalChanged(ProposalView),
    /// The affirmative answer was given
    Celebration { confetti_seed: u64 },
}

/// Everything a renderer needs to draw the current frame from scratch
#[derive(Debug, Clone, PartialEq)]
pub struct StorySnapshot {
    pub index: usize,
    pub nav_state: NavState,
    pub dwell_running: bool,
    pub unlocked: bool,
    pub muted: bool,
    pub proposal: ProposalView,
}

/// Cloneable sender for intents
#[derive(Debug, Clone)]
pub struct StoryHandle {
    tx: mpsc::UnboundedSender<StoryIntent>,
}

impl StoryHandle {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StoryIntent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue an intent. Dropped silently once the engine has stopped.
    pub fn send(&self, intent: StoryIntent) {
        if self.tx.send(intent).is_err() {
            trace!("Story engine stopped, dropping {intent:?}");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NavSnapshot {
    state: NavState,
    ticket: Option<TimerTicket>,
}

pub struct StoryEngine {
    catalog: Arc<SlideCatalog>,
    navigation: NavigationController,
    gestures: GestureInterpreter,
    audio: AudioChannel,
    proposal: ProposalFlow,
    notifier: Box<dyn Notifier>,
    proposal_config: ProposalConfig,
    event_tx: broadcast::Sender<StoryEvent>,
}

impl StoryEngine {
    pub fn new(
        catalog: Arc<SlideCatalog>,
        scheduler: Box<dyn Scheduler>,
        backend: Box<dyn AudioBackend>,
        notifier: Box<dyn Notifier>,
        config: &RewindConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(64);

        let phrases = match catalog.terminal().map(|s| &s.kind) {
            Some(SlideKind::Proposal {
                decline_phrases, ..
            }) => decline_phrases.clone(),
            _ => Vec::new(),
        };

        Self {
            navigation: NavigationController::new(
                Arc::clone(&catalog),
                scheduler,
                config.presentation.auto_advance(),
            ),
            catalog,
            gestures: GestureInterpreter::new(config.gestures.clone()),
            audio: AudioChannel::new(backend, &config.audio),
            proposal: ProposalFlow::new(phrases),
            notifier,
            proposal_config: config.proposal.clone(),
            event_tx,
        }
    }

    /// Subscribe to story events
    pub fn subscribe(&self) -> broadcast::Receiver<StoryEvent> {
        self.event_tx.subscribe()
    }

    /// Live drag offset of the slide surface
    #[must_use]
    pub fn subscribe_drag_offset(&self) -> watch::Receiver<f64> {
        self.gestures.subscribe_drag_offset()
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<SlideCatalog> {
        &self.catalog
    }

    #[must_use]
    pub const fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    #[must_use]
    pub const fn audio(&self) -> &AudioChannel {
        &self.audio
    }

    #[must_use]
    pub const fn proposal(&self) -> &ProposalFlow {
        &self.proposal
    }

    #[must_use]
    pub fn snapshot(&self) -> StorySnapshot {
        StorySnapshot {
            index: self.navigation.current_index(),
            nav_state: self.navigation.state(),
            dwell_running: self.navigation.armed_ticket().is_some(),
            unlocked: self.audio.is_unlocked(),
            muted: self.audio.is_muted(),
            proposal: ProposalView::from(&self.proposal),
        }
    }

    /// Queue the first slide's track so the unlock gesture can start it
    pub fn start(&mut self) {
        info!(
            "Starting story with {} slides, auto-advance {:?}",
            self.catalog.len(),
            self.navigation.auto_advance()
        );
        if let Some(track) = self.navigation.current_slide().and_then(|s| s.track.clone()) {
            self.audio.play(&track);
        }
    }

    /// Apply one intent
    pub fn handle(&mut self, intent: StoryIntent) {
        trace!("Intent {intent:?}");
        let before = self.nav_snapshot();

        match intent {
            StoryIntent::Next => self.navigate(NavIntent::Next),
            StoryIntent::Prev => self.navigate(NavIntent::Prev),
            StoryIntent::Pointer(input) => {
                let suppressed = self.navigation.is_terminal();
                for nav in self.gestures.handle(input, suppressed) {
                    self.navigate(nav);
                }
            }
            StoryIntent::SetOverlay(open) => self.navigation.set_overlay_open(open),
            StoryIntent::Unlock(source) => {
                if self.audio.request_unlock() {
                    debug!("Unlocked by {}", source.as_str());
                    self.emit(StoryEvent::AudioUnlocked(source));
                }
            }
            StoryIntent::ToggleMute => {
                let muted = self.audio.toggle_muted();
                self.emit(StoryEvent::MuteChanged(muted));
            }
            StoryIntent::Decline => self.decline(),
            StoryIntent::Accept => self.accept(),
            StoryIntent::Pop => self.audio.play_pop_sound(),
        }

        self.publish_nav(before);
    }

    /// Apply an auto-advance expiration
    pub fn on_timer(&mut self, ticket: TimerTicket) {
        let before = self.nav_snapshot();
        let change = self.navigation.on_timer_fired(ticket);
        self.on_slide_change(change);
        self.publish_nav(before);
    }

    /// Drive the engine until `cancel` fires or every intent sender is gone
    pub async fn run(
        mut self,
        mut intents: mpsc::UnboundedReceiver<StoryIntent>,
        mut timers: mpsc::UnboundedReceiver<TimerTicket>,
        cancel: CancellationToken,
    ) {
        info!("Story engine running");
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!("Story engine cancelled");
                    break;
                }
                intent = intents.recv() => match intent {
                    Some(intent) => self.handle(intent),
                    None => {
                        debug!("Intent channel closed");
                        break;
                    }
                },
                Some(ticket) = timers.recv() => self.on_timer(ticket),
            }
        }
    }

    fn navigate(&mut self, intent: NavIntent) {
        let change = match intent {
            NavIntent::Next => self.navigation.go_next(),
            NavIntent::Prev => self.navigation.go_prev(),
            NavIntent::HoldStart => {
                self.navigation.set_paused(true);
                None
            }
            NavIntent::HoldEnd => {
                self.navigation.set_paused(false);
                None
            }
        };
        self.on_slide_change(change);
    }

    fn on_slide_change(&mut self, change: Option<SlideChange>) {
        let Some(change) = change else {
            return;
        };

        self.audio.play_transition_sound();
        if let Some(track) = self.catalog.get(change.to).and_then(|s| s.track.clone()) {
            self.audio.play(&track);
        }
        self.emit(StoryEvent::SlideChanged {
            from: change.from,
            to: change.to,
        });
    }

    fn decline(&mut self) {
        if !self.navigation.is_terminal() || !self.proposal.decline() {
            return;
        }
        self.audio.play_pop_sound();
        self.emit(StoryEvent::ProposalChanged(ProposalView::from(&self.proposal)));
    }

    fn accept(&mut self) {
        if !self.navigation.is_terminal() || !self.proposal.accept() {
            return;
        }

        if let Some(track) = self
            .catalog
            .terminal()
            .and_then(|s| s.alternate_track.clone())
        {
            self.audio.play(&track);
        }

        let ProposalConfig {
            recipient,
            subject,
            body,
            confetti_seed,
        } = &self.proposal_config;
        if recipient.is_empty() {
            debug!("No recipient configured, skipping notification");
        } else {
            self.notifier.notify(recipient, subject, body);
        }

        self.emit(StoryEvent::ProposalChanged(ProposalView::from(&self.proposal)));
        self.emit(StoryEvent::Celebration {
            confetti_seed: *confetti_seed,
        });
    }

    fn nav_snapshot(&self) -> NavSnapshot {
        NavSnapshot {
            state: self.navigation.state(),
            ticket: self.navigation.armed_ticket(),
        }
    }

    fn publish_nav(&self, before: NavSnapshot) {
        let after = self.nav_snapshot();
        if after.state != before.state {
            self.emit(StoryEvent::NavStateChanged(after.state));
        }
        if after.ticket != before.ticket {
            self.emit(StoryEvent::Dwell {
                running: after.ticket.is_some(),
            });
        }
    }

    fn emit(&self, event: StoryEvent) {
        let _ = self.event_tx.send(event);
    }
}

impl std::fmt::Debug for StoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryEngine")
            .field("navigation", &self.navigation)
            .field("audio", &self.audio)
            .field("proposal", &self.proposal)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::EffectKind;
    use crate::catalog::{AudioAsset, SlideDescriptor, Track, default_decline_phrases};
    use crate::testing::{FakeAudioBackend, RecordingNotifier, RecordingScheduler, settle};
    use crate::timer::TokioScheduler;
    use std::time::Duration;

    fn stat(track: Option<&str>) -> SlideDescriptor {
        let slide = SlideDescriptor::new(SlideKind::Stat {
            top_label: "We texted".to_string(),
            number: 12_480,
            suffix: String::new(),
            bottom_label: "messages".to_string(),
            bottom_label_append: None,
            emoji: String::new(),
        });
        match track {
            Some(asset) => slide.with_track(Track::new(asset, 10.0)),
            None => slide,
        }
    }

    fn proposal() -> SlideDescriptor {
        SlideDescriptor::new(SlideKind::Proposal {
            question: "?".to_string(),
            celebration_title: "!".to_string(),
            celebration_subtitle: String::new(),
            decline_phrases: default_decline_phrases(),
        })
        .with_track(Track::new("/music/ask.mp3", 0.0))
        .with_alternate_track(Track::new("/music/yes.mp3", 45.0))
    }

    struct Harness {
        engine: StoryEngine,
        scheduler: RecordingScheduler,
        backend: FakeAudioBackend,
        notifier: RecordingNotifier,
        events: broadcast::Receiver<StoryEvent>,
    }

    impl Harness {
        fn events(&mut self) -> Vec<StoryEvent> {
            let mut out = Vec::new();
            while let Ok(event) = self.events.try_recv() {
                out.push(event);
            }
            out
        }

        fn fire(&mut self) {
            let ticket = self.scheduler.live_ticket().unwrap();
            self.engine.on_timer(ticket);
        }
    }

    fn harness(slides: Vec<SlideDescriptor>) -> Harness {
        let mut config = RewindConfig::default();
        config.proposal.recipient = "me@example.com".to_string();

        let scheduler = RecordingScheduler::default();
        let backend = FakeAudioBackend::default();
        let notifier = RecordingNotifier::default();
        let engine = StoryEngine::new(
            Arc::new(SlideCatalog::new(slides).unwrap()),
            Box::new(scheduler.clone()),
            Box::new(backend.clone()),
            Box::new(notifier.clone()),
            &config,
        );
        let events = engine.subscribe();
        Harness {
            engine,
            scheduler,
            backend,
            notifier,
            events,
        }
    }

    fn asset(path: &str) -> AudioAsset {
        AudioAsset::new(path)
    }

    fn tap(h: &mut Harness, x: f64) {
        h.engine.handle(StoryIntent::Pointer(PointerInput::Down { x, width: 400.0 }));
        h.engine.handle(StoryIntent::Pointer(PointerInput::Up { x }));
    }

    #[test]
    fn test_first_track_waits_for_unlock() {
        let mut h = harness(vec![stat(Some("/music/a.mp3")), proposal()]);
        h.engine.start();
        assert!(h.backend.started().is_empty());

        h.engine.handle(StoryIntent::Unlock(UnlockSource::KeyDown));
        assert_eq!(h.backend.started(), vec![asset("/music/a.mp3")]);
        assert_eq!(h.events(), vec![StoryEvent::AudioUnlocked(UnlockSource::KeyDown)]);

        h.engine.handle(StoryIntent::Unlock(UnlockSource::Click));
        assert!(h.events().is_empty());
    }

    #[test]
    fn test_navigation_before_unlock_queues_latest_track() {
        let mut h = harness(vec![
            stat(Some("/music/a.mp3")),
            stat(Some("/music/b.mp3")),
            proposal(),
        ]);
        h.engine.start();
        h.engine.handle(StoryIntent::Next);
        h.engine.handle(StoryIntent::Unlock(UnlockSource::PointerDown));

        assert_eq!(h.backend.started(), vec![asset("/music/b.mp3")]);
        assert!(h.backend.effects().is_empty());
    }

    #[test]
    fn test_slide_change_plays_cue_and_track() {
        let mut h = harness(vec![stat(Some("/music/a.mp3")), stat(Some("/music/b.mp3")), proposal()]);
        h.engine.start();
        h.engine.handle(StoryIntent::Unlock(UnlockSource::Click));
        h.events();

        h.engine.handle(StoryIntent::Next);
        assert_eq!(h.backend.effects(), vec![EffectKind::Transition]);
        assert_eq!(h.backend.current(), Some(asset("/music/b.mp3")));
        assert_eq!(h.backend.max_concurrent_loops(), 1);

        let events = h.events();
        assert!(events.contains(&StoryEvent::SlideChanged { from: 0, to: 1 }));
        assert!(events.contains(&StoryEvent::Dwell { running: true }));
    }

    #[test]
    fn test_slide_without_track_keeps_music() {
        let mut h = harness(vec![stat(Some("/music/a.mp3")), stat(None), proposal()]);
        h.engine.start();
        h.engine.handle(StoryIntent::Unlock(UnlockSource::Click));

        h.engine.handle(StoryIntent::Next);
        assert_eq!(h.backend.started(), vec![asset("/music/a.mp3")]);
        assert_eq!(h.engine.audio().active_asset(), Some(&asset("/music/a.mp3")));
    }

    #[test]
    fn test_boundary_emits_no_cue() {
        let mut h = harness(vec![stat(None), proposal()]);
        h.engine.handle(StoryIntent::Unlock(UnlockSource::Click));
        h.events();

        h.engine.handle(StoryIntent::Prev);
        assert!(h.backend.effects().is_empty());
        assert!(h.events().is_empty());
    }

    #[test]
    fn test_stat_then_terminal_clears_timer() {
        for held in [false, true] {
            let mut h = harness(vec![stat(None), proposal()]);
            if held {
                h.engine.handle(StoryIntent::Pointer(PointerInput::Down { x: 200.0, width: 400.0 }));
            }

            h.engine.handle(StoryIntent::Next);
            assert_eq!(h.engine.navigation().current_index(), 1);
            assert_eq!(h.engine.navigation().state(), NavState::Terminal);
            assert_eq!(h.scheduler.live_count(), 0);
            assert!(!h.engine.snapshot().dwell_running);
        }
    }

    #[test]
    fn test_tap_zones_navigate() {
        let mut h = harness(vec![stat(None), stat(None), stat(None), proposal()]);
        tap(&mut h, 300.0);
        tap(&mut h, 300.0);
        assert_eq!(h.engine.navigation().current_index(), 2);
        tap(&mut h, 20.0);
        assert_eq!(h.engine.navigation().current_index(), 1);
        assert_eq!(h.engine.navigation().state(), NavState::Running);
    }

    #[test]
    fn test_swipe_release_navigates_once() {
        let mut h = harness(vec![stat(None), stat(None), stat(None), proposal()]);
        h.engine.handle(StoryIntent::Pointer(PointerInput::Down { x: 300.0, width: 400.0 }));
        h.engine.handle(StoryIntent::Pointer(PointerInput::Move { x: 240.0 }));
        h.engine.handle(StoryIntent::Pointer(PointerInput::Up { x: 240.0 }));
        assert_eq!(h.engine.navigation().current_index(), 1);

        h.engine.handle(StoryIntent::Pointer(PointerInput::Down { x: 300.0, width: 400.0 }));
        h.engine.handle(StoryIntent::Pointer(PointerInput::Up { x: 260.0 }));
        assert_eq!(h.engine.navigation().current_index(), 1);
    }

    #[test]
    fn test_hold_pauses_and_release_resumes() {
        let mut h = harness(vec![stat(None), stat(None), proposal()]);
        h.events();

        h.engine.handle(StoryIntent::Pointer(PointerInput::Down { x: 100.0, width: 400.0 }));
        assert_eq!(h.engine.navigation().state(), NavState::PausedByHold);
        assert_eq!(h.scheduler.live_count(), 0);

        h.engine.handle(StoryIntent::Pointer(PointerInput::Leave));
        assert_eq!(h.engine.navigation().state(), NavState::Running);
        assert_eq!(h.scheduler.live_count(), 1);

        let events = h.events();
        assert!(events.contains(&StoryEvent::NavStateChanged(NavState::PausedByHold)));
        assert!(events.contains(&StoryEvent::NavStateChanged(NavState::Running)));
    }

    #[test]
    fn test_overlay_pauses() {
        let mut h = harness(vec![stat(None), stat(None), proposal()]);
        h.engine.handle(StoryIntent::SetOverlay(true));
        assert_eq!(h.engine.navigation().state(), NavState::PausedByOverlay);
        assert_eq!(h.scheduler.live_count(), 0);
        h.engine.handle(StoryIntent::SetOverlay(false));
        assert_eq!(h.scheduler.live_count(), 1);
    }

    #[test]
    fn test_timer_fire_advances_with_cue() {
        let mut h = harness(vec![stat(None), stat(Some("/music/b.mp3")), proposal()]);
        h.engine.handle(StoryIntent::Unlock(UnlockSource::Click));
        h.fire();
        assert_eq!(h.engine.navigation().current_index(), 1);
        assert_eq!(h.backend.effects(), vec![EffectKind::Transition]);
        assert_eq!(h.backend.current(), Some(asset("/music/b.mp3")));
    }

    #[test]
    fn test_gestures_suppressed_on_terminal() {
        let mut h = harness(vec![stat(None), proposal()]);
        h.engine.handle(StoryIntent::Next);

        tap(&mut h, 10.0);
        h.engine.handle(StoryIntent::Pointer(PointerInput::Down { x: 100.0, width: 400.0 }));
        h.engine.handle(StoryIntent::Pointer(PointerInput::Up { x: 300.0 }));

        assert_eq!(h.engine.navigation().current_index(), 1);
        assert!(!h.engine.navigation().is_paused());
    }

    #[test]
    fn test_decline_only_on_terminal() {
        let mut h = harness(vec![stat(None), proposal()]);
        h.engine.handle(StoryIntent::Decline);
        assert_eq!(h.engine.proposal().rejections(), 0);

        h.engine.handle(StoryIntent::Unlock(UnlockSource::Click));
        h.engine.handle(StoryIntent::Next);
        h.events();

        h.engine.handle(StoryIntent::Decline);
        assert_eq!(h.engine.proposal().rejections(), 1);
        assert_eq!(h.backend.effects().last(), Some(&EffectKind::Pop));

        let events = h.events();
        assert!(
            matches!(
                events.last(),
                Some(StoryEvent::ProposalChanged(view))
                    if view.mood == ProposalMood::Pleading && view.accept_font_px == 36
            ),
            "{events:?}"
        );
    }

    #[test]
    fn test_decline_exhaustion_through_engine() {
        let mut h = harness(vec![stat(None), proposal()]);
        h.engine.handle(StoryIntent::Next);
        let m = default_decline_phrases().len();

        for _ in 0..m + 3 {
            h.engine.handle(StoryIntent::Decline);
        }
        assert_eq!(h.engine.proposal().rejections(), m);
        assert_eq!(h.engine.snapshot().proposal.decline_label, None);
    }

    #[test]
    fn test_accept_switches_track_and_notifies_once() {
        let mut h = harness(vec![stat(None), proposal()]);
        h.engine.handle(StoryIntent::Unlock(UnlockSource::Click));
        h.engine.handle(StoryIntent::Next);
        assert_eq!(h.backend.current(), Some(asset("/music/ask.mp3")));
        h.events();

        h.engine.handle(StoryIntent::Accept);
        h.engine.handle(StoryIntent::Accept);

        assert_eq!(h.backend.current(), Some(asset("/music/yes.mp3")));
        let request = h.backend.last_loop_request().unwrap();
        assert_eq!(request.start_offset, Duration::from_secs(45));

        let sent = h.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "me@example.com");

        let celebrations = h
            .events()
            .into_iter()
            .filter(|e| matches!(e, StoryEvent::Celebration { .. }))
            .count();
        assert_eq!(celebrations, 1);
        assert_eq!(h.engine.proposal().state(), ProposalState::Celebrating);
    }

    #[test]
    fn test_accept_without_recipient_skips_notify() {
        let scheduler = RecordingScheduler::default();
        let notifier = RecordingNotifier::default();
        let mut engine = StoryEngine::new(
            Arc::new(SlideCatalog::new(vec![proposal()]).unwrap()),
            Box::new(scheduler),
            Box::new(FakeAudioBackend::default()),
            Box::new(notifier.clone()),
            &RewindConfig::default(),
        );

        engine.handle(StoryIntent::Accept);
        assert_eq!(engine.proposal().state(), ProposalState::Celebrating);
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn test_toggle_mute_emits() {
        let mut h = harness(vec![stat(None), proposal()]);
        h.engine.handle(StoryIntent::ToggleMute);
        h.engine.handle(StoryIntent::ToggleMute);
        assert_eq!(
            h.events(),
            vec![StoryEvent::MuteChanged(true), StoryEvent::MuteChanged(false)]
        );
    }

    #[test]
    fn test_pop_intent_needs_unlock() {
        let mut h = harness(vec![stat(None), proposal()]);
        h.engine.handle(StoryIntent::Pop);
        assert!(h.backend.effects().is_empty());
        h.engine.handle(StoryIntent::Unlock(UnlockSource::Click));
        h.engine.handle(StoryIntent::Pop);
        assert_eq!(h.backend.effects(), vec![EffectKind::Pop]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_loop_auto_advances_until_terminal() {
        let (scheduler, timers) = TokioScheduler::new(tokio::runtime::Handle::current());
        let mut config = RewindConfig::default();
        config.presentation.auto_advance_ms = 1_000;

        let mut engine = StoryEngine::new(
            Arc::new(SlideCatalog::new(vec![stat(None), stat(None), proposal()]).unwrap()),
            Box::new(scheduler),
            Box::new(FakeAudioBackend::default()),
            Box::new(RecordingNotifier::default()),
            &config,
        );
        engine.start();
        let mut events = engine.subscribe();

        let (handle, intents) = StoryHandle::new();
        let cancel = CancellationToken::new();
        let local = tokio::task::LocalSet::new();
        local.spawn_local(engine.run(intents, timers, cancel.clone()));

        local
            .run_until(async {
                settle().await;
                for _ in 0..3 {
                    tokio::time::advance(Duration::from_millis(1_000)).await;
                    settle().await;
                }
            })
            .await;

        let mut changes = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let StoryEvent::SlideChanged { to, .. } = event {
                changes.push(to);
            }
        }
        assert_eq!(changes, vec![1, 2]);

        cancel.cancel();
        handle.send(StoryIntent::Next);
        local.await;
    }
}
