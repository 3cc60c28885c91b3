use crate::audio_backend::WebviewAudioBackend;
use crate::notifier::MailtoNotifier;
use crate::state::StoryState;
use dioxus::desktop::use_window;
use dioxus::prelude::*;
use rewind_core::{
    RewindConfig, SlideCatalog, StoryEngine, StoryEvent, StoryHandle, TokioScheduler,
};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const LOG_TARGET: &str = "rewind::bridge";

/// Build the story engine, run it on the UI task and bridge its events to signals.
///
/// The engine owns the webview audio backend, so it lives on the UI executor rather
/// than the background runtime; only its timers run there.
pub fn use_story_engine(catalog: Arc<SlideCatalog>, config: &RewindConfig, story: StoryState) {
    let runtime: Handle = use_context();
    let cancel_token: CancellationToken = use_context();
    let window = use_window();
    let config = config.clone();

    use_hook(move || {
        let (scheduler, timers) = TokioScheduler::new(runtime);
        let backend = WebviewAudioBackend::new(config.assets_dir());
        let mut engine = StoryEngine::new(
            catalog,
            Box::new(scheduler),
            Box::new(backend),
            Box::new(MailtoNotifier),
            &config,
        );
        engine.start();

        let events = engine.subscribe();
        let drag_offset = engine.subscribe_drag_offset();
        let snapshot = engine.snapshot();
        let (handle, intents) = StoryHandle::new();

        spawn(bridge_story_events(events, story));
        spawn(bridge_drag_offset(drag_offset, story));
        spawn(async move {
            let mut story = story;
            story.load_snapshot(snapshot);
            story.handle.set(Some(handle));

            engine.run(intents, timers, cancel_token.clone()).await;

            story.handle.set(None);
            if cancel_token.is_cancelled() {
                info!(target: LOG_TARGET, "Closing window");
                window.close();
            }
        });
    });
}

async fn bridge_story_events(mut rx: broadcast::Receiver<StoryEvent>, story: StoryState) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                handle_story_event(event, story);
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!(target: LOG_TARGET, "Story event channel closed");
                break;
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                info!(target: LOG_TARGET, "Missed {} story events", n);
            }
        }
    }
}

async fn bridge_drag_offset(mut rx: watch::Receiver<f64>, mut story: StoryState) {
    while rx.changed().await.is_ok() {
        let offset = *rx.borrow_and_update();
        story.drag_offset.set(offset);
    }
}

fn handle_story_event(event: StoryEvent, mut story: StoryState) {
    match event {
        StoryEvent::SlideChanged { from, to } => {
            debug!(target: LOG_TARGET, "Slide {from} -> {to}");
            story.set_slide(to);
        }
        StoryEvent::NavStateChanged(state) => {
            story.nav_state.set(state);
        }
        StoryEvent::Dwell { running } => {
            story.set_dwell(running);
        }
        StoryEvent::AudioUnlocked(source) => {
            info!(target: LOG_TARGET, "Audio unlocked by {}", source.as_str());
            story.unlocked.set(true);
        }
        StoryEvent::MuteChanged(muted) => {
            story.muted.set(muted);
        }
        StoryEvent::ProposalChanged(view) => {
            story.proposal.set(Some(view));
        }
        StoryEvent::Celebration { confetti_seed } => {
            story.celebration.set(Some(confetti_seed));
        }
    }
}
