use crate::state::StoryState;
use dioxus::prelude::*;
use rewind_core::{NavState, RewindConfig, SlideCatalog};
use std::sync::Arc;

/// How a single progress segment is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Empty,
    Full,
    /// Filling over the dwell time; paused while the countdown is stopped
    Filling { running: bool },
}

fn segment_for(i: usize, current: usize, terminal: bool, running: bool) -> Segment {
    if i < current || (i == current && terminal) {
        Segment::Full
    } else if i == current {
        Segment::Filling { running }
    } else {
        Segment::Empty
    }
}

/// One bar per slide across the top of the story
#[component]
pub fn ProgressBars() -> Element {
    let story = use_context::<StoryState>();
    let catalog = use_context::<Arc<SlideCatalog>>();
    let config = use_context::<RewindConfig>();

    let current = *story.index.read();
    let running = *story.dwell_running.read();
    let epoch = *story.dwell_epoch.read();
    let terminal = *story.nav_state.read() == NavState::Terminal;
    let duration_ms = config.presentation.auto_advance_ms;

    rsx! {
        div {
            class: "progress",
            for i in 0..catalog.len() {
                div {
                    key: "{i}",
                    class: "progress-track",
                    {
                        match segment_for(i, current, terminal, running) {
                            Segment::Empty => rsx! {},
                            Segment::Full => rsx! {
                                div { class: "progress-fill full" }
                            },
                            Segment::Filling { running } => {
                                let play_state = if running { "running" } else { "paused" };
                                rsx! {
                                    // Keyed by the countdown epoch so every restart replays the fill
                                    div {
                                        key: "{epoch}",
                                        class: "progress-fill filling",
                                        style: "--duration: {duration_ms}ms; --play-state: {play_state};",
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
