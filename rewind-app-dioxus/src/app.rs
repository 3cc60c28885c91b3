use crate::components::{MuteButton, ProgressBars, SlideView};
use crate::state::StoryState;
use crate::theme_watcher::use_theme_watcher;
use dioxus::desktop::use_window;
use dioxus::prelude::*;
use rewind_core::{
    NavState, PointerInput, SlideCatalog, StoryIntent, UnlockGate, UnlockSource, drag_opacity,
};
use std::rc::Rc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// How far the surface follows the finger, relative to the drag
const DRAG_FOLLOW: f64 = 0.15;

/// Listener for one unlock source; a no-op once any source has fired
fn on_unlock<T: 'static>(
    gate: &Rc<UnlockGate>,
    story: StoryState,
    source: UnlockSource,
) -> impl FnMut(Event<T>) + 'static {
    let gate = Rc::clone(gate);
    move |_| {
        if gate.armed_sources().contains(&source)
            && let Some(source) = gate.fire(source)
        {
            story.send(StoryIntent::Unlock(source));
        }
    }
}

/// Keyboard navigation, ignored on the terminal slide like every other gesture
fn key_intent(key: &Key, nav_state: NavState) -> Option<StoryIntent> {
    if nav_state == NavState::Terminal {
        return None;
    }
    match key {
        Key::ArrowRight => Some(StoryIntent::Next),
        Key::Character(c) if c == " " => Some(StoryIntent::Next),
        Key::ArrowLeft => Some(StoryIntent::Prev),
        _ => None,
    }
}

/// Root application component.
/// Renders the user stylesheet, progress bars, mute toggle and the current slide.
#[component]
pub fn App() -> Element {
    let story = use_context::<StoryState>();
    let catalog = use_context::<Arc<SlideCatalog>>();
    let cancel_token = use_context::<CancellationToken>();
    let css = use_theme_watcher(cancel_token);
    let window = use_window();
    let gate = use_hook(|| Rc::new(UnlockGate::new()));

    // Pointer x comes in CSS pixels, so measure the surface in logical pixels too
    let surface_width = move || {
        let inner = window.window.inner_size();
        f64::from(inner.width) / window.window.scale_factor()
    };

    let index = *story.index.read();
    let offset = *story.drag_offset.read();
    let opacity = drag_opacity(offset);
    let shift = offset * DRAG_FOLLOW;
    let slide = catalog.get(index).cloned();

    let mut on_key_unlock = on_unlock::<KeyboardData>(&gate, story, UnlockSource::KeyDown);

    rsx! {
        style { "{css}" }
        div {
            class: "story",
            tabindex: "0",
            onmounted: move |evt: MountedEvent| async move {
                let _ = evt.set_focus(true).await;
            },
            onpointerdown: on_unlock::<PointerData>(&gate, story, UnlockSource::PointerDown),
            ontouchstart: on_unlock::<TouchData>(&gate, story, UnlockSource::TouchStart),
            onclick: on_unlock::<MouseData>(&gate, story, UnlockSource::Click),
            onkeydown: move |evt: KeyboardEvent| {
                on_key_unlock(evt.clone());
                if let Some(intent) = key_intent(&evt.key(), *story.nav_state.peek()) {
                    story.send(intent);
                }
            },

            ProgressBars {}
            MuteButton {}

            div {
                class: "surface",
                style: "opacity: {opacity}; transform: translateX({shift}px);",
                onpointerdown: move |evt: PointerEvent| {
                    let x = evt.client_coordinates().x;
                    story.send(StoryIntent::Pointer(PointerInput::Down { x, width: surface_width() }));
                },
                onpointermove: move |evt: PointerEvent| {
                    let x = evt.client_coordinates().x;
                    story.send(StoryIntent::Pointer(PointerInput::Move { x }));
                },
                onpointerup: move |evt: PointerEvent| {
                    let x = evt.client_coordinates().x;
                    story.send(StoryIntent::Pointer(PointerInput::Up { x }));
                },
                onpointerleave: move |_| {
                    story.send(StoryIntent::Pointer(PointerInput::Leave));
                },

                if let Some(slide) = slide {
                    SlideView { key: "{index}", slide }
                }
            }
        }
    }
}
