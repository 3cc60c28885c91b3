//! Stacked photo cards that open into a grid and a full-screen viewer.

use crate::media::media_url;
use crate::state::StoryState;
use dioxus::prelude::*;
use rewind_core::collage::CYCLE_INTERVAL;
use rewind_core::{PhotoCollage, PointerInput, StoryIntent};

#[component]
pub fn CollageSlide(photos: Vec<String>, caption: String, subcaption: String) -> Element {
    let story = use_context::<StoryState>();
    // Fresh order on every visit
    let mut collage = use_signal(|| PhotoCollage::new(photos, rand::random()));

    use_future(move || async move {
        let mut ticker = tokio::time::interval(CYCLE_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            collage.write().cycle();
        }
    });

    // Leaving the slide with the grid still open must not leave the story paused
    use_drop(move || {
        if collage.try_peek().is_ok_and(|c| c.is_grid_open()) {
            story.send(StoryIntent::SetOverlay(false));
        }
    });

    let mut open_grid = move || {
        if collage.write().open_grid() {
            story.send(StoryIntent::SetOverlay(true));
            story.send(StoryIntent::Pop);
        }
    };
    let mut close_grid = move || {
        if collage.write().close_grid() {
            story.send(StoryIntent::SetOverlay(false));
        }
    };

    let state = collage.read();
    let cards = state.cards();
    let grid_open = state.is_grid_open();
    let viewing = state.viewing().zip(state.viewing_photo().map(str::to_string));
    let photos = state.photos().to_vec();
    let count = photos.len();
    drop(state);

    rsx! {
        div {
            class: "slide-body",
            div {
                class: "card-stack",
                // A press on the stack opens the grid instead of navigating
                onpointerup: move |evt| {
                    evt.stop_propagation();
                    story.send(StoryIntent::Pointer(PointerInput::Leave));
                },
                onclick: move |evt| {
                    evt.stop_propagation();
                    open_grid();
                },
                for card in cards {
                    {
                        let layout = card.layout;
                        let src = media_url(&photos[card.photo]);
                        rsx! {
                            div {
                                key: "{card.photo}",
                                class: "card",
                                style: "z-index: {card.depth}; transform: translate({layout.x}px, {layout.y}px) rotate({layout.rotate}deg) scale({layout.scale});",
                                img { src, draggable: false }
                            }
                        }
                    }
                }
            }
            h2 { class: "caption rise-in", "{caption}" }
            if !subcaption.is_empty() {
                p { class: "subcaption rise-in late", "{subcaption}" }
            }
        }

        if grid_open {
            div {
                class: "overlay grid-overlay",
                onpointerdown: move |evt| evt.stop_propagation(),
                onpointerup: move |evt| evt.stop_propagation(),
                onpointermove: move |evt| evt.stop_propagation(),
                onclick: move |evt| {
                    evt.stop_propagation();
                    close_grid();
                },
                div {
                    class: "overlay-bar",
                    button {
                        class: "overlay-close",
                        onclick: move |evt| {
                            evt.stop_propagation();
                            close_grid();
                        },
                        "\u{00d7}"
                    }
                }
                div {
                    class: "photo-grid",
                    onclick: move |evt| evt.stop_propagation(),
                    for (i, photo) in photos.iter().enumerate() {
                        div {
                            key: "{i}",
                            class: "grid-cell",
                            style: format!("animation-delay: {}ms;", i * 80),
                            onclick: move |evt| {
                                evt.stop_propagation();
                                collage.write().view(i);
                            },
                            img { src: media_url(photo), draggable: false }
                        }
                    }
                }

                if let Some((index, photo)) = viewing {
                    div {
                        class: "overlay viewer",
                        onclick: move |evt| {
                            evt.stop_propagation();
                            collage.write().close_viewer();
                        },
                        button {
                            class: "viewer-arrow prev",
                            onclick: move |evt| {
                                evt.stop_propagation();
                                collage.write().view_prev();
                            },
                            "\u{2039}"
                        }
                        img {
                            key: "{index}",
                            class: "viewer-photo",
                            src: media_url(&photo),
                            draggable: false,
                            onclick: move |evt| evt.stop_propagation(),
                        }
                        button {
                            class: "viewer-arrow next",
                            onclick: move |evt| {
                                evt.stop_propagation();
                                collage.write().view_next();
                            },
                            "\u{203a}"
                        }
                        button {
                            class: "overlay-close",
                            onclick: move |evt| {
                                evt.stop_propagation();
                                collage.write().close_viewer();
                            },
                            "\u{00d7}"
                        }
                        p { class: "viewer-counter", {format!("{} / {count}", index + 1)} }
                    }
                }
            }
        }
    }
}
