//! The closing question, its escalating decline button and the celebration.

use crate::state::StoryState;
use dioxus::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rewind_core::{ConfettiBurst, ConfettiFrame, ProposalMood, ProposalState, StoryIntent};
use std::time::Duration;

/// How long one confetti piece stays on screen
const PARTICLE_LIFETIME: Duration = Duration::from_millis(1000);

const CONFETTI_COLORS: [&str; 6] = ["#26ccff", "#a25afd", "#ff5e7e", "#88ff5a", "#fcff42", "#ffa62d"];

/// One confetti piece: where it starts and where it flies to, in viewport units
#[derive(Debug, Clone, PartialEq)]
struct Particle {
    id: u64,
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
    spin: f32,
    color: &'static str,
}

/// Emit a frame's particle count from each of its origins, flying out in every direction
fn particles_for(frame: &ConfettiFrame, rng: &mut StdRng, next_id: &mut u64) -> Vec<Particle> {
    let per_origin = frame.particle_count;
    frame
        .origins
        .iter()
        .flat_map(|origin| std::iter::repeat_n(*origin, per_origin as usize))
        .map(|origin| {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(10.0..30.0);
            *next_id += 1;
            Particle {
                id: *next_id,
                x: origin.x * 100.0,
                y: origin.y * 100.0,
                dx: angle.cos() * speed,
                // Pieces drift down as they slow
                dy: angle.sin() * speed + 20.0,
                spin: rng.gen_range(-540.0..540.0),
                color: CONFETTI_COLORS[rng.gen_range(0..CONFETTI_COLORS.len())],
            }
        })
        .collect()
}

#[component]
pub fn ProposalSlide(question: String, celebration_title: String, celebration_subtitle: String) -> Element {
    let story = use_context::<StoryState>();

    let Some(view) = story.proposal.read().clone() else {
        return rsx! {};
    };
    let mood_emoji = match view.mood {
        ProposalMood::Pleading => "\u{1f622}",
        ProposalMood::Asking | ProposalMood::Celebrating => "\u{1f97a}",
    };

    rsx! {
        div {
            class: "proposal",
            FloatingHearts {}
            if view.state == ProposalState::Celebrating {
                div {
                    class: "celebration pop-in",
                    div { class: "mood celebrating", "\u{1f970}" }
                    h1 { class: "celebration-title", "{celebration_title}" }
                    p { class: "celebration-subtitle", "{celebration_subtitle}" }
                }
                if let Some(seed) = *story.celebration.read() {
                    Confetti { key: "{seed}", seed }
                }
            } else {
                div {
                    class: "question",
                    div {
                        key: "{view.rejections}",
                        class: "mood pop-in",
                        "{mood_emoji}"
                    }
                    h1 { class: "question-text", "{question}" }
                    div {
                        class: "answers",
                        button {
                            class: "accept",
                            style: "font-size: {view.accept_font_px}px;",
                            onclick: move |_| story.send(StoryIntent::Accept),
                            "YES!"
                        }
                        if let Some(label) = view.decline_label {
                            button {
                                class: "decline",
                                onclick: move |_| story.send(StoryIntent::Decline),
                                "{label}"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn FloatingHearts() -> Element {
    rsx! {
        div {
            class: "floating-hearts",
            for i in 0..6u32 {
                span {
                    key: "{i}",
                    class: "floating-heart",
                    style: format!(
                        "left: {}%; font-size: {}px; animation-duration: {}s; animation-delay: {}s;",
                        8 + i * 16,
                        16 + (i * 7) % 20,
                        10 + (i * 3) % 10,
                        (i * 17) % 10
                    ),
                    "\u{2764}"
                }
            }
        }
    }
}

/// Two-sided confetti burst replayed from its seed
#[component]
fn Confetti(seed: u64) -> Element {
    let mut particles = use_signal(Vec::<(Duration, Particle)>::new);

    use_hook(move || {
        spawn(async move {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut next_id = 0;
            let mut elapsed = Duration::ZERO;
            let burst = ConfettiBurst::new(seed);
            let interval = burst.interval();

            for frame in burst.frames() {
                tokio::time::sleep(frame.at.saturating_sub(elapsed)).await;
                elapsed = frame.at;
                let fresh = particles_for(&frame, &mut rng, &mut next_id);
                let mut live = particles.write();
                live.retain(|(born, _)| elapsed.saturating_sub(*born) < PARTICLE_LIFETIME);
                live.extend(fresh.into_iter().map(|p| (elapsed, p)));
            }

            tokio::time::sleep(PARTICLE_LIFETIME + interval).await;
            particles.write().clear();
        });
    });

    rsx! {
        div {
            class: "confetti",
            for (_, p) in particles.read().iter() {
                span {
                    key: "{p.id}",
                    class: "confetti-piece",
                    style: "left: {p.x}%; top: {p.y}%; background: {p.color}; --dx: {p.dx}vw; --dy: {p.dy}vh; --spin: {p.spin}deg;",
                }
            }
        }
    }
}
