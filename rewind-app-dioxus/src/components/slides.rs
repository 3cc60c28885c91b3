use super::{Backdrop, CollageSlide, ProposalSlide};
use crate::media::media_url;
use dioxus::prelude::*;
use rewind_core::{COUNT_UP_DURATION, DateLine, SlideDescriptor, SlideKind, count_up_value, group_thousands};
use std::time::{Duration, Instant};

/// Repaint interval for the count-up
const COUNT_UP_FRAME: Duration = Duration::from_millis(16);

/// Render one slide. Mounted fresh for every visit so entry animations replay.
#[component]
pub fn SlideView(slide: SlideDescriptor) -> Element {
    let content = match slide.kind.clone() {
        SlideKind::Intro {
            top_label,
            big_text,
            subtitle,
            video,
        } => rsx! {
            IntroSlide { top_label, big_text, subtitle, video }
        },
        SlideKind::Stat {
            top_label,
            number,
            suffix,
            bottom_label,
            bottom_label_append,
            emoji,
        } => rsx! {
            StatSlide { top_label, number, suffix, bottom_label, bottom_label_append, emoji }
        },
        SlideKind::PhotoCollage {
            photos,
            caption,
            subcaption,
        } => rsx! {
            CollageSlide { photos, caption, subcaption }
        },
        SlideKind::Message {
            lines,
            background_photo,
        } => rsx! {
            MessageSlide { lines, background_photo }
        },
        SlideKind::DateReveal { intro, dates } => rsx! {
            DateRevealSlide { intro, dates }
        },
        SlideKind::Transition { lines } => rsx! {
            TransitionSlide { lines }
        },
        SlideKind::Proposal {
            question,
            celebration_title,
            celebration_subtitle,
            ..
        } => rsx! {
            ProposalSlide { question, celebration_title, celebration_subtitle }
        },
    };

    let kind = slide.kind.name();

    rsx! {
        div {
            class: "slide slide-{kind}",
            Backdrop { slide_index: slide.index, gradient: slide.gradient.clone() }
            {content}
        }
    }
}

#[component]
fn IntroSlide(
    top_label: String,
    big_text: String,
    subtitle: String,
    #[props(!optional)] video: Option<String>,
) -> Element {
    rsx! {
        if let Some(path) = video {
            video {
                class: "intro-video",
                src: media_url(&path),
                autoplay: true,
                r#loop: true,
                muted: true,
                playsinline: true,
            }
        }
        div { class: "intro-shade" }
        div {
            class: "slide-body",
            p { class: "label fade-in", "{top_label}" }
            h1 { class: "big-text pop-in", "{big_text}" }
            p { class: "subtitle fade-in late", "{subtitle}" }
            p { class: "hint fade-in later", "Tap to continue \u{2192}" }
        }
    }
}

#[component]
fn StatSlide(
    top_label: String,
    number: u64,
    suffix: String,
    bottom_label: String,
    #[props(!optional)] bottom_label_append: Option<String>,
    emoji: String,
) -> Element {
    let mut shown = use_signal(|| 0u64);

    use_hook(move || {
        spawn(async move {
            let start = Instant::now();
            loop {
                let elapsed = start.elapsed();
                shown.set(count_up_value(number, elapsed, COUNT_UP_DURATION));
                if elapsed >= COUNT_UP_DURATION {
                    break;
                }
                tokio::time::sleep(COUNT_UP_FRAME).await;
            }
        });
    });

    let value = group_thousands(*shown.read());

    rsx! {
        div {
            class: "slide-body",
            p { class: "label fade-in", "{top_label}" }
            div { class: "stat-number pop-in", "{value}{suffix}" }
            p {
                class: "stat-caption rise-in",
                "{bottom_label}"
                if let Some(append) = bottom_label_append {
                    span { class: "stat-append", "{append}" }
                }
            }
            span { class: "stat-emoji bounce-in", "{emoji}" }
        }
    }
}

#[component]
fn MessageSlide(lines: Vec<String>, #[props(!optional)] background_photo: Option<String>) -> Element {
    rsx! {
        if let Some(photo) = background_photo {
            img {
                class: "message-photo",
                src: media_url(&photo),
                draggable: false,
            }
        }
        div {
            class: "slide-body lines",
            for (i, line) in lines.iter().enumerate() {
                p {
                    key: "{i}",
                    class: "line rise-in",
                    style: format!("animation-delay: {}ms;", 300 + i * 500),
                    "{line}"
                }
            }
        }
    }
}

/// Appearance and strike-through times for date lines, in milliseconds
const DATE_APPEAR_MS: [u64; 3] = [1000, 2400, 3800];
const DATE_STRIKE_MS: [u64; 2] = [1700, 3100];

fn date_timing(i: usize) -> (u64, u64) {
    let appear = DATE_APPEAR_MS
        .get(i)
        .copied()
        .unwrap_or_else(|| 1000 + 1400 * i as u64);
    let strike = DATE_STRIKE_MS.get(i).copied().unwrap_or(appear + 700);
    (appear, strike)
}

#[component]
fn DateRevealSlide(intro: String, dates: Vec<DateLine>) -> Element {
    rsx! {
        div {
            class: "slide-body lines",
            p { class: "line rise-in", style: "animation-delay: 300ms;", "{intro}" }
            for (i, date) in dates.iter().enumerate() {
                {
                    let (appear, strike) = date_timing(i);
                    rsx! {
                        div {
                            key: "{i}",
                            class: "date-line rise-in",
                            style: "animation-delay: {appear}ms;",
                            span { class: "line", "{date.text}" }
                            if date.struck {
                                div { class: "strike", style: "animation-delay: {strike}ms;" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TransitionSlide(lines: Vec<String>) -> Element {
    rsx! {
        div {
            class: "slide-body lines wide",
            for (i, line) in lines.iter().enumerate() {
                p {
                    key: "{i}",
                    class: "line big rise-in",
                    style: format!("animation-delay: {}ms;", 400 + i * 700),
                    "{line}"
                }
            }
            span { class: "heartbeat", "\u{1f497}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_timing_follows_reveal_sequence() {
        assert_eq!(date_timing(0), (1000, 1700));
        assert_eq!(date_timing(1), (2400, 3100));
        assert_eq!(date_timing(2).0, 3800);
        assert_eq!(date_timing(3), (5200, 5900));
    }
}
