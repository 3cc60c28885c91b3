use crate::state::StoryState;
use dioxus::prelude::*;
use rewind_core::StoryIntent;

/// Speaker toggle, shown once audio has been unlocked
#[component]
pub fn MuteButton() -> Element {
    let story = use_context::<StoryState>();

    if !*story.unlocked.read() {
        return rsx! {};
    }

    let muted = *story.muted.read();
    let (icon, label) = if muted {
        ("\u{1f507}", "Unmute")
    } else {
        ("\u{1f50a}", "Mute")
    };

    rsx! {
        button {
            class: "mute-button",
            title: "{label}",
            onclick: move |_| story.send(StoryIntent::ToggleMute),
            "{icon}"
        }
    }
}
