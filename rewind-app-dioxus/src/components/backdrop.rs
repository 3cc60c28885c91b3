//! Slide background: the catalog gradient with three slowly drifting color blobs.

use dioxus::prelude::*;

type Palette = [(&'static str, &'static str); 3];

const DEFAULT_PALETTE: Palette = [("#FF6B95", "#C471ED"), ("#00D2FF", "#6C5CE7"), ("#FFD700", "#FF416C")];

/// Blob palettes keyed by colors that appear in the slide gradient; first match wins
const PALETTES: &[(&[&str], Palette)] = &[
    (&["1db954"], [("#1DB954", "#1ed760"), ("#14833c", "#1DB954"), ("#0a5a28", "#14833c")]),
    (&["ff416c", "ffd700"], [("#FF416C", "#FF9A44"), ("#FFD700", "#FF6B6B"), ("#FF416C", "#FFD700")]),
    (&["7f00ff"], [("#7F00FF", "#E100FF"), ("#00D2FF", "#6C5CE7"), ("#A29BFE", "#7F00FF")]),
    (&["e100ff"], [("#7F00FF", "#E100FF"), ("#00D2FF", "#6C5CE7"), ("#A29BFE", "#7F00FF")]),
    (&["ff6b95"], [("#FF6B95", "#C471ED"), ("#FD79A8", "#E84393"), ("#F8A5C2", "#FF6B95")]),
    (&["11998e"], [("#11998E", "#38EF7D"), ("#00CEC9", "#0984E3"), ("#11998E", "#00CEC9")]),
    (&["f7971e"], [("#F7971E", "#FFD200"), ("#FF5858", "#D63031"), ("#F7971E", "#FF5858")]),
    (&["0f0c29"], [("#302B63", "#24243E"), ("#0F0C29", "#302B63"), ("#6C5CE7", "#0F0C29")]),
    (&["200122"], [("#200122", "#6F0000"), ("#FF416C", "#200122"), ("#6F0000", "#FF416C")]),
    (&["ff758c"], [("#FF758C", "#FF7EB3"), ("#FFC3A0", "#FF758C"), ("#FF7EB3", "#FFC3A0")]),
    (&["fff0f5"], [("#FFF0F5", "#FFB6C1"), ("#FFE4EC", "#FFC0CB"), ("#FFB6C1", "#FFE4EC")]),
];

fn palette_for(gradient: &str) -> Palette {
    let gradient = gradient.to_ascii_lowercase();
    PALETTES
        .iter()
        .find(|(needles, _)| needles.iter().all(|n| gradient.contains(n)))
        .map_or(DEFAULT_PALETTE, |(_, palette)| *palette)
}

/// Blob placement for a slide, stable across visits (Park-Miller generator)
fn blob_geometry(slide_index: usize) -> [(u32, i32, i32, u32); 3] {
    let mut state = (slide_index as u64 * 137 + 42) % 2_147_483_647;
    let mut next = move || {
        state = state * 16_807 % 2_147_483_647;
        state
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let mut blob = || {
        let size = 60 + (next() % 41) as u32;
        let left = (next() % 81) as i32 - 40;
        let top = (next() % 81) as i32 - 40;
        let duration = 12 + (next() % 7) as u32;
        (size, left, top, duration)
    };
    [blob(), blob(), blob()]
}

#[component]
pub fn Backdrop(slide_index: usize, gradient: String) -> Element {
    let palette = palette_for(&gradient);
    let geometry = blob_geometry(slide_index);

    rsx! {
        div {
            class: "backdrop",
            style: "background: {gradient};",
            for (i, ((from, to), (size, left, top, duration))) in palette.iter().zip(geometry).enumerate() {
                div {
                    key: "{i}",
                    class: "blob",
                    style: "width: {size}%; height: {size}%; left: calc(50% + {left}% - {size}% / 2); top: calc(50% + {top}% - {size}% / 2); background: radial-gradient(circle, {from} 0%, {to} 45%, transparent 70%); animation-duration: {duration}s;",
                }
            }
        }
    }
}
