//! One-shot gate for the first user gesture that permits audio.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Document-level events that count as an unlock gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnlockSource {
    PointerDown,
    TouchStart,
    Click,
    KeyDown,
}

impl UnlockSource {
    pub const ALL: [Self; 4] = [Self::PointerDown, Self::TouchStart, Self::Click, Self::KeyDown];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::TouchStart => "touchstart",
            Self::Click => "click",
            Self::KeyDown => "keydown",
        }
    }
}

/// All four unlock listeners as a single subscription.
///
/// The first [`fire`](Self::fire) wins and disarms every listener at once; later
/// calls, including ones from the same physical gesture, return `None`.
#[derive(Debug)]
pub struct UnlockGate {
    armed: AtomicBool,
}

impl UnlockGate {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(true),
        }
    }

    /// Whether listeners should still be attached
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Sources that still need a listener; empty once fired
    #[must_use]
    pub fn armed_sources(&self) -> &'static [UnlockSource] {
        if self.is_armed() {
            &UnlockSource::ALL
        } else {
            &[]
        }
    }

    /// Report an event. Returns the source only for the call that performed the unlock.
    pub fn fire(&self, source: UnlockSource) -> Option<UnlockSource> {
        if self
            .armed
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            debug!("Audio unlocked by {}", source.as_str());
            Some(source)
        } else {
            None
        }
    }
}

impl Default for UnlockGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_event_wins() {
        let gate = UnlockGate::new();
        assert!(gate.is_armed());
        assert_eq!(gate.armed_sources().len(), 4);

        assert_eq!(gate.fire(UnlockSource::TouchStart), Some(UnlockSource::TouchStart));
        assert!(!gate.is_armed());
        assert!(gate.armed_sources().is_empty());
    }

    #[test]
    fn test_same_gesture_events_fire_once() {
        let gate = UnlockGate::new();
        let fired: Vec<_> = [
            UnlockSource::PointerDown,
            UnlockSource::TouchStart,
            UnlockSource::Click,
            UnlockSource::KeyDown,
        ]
        .into_iter()
        .filter_map(|s| gate.fire(s))
        .collect();

        assert_eq!(fired, vec![UnlockSource::PointerDown]);
    }

    #[test]
    fn test_concurrent_fire_exactly_once() {
        let gate = Arc::new(UnlockGate::new());
        let handles: Vec<_> = UnlockSource::ALL
            .into_iter()
            .map(|source| {
                let gate = Arc::clone(&gate);
                std::thread::spawn(move || gate.fire(source).is_some())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
    }
}
