//! Pointer input to navigation intents.
//!
//! The surface reports a single pointer stream. A press pauses, a release resumes,
//! and the release itself is classified: barely moved means tap (zone decides the
//! direction), moved further means drag (threshold decides). One release never
//! produces both a tap and a swipe.

use crate::config::GestureConfig;
use tokio::sync::watch;
use tracing::trace;

/// What the interpreter asks the navigation controller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    Next,
    Prev,
    HoldStart,
    HoldEnd,
}

/// Raw pointer events from the slide surface, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { x: f64, width: f64 },
    Move { x: f64 },
    Up { x: f64 },
    Leave,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start_x: f64,
    width: f64,
}

#[derive(Debug)]
pub struct GestureInterpreter {
    config: GestureConfig,
    press: Option<Press>,
    drag_offset: watch::Sender<f64>,
}

impl GestureInterpreter {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        let (drag_offset, _) = watch::channel(0.0);
        Self {
            config,
            press: None,
            drag_offset,
        }
    }

    /// Live horizontal drag offset for renderer feedback
    #[must_use]
    pub fn subscribe_drag_offset(&self) -> watch::Receiver<f64> {
        self.drag_offset.subscribe()
    }

    #[must_use]
    pub fn drag_offset(&self) -> f64 {
        *self.drag_offset.borrow()
    }

    /// Tap at `fraction` of the surface width
    #[must_use]
    pub fn tap(&self, fraction: f64) -> NavIntent {
        if fraction < self.config.back_zone {
            NavIntent::Prev
        } else {
            NavIntent::Next
        }
    }

    /// Completed drag with start-to-release displacement `offset`
    #[must_use]
    pub fn drag_released(&self, offset: f64) -> Option<NavIntent> {
        if offset < -self.config.swipe_threshold {
            Some(NavIntent::Next)
        } else if offset > self.config.swipe_threshold {
            Some(NavIntent::Prev)
        } else {
            None
        }
    }

    /// Interpret one pointer event. `suppressed` is true while the proposal slide is
    /// showing; nothing is emitted then and any press in flight is dropped.
    pub fn handle(&mut self, input: PointerInput, suppressed: bool) -> Vec<NavIntent> {
        if suppressed {
            self.press = None;
            self.publish_offset(0.0);
            return Vec::new();
        }

        match input {
            PointerInput::Down { x, width } => {
                self.press = Some(Press { start_x: x, width });
                self.publish_offset(0.0);
                vec![NavIntent::HoldStart]
            }
            PointerInput::Move { x } => {
                if let Some(press) = self.press {
                    self.publish_offset(x - press.start_x);
                }
                Vec::new()
            }
            PointerInput::Up { x } => {
                let Some(press) = self.press.take() else {
                    return vec![NavIntent::HoldEnd];
                };
                self.publish_offset(0.0);

                let offset = x - press.start_x;
                let release = if offset.abs() <= self.config.tap_slop {
                    (press.width > 0.0).then(|| self.tap(x / press.width))
                } else {
                    self.drag_released(offset)
                };
                trace!("Release at offset {offset:.1} -> {release:?}");

                let mut intents = vec![NavIntent::HoldEnd];
                intents.extend(release);
                intents
            }
            PointerInput::Leave => {
                self.press = None;
                self.publish_offset(0.0);
                vec![NavIntent::HoldEnd]
            }
        }
    }

    fn publish_offset(&self, offset: f64) {
        self.drag_offset.send_if_modified(|current| {
            if (*current - offset).abs() > f64::EPSILON {
                *current = offset;
                true
            } else {
                false
            }
        });
    }
}

/// Opacity the surface shows while dragging: 1.0 at rest, 0.5 at +-120 px and beyond
#[must_use]
pub fn drag_opacity(offset: f64) -> f64 {
    const FULL_FADE_AT: f64 = 120.0;
    let t = (offset.abs() / FULL_FADE_AT).min(1.0);
    1.0 - 0.5 * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> GestureInterpreter {
        GestureInterpreter::new(GestureConfig::default())
    }

    fn release(g: &mut GestureInterpreter, start: f64, end: f64) -> Vec<NavIntent> {
        g.handle(PointerInput::Down { x: start, width: 400.0 }, false);
        g.handle(PointerInput::Move { x: end }, false);
        g.handle(PointerInput::Up { x: end }, false)
    }

    #[test]
    fn test_tap_zones() {
        let g = interpreter();
        assert_eq!(g.tap(0.0), NavIntent::Prev);
        assert_eq!(g.tap(0.29), NavIntent::Prev);
        assert_eq!(g.tap(0.3), NavIntent::Next);
        assert_eq!(g.tap(0.95), NavIntent::Next);
    }

    #[test]
    fn test_drag_thresholds() {
        let g = interpreter();
        assert_eq!(g.drag_released(-60.0), Some(NavIntent::Next));
        assert_eq!(g.drag_released(-40.0), None);
        assert_eq!(g.drag_released(-50.0), None);
        assert_eq!(g.drag_released(50.0), None);
        assert_eq!(g.drag_released(75.0), Some(NavIntent::Prev));
    }

    #[test]
    fn test_press_holds_and_release_resumes() {
        let mut g = interpreter();
        assert_eq!(
            g.handle(PointerInput::Down { x: 300.0, width: 400.0 }, false),
            vec![NavIntent::HoldStart]
        );
        assert_eq!(
            g.handle(PointerInput::Up { x: 300.0 }, false),
            vec![NavIntent::HoldEnd, NavIntent::Next]
        );
    }

    #[test]
    fn test_tap_in_back_zone() {
        let mut g = interpreter();
        assert_eq!(release(&mut g, 40.0, 43.0), vec![NavIntent::HoldEnd, NavIntent::Prev]);
    }

    #[test]
    fn test_swipe_left_goes_next_once() {
        let mut g = interpreter();
        let intents = release(&mut g, 300.0, 240.0);
        assert_eq!(intents, vec![NavIntent::HoldEnd, NavIntent::Next]);
    }

    #[test]
    fn test_short_drag_does_nothing() {
        let mut g = interpreter();
        // -40 is past the tap slop but short of a swipe
        assert_eq!(release(&mut g, 300.0, 260.0), vec![NavIntent::HoldEnd]);
    }

    #[test]
    fn test_swipe_right_goes_prev() {
        let mut g = interpreter();
        assert_eq!(release(&mut g, 100.0, 180.0), vec![NavIntent::HoldEnd, NavIntent::Prev]);
    }

    #[test]
    fn test_leave_resumes_without_navigation() {
        let mut g = interpreter();
        g.handle(PointerInput::Down { x: 100.0, width: 400.0 }, false);
        assert_eq!(g.handle(PointerInput::Leave, false), vec![NavIntent::HoldEnd]);
        // The release after leaving is not a tap
        assert_eq!(g.handle(PointerInput::Up { x: 100.0 }, false), vec![NavIntent::HoldEnd]);
    }

    #[test]
    fn test_suppressed_emits_nothing() {
        let mut g = interpreter();
        assert!(g.handle(PointerInput::Down { x: 10.0, width: 400.0 }, true).is_empty());
        assert!(g.handle(PointerInput::Move { x: 200.0 }, true).is_empty());
        assert!(g.handle(PointerInput::Up { x: 200.0 }, true).is_empty());
        assert!(g.handle(PointerInput::Leave, true).is_empty());
        assert!(g.drag_offset().abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_offset_is_observable() {
        let mut g = interpreter();
        let rx = g.subscribe_drag_offset();

        g.handle(PointerInput::Down { x: 200.0, width: 400.0 }, false);
        g.handle(PointerInput::Move { x: 150.0 }, false);
        assert!((*rx.borrow() + 50.0).abs() < f64::EPSILON);

        g.handle(PointerInput::Up { x: 150.0 }, false);
        assert!(rx.borrow().abs() < f64::EPSILON);
    }

    #[test]
    fn test_move_without_press_ignored() {
        let mut g = interpreter();
        g.handle(PointerInput::Move { x: 80.0 }, false);
        assert!(g.drag_offset().abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_opacity_curve() {
        assert!((drag_opacity(0.0) - 1.0).abs() < 1e-9);
        assert!((drag_opacity(60.0) - 0.75).abs() < 1e-9);
        assert!((drag_opacity(-120.0) - 0.5).abs() < 1e-9);
        assert!((drag_opacity(400.0) - 0.5).abs() < 1e-9);
    }
}
