#![forbid(unsafe_code)]

//! One-shot visibility reveal tracking.
//!
//! Elements are observed with their content-space bounds; feeding the
//! current viewport transitions each observed element `revealed: false →
//! true` exactly once, the first time enough of its area is inside the
//! viewport. A revealed element is unobserved immediately: no further work
//! is done for it and the watch list only shrinks.
//!
//! Reveal state is independent of panel state by construction — the tracker
//! knows nothing about cards beyond an opaque element id.
//!
//! # Invariants
//!
//! 1. `revealed` is monotonic: once reported, an element is never reported
//!    again, and re-observing it is a no-op
//! 2. An element is reported the first update in which at least
//!    [`REVEAL_THRESHOLD`] of its area intersects the viewport
//! 3. The watch list never grows except through `observe`

use std::collections::HashSet;

use crate::geometry::Rect;

/// Fraction of an element's area that must be inside the viewport before it
/// is revealed.
pub const REVEAL_THRESHOLD: f32 = 0.14;

/// Configuration for reveal tracking.
#[derive(Debug, Clone)]
pub struct RevealConfig {
    /// Visible-area fraction that triggers the reveal.
    /// Default: 0.14
    pub threshold: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: REVEAL_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Watched {
    id: u64,
    bounds: Rect,
}

/// Tracks which observed elements have entered the viewport.
#[derive(Debug, Default)]
pub struct RevealTracker {
    config: RevealConfig,
    watched: Vec<Watched>,
    revealed: HashSet<u64>,
}

impl RevealTracker {
    /// Create a tracker with the given configuration.
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            watched: Vec::new(),
            revealed: HashSet::new(),
        }
    }

    /// Observe an element at its content-space bounds.
    ///
    /// Re-observing a watched element updates its bounds (layout changed).
    /// Observing an already-revealed element is a no-op.
    pub fn observe(&mut self, id: u64, bounds: Rect) {
        if self.revealed.contains(&id) {
            return;
        }
        if let Some(w) = self.watched.iter_mut().find(|w| w.id == id) {
            w.bounds = bounds;
            return;
        }
        self.watched.push(Watched { id, bounds });
    }

    /// Feed the current viewport (in the same content space as the observed
    /// bounds). Returns the ids newly revealed by this update, which are
    /// unobserved as they fire.
    pub fn update(&mut self, viewport: Rect) -> Vec<u64> {
        let threshold = self.config.threshold;
        let revealed = &mut self.revealed;
        let mut fired = Vec::new();
        self.watched.retain(|w| {
            if w.bounds.visible_fraction(&viewport) >= threshold {
                revealed.insert(w.id);
                fired.push(w.id);
                false
            } else {
                true
            }
        });
        fired
    }

    /// Whether an element has been revealed.
    #[must_use]
    pub fn is_revealed(&self, id: u64) -> bool {
        self.revealed.contains(&id)
    }

    /// Number of elements still being watched.
    #[must_use]
    pub fn watched_len(&self) -> usize {
        self.watched.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> RevealTracker {
        RevealTracker::new(RevealConfig::default())
    }

    #[test]
    fn reveals_when_inside_viewport() {
        let mut t = tracker();
        t.observe(1, Rect::new(0, 5, 10, 4));
        let fired = t.update(Rect::new(0, 0, 80, 24));
        assert_eq!(fired, vec![1]);
        assert!(t.is_revealed(1));
        assert_eq!(t.watched_len(), 0);
    }

    #[test]
    fn does_not_reveal_below_threshold() {
        let mut t = tracker();
        // 10x10 element, 1 row (10%) inside the viewport.
        t.observe(1, Rect::new(0, 23, 10, 10));
        let fired = t.update(Rect::new(0, 0, 80, 24));
        assert!(fired.is_empty());
        assert!(!t.is_revealed(1));
        assert_eq!(t.watched_len(), 1);
    }

    #[test]
    fn reveals_at_exact_threshold() {
        let mut t = tracker();
        // 10x10 element with 14 of 100 cells visible: exactly 14%.
        t.observe(1, Rect::new(0, 0, 10, 10));
        let viewport = Rect::new(0, 0, 10, 2); // 20 cells visible: 20%
        assert_eq!(t.update(viewport), vec![1]);

        t.observe(2, Rect::new(0, 0, 50, 2)); // 100 cells
        let viewport = Rect::new(0, 0, 7, 2); // 14 cells visible: 14%
        assert_eq!(t.update(viewport), vec![2]);
    }

    #[test]
    fn fires_exactly_once() {
        let mut t = tracker();
        t.observe(1, Rect::new(0, 0, 4, 4));
        assert_eq!(t.update(Rect::new(0, 0, 10, 10)), vec![1]);
        assert!(t.update(Rect::new(0, 0, 10, 10)).is_empty());
    }

    #[test]
    fn reobserving_revealed_element_is_a_noop() {
        let mut t = tracker();
        t.observe(1, Rect::new(0, 0, 4, 4));
        t.update(Rect::new(0, 0, 10, 10));
        t.observe(1, Rect::new(0, 0, 4, 4));
        assert_eq!(t.watched_len(), 0);
        assert!(t.update(Rect::new(0, 0, 10, 10)).is_empty());
    }

    #[test]
    fn reobserving_watched_element_updates_bounds() {
        let mut t = tracker();
        t.observe(1, Rect::new(0, 100, 4, 4));
        assert!(t.update(Rect::new(0, 0, 10, 10)).is_empty());
        // Layout moved the element into view.
        t.observe(1, Rect::new(0, 2, 4, 4));
        assert_eq!(t.watched_len(), 1);
        assert_eq!(t.update(Rect::new(0, 0, 10, 10)), vec![1]);
    }

    #[test]
    fn scrolling_viewport_reveals_progressively() {
        let mut t = tracker();
        t.observe(1, Rect::new(0, 0, 10, 4));
        t.observe(2, Rect::new(0, 30, 10, 4));

        assert_eq!(t.update(Rect::new(0, 0, 80, 24)), vec![1]);
        // Scroll down far enough for the second element.
        assert_eq!(t.update(Rect::new(0, 20, 80, 24)), vec![2]);
        assert_eq!(t.watched_len(), 0);
    }

    #[test]
    fn reveal_state_survives_unrelated_updates() {
        let mut t = tracker();
        t.observe(1, Rect::new(0, 0, 4, 4));
        t.update(Rect::new(0, 0, 10, 10));
        // Viewport far away; previously revealed stays revealed.
        t.update(Rect::new(500, 500, 10, 10));
        assert!(t.is_revealed(1));
    }
}
