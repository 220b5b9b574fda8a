#![forbid(unsafe_code)]

//! Keyboard focus cycling across the card set.
//!
//! Tab/arrow navigation moves focus through cards in registration order.
//! Each move reports the card that lost focus and the card that gained it,
//! in that order, matching how the environment delivers blur before focus.

use vitrine_core::card::CardId;

/// The result of a focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusMove {
    /// Card that lost focus, if any.
    pub blurred: Option<CardId>,
    /// Card that gained focus, if any.
    pub focused: Option<CardId>,
}

/// Cycles keyboard focus through an ordered card list.
#[derive(Debug, Clone, Default)]
pub struct FocusRing {
    order: Vec<CardId>,
    current: Option<usize>,
}

impl FocusRing {
    /// Create a ring over cards in the given order. Focus starts nowhere.
    #[must_use]
    pub fn new(order: Vec<CardId>) -> Self {
        Self {
            order,
            current: None,
        }
    }

    /// The currently focused card, if any.
    #[must_use]
    pub fn current(&self) -> Option<CardId> {
        self.current.map(|i| self.order[i])
    }

    /// Move focus to the next card, wrapping. The first move focuses the
    /// first card.
    pub fn next(&mut self) -> FocusMove {
        if self.order.is_empty() {
            return FocusMove::default();
        }
        let blurred = self.current();
        let next = match self.current {
            Some(i) => (i + 1) % self.order.len(),
            None => 0,
        };
        self.current = Some(next);
        FocusMove {
            blurred,
            focused: self.current(),
        }
    }

    /// Move focus to the previous card, wrapping. The first move focuses
    /// the last card.
    pub fn prev(&mut self) -> FocusMove {
        if self.order.is_empty() {
            return FocusMove::default();
        }
        let blurred = self.current();
        let prev = match self.current {
            Some(0) | None => self.order.len() - 1,
            Some(i) => i - 1,
        };
        self.current = Some(prev);
        FocusMove {
            blurred,
            focused: self.current(),
        }
    }

    /// Drop focus entirely, reporting the blurred card.
    pub fn clear(&mut self) -> Option<CardId> {
        let blurred = self.current();
        self.current = None;
        blurred
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::card::{CardDef, CardRegistry};

    fn ring(n: usize) -> (FocusRing, Vec<CardId>) {
        let mut reg = CardRegistry::new();
        let ids: Vec<CardId> = (0..n).map(|_| reg.register(CardDef::new())).collect();
        (FocusRing::new(ids.clone()), ids)
    }

    #[test]
    fn first_move_focuses_first_card() {
        let (mut ring, ids) = ring(3);
        let mv = ring.next();
        assert_eq!(mv.blurred, None);
        assert_eq!(mv.focused, Some(ids[0]));
    }

    #[test]
    fn next_wraps_and_reports_blur() {
        let (mut ring, ids) = ring(2);
        ring.next();
        let mv = ring.next();
        assert_eq!(mv.blurred, Some(ids[0]));
        assert_eq!(mv.focused, Some(ids[1]));
        let mv = ring.next();
        assert_eq!(mv.blurred, Some(ids[1]));
        assert_eq!(mv.focused, Some(ids[0]));
    }

    #[test]
    fn prev_from_nowhere_focuses_last() {
        let (mut ring, ids) = ring(3);
        let mv = ring.prev();
        assert_eq!(mv.focused, Some(ids[2]));
    }

    #[test]
    fn clear_reports_blurred() {
        let (mut ring, ids) = ring(2);
        ring.next();
        assert_eq!(ring.clear(), Some(ids[0]));
        assert_eq!(ring.current(), None);
        assert_eq!(ring.clear(), None);
    }

    #[test]
    fn empty_ring_is_inert() {
        let (mut ring, _) = ring(0);
        assert_eq!(ring.next(), FocusMove::default());
        assert_eq!(ring.prev(), FocusMove::default());
    }
}
