#![forbid(unsafe_code)]

//! Raw-input routing.
//!
//! Translates terminal-level pointer motion and presses into the resolved
//! [`CardEvent`]s the arbitrator consumes. Motion is turned into
//! leave/enter pairs in environment order (leave of the old card strictly
//! before enter of the new one); presses are classified against the panel
//! zones first, then the card tiles, and fall through to outside-click.

use vitrine_core::arbitrator::CardEvent;
use vitrine_core::card::CardId;
use vitrine_widgets::panel::PanelZones;

/// Tracks which card the pointer is over and synthesizes enter/leave
/// events from motion.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    hovered: Option<CardId>,
}

impl PointerTracker {
    /// Create a tracker with the pointer over nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The card currently under the pointer, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<CardId> {
        self.hovered
    }

    /// Process a pointer position resolved to a card hit.
    ///
    /// Returns the synthesized events in delivery order: a leave for the
    /// previous card always precedes the enter for the new one.
    pub fn on_move(&mut self, hit: Option<CardId>) -> Vec<CardEvent> {
        match (self.hovered, hit) {
            (prev, next) if prev == next => Vec::new(),
            (Some(prev), Some(next)) => {
                self.hovered = Some(next);
                vec![CardEvent::PointerLeave(prev), CardEvent::PointerEnter(next)]
            }
            (Some(prev), None) => {
                self.hovered = None;
                vec![CardEvent::PointerLeave(prev)]
            }
            (None, Some(next)) => {
                self.hovered = Some(next);
                vec![CardEvent::PointerEnter(next)]
            }
            (None, None) => Vec::new(),
        }
    }

    /// The terminal lost focus: the pointer is effectively gone.
    pub fn on_terminal_focus_lost(&mut self) -> Vec<CardEvent> {
        self.on_move(None)
    }
}

/// What a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    /// A card tile.
    Card(CardId),
    /// The panel's order control.
    PanelOrder,
    /// The panel's close affordance.
    PanelClose,
    /// The panel body (neither control).
    PanelBody,
    /// Neither a card nor the panel.
    Outside,
}

/// Classify a press at `(x, y)`.
///
/// The open panel overlays the gallery, so its zones win; within the panel
/// the controls win over the body.
pub fn classify_press(
    x: u16,
    y: u16,
    card_at: impl Fn(u16, u16) -> Option<CardId>,
    panel: &PanelZones,
) -> PressTarget {
    if panel.close.is_some_and(|z| z.contains(x, y)) {
        return PressTarget::PanelClose;
    }
    if panel.order.is_some_and(|z| z.contains(x, y)) {
        return PressTarget::PanelOrder;
    }
    if panel.body.is_some_and(|z| z.contains(x, y)) {
        return PressTarget::PanelBody;
    }
    match card_at(x, y) {
        Some(id) => PressTarget::Card(id),
        None => PressTarget::Outside,
    }
}
