#![forbid(unsafe_code)]

//! Interaction arbitration for the shared detail panel.
//!
//! Arbitrates pointer, keyboard, and click input across the card set and
//! resolves it into panel open/close/retarget transitions. Leave and blur
//! do not close the panel immediately; they schedule a short debounced
//! pending close that any qualifying re-entry cancels, so the panel never
//! flickers while the pointer or focus travels into it.
//!
//! # States
//!
//! - `Idle`: no active card, panel closed.
//! - `Active(card)`: panel open, showing `card`'s metadata.
//! - `PendingClose(card, deadline)`: transient sub-state layered on
//!   `Active` — the panel is still visually open but a close is scheduled.
//!
//! # Invariants
//!
//! 1. At most one pending close is outstanding at any time
//! 2. A pending close always refers to the currently active card
//! 3. Cancellation is observed by every later deadline check (the deadline
//!    lives in owned state, not in a detached timer)
//! 4. Escape and outside-click resolve within the same event turn; they
//!    never wait on a deadline
//! 5. Rapid successive enters retarget to the most recent card with a
//!    single effect (no intermediate open/close pair)
//!
//! # Failure Modes
//!
//! - Events referencing an unregistered card are contract violations:
//!   logged at warn level and dropped without touching panel state
//! - A leave/blur for a card that is not active is stale input and ignored
//! - If the panel holds input focus when the deadline elapses, the pending
//!   close is consumed without closing (the user travelled into the panel)

use std::time::{Duration, Instant};

use crate::card::{CardId, CardRegistry};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Debounce window between a leave/blur and the panel actually closing.
///
/// Leave events fire before pointer or focus can land inside the panel;
/// closing immediately would make the panel's own controls unreachable.
pub const CLOSE_DELAY_MS: u64 = 120;

/// Configuration for the interaction arbitrator.
#[derive(Debug, Clone)]
pub struct ArbitratorConfig {
    /// Delay between a leave/blur and the scheduled close.
    /// Default: 120ms
    pub close_delay: Duration,
}

impl Default for ArbitratorConfig {
    fn default() -> Self {
        Self {
            close_delay: Duration::from_millis(CLOSE_DELAY_MS),
        }
    }
}

// ---------------------------------------------------------------------------
// Events and effects
// ---------------------------------------------------------------------------

/// A resolved input event concerning the card set or the page at large.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEvent {
    /// Pointer moved onto a card.
    PointerEnter(CardId),
    /// Pointer moved off a card.
    PointerLeave(CardId),
    /// A card gained keyboard focus.
    Focus(CardId),
    /// A card lost keyboard focus.
    Blur(CardId),
    /// A card was clicked, or Enter was pressed while it held focus.
    Click(CardId),
    /// The panel's own close affordance was activated.
    PanelClose,
    /// A click that hit neither a card nor the panel.
    OutsideClick,
    /// Escape key.
    Escape,
}

/// A side effect the runtime must apply. The arbitrator never mutates the
/// registry or the panel itself; it only decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Open the panel showing `card`'s metadata. `focus_panel` is set for
    /// keyboard-originated transitions: input focus must move into the
    /// panel's primary action control.
    Open { card: CardId, focus_panel: bool },
    /// The panel is already open; re-render it for `card` in place.
    Retarget { card: CardId, focus_panel: bool },
    /// Move input focus into the panel's primary action control.
    FocusPanel,
    /// Close the panel and clear the active mark.
    Close,
    /// Apply the transient click-feedback mark to `card`.
    MarkClicked(CardId),
    /// Arm the deferred navigation toward `card`'s target link.
    ArmCommit(CardId),
}

/// A scheduled, cancellable close: "close the panel unless qualifying input
/// arrives before `deadline`."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingClose {
    /// The card that was active when the close was scheduled.
    pub card: CardId,
    /// When the close fires if not cancelled.
    pub deadline: Instant,
}

// ---------------------------------------------------------------------------
// Arbitrator
// ---------------------------------------------------------------------------

/// The interaction state machine.
///
/// Feed resolved [`CardEvent`]s via [`handle`](Arbitrator::handle) and poll
/// elapsed deadlines via [`poll`](Arbitrator::poll). Both are pure functions
/// of (state, input, now); all waiting is expressed through
/// [`next_deadline`](Arbitrator::next_deadline).
#[derive(Debug)]
pub struct Arbitrator {
    config: ArbitratorConfig,

    /// Currently active card (None = panel closed).
    active: Option<CardId>,

    /// Outstanding debounced close, if any.
    pending_close: Option<PendingClose>,

    /// Diagnostic: total panel opens.
    opens: u64,
    /// Diagnostic: total in-place retargets.
    retargets: u64,
    /// Diagnostic: total closes (debounced and immediate).
    closes: u64,
}

impl Arbitrator {
    /// Create a new arbitrator with the given configuration.
    #[must_use]
    pub fn new(config: ArbitratorConfig) -> Self {
        Self {
            config,
            active: None,
            pending_close: None,
            opens: 0,
            retargets: 0,
            closes: 0,
        }
    }

    /// The currently active card, if any.
    #[inline]
    #[must_use]
    pub fn active(&self) -> Option<CardId> {
        self.active
    }

    /// Whether the arbitrator is idle (panel closed).
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// The outstanding pending close, if any.
    #[inline]
    #[must_use]
    pub fn pending_close(&self) -> Option<PendingClose> {
        self.pending_close
    }

    /// The next instant at which [`poll`](Arbitrator::poll) can have work.
    #[inline]
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_close.map(|p| p.deadline)
    }

    /// Total panel opens (diagnostic).
    #[inline]
    #[must_use]
    pub fn open_count(&self) -> u64 {
        self.opens
    }

    /// Total in-place retargets (diagnostic).
    #[inline]
    #[must_use]
    pub fn retarget_count(&self) -> u64 {
        self.retargets
    }

    /// Total closes (diagnostic).
    #[inline]
    #[must_use]
    pub fn close_count(&self) -> u64 {
        self.closes
    }

    /// Cancel any outstanding pending close. Used at teardown so a disposed
    /// surface is never mutated by a stale deadline.
    pub fn cancel_pending_close(&mut self) {
        self.pending_close = None;
    }

    /// Process one resolved input event at time `now`.
    ///
    /// Returns the effects the runtime must apply, in order. Events are
    /// expected in environment delivery order; the arbitrator never reorders
    /// or batches them.
    pub fn handle(
        &mut self,
        registry: &CardRegistry,
        event: CardEvent,
        now: Instant,
    ) -> Vec<Effect> {
        match event {
            CardEvent::PointerEnter(card) => self.engage(registry, card, false),
            CardEvent::Focus(card) => self.engage(registry, card, true),
            CardEvent::PointerLeave(card) | CardEvent::Blur(card) => {
                self.disengage(card, now);
                Vec::new()
            }
            CardEvent::Click(card) => {
                if !registry.contains(card) {
                    crate::warn!(card = %card, "click on unregistered card ignored");
                    return Vec::new();
                }
                vec![Effect::MarkClicked(card), Effect::ArmCommit(card)]
            }
            CardEvent::Escape | CardEvent::OutsideClick => {
                self.pending_close = None;
                self.close_now()
            }
            CardEvent::PanelClose => {
                if self.active.is_none() {
                    return Vec::new();
                }
                self.pending_close = None;
                self.close_now()
            }
        }
    }

    /// Fire an elapsed pending close.
    ///
    /// `panel_holds_focus` is sampled at expiry, not at scheduling: if input
    /// focus travelled into the panel in the meantime the close is consumed
    /// without effect. Returns `Some(Effect::Close)` when the panel must
    /// close now.
    pub fn poll(&mut self, panel_holds_focus: bool, now: Instant) -> Option<Effect> {
        match self.pending_close {
            Some(pending) if now >= pending.deadline => {}
            _ => return None,
        }
        self.pending_close = None;
        if panel_holds_focus {
            crate::trace!("pending close consumed: panel holds focus");
            return None;
        }
        self.active.take().map(|_| {
            self.closes += 1;
            Effect::Close
        })
    }

    // -----------------------------------------------------------------------
    // Internal transitions
    // -----------------------------------------------------------------------

    /// Enter/focus: cancel any pending close, open or retarget.
    fn engage(&mut self, registry: &CardRegistry, card: CardId, keyboard: bool) -> Vec<Effect> {
        if !registry.contains(card) {
            crate::warn!(card = %card, "engage on unregistered card ignored");
            return Vec::new();
        }
        self.pending_close = None;
        match self.active {
            None => {
                self.active = Some(card);
                self.opens += 1;
                vec![Effect::Open {
                    card,
                    focus_panel: keyboard,
                }]
            }
            Some(current) if current == card => {
                // Already showing this card; a keyboard re-entry still moves
                // focus into the panel for parity with the first open.
                if keyboard {
                    vec![Effect::FocusPanel]
                } else {
                    Vec::new()
                }
            }
            Some(_) => {
                self.active = Some(card);
                self.retargets += 1;
                vec![Effect::Retarget {
                    card,
                    focus_panel: keyboard,
                }]
            }
        }
    }

    /// Leave/blur: schedule the debounced close for the active card only.
    fn disengage(&mut self, card: CardId, now: Instant) {
        if self.active != Some(card) {
            return;
        }
        self.pending_close = Some(PendingClose {
            card,
            deadline: now + self.config.close_delay,
        });
    }

    fn close_now(&mut self) -> Vec<Effect> {
        match self.active.take() {
            Some(_) => {
                self.closes += 1;
                vec![Effect::Close]
            }
            None => Vec::new(),
        }
    }
}

impl Default for Arbitrator {
    fn default() -> Self {
        Self::new(ArbitratorConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
