#![forbid(unsafe_code)]

//! Card registry: the fixed set of interactive cards and their marks.
//!
//! Cards are registered once at startup from static definitions and are
//! immutable afterwards; only their membership marks (active, hovered,
//! focused, revealed, clicked) change at runtime. At most one card is active
//! at a time, and activation touches exactly the previous and the new active
//! card.

use bitflags::bitflags;
use std::fmt;

// ---------------------------------------------------------------------------
// Metadata defaults
// ---------------------------------------------------------------------------

/// Title used when a card definition carries none.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Destination used when a card definition carries no target link.
pub const FALLBACK_LINK: &str = "order.html";

// ---------------------------------------------------------------------------
// Identity and metadata
// ---------------------------------------------------------------------------

/// Stable handle for a registered card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(u32);

impl CardId {
    /// Raw index value, usable as an element id elsewhere.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card#{}", self.0)
    }
}

/// Immutable card metadata, resolved from a [`CardDef`] at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMeta {
    /// Display title.
    pub title: String,
    /// Short description shown in the detail panel.
    pub description: String,
    /// Destination the commit control navigates to.
    pub target_link: String,
}

/// A card definition as read from static content. All attributes optional;
/// missing ones resolve to documented defaults at registration.
#[derive(Debug, Clone, Default)]
pub struct CardDef {
    title: Option<String>,
    description: Option<String>,
    target_link: Option<String>,
}

impl CardDef {
    /// Create an empty definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the target link.
    #[must_use]
    pub fn target_link(mut self, target_link: impl Into<String>) -> Self {
        self.target_link = Some(target_link.into());
        self
    }

    fn resolve(self) -> CardMeta {
        CardMeta {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: self.description.unwrap_or_default(),
            target_link: self
                .target_link
                .unwrap_or_else(|| FALLBACK_LINK.to_string()),
        }
    }
}

bitflags! {
    /// Membership marks for a card.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CardFlags: u8 {
        /// The card currently owns the detail panel.
        const ACTIVE   = 0b0000_0001;
        /// The pointer is over the card.
        const HOVERED  = 0b0000_0010;
        /// The card holds keyboard focus.
        const FOCUSED  = 0b0000_0100;
        /// The card has entered the viewport at least once. Monotonic.
        const REVEALED = 0b0000_1000;
        /// Transient click feedback mark.
        const CLICKED  = 0b0001_0000;
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The result of an activation change: the cards whose visual marking must
/// be repainted. At most two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveChange {
    /// Card that lost the active mark, if any.
    pub cleared: Option<CardId>,
    /// Card that gained the active mark, if any.
    pub marked: Option<CardId>,
}

impl ActiveChange {
    /// Whether the call changed nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.cleared.is_none() && self.marked.is_none()
    }
}

#[derive(Debug, Clone)]
struct Slot {
    meta: CardMeta,
    flags: CardFlags,
}

/// Registry of all interactive cards.
///
/// Hands out fresh [`CardId`]s at registration, so no id is ever registered
/// twice. [`set_active`](CardRegistry::set_active) is idempotent for the
/// already-active card.
#[derive(Debug, Clone, Default)]
pub struct CardRegistry {
    slots: Vec<Slot>,
    active: Option<CardId>,
}

impl CardRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition, resolving metadata defaults.
    pub fn register(&mut self, def: CardDef) -> CardId {
        let id = CardId(self.slots.len() as u32);
        self.slots.push(Slot {
            meta: def.resolve(),
            flags: CardFlags::empty(),
        });
        id
    }

    /// Number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no cards are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether `id` belongs to this registry.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        (id.0 as usize) < self.slots.len()
    }

    /// All card ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        (0..self.slots.len() as u32).map(CardId)
    }

    /// Metadata of a registered card.
    #[must_use]
    pub fn metadata(&self, id: CardId) -> Option<&CardMeta> {
        self.slots.get(id.0 as usize).map(|s| &s.meta)
    }

    /// Current marks of a card. Empty for unregistered ids.
    #[must_use]
    pub fn flags(&self, id: CardId) -> CardFlags {
        self.slots
            .get(id.0 as usize)
            .map(|s| s.flags)
            .unwrap_or_default()
    }

    /// The currently active card, if any.
    #[must_use]
    pub fn active(&self) -> Option<CardId> {
        self.active
    }

    /// Move the active mark.
    ///
    /// Idempotent for the already-active card. An unregistered id is a
    /// no-op. Touches at most the previously and the newly active card.
    pub fn set_active(&mut self, id: Option<CardId>) -> ActiveChange {
        if let Some(target) = id
            && !self.contains(target)
        {
            crate::warn!(card = %target, "set_active on unregistered card");
            return ActiveChange::default();
        }
        if self.active == id {
            return ActiveChange::default();
        }

        let mut change = ActiveChange::default();
        if let Some(prev) = self.active.take() {
            self.slots[prev.0 as usize].flags.remove(CardFlags::ACTIVE);
            change.cleared = Some(prev);
        }
        if let Some(next) = id {
            self.slots[next.0 as usize].flags.insert(CardFlags::ACTIVE);
            change.marked = Some(next);
        }
        self.active = id;
        change
    }

    /// Set or clear the hovered mark.
    pub fn set_hovered(&mut self, id: CardId, hovered: bool) {
        if let Some(slot) = self.slots.get_mut(id.0 as usize) {
            slot.flags.set(CardFlags::HOVERED, hovered);
        }
    }

    /// Set or clear the focused mark.
    pub fn set_focused(&mut self, id: CardId, focused: bool) {
        if let Some(slot) = self.slots.get_mut(id.0 as usize) {
            slot.flags.set(CardFlags::FOCUSED, focused);
        }
    }

    /// Mark a card revealed. Monotonic; there is no way to clear it.
    pub fn mark_revealed(&mut self, id: CardId) {
        if let Some(slot) = self.slots.get_mut(id.0 as usize) {
            slot.flags.insert(CardFlags::REVEALED);
        }
    }

    /// Set the transient click-feedback mark.
    pub fn set_clicked(&mut self, id: CardId, clicked: bool) {
        if let Some(slot) = self.slots.get_mut(id.0 as usize) {
            slot.flags.set(CardFlags::CLICKED, clicked);
        }
    }
}
