#![forbid(unsafe_code)]

//! Card gallery: the grid of interactive cards.
//!
//! Renders every registered card as a small bordered tile, flowing
//! left-to-right and wrapping into rows. Visual marks come straight from the
//! registry flags: unrevealed cards draw as empty dim frames, the active
//! card gets the accent border, focused cards a pointer prefix, clicked
//! cards a short reversed flash.
//!
//! The same flow layout is exposed through [`GalleryLayout::slots`] so the
//! reveal tracker can observe card bounds in content space without
//! rendering.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, StatefulWidget, Widget};

use vitrine_core::card::{CardFlags, CardId, CardRegistry};
use vitrine_core::geometry::Rect as HitRect;

use crate::{core_rect, ellipsize};

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Flow layout parameters for card tiles.
#[derive(Debug, Clone)]
pub struct GalleryLayout {
    /// Tile width in cells.
    pub card_width: u16,
    /// Tile height in cells.
    pub card_height: u16,
    /// Horizontal gap between tiles.
    pub gap_x: u16,
    /// Vertical gap between rows.
    pub gap_y: u16,
}

impl Default for GalleryLayout {
    fn default() -> Self {
        Self {
            card_width: 20,
            card_height: 4,
            gap_x: 2,
            gap_y: 1,
        }
    }
}

impl GalleryLayout {
    /// Tile bounds for `count` cards flowing inside `area`, in the same
    /// coordinate space as `area`. Rows may extend below `area`; callers
    /// clip (render) or scroll (reveal observation) as appropriate.
    #[must_use]
    pub fn slots(&self, area: HitRect, count: usize) -> Vec<HitRect> {
        if count == 0 || area.width == 0 {
            return Vec::new();
        }
        let step_x = self.card_width + self.gap_x;
        let step_y = self.card_height + self.gap_y;
        let columns = ((area.width + self.gap_x) / step_x).max(1) as usize;

        (0..count)
            .map(|i| {
                let col = (i % columns) as u16;
                let row = (i / columns) as u16;
                HitRect::new(
                    area.x + col * step_x,
                    area.y + row * step_y,
                    self.card_width,
                    self.card_height,
                )
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// State and widget
// ---------------------------------------------------------------------------

/// Hit zones recorded by the last gallery render.
#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    zones: Vec<(CardId, HitRect)>,
}

impl GalleryState {
    /// Create empty gallery state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The card whose tile contains `(x, y)`, if any.
    #[must_use]
    pub fn card_at(&self, x: u16, y: u16) -> Option<CardId> {
        self.zones
            .iter()
            .find(|(_, zone)| zone.contains(x, y))
            .map(|(id, _)| *id)
    }

    /// All recorded zones in registration order.
    #[must_use]
    pub fn zones(&self) -> &[(CardId, HitRect)] {
        &self.zones
    }
}

/// The gallery view over a card registry.
#[derive(Debug)]
pub struct CardGallery<'a> {
    registry: &'a CardRegistry,
    layout: GalleryLayout,
    border_style: Style,
    active_style: Style,
    hidden_style: Style,
    title_style: Style,
}

impl<'a> CardGallery<'a> {
    /// Create a gallery over `registry` with default styling.
    #[must_use]
    pub fn new(registry: &'a CardRegistry) -> Self {
        Self {
            registry,
            layout: GalleryLayout::default(),
            border_style: Style::new().fg(Color::DarkGray),
            active_style: Style::new().fg(Color::Cyan),
            hidden_style: Style::new().add_modifier(Modifier::DIM),
            title_style: Style::new(),
        }
    }

    /// Override the flow layout.
    #[must_use]
    pub fn layout(mut self, layout: GalleryLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the resting border style.
    #[must_use]
    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    /// Set the active-card border style.
    #[must_use]
    pub fn active_style(mut self, style: Style) -> Self {
        self.active_style = style;
        self
    }

    fn tile_styles(&self, flags: CardFlags) -> (Style, Style) {
        if !flags.contains(CardFlags::REVEALED) {
            return (self.hidden_style, self.hidden_style);
        }
        let border = if flags.contains(CardFlags::ACTIVE) {
            self.active_style
        } else {
            self.border_style
        };
        let mut title = self.title_style;
        if flags.contains(CardFlags::ACTIVE) {
            title = title.add_modifier(Modifier::BOLD);
        }
        if flags.contains(CardFlags::HOVERED) {
            title = title.add_modifier(Modifier::UNDERLINED);
        }
        if flags.contains(CardFlags::CLICKED) {
            title = title.add_modifier(Modifier::REVERSED);
        }
        (border, title)
    }
}

impl StatefulWidget for CardGallery<'_> {
    type State = GalleryState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.zones.clear();
        if area.width == 0 || area.height == 0 {
            return;
        }

        let slots = self.layout.slots(core_rect(area), self.registry.len());
        for (id, slot) in self.registry.ids().zip(slots) {
            // Clip rows that fall below the visible area.
            if slot.bottom() > area.y + area.height || slot.right() > area.x + area.width {
                continue;
            }
            state.zones.push((id, slot));

            let tile = Rect::new(slot.x, slot.y, slot.width, slot.height);
            let flags = self.registry.flags(id);
            let (border_style, title_style) = self.tile_styles(flags);
            let block = Block::bordered().border_style(border_style);
            let inner = block.inner(tile);
            block.render(tile, buf);

            // Unrevealed cards keep their frame but stay blank.
            if !flags.contains(CardFlags::REVEALED) || inner.height == 0 {
                continue;
            }

            let Some(meta) = self.registry.metadata(id) else {
                continue;
            };
            let (prefix, prefix_w) = if flags.contains(CardFlags::FOCUSED) {
                ("▸ ", 2u16)
            } else {
                ("", 0)
            };
            let label = format!(
                "{prefix}{}",
                ellipsize(&meta.title, inner.width.saturating_sub(prefix_w) as usize)
            );
            buf.set_stringn(
                inner.x,
                inner.y,
                &label,
                inner.width as usize,
                title_style,
            );
        }
    }
}
