#![forbid(unsafe_code)]

//! The shared detail panel.
//!
//! A single surface showing the active card's metadata with an explicit
//! open/closed state, a primary "order" control carrying the card's target
//! link, and a close affordance. The panel exposes an assistive-technology
//! flag mirroring open/closed so state changes are detectable without
//! looking at pixels, and tracks whether it currently holds input focus
//! (consulted when a debounced close expires).
//!
//! # Invariants
//!
//! 1. `close()` is idempotent: closing a closed panel changes nothing
//! 2. The assistive flag equals the open state at all times
//! 3. Focus can only rest inside an open panel
//!
//! Rendering is a function of [`PanelState`]; the state is mutated only by
//! the runtime interpreting arbitrator effects.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, StatefulWidget, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use vitrine_core::card::CardMeta;
use vitrine_core::geometry::Rect as HitRect;

use crate::{core_rect, ellipsize};

// ---------------------------------------------------------------------------
// Content and state
// ---------------------------------------------------------------------------

/// Metadata snapshot displayed by the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelContent {
    /// Card title.
    pub title: String,
    /// Card description.
    pub description: String,
    /// Destination of the order control.
    pub target_link: String,
}

impl From<&CardMeta> for PanelContent {
    fn from(meta: &CardMeta) -> Self {
        Self {
            title: meta.title.clone(),
            description: meta.description.clone(),
            target_link: meta.target_link.clone(),
        }
    }
}

/// The panel controls that can hold input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelControl {
    /// The primary action: navigate to the card's target link.
    Order,
    /// The close affordance.
    Close,
}

/// What activating the focused control means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    /// Commit: navigate to the target link.
    Commit(String),
    /// Dismiss the panel.
    Dismiss,
}

/// Screen-space hit zones recorded at render time.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelZones {
    /// The whole panel surface.
    pub body: Option<HitRect>,
    /// The order control.
    pub order: Option<HitRect>,
    /// The close affordance.
    pub close: Option<HitRect>,
}

/// Mutable panel state.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    open: bool,
    content: Option<PanelContent>,
    focus: Option<PanelControl>,
    zones: PanelZones,
}

impl PanelState {
    /// Create a closed, empty panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the panel showing `content`. Re-opening with new content
    /// retargets in place; focus is left where it was.
    pub fn open(&mut self, content: PanelContent) {
        self.content = Some(content);
        self.open = true;
    }

    /// Close the panel. Idempotent; a closed panel stays closed and loses
    /// nothing else.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.focus = None;
        self.zones = PanelZones::default();
    }

    /// Whether the panel is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Assistive-technology flag: `true` when the panel is hidden.
    #[must_use]
    pub fn aria_hidden(&self) -> bool {
        !self.open
    }

    /// The content currently shown, if any.
    #[must_use]
    pub fn content(&self) -> Option<&PanelContent> {
        self.content.as_ref()
    }

    /// Move input focus onto the primary action control. No-op while closed.
    pub fn focus_primary(&mut self) {
        if self.open {
            self.focus = Some(PanelControl::Order);
        }
    }

    /// Cycle focus between the order and close controls. No-op while closed
    /// or unfocused.
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Some(PanelControl::Order) => Some(PanelControl::Close),
            Some(PanelControl::Close) => Some(PanelControl::Order),
            None => None,
        };
    }

    /// Drop input focus from the panel.
    pub fn blur(&mut self) {
        self.focus = None;
    }

    /// Whether the panel currently holds input focus.
    #[must_use]
    pub fn holds_focus(&self) -> bool {
        self.focus.is_some()
    }

    /// The focused control, if any.
    #[must_use]
    pub fn focused_control(&self) -> Option<PanelControl> {
        self.focus
    }

    /// What activating the focused control would do.
    #[must_use]
    pub fn focused_action(&self) -> Option<PanelAction> {
        match self.focus? {
            PanelControl::Order => {
                let link = self.content.as_ref()?.target_link.clone();
                Some(PanelAction::Commit(link))
            }
            PanelControl::Close => Some(PanelAction::Dismiss),
        }
    }

    /// Hit zones recorded by the last render. Empty while closed.
    #[must_use]
    pub fn zones(&self) -> &PanelZones {
        &self.zones
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// The detail panel view.
#[derive(Debug, Clone)]
pub struct DetailPanel {
    border_style: Style,
    title_style: Style,
    text_style: Style,
    control_style: Style,
    focused_style: Style,
}

impl Default for DetailPanel {
    fn default() -> Self {
        Self {
            border_style: Style::new().fg(Color::Cyan),
            title_style: Style::new().add_modifier(Modifier::BOLD),
            text_style: Style::new(),
            control_style: Style::new().fg(Color::Cyan),
            focused_style: Style::new().add_modifier(Modifier::REVERSED),
        }
    }
}

impl DetailPanel {
    /// Create a panel view with default styling.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the border style.
    #[must_use]
    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    /// Set the title style.
    #[must_use]
    pub fn title_style(mut self, style: Style) -> Self {
        self.title_style = style;
        self
    }

    /// Set the description text style.
    #[must_use]
    pub fn text_style(mut self, style: Style) -> Self {
        self.text_style = style;
        self
    }

    /// Set the control label style.
    #[must_use]
    pub fn control_style(mut self, style: Style) -> Self {
        self.control_style = style;
        self
    }

    /// Set the style applied to the focused control.
    #[must_use]
    pub fn focused_style(mut self, style: Style) -> Self {
        self.focused_style = style;
        self
    }

    fn control_labels(link: &str) -> (String, String) {
        let order = format!("[ Order → {} ]", ellipsize(link, 24));
        let close = "[ ✕ Close ]".to_string();
        (order, close)
    }
}

impl StatefulWidget for DetailPanel {
    type State = PanelState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.zones = PanelZones::default();
        if !state.open || area.width < 4 || area.height < 4 {
            return;
        }
        let Some(content) = state.content.clone() else {
            return;
        };

        Clear.render(area, buf);
        let title = format!(" {} ", ellipsize(&content.title, area.width.saturating_sub(4) as usize));
        let block = Block::bordered()
            .border_style(self.border_style)
            .title(Span::styled(title, self.title_style));
        let inner = block.inner(area);
        block.render(area, buf);
        state.zones.body = Some(core_rect(area));

        if inner.height == 0 {
            return;
        }

        // Description fills all but the last inner row.
        let desc_area = Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        };
        if desc_area.height > 0 {
            Paragraph::new(content.description.as_str())
                .style(self.text_style)
                .wrap(Wrap { trim: true })
                .render(desc_area, buf);
        }

        // Controls on the last inner row.
        let controls_y = inner.y + inner.height - 1;
        let (order_label, close_label) = Self::control_labels(&content.target_link);
        let order_style = if state.focus == Some(PanelControl::Order) {
            self.focused_style
        } else {
            self.control_style
        };
        let close_style = if state.focus == Some(PanelControl::Close) {
            self.focused_style
        } else {
            self.control_style
        };

        let (order_end, _) = buf.set_stringn(
            inner.x,
            controls_y,
            &order_label,
            inner.width as usize,
            order_style,
        );
        let order_w = order_end.saturating_sub(inner.x);
        state.zones.order = Some(HitRect::new(inner.x, controls_y, order_w, 1));

        let close_w = UnicodeWidthStr::width(close_label.as_str()) as u16;
        if inner.width > order_w + close_w + 2 {
            let close_x = inner.x + inner.width - close_w;
            buf.set_stringn(close_x, controls_y, &close_label, close_w as usize, close_style);
            state.zones.close = Some(HitRect::new(close_x, controls_y, close_w, 1));
        }
    }
}
