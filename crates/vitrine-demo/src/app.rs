#![forbid(unsafe_code)]

//! The showcase application: one scrollable page with a hero section, the
//! service card gallery, and the contact form, plus the shared detail
//! panel overlay.
//!
//! The page is rendered into a content-space buffer and blitted through a
//! scrolled viewport, so reveal tracking, pointer hit tests, and layout all
//! share one coordinate space (screen y + scroll = content y).

use std::io::Write;
use std::time::{Duration, Instant};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::StatefulWidget;

use vitrine_core::arbitrator::CardEvent;
use vitrine_core::card::{CardId, CardRegistry};
use vitrine_core::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use vitrine_core::geometry::Rect as ContentRect;
use vitrine_core::reveal::{RevealConfig, RevealTracker};
use vitrine_runtime::controller::InteractionController;
use vitrine_runtime::focus::FocusRing;
use vitrine_runtime::navigator::{
    FeedbackCue, HERO_COMMIT_DELAY_MS, NavigationSurface,
};
use vitrine_runtime::program::{App, Control};
use vitrine_runtime::router::{classify_press, PointerTracker, PressTarget};
use vitrine_widgets::form::{
    ContactForm, ContactFormView, ContactMessage, FormFocus, MessageSink, SubmitOutcome,
};
use vitrine_widgets::gallery::{CardGallery, GalleryLayout, GalleryState};
use vitrine_widgets::panel::{DetailPanel, PanelAction};
use vitrine_widgets::typewriter::{Typewriter, TypewriterConfig};

use crate::content;

/// Hero entrance delay before its elements join the reveal set.
const ENTRANCE_DELAY_MS: u64 = 240;

/// Page margin on the left edge.
const MARGIN: u16 = 2;

// Reveal element ids outside the card id range.
const EL_HERO_TITLE: u64 = 1001;
const EL_HERO_SUBTITLE: u64 = 1002;
const EL_ABOUT: u64 = 1003;
const EL_CONTACT: u64 = 1004;

/// The environment's current location.
#[derive(Debug)]
struct LocationBar {
    current: String,
}

impl Default for LocationBar {
    fn default() -> Self {
        Self {
            current: "index.html".to_string(),
        }
    }
}

impl NavigationSurface for LocationBar {
    fn navigate(&mut self, url: &str) {
        self.current = url.to_string();
    }
}

/// Terminal bell as the click feedback cue.
#[derive(Debug, Default)]
struct BellCue;

impl FeedbackCue for BellCue {
    fn play(&mut self) -> std::io::Result<()> {
        let mut out = std::io::stdout();
        out.write_all(b"\x07")?;
        out.flush()
    }
}

/// Stand-in for the persistence endpoint: logs and accepts.
#[derive(Debug, Default)]
struct LoggedSink;

impl MessageSink for LoggedSink {
    fn deliver(&mut self, message: &ContactMessage) -> Result<String, String> {
        tracing::info!(name = %message.name, email = %message.email, "contact message received");
        Ok("Message saved. Thank you!".to_string())
    }
}

/// Where keyboard focus lives on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Domain {
    Gallery,
    Form,
}

/// What the app is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Page {
    Home,
    /// A full-page navigation happened.
    Navigated(String),
}

/// Content-space row layout, recomputed per width.
#[derive(Debug, Clone, Copy)]
struct PageLayout {
    gallery_top: u16,
    contact_top: u16,
    total: u16,
}

/// The showcase application state.
pub struct ShowcaseApp {
    controller: InteractionController,
    ids: Vec<CardId>,
    tracker: PointerTracker,
    ring: FocusRing,
    gallery: GalleryState,
    gallery_layout: GalleryLayout,
    reveal: RevealTracker,
    typewriter: Typewriter,
    form: ContactForm,
    sink: LoggedSink,
    location: LocationBar,
    domain: Domain,
    page: Page,
    scroll: u16,
    viewport: (u16, u16),
    about_zone: Option<ContentRect>,
    started_at: Instant,
    last_frame: Instant,
    hero_observed: bool,
}

impl ShowcaseApp {
    /// Build the app with the static page content.
    #[must_use]
    pub fn new(now: Instant) -> Self {
        let mut registry = CardRegistry::new();
        content::register_cards(&mut registry);
        let ids: Vec<CardId> = registry.ids().collect();

        Self {
            controller: InteractionController::new(registry).with_cue(Box::new(BellCue)),
            ring: FocusRing::new(ids.clone()),
            ids,
            tracker: PointerTracker::new(),
            gallery: GalleryState::new(),
            gallery_layout: GalleryLayout::default(),
            reveal: RevealTracker::new(RevealConfig::default()),
            typewriter: Typewriter::new(content::HERO_SUBTITLE, TypewriterConfig::default()),
            form: ContactForm::new(),
            sink: LoggedSink,
            location: LocationBar::default(),
            domain: Domain::Gallery,
            page: Page::Home,
            scroll: 0,
            viewport: (80, 24),
            about_zone: None,
            started_at: now,
            last_frame: now,
            hero_observed: false,
        }
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    fn layout(&self, width: u16) -> PageLayout {
        let content_width = width.saturating_sub(MARGIN * 2).max(1);
        let gallery_top = 10;
        let slots = self.gallery_layout.slots(
            ContentRect::new(MARGIN, gallery_top, content_width, u16::MAX - gallery_top),
            self.ids.len(),
        );
        let gallery_bottom = slots
            .iter()
            .map(ContentRect::bottom)
            .max()
            .unwrap_or(gallery_top);
        let contact_top = gallery_bottom + 2;
        PageLayout {
            gallery_top,
            contact_top,
            // Header + blank + six form rows + trailing blank.
            total: contact_top + 9,
        }
    }

    fn page_height(&self) -> u16 {
        self.viewport.1.saturating_sub(1) // status bar
    }

    fn max_scroll(&self) -> u16 {
        self.layout(self.viewport.0)
            .total
            .saturating_sub(self.page_height())
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = i32::from(self.max_scroll());
        let next = (i32::from(self.scroll) + delta).clamp(0, max);
        self.scroll = next as u16;
    }

    // -----------------------------------------------------------------------
    // Reveal
    // -----------------------------------------------------------------------

    fn observe_elements(&mut self, now: Instant) {
        let layout = self.layout(self.viewport.0);
        let width = self.viewport.0.saturating_sub(MARGIN * 2).max(1);

        if !self.hero_observed
            && now.duration_since(self.started_at) >= Duration::from_millis(ENTRANCE_DELAY_MS)
        {
            self.reveal.observe(EL_HERO_TITLE, ContentRect::new(MARGIN, 1, width, 1));
            self.reveal
                .observe(EL_HERO_SUBTITLE, ContentRect::new(MARGIN, 3, width, 1));
            self.reveal.observe(EL_ABOUT, ContentRect::new(MARGIN, 5, width, 1));
            self.hero_observed = true;
        }

        let slots = self.gallery_layout.slots(
            ContentRect::new(MARGIN, layout.gallery_top, width, u16::MAX - layout.gallery_top),
            self.ids.len(),
        );
        for (id, slot) in self.ids.iter().zip(slots) {
            self.reveal.observe(id.index() as u64, slot);
        }
        self.reveal
            .observe(EL_CONTACT, ContentRect::new(MARGIN, layout.contact_top, width, 8));
    }

    fn update_reveal(&mut self) {
        let viewport = ContentRect::new(0, self.scroll, self.viewport.0, self.page_height());
        for fired in self.reveal.update(viewport) {
            if let Some(&id) = self.ids.iter().find(|id| id.index() as u64 == fired) {
                self.controller.registry_mut().mark_revealed(id);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    fn dispatch_all(&mut self, events: Vec<CardEvent>, now: Instant) {
        for event in events {
            self.controller.dispatch(event, now);
        }
    }

    fn tab_forward(&mut self, now: Instant) {
        match self.domain {
            Domain::Gallery => {
                let last = self.ids.last().copied();
                if self.ring.current().is_some() && self.ring.current() == last {
                    // Crossing into the form: the panel loses focus so the
                    // debounced close scheduled by the blur can complete.
                    self.controller.panel_mut().blur();
                    if let Some(blurred) = self.ring.clear() {
                        self.controller.dispatch(CardEvent::Blur(blurred), now);
                    }
                    self.domain = Domain::Form;
                } else {
                    let mv = self.ring.next();
                    if let Some(blurred) = mv.blurred {
                        self.controller.dispatch(CardEvent::Blur(blurred), now);
                    }
                    if let Some(focused) = mv.focused {
                        self.controller.dispatch(CardEvent::Focus(focused), now);
                    }
                }
            }
            Domain::Form => {
                if self.form.focus() == FormFocus::Submit {
                    self.form.focus_next(); // wraps to Name for next visit
                    self.domain = Domain::Gallery;
                    let mv = self.ring.next();
                    if let Some(focused) = mv.focused {
                        self.controller.dispatch(CardEvent::Focus(focused), now);
                    }
                } else {
                    self.form.focus_next();
                }
            }
        }
    }

    fn tab_backward(&mut self, now: Instant) {
        match self.domain {
            Domain::Gallery => match self.ring.current() {
                Some(current) if Some(current) == self.ids.first().copied() => {
                    self.controller.panel_mut().blur();
                    if let Some(blurred) = self.ring.clear() {
                        self.controller.dispatch(CardEvent::Blur(blurred), now);
                    }
                    self.domain = Domain::Form;
                    self.form.focus_prev(); // Name → Submit
                }
                _ => {
                    let mv = self.ring.prev();
                    if let Some(blurred) = mv.blurred {
                        self.controller.dispatch(CardEvent::Blur(blurred), now);
                    }
                    if let Some(focused) = mv.focused {
                        self.controller.dispatch(CardEvent::Focus(focused), now);
                    }
                }
            },
            Domain::Form => {
                if self.form.focus() == FormFocus::Field(vitrine_widgets::form::FieldId::Name) {
                    self.domain = Domain::Gallery;
                    let mv = self.ring.prev();
                    if let Some(focused) = mv.focused {
                        self.controller.dispatch(CardEvent::Focus(focused), now);
                    }
                } else {
                    self.form.focus_prev();
                }
            }
        }
    }

    fn activate(&mut self, now: Instant) {
        if self.controller.panel().holds_focus() {
            match self.controller.panel().focused_action() {
                Some(PanelAction::Commit(url)) => {
                    // Enter on the order control is the keyboard click:
                    // same feedback mark, same deferred commit.
                    match self.controller.arbitrator().active() {
                        Some(card) => {
                            self.controller.dispatch(CardEvent::Click(card), now);
                        }
                        None => {
                            self.controller.commit(Some(&url), now);
                        }
                    }
                }
                Some(PanelAction::Dismiss) => {
                    self.controller.dispatch(CardEvent::PanelClose, now);
                }
                None => {}
            }
            return;
        }
        match self.domain {
            Domain::Gallery => {
                // Enter on a focused card commits, same as a click.
                if let Some(card) = self.ring.current() {
                    self.controller.dispatch(CardEvent::Click(card), now);
                }
            }
            Domain::Form => {
                if self.form.focus() == FormFocus::Submit {
                    match self.form.submit(&mut self.sink) {
                        SubmitOutcome::Blocked => {
                            tracing::debug!("contact submission blocked by validation");
                        }
                        SubmitOutcome::Delivered(_) | SubmitOutcome::Rejected(_) => {}
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        if !key.is_press() {
            return Control::Continue;
        }
        if let Page::Navigated(_) = self.page {
            match key.code {
                KeyCode::Char('q') => return Control::Quit,
                KeyCode::Escape | KeyCode::Backspace => {
                    self.page = Page::Home;
                    self.location.navigate("index.html");
                }
                _ => {}
            }
            return Control::Continue;
        }

        // Form edits win while the form owns focus.
        if self.domain == Domain::Form
            && !key.ctrl()
            && !matches!(
                key.code,
                KeyCode::Escape | KeyCode::Tab | KeyCode::BackTab | KeyCode::Enter
                    | KeyCode::PageUp | KeyCode::PageDown
            )
            && self.form.handle_key(key)
        {
            return Control::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return Control::Quit,
            KeyCode::Char('c') if key.ctrl() => return Control::Quit,
            KeyCode::Escape => self.dispatch_all(vec![CardEvent::Escape], now),
            KeyCode::Tab => self.tab_forward(now),
            KeyCode::BackTab => self.tab_backward(now),
            // Inside the panel, Left/Right travel between its two controls;
            // otherwise they move along the cards.
            KeyCode::Right => {
                if self.controller.panel().holds_focus() {
                    self.controller.panel_mut().focus_next();
                } else if self.domain == Domain::Gallery {
                    self.tab_forward(now);
                }
            }
            KeyCode::Left => {
                if self.controller.panel().holds_focus() {
                    self.controller.panel_mut().focus_next();
                } else if self.domain == Domain::Gallery {
                    self.tab_backward(now);
                }
            }
            KeyCode::Enter => self.activate(now),
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-(i32::from(self.page_height()))),
            KeyCode::PageDown => self.scroll_by(i32::from(self.page_height())),
            KeyCode::Char('p') => {
                self.controller.commit_after(
                    Some(content::ABOUT_LINK),
                    Duration::from_millis(HERO_COMMIT_DELAY_MS),
                    now,
                );
            }
            _ => {}
        }
        Control::Continue
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if self.page != Page::Home {
            return;
        }
        let content_y = mouse.y.saturating_add(self.scroll);
        match mouse.kind {
            MouseEventKind::Moved => {
                let hit = self.gallery.card_at(mouse.x, content_y);
                let events = self.tracker.on_move(hit);
                self.dispatch_all(events, now);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let scroll = self.scroll;
                let gallery = &self.gallery;
                let target = classify_press(
                    mouse.x,
                    mouse.y,
                    |x, y| gallery.card_at(x, y.saturating_add(scroll)),
                    self.controller.panel().zones(),
                );
                match target {
                    PressTarget::Card(id) => {
                        self.controller.dispatch(CardEvent::Click(id), now);
                    }
                    PressTarget::PanelOrder => {
                        let link = self
                            .controller
                            .panel()
                            .content()
                            .map(|c| c.target_link.clone());
                        self.controller.commit(link.as_deref(), now);
                    }
                    PressTarget::PanelClose => {
                        self.controller.dispatch(CardEvent::PanelClose, now);
                    }
                    PressTarget::PanelBody => {}
                    PressTarget::Outside => {
                        if self
                            .about_zone
                            .is_some_and(|z| z.contains(mouse.x, content_y))
                        {
                            self.controller.commit_after(
                                Some(content::ABOUT_LINK),
                                Duration::from_millis(HERO_COMMIT_DELAY_MS),
                                now,
                            );
                        } else {
                            self.controller.dispatch(CardEvent::OutsideClick, now);
                        }
                    }
                }
            }
            MouseEventKind::ScrollUp => self.scroll_by(-3),
            MouseEventKind::ScrollDown => self.scroll_by(3),
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn render_home(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        self.viewport = (size.width, size.height);
        let page_h = self.page_height();
        let layout = self.layout(size.width);
        let width = size.width.saturating_sub(MARGIN * 2).max(1);

        // Content-space buffer for the whole page.
        let content_area = Rect::new(0, 0, size.width, layout.total);
        let mut content = Buffer::empty(content_area);

        // Hero.
        if self.reveal.is_revealed(EL_HERO_TITLE) {
            content.set_stringn(
                MARGIN,
                1,
                content::HERO_TITLE,
                width as usize,
                Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            );
        }
        if self.reveal.is_revealed(EL_HERO_SUBTITLE) {
            content.set_stringn(
                MARGIN,
                3,
                self.typewriter.line(),
                width as usize,
                Style::new().fg(Color::Gray),
            );
        }
        if self.reveal.is_revealed(EL_ABOUT) {
            content.set_stringn(
                MARGIN,
                5,
                content::ABOUT_LABEL,
                width as usize,
                Style::new().fg(Color::Cyan),
            );
            self.about_zone = Some(ContentRect::new(
                MARGIN,
                5,
                content::ABOUT_LABEL.len() as u16,
                1,
            ));
        } else {
            self.about_zone = None;
        }

        content.set_stringn(
            MARGIN,
            8,
            "── Services ──",
            width as usize,
            Style::new().add_modifier(Modifier::BOLD),
        );

        // Gallery, in content coordinates.
        let gallery_area = Rect::new(
            MARGIN,
            layout.gallery_top,
            width,
            layout.contact_top - layout.gallery_top,
        );
        CardGallery::new(self.controller.registry()).render(
            gallery_area,
            &mut content,
            &mut self.gallery,
        );

        // Contact section.
        if self.reveal.is_revealed(EL_CONTACT) {
            content.set_stringn(
                MARGIN,
                layout.contact_top,
                "── Get in touch ──",
                width as usize,
                Style::new().add_modifier(Modifier::BOLD),
            );
            let form_area = Rect::new(MARGIN, layout.contact_top + 2, width, 6);
            ContactFormView::new().render(form_area, &mut content, &mut self.form);
        }

        // Blit the scrolled window into the frame.
        let buf = frame.buffer_mut();
        for y in 0..page_h.min(layout.total.saturating_sub(self.scroll)) {
            let src_y = y + self.scroll;
            for x in 0..size.width {
                buf[(x, y)] = content[(x, src_y)].clone();
            }
        }

        // Panel overlay, fixed near the bottom in screen space.
        let panel_w = size.width.saturating_sub(4).clamp(20, 48);
        let panel_h = 7u16;
        if page_h > panel_h && size.width >= panel_w {
            let panel_area = Rect::new(
                (size.width - panel_w) / 2,
                page_h - panel_h - 1,
                panel_w,
                panel_h,
            );
            DetailPanel::new().render(panel_area, buf, self.controller.panel_mut());
        }

        self.render_status(frame);
    }

    fn render_navigated(&mut self, frame: &mut ratatui::Frame<'_>, url: &str) {
        let size = frame.area();
        let buf = frame.buffer_mut();
        let y = size.height / 3;
        let line = format!("→ {url}");
        let x = size.width.saturating_sub(line.len() as u16) / 2;
        buf.set_stringn(
            x,
            y,
            &line,
            size.width as usize,
            Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        );
        let hint = "esc back · q quit";
        let hx = size.width.saturating_sub(hint.len() as u16) / 2;
        buf.set_stringn(
            hx,
            y + 2,
            hint,
            size.width as usize,
            Style::new().fg(Color::DarkGray),
        );
        self.render_status(frame);
    }

    fn render_status(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        if size.height == 0 {
            return;
        }
        let y = size.height - 1;
        let line = format!(
            " {}  ·  ↑↓ scroll · tab focus · enter open · q quit",
            self.location.current
        );
        frame.buffer_mut().set_stringn(
            0,
            y,
            &line,
            size.width as usize,
            Style::new().fg(Color::DarkGray),
        );
    }
}

impl App for ShowcaseApp {
    fn update(&mut self, event: Event, now: Instant) -> Control {
        let control = match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse, now);
                Control::Continue
            }
            Event::Resize { width, height } => {
                self.viewport = (width, height);
                self.scroll = self.scroll.min(self.max_scroll());
                Control::Continue
            }
            Event::Focus(false) => {
                let events = self.tracker.on_terminal_focus_lost();
                self.dispatch_all(events, now);
                Control::Continue
            }
            Event::Focus(true) | Event::Tick => Control::Continue,
        };

        // Decorative clock: disjoint from arbitration state.
        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.typewriter.tick(delta);

        self.observe_elements(now);
        self.update_reveal();

        let report = self.controller.tick(&mut self.location, now);
        if let Some(url) = report.navigated {
            self.page = Page::Navigated(url);
        }

        control
    }

    fn view(&mut self, frame: &mut ratatui::Frame<'_>) {
        match self.page.clone() {
            Page::Home => self.render_home(frame),
            Page::Navigated(url) => self.render_navigated(frame, &url),
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.controller.next_deadline()
    }

    fn teardown(&mut self) {
        self.controller.teardown();
    }
}
