//! End-to-end interaction flows: raw input through routing, arbitration,
//! panel state, and deferred navigation.

use std::time::{Duration, Instant};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::StatefulWidget;

use vitrine_core::arbitrator::{CardEvent, CLOSE_DELAY_MS};
use vitrine_core::card::{CardDef, CardFlags, CardRegistry};
use vitrine_runtime::controller::InteractionController;
use vitrine_runtime::focus::FocusRing;
use vitrine_runtime::navigator::{COMMIT_DELAY_MS, NavigationSurface};
use vitrine_runtime::router::{classify_press, PointerTracker, PressTarget};
use vitrine_widgets::form::{ContactForm, ContactMessage, MessageSink, SubmitOutcome};
use vitrine_widgets::gallery::{CardGallery, GalleryState};
use vitrine_widgets::panel::{DetailPanel, PanelAction};

const CLOSE: Duration = Duration::from_millis(CLOSE_DELAY_MS);
const COMMIT: Duration = Duration::from_millis(COMMIT_DELAY_MS);

#[derive(Default)]
struct RecordingSurface {
    locations: Vec<String>,
}

impl NavigationSurface for RecordingSurface {
    fn navigate(&mut self, url: &str) {
        self.locations.push(url.to_string());
    }
}

fn showcase() -> InteractionController {
    let mut reg = CardRegistry::new();
    reg.register(
        CardDef::new()
            .title("Repair Services")
            .description("Laptop diagnostics")
            .target_link("order.html#repair"),
    );
    reg.register(
        CardDef::new()
            .title("Web Development")
            .description("Sites and dashboards")
            .target_link("order.html#web"),
    );
    InteractionController::new(reg)
}

#[test]
fn pointer_flow_from_hover_to_outside_click() {
    let mut c = showcase();
    let ids: Vec<_> = c.registry().ids().collect();
    let mut tracker = PointerTracker::new();
    let mut surface = RecordingSurface::default();
    let now = Instant::now();

    // Render the gallery so pointer hits resolve against real tiles.
    let area = Rect::new(0, 0, 70, 12);
    let mut buf = Buffer::empty(area);
    let mut gallery = GalleryState::new();
    for id in &ids {
        c.registry_mut().mark_revealed(*id);
    }
    CardGallery::new(c.registry()).render(area, &mut buf, &mut gallery);

    // Move onto the first tile.
    let hit = gallery.card_at(1, 1);
    assert_eq!(hit, Some(ids[0]));
    for event in tracker.on_move(hit) {
        c.dispatch(event, now);
    }

    let content = c.panel().content().expect("panel populated");
    assert_eq!(content.title, "Repair Services");
    assert_eq!(content.description, "Laptop diagnostics");
    assert_eq!(content.target_link, "order.html#repair");

    // The panel's commit control carries exactly that link.
    c.panel_mut().focus_primary();
    assert_eq!(
        c.panel().focused_action(),
        Some(PanelAction::Commit("order.html#repair".to_string()))
    );
    c.panel_mut().blur();

    // A press on empty space is an outside click: panel closes, card
    // loses its active mark.
    let press = classify_press(60, 11, |x, y| gallery.card_at(x, y), c.panel().zones());
    assert_eq!(press, PressTarget::Outside);
    c.dispatch(CardEvent::OutsideClick, now);

    assert!(!c.panel().is_open());
    assert!(c.panel().aria_hidden());
    assert!(!c.registry().flags(ids[0]).contains(CardFlags::ACTIVE));
    assert!(surface.locations.is_empty());
    let _ = c.tick(&mut surface, now + Duration::from_secs(1));
    assert!(surface.locations.is_empty());
}

#[test]
fn keyboard_flow_reaches_parity_with_pointer() {
    let mut c = showcase();
    let ids: Vec<_> = c.registry().ids().collect();
    let mut ring = FocusRing::new(ids.clone());
    let mut surface = RecordingSurface::default();
    let now = Instant::now();

    // Tab to the first card: blur-before-focus ordering.
    let mv = ring.next();
    if let Some(blurred) = mv.blurred {
        c.dispatch(CardEvent::Blur(blurred), now);
    }
    if let Some(focused) = mv.focused {
        c.dispatch(CardEvent::Focus(focused), now);
    }

    // Keyboard users land inside the panel on its primary control.
    assert!(c.panel().is_open());
    assert!(c.panel().holds_focus());

    // Enter on the order control commits and navigates after the delay.
    let Some(PanelAction::Commit(url)) = c.panel().focused_action() else {
        panic!("order control must hold focus");
    };
    c.commit(Some(&url), now);
    assert!(c.navigation_armed());
    c.tick(&mut surface, now + COMMIT);
    assert_eq!(surface.locations, vec!["order.html#repair"]);
}

#[test]
fn moving_between_cards_never_flickers() {
    let mut c = showcase();
    let ids: Vec<_> = c.registry().ids().collect();
    let mut tracker = PointerTracker::new();
    let mut surface = RecordingSurface::default();
    let mut now = Instant::now();

    for event in tracker.on_move(Some(ids[0])) {
        c.dispatch(event, now);
    }
    // Cross to the second card: the synthesized leave(0) + enter(1) burst
    // must retarget without ever closing.
    now += Duration::from_millis(15);
    for event in tracker.on_move(Some(ids[1])) {
        c.dispatch(event, now);
        assert!(c.panel().is_open(), "panel must stay open mid-burst");
    }
    assert_eq!(c.panel().content().unwrap().title, "Web Development");

    // No stale deadline from the burst ever fires.
    let report = c.tick(&mut surface, now + CLOSE * 4);
    assert!(!report.closed);
    assert!(c.panel().is_open());
}

#[test]
fn leave_then_refocus_inside_window_keeps_panel_open() {
    let mut c = showcase();
    let ids: Vec<_> = c.registry().ids().collect();
    let mut surface = RecordingSurface::default();
    let now = Instant::now();

    c.dispatch(CardEvent::PointerEnter(ids[0]), now);
    c.dispatch(CardEvent::PointerLeave(ids[0]), now);
    c.dispatch(CardEvent::Focus(ids[0]), now + CLOSE / 2);

    let report = c.tick(&mut surface, now + CLOSE * 2);
    assert!(!report.closed);
    assert!(c.panel().is_open());
}

#[test]
fn escape_is_immediate_from_every_state() {
    let mut c = showcase();
    let ids: Vec<_> = c.registry().ids().collect();
    let now = Instant::now();

    // Idle.
    c.dispatch(CardEvent::Escape, now);
    assert!(!c.panel().is_open());

    // Active.
    c.dispatch(CardEvent::PointerEnter(ids[0]), now);
    c.dispatch(CardEvent::Escape, now);
    assert!(!c.panel().is_open());

    // Pending close.
    c.dispatch(CardEvent::PointerEnter(ids[1]), now);
    c.dispatch(CardEvent::PointerLeave(ids[1]), now);
    c.dispatch(CardEvent::Escape, now);
    assert!(!c.panel().is_open());
    assert_eq!(c.next_deadline(), None);
}

#[test]
fn panel_close_press_resolves_through_zones() {
    let mut c = showcase();
    let ids: Vec<_> = c.registry().ids().collect();
    let now = Instant::now();

    c.dispatch(CardEvent::PointerEnter(ids[0]), now);

    // Render the panel to obtain real control zones.
    let area = Rect::new(5, 5, 44, 7);
    let mut buf = Buffer::empty(area);
    let mut panel_state = c.panel().clone();
    DetailPanel::new().render(area, &mut buf, &mut panel_state);
    *c.panel_mut() = panel_state;

    let close_zone = c.panel().zones().close.expect("close affordance rendered");
    let press = classify_press(close_zone.x, close_zone.y, |_, _| None, c.panel().zones());
    assert_eq!(press, PressTarget::PanelClose);

    c.dispatch(CardEvent::PanelClose, now);
    assert!(!c.panel().is_open());
}

/// Sink that records whether the network was touched at all.
#[derive(Default)]
struct CountingSink {
    calls: usize,
}

impl MessageSink for CountingSink {
    fn deliver(&mut self, _message: &ContactMessage) -> Result<String, String> {
        self.calls += 1;
        Ok("Message saved.".to_string())
    }
}

#[test]
fn blocked_form_submission_touches_nothing() {
    use vitrine_core::event::{KeyCode, KeyEvent};

    let mut c = showcase();
    let mut surface = RecordingSurface::default();
    let mut form = ContactForm::new();
    let mut sink = CountingSink::default();
    let now = Instant::now();

    // name stays "", email and message filled.
    form.focus_next();
    for ch in "a@b.com".chars() {
        form.handle_key(KeyEvent::new(KeyCode::Char(ch)));
    }
    form.focus_next();
    for ch in "hi".chars() {
        form.handle_key(KeyEvent::new(KeyCode::Char(ch)));
    }

    assert_eq!(form.submit(&mut sink), SubmitOutcome::Blocked);
    assert_eq!(sink.calls, 0, "no network call may occur");
    assert!(form.error().is_some(), "blocking message must be visible");

    // And nothing navigates.
    let report = c.tick(&mut surface, now + Duration::from_secs(1));
    assert_eq!(report.navigated, None);
    assert!(surface.locations.is_empty());
}
