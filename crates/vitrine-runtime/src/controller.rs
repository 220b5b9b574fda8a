#![forbid(unsafe_code)]

//! The interaction controller: arbitrator effects applied to real state.
//!
//! Owns the card registry, the arbitrator, the panel state, and the
//! navigation trigger, and keeps them consistent: raw input flows in as
//! [`CardEvent`]s, arbitration effects flow out into registry marks, panel
//! open/close, and armed navigations. Nothing else writes to any of these.
//!
//! # Invariants
//!
//! 1. The panel is open iff a card is active
//! 2. The active card id always references a registered card
//! 3. Teardown leaves no pending deadline behind

use std::fmt;
use std::time::{Duration, Instant};

use vitrine_core::arbitrator::{Arbitrator, ArbitratorConfig, CardEvent, Effect};
use vitrine_core::card::{CardId, CardRegistry};
use vitrine_widgets::panel::{PanelContent, PanelState};

use crate::navigator::{FeedbackCue, NavigationSurface, NavigationTrigger, NavigatorConfig, SilentCue};
use crate::schedule;

/// What a deadline poll did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickReport {
    /// The debounced close fired and the panel closed.
    pub closed: bool,
    /// A deferred navigation fired toward this destination.
    pub navigated: Option<String>,
}

/// Glue between arbitration decisions and the owned UI state.
pub struct InteractionController {
    registry: CardRegistry,
    arbitrator: Arbitrator,
    panel: PanelState,
    navigator: NavigationTrigger,
    cue: Box<dyn FeedbackCue>,
}

impl fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionController")
            .field("registry", &self.registry)
            .field("arbitrator", &self.arbitrator)
            .field("panel", &self.panel)
            .field("navigator", &self.navigator)
            .field("cue", &"<dyn FeedbackCue>")
            .finish()
    }
}

impl InteractionController {
    /// Create a controller over a populated registry with default
    /// configurations and no feedback cue.
    #[must_use]
    pub fn new(registry: CardRegistry) -> Self {
        Self {
            registry,
            arbitrator: Arbitrator::new(ArbitratorConfig::default()),
            panel: PanelState::new(),
            navigator: NavigationTrigger::new(NavigatorConfig::default()),
            cue: Box::new(SilentCue),
        }
    }

    /// Replace the arbitrator configuration.
    #[must_use]
    pub fn with_arbitrator_config(mut self, config: ArbitratorConfig) -> Self {
        self.arbitrator = Arbitrator::new(config);
        self
    }

    /// Replace the navigator configuration.
    #[must_use]
    pub fn with_navigator_config(mut self, config: NavigatorConfig) -> Self {
        self.navigator = NavigationTrigger::new(config);
        self
    }

    /// Attach a feedback cue played when a commit arms.
    #[must_use]
    pub fn with_cue(mut self, cue: Box<dyn FeedbackCue>) -> Self {
        self.cue = cue;
        self
    }

    /// The card registry.
    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    /// Mutable registry access for marks owned outside arbitration
    /// (reveal, hover on non-interactive elements).
    pub fn registry_mut(&mut self) -> &mut CardRegistry {
        &mut self.registry
    }

    /// The panel state.
    #[must_use]
    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    /// Mutable panel access for focus travel (Tab inside the panel).
    pub fn panel_mut(&mut self) -> &mut PanelState {
        &mut self.panel
    }

    /// The arbitrator (read-only).
    #[must_use]
    pub fn arbitrator(&self) -> &Arbitrator {
        &self.arbitrator
    }

    /// Whether a navigation is armed.
    #[must_use]
    pub fn navigation_armed(&self) -> bool {
        self.navigator.is_armed()
    }

    /// Process one resolved input event, applying every resulting effect.
    /// Returns the effects for callers that react to them.
    pub fn dispatch(&mut self, event: CardEvent, now: Instant) -> Vec<Effect> {
        // Hover/focus marks track the raw event stream, not arbitration.
        match event {
            CardEvent::PointerEnter(card) => self.registry.set_hovered(card, true),
            CardEvent::PointerLeave(card) => self.registry.set_hovered(card, false),
            CardEvent::Focus(card) => self.registry.set_focused(card, true),
            CardEvent::Blur(card) => self.registry.set_focused(card, false),
            _ => {}
        }

        let effects = self.arbitrator.handle(&self.registry, event, now);
        for effect in &effects {
            self.apply(*effect, now);
        }
        effects
    }

    /// Commit toward an explicit link (panel order control, Enter on the
    /// focused order control).
    pub fn commit(&mut self, link: Option<&str>, now: Instant) -> bool {
        self.arm_with_cue(link, None, now)
    }

    /// Commit with an explicit delay (hero-level controls use a longer one).
    pub fn commit_after(&mut self, link: Option<&str>, delay: Duration, now: Instant) -> bool {
        self.arm_with_cue(link, Some(delay), now)
    }

    /// Fire any elapsed deadlines: the debounced close and the deferred
    /// navigation. `surface` receives the navigation, which is the only
    /// external effect.
    pub fn tick(&mut self, surface: &mut dyn NavigationSurface, now: Instant) -> TickReport {
        let mut report = TickReport::default();

        if let Some(Effect::Close) = self.arbitrator.poll(self.panel.holds_focus(), now) {
            self.registry.set_active(None);
            self.panel.close();
            report.closed = true;
        }

        if let Some(destination) = self.navigator.poll(now) {
            for id in self.registry.ids().collect::<Vec<_>>() {
                self.registry.set_clicked(id, false);
            }
            tracing::debug!(url = %destination, "navigating");
            surface.navigate(&destination);
            report.navigated = Some(destination);
        }

        report
    }

    /// The nearest pending deadline across the close debounce and the
    /// armed navigation.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        schedule::nearest([
            self.arbitrator.next_deadline(),
            self.navigator.next_deadline(),
        ])
    }

    /// Cancel every pending deadline. Called at teardown so a disposed
    /// surface is never mutated afterwards.
    pub fn teardown(&mut self) {
        self.arbitrator.cancel_pending_close();
        self.navigator.cancel();
    }

    // -----------------------------------------------------------------------
    // Effect application
    // -----------------------------------------------------------------------

    fn apply(&mut self, effect: Effect, now: Instant) {
        match effect {
            Effect::Open { card, focus_panel } | Effect::Retarget { card, focus_panel } => {
                let Some(meta) = self.registry.metadata(card) else {
                    // The arbitrator validated registration; a miss here
                    // means the registry changed under us. Never render
                    // a partial panel.
                    tracing::warn!(card = %card, "active card vanished from registry");
                    return;
                };
                let content = PanelContent::from(meta);
                self.registry.set_active(Some(card));
                self.panel.open(content);
                if focus_panel {
                    self.panel.focus_primary();
                }
            }
            Effect::FocusPanel => self.panel.focus_primary(),
            Effect::Close => {
                self.registry.set_active(None);
                self.panel.close();
            }
            Effect::MarkClicked(card) => self.registry.set_clicked(card, true),
            Effect::ArmCommit(card) => {
                let link = self
                    .registry
                    .metadata(card)
                    .map(|m| m.target_link.clone());
                self.arm_with_cue(link.as_deref(), None, now);
            }
        }
    }

    fn arm_with_cue(&mut self, link: Option<&str>, delay: Option<Duration>, now: Instant) -> bool {
        let armed = match delay {
            Some(d) => self.navigator.arm_after(link, d, now),
            None => self.navigator.arm(link, now),
        };
        if armed {
            // Decorative: a cue that cannot play never blocks navigation.
            if let Err(err) = self.cue.play() {
                tracing::trace!(%err, "feedback cue failed");
            }
        }
        armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use vitrine_core::arbitrator::CLOSE_DELAY_MS;
    use vitrine_core::card::{CardDef, CardFlags};
    use crate::navigator::COMMIT_DELAY_MS;

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

    struct FailingCue;

    impl FeedbackCue for FailingCue {
        fn play(&mut self) -> io::Result<()> {
            Err(io::Error::other("audio device missing"))
        }
    }

    fn controller() -> (InteractionController, Vec<CardId>) {
        let mut reg = CardRegistry::new();
        let ids = vec![
            reg.register(
                CardDef::new()
                    .title("Repair Services")
                    .description("Laptop diagnostics")
                    .target_link("order.html#repair"),
            ),
            reg.register(
                CardDef::new()
                    .title("Web Development")
                    .description("Sites and dashboards")
                    .target_link("order.html#web"),
            ),
        ];
        (InteractionController::new(reg), ids)
    }

    fn assert_invariant(c: &InteractionController) {
        assert_eq!(c.panel().is_open(), c.arbitrator().active().is_some());
        assert_eq!(c.registry().active(), c.arbitrator().active());
    }

    // --- panel data-flow tests ---

    #[test]
    fn enter_shows_exact_metadata() {
        let (mut c, ids) = controller();
        let now = Instant::now();
        c.dispatch(CardEvent::PointerEnter(ids[0]), now);

        let content = c.panel().content().unwrap();
        assert_eq!(content.title, "Repair Services");
        assert_eq!(content.description, "Laptop diagnostics");
        assert_eq!(content.target_link, "order.html#repair");
        assert!(c.panel().is_open());
        assert!(!c.panel().aria_hidden());
        assert!(c.registry().flags(ids[0]).contains(CardFlags::ACTIVE));
        assert_invariant(&c);
    }

    #[test]
    fn outside_click_closes_and_unmarks() {
        let (mut c, ids) = controller();
        let now = Instant::now();
        c.dispatch(CardEvent::PointerEnter(ids[0]), now);
        c.dispatch(CardEvent::OutsideClick, now);

        assert!(!c.panel().is_open());
        assert!(c.panel().aria_hidden());
        assert!(!c.registry().flags(ids[0]).contains(CardFlags::ACTIVE));
        assert_invariant(&c);
    }

    #[test]
    fn retarget_swaps_content_in_place() {
        let (mut c, ids) = controller();
        let now = Instant::now();
        c.dispatch(CardEvent::PointerEnter(ids[0]), now);
        c.dispatch(CardEvent::PointerEnter(ids[1]), now);

        assert_eq!(c.panel().content().unwrap().title, "Web Development");
        assert!(!c.registry().flags(ids[0]).contains(CardFlags::ACTIVE));
        assert!(c.registry().flags(ids[1]).contains(CardFlags::ACTIVE));
        assert_invariant(&c);
    }

    #[test]
    fn keyboard_focus_moves_into_panel() {
        let (mut c, ids) = controller();
        let now = Instant::now();
        c.dispatch(CardEvent::Focus(ids[0]), now);
        assert!(c.panel().holds_focus());
        assert!(c.registry().flags(ids[0]).contains(CardFlags::FOCUSED));
    }

    #[test]
    fn pointer_open_leaves_focus_alone() {
        let (mut c, ids) = controller();
        c.dispatch(CardEvent::PointerEnter(ids[0]), Instant::now());
        assert!(!c.panel().holds_focus());
        assert!(c.registry().flags(ids[0]).contains(CardFlags::HOVERED));
    }

    // --- debounce flow tests ---

    #[test]
    fn debounced_close_fires_through_tick() {
        let (mut c, ids) = controller();
        let now = Instant::now();
        let mut surface = RecordingSurface::default();

        c.dispatch(CardEvent::PointerEnter(ids[0]), now);
        c.dispatch(CardEvent::PointerLeave(ids[0]), now);
        assert!(c.panel().is_open());

        let report = c.tick(&mut surface, now + CLOSE);
        assert!(report.closed);
        assert!(!c.panel().is_open());
        assert_invariant(&c);
    }

    #[test]
    fn focus_into_panel_keeps_it_open_past_deadline() {
        let (mut c, ids) = controller();
        let now = Instant::now();
        let mut surface = RecordingSurface::default();

        c.dispatch(CardEvent::Focus(ids[0]), now);
        c.dispatch(CardEvent::Blur(ids[0]), now);
        // Focus is inside the panel (moved there on open).
        let report = c.tick(&mut surface, now + CLOSE * 2);
        assert!(!report.closed);
        assert!(c.panel().is_open());
    }

    // --- navigation flow tests ---

    #[test]
    fn click_arms_and_navigates_after_delay() {
        let (mut c, ids) = controller();
        let now = Instant::now();
        let mut surface = RecordingSurface::default();

        c.dispatch(CardEvent::Click(ids[0]), now);
        assert!(c.registry().flags(ids[0]).contains(CardFlags::CLICKED));
        assert!(c.navigation_armed());
        // Panel untouched by the click itself.
        assert!(!c.panel().is_open());

        assert_eq!(c.tick(&mut surface, now).navigated, None);
        let report = c.tick(&mut surface, now + COMMIT);
        assert_eq!(report.navigated.as_deref(), Some("order.html#repair"));
        assert_eq!(surface.locations, vec!["order.html#repair"]);
        // Click flash cleared once the navigation fired.
        assert!(!c.registry().flags(ids[0]).contains(CardFlags::CLICKED));
    }

    #[test]
    fn double_click_navigates_once() {
        let (mut c, ids) = controller();
        let now = Instant::now();
        let mut surface = RecordingSurface::default();

        c.dispatch(CardEvent::Click(ids[0]), now);
        c.dispatch(CardEvent::Click(ids[0]), now + Duration::from_millis(20));
        c.tick(&mut surface, now + COMMIT * 3);
        assert_eq!(surface.locations.len(), 1);
    }

    #[test]
    fn failing_cue_never_blocks_navigation() {
        let mut reg = CardRegistry::new();
        let id = reg.register(CardDef::new().target_link("order.html#x"));
        let mut c = InteractionController::new(reg).with_cue(Box::new(FailingCue));
        let now = Instant::now();
        let mut surface = RecordingSurface::default();

        c.dispatch(CardEvent::Click(id), now);
        c.tick(&mut surface, now + COMMIT);
        assert_eq!(surface.locations, vec!["order.html#x"]);
    }

    #[test]
    fn panel_commit_uses_shown_link() {
        let (mut c, ids) = controller();
        let now = Instant::now();
        let mut surface = RecordingSurface::default();

        c.dispatch(CardEvent::Focus(ids[1]), now);
        let link = c.panel().focused_action();
        let vitrine_widgets::panel::PanelAction::Commit(url) = link.unwrap() else {
            panic!("order control focused");
        };
        c.commit(Some(&url), now);
        c.tick(&mut surface, now + COMMIT);
        assert_eq!(surface.locations, vec!["order.html#web"]);
    }

    // --- teardown tests ---

    #[test]
    fn teardown_cancels_all_deadlines() {
        let (mut c, ids) = controller();
        let now = Instant::now();
        let mut surface = RecordingSurface::default();

        c.dispatch(CardEvent::PointerEnter(ids[0]), now);
        c.dispatch(CardEvent::PointerLeave(ids[0]), now);
        c.dispatch(CardEvent::Click(ids[1]), now);
        assert!(c.next_deadline().is_some());

        c.teardown();
        assert_eq!(c.next_deadline(), None);
        let report = c.tick(&mut surface, now + Duration::from_secs(10));
        assert_eq!(report, TickReport::default());
        assert!(surface.locations.is_empty());
    }

    #[test]
    fn next_deadline_is_the_nearest() {
        let (mut c, ids) = controller();
        let now = Instant::now();

        c.dispatch(CardEvent::Click(ids[0]), now); // commit at +120ms
        c.dispatch(CardEvent::PointerEnter(ids[1]), now + Duration::from_millis(10));
        c.dispatch(
            CardEvent::PointerLeave(ids[1]),
            now + Duration::from_millis(10),
        ); // close at +130ms
        assert_eq!(c.next_deadline(), Some(now + COMMIT));
    }
}
