#![forbid(unsafe_code)]

//! Deferred navigation.
//!
//! A resolved commit does not navigate immediately: the trigger arms a
//! short delay first so click feedback can play, then performs the
//! navigation through an injected [`NavigationSurface`]. At most one
//! navigation is armed at a time; a second commit while armed is ignored,
//! so rapid double clicks never double-navigate.

use std::io;
use std::time::{Duration, Instant};

use vitrine_core::card::FALLBACK_LINK;

/// Delay between a card commit and the navigation, letting feedback cues
/// complete.
pub const COMMIT_DELAY_MS: u64 = 120;

/// Slightly longer delay used by the hero-level commit control.
pub const HERO_COMMIT_DELAY_MS: u64 = 160;

/// Configuration for the navigation trigger.
#[derive(Debug, Clone)]
pub struct NavigatorConfig {
    /// Delay before an armed navigation fires.
    /// Default: 120ms
    pub commit_delay: Duration,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            commit_delay: Duration::from_millis(COMMIT_DELAY_MS),
        }
    }
}

/// The environment's location setter. Navigation is the trigger's only
/// external effect.
pub trait NavigationSurface {
    /// Set the current location to `url`.
    fn navigate(&mut self, url: &str);
}

/// A decorative feedback cue (the click sound of the original page).
///
/// Failures are the caller's to swallow: a cue that cannot play must never
/// block the navigation it decorates.
pub trait FeedbackCue {
    /// Start the cue.
    fn play(&mut self) -> io::Result<()>;
}

/// A cue that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl FeedbackCue for SilentCue {
    fn play(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Armed {
    destination: String,
    fire_at: Instant,
}

/// Arms and fires deferred navigations.
#[derive(Debug, Default)]
pub struct NavigationTrigger {
    config: NavigatorConfig,
    armed: Option<Armed>,
    /// Diagnostic: navigations fired.
    fired: u64,
}

impl NavigationTrigger {
    /// Create a trigger with the given configuration.
    #[must_use]
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            config,
            armed: None,
            fired: 0,
        }
    }

    /// Arm a navigation toward `link` using the configured delay.
    ///
    /// A missing link falls back to the default destination. Returns `false`
    /// when a navigation is already armed (the first commit wins).
    pub fn arm(&mut self, link: Option<&str>, now: Instant) -> bool {
        self.arm_after(link, self.config.commit_delay, now)
    }

    /// Arm a navigation with an explicit delay (the hero control uses a
    /// slightly longer one).
    pub fn arm_after(&mut self, link: Option<&str>, delay: Duration, now: Instant) -> bool {
        if self.armed.is_some() {
            tracing::debug!("commit ignored: navigation already armed");
            return false;
        }
        let destination = match link {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => FALLBACK_LINK.to_string(),
        };
        self.armed = Some(Armed {
            destination,
            fire_at: now + delay,
        });
        true
    }

    /// Whether a navigation is currently armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// When the armed navigation fires, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.armed.as_ref().map(|a| a.fire_at)
    }

    /// Number of navigations fired (diagnostic).
    #[must_use]
    pub fn fired_count(&self) -> u64 {
        self.fired
    }

    /// Disarm without navigating. Used at teardown.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Fire the armed navigation if its delay has elapsed, returning the
    /// destination to navigate to.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.armed {
            Some(armed) if now >= armed.fire_at => {}
            _ => return None,
        }
        let armed = self.armed.take()?;
        self.fired += 1;
        Some(armed.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(COMMIT_DELAY_MS);

    fn trigger() -> NavigationTrigger {
        NavigationTrigger::new(NavigatorConfig::default())
    }

    #[test]
    fn arm_then_fire_after_delay() {
        let mut nav = trigger();
        let now = Instant::now();
        assert!(nav.arm(Some("order.html#repair"), now));
        assert_eq!(nav.poll(now + DELAY / 2), None);
        assert_eq!(nav.poll(now + DELAY), Some("order.html#repair".to_string()));
        assert!(!nav.is_armed());
        assert_eq!(nav.fired_count(), 1);
    }

    #[test]
    fn second_commit_while_armed_is_ignored() {
        let mut nav = trigger();
        let now = Instant::now();
        assert!(nav.arm(Some("a.html"), now));
        assert!(!nav.arm(Some("b.html"), now + Duration::from_millis(10)));
        assert_eq!(nav.poll(now + DELAY), Some("a.html".to_string()));
        // Exactly one navigation fired.
        assert_eq!(nav.poll(now + DELAY * 4), None);
        assert_eq!(nav.fired_count(), 1);
    }

    #[test]
    fn missing_link_falls_back_to_default() {
        let mut nav = trigger();
        let now = Instant::now();
        nav.arm(None, now);
        assert_eq!(nav.poll(now + DELAY), Some(FALLBACK_LINK.to_string()));

        nav.arm(Some(""), now);
        assert_eq!(nav.poll(now + DELAY * 2), Some(FALLBACK_LINK.to_string()));
    }

    #[test]
    fn cancel_disarms() {
        let mut nav = trigger();
        let now = Instant::now();
        nav.arm(Some("a.html"), now);
        nav.cancel();
        assert!(!nav.is_armed());
        assert_eq!(nav.poll(now + DELAY * 2), None);
        assert_eq!(nav.fired_count(), 0);
    }

    #[test]
    fn explicit_delay_is_honored() {
        let mut nav = trigger();
        let now = Instant::now();
        let hero = Duration::from_millis(HERO_COMMIT_DELAY_MS);
        nav.arm_after(Some("profile.html"), hero, now);
        assert_eq!(nav.poll(now + DELAY), None);
        assert_eq!(nav.poll(now + hero), Some("profile.html".to_string()));
    }

    #[test]
    fn next_deadline_tracks_armed_state() {
        let mut nav = trigger();
        let now = Instant::now();
        assert_eq!(nav.next_deadline(), None);
        nav.arm(Some("a.html"), now);
        assert_eq!(nav.next_deadline(), Some(now + DELAY));
    }
}
