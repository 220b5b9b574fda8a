#![forbid(unsafe_code)]

//! Decorative typewriter text fill.
//!
//! Reveals a line of text one grapheme at a time after a short lead-in,
//! then blinks a caret. Purely decorative: the state here is a function of
//! its own elapsed time and nothing else, so the animation can be dropped
//! entirely without affecting any interactive behavior.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

/// Delay before the first character appears.
pub const LEAD_IN_MS: u64 = 400;

/// Cadence of character reveals.
pub const CHAR_EVERY_MS: u64 = 24;

/// Caret blink half-period once typing is complete.
pub const CARET_HALF_PERIOD_MS: u64 = 500;

/// The caret glyph.
pub const CARET: char = '|';

/// Timing configuration for the typewriter.
#[derive(Debug, Clone)]
pub struct TypewriterConfig {
    /// Delay before the first character.
    /// Default: 400ms
    pub lead_in: Duration,
    /// Time between character reveals.
    /// Default: 24ms
    pub char_every: Duration,
    /// Caret blink half-period after completion.
    /// Default: 500ms
    pub caret_half_period: Duration,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            lead_in: Duration::from_millis(LEAD_IN_MS),
            char_every: Duration::from_millis(CHAR_EVERY_MS),
            caret_half_period: Duration::from_millis(CARET_HALF_PERIOD_MS),
        }
    }
}

/// Character-by-character text fill with a blinking caret.
#[derive(Debug, Clone)]
pub struct Typewriter {
    config: TypewriterConfig,
    text: String,
    /// Byte offset of each grapheme start, for O(1) prefix slicing.
    grapheme_starts: Vec<usize>,
    elapsed: Duration,
}

impl Typewriter {
    /// Create a typewriter over `text`.
    #[must_use]
    pub fn new(text: impl Into<String>, config: TypewriterConfig) -> Self {
        let text = text.into();
        let grapheme_starts = text.grapheme_indices(true).map(|(i, _)| i).collect();
        Self {
            config,
            text,
            grapheme_starts,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance the animation clock.
    pub fn tick(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    /// Number of graphemes currently shown.
    #[must_use]
    pub fn shown(&self) -> usize {
        let total = self.grapheme_starts.len();
        if self.elapsed < self.config.lead_in {
            return 0;
        }
        let typing = self.elapsed - self.config.lead_in;
        let per = self.config.char_every.as_millis().max(1);
        let revealed = 1 + (typing.as_millis() / per) as usize;
        revealed.min(total)
    }

    /// Whether every character has been revealed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shown() == self.grapheme_starts.len()
    }

    /// The visible text prefix.
    #[must_use]
    pub fn visible_text(&self) -> &str {
        let shown = self.shown();
        match self.grapheme_starts.get(shown) {
            Some(&end) => &self.text[..end],
            None => &self.text,
        }
    }

    /// Whether the caret is currently in its visible blink phase. Always
    /// `false` until typing completes.
    #[must_use]
    pub fn caret_visible(&self) -> bool {
        if !self.is_complete() {
            return false;
        }
        let since = self.elapsed.saturating_sub(self.completed_at());
        let half = self.config.caret_half_period.as_millis().max(1);
        (since.as_millis() / half) % 2 == 0
    }

    /// The rendered line: visible prefix plus caret when blinked on.
    #[must_use]
    pub fn line(&self) -> String {
        let mut out = self.visible_text().to_string();
        if self.caret_visible() {
            out.push(CARET);
        }
        out
    }

    /// When the last character appears.
    fn completed_at(&self) -> Duration {
        let n = self.grapheme_starts.len() as u32;
        if n == 0 {
            return Duration::ZERO;
        }
        self.config.lead_in + self.config.char_every * (n - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typewriter(text: &str) -> Typewriter {
        Typewriter::new(text, TypewriterConfig::default())
    }

    #[test]
    fn nothing_before_lead_in() {
        let mut tw = typewriter("hello");
        tw.tick(Duration::from_millis(LEAD_IN_MS - 1));
        assert_eq!(tw.visible_text(), "");
        assert!(!tw.caret_visible());
    }

    #[test]
    fn first_char_at_lead_in() {
        let mut tw = typewriter("hello");
        tw.tick(Duration::from_millis(LEAD_IN_MS));
        assert_eq!(tw.visible_text(), "h");
    }

    #[test]
    fn progression_follows_cadence() {
        let mut tw = typewriter("hello");
        tw.tick(Duration::from_millis(LEAD_IN_MS + 2 * CHAR_EVERY_MS));
        assert_eq!(tw.visible_text(), "hel");
    }

    #[test]
    fn completes_and_blinks_caret() {
        let mut tw = typewriter("hi");
        tw.tick(Duration::from_millis(LEAD_IN_MS + CHAR_EVERY_MS));
        assert!(tw.is_complete());
        assert_eq!(tw.visible_text(), "hi");
        assert!(tw.caret_visible());
        assert_eq!(tw.line(), format!("hi{CARET}"));

        // Half a period later the caret hides; a full period restores it.
        tw.tick(Duration::from_millis(CARET_HALF_PERIOD_MS));
        assert!(!tw.caret_visible());
        assert_eq!(tw.line(), "hi");
        tw.tick(Duration::from_millis(CARET_HALF_PERIOD_MS));
        assert!(tw.caret_visible());
    }

    #[test]
    fn overshoot_saturates_at_full_text() {
        let mut tw = typewriter("abc");
        tw.tick(Duration::from_secs(60));
        assert_eq!(tw.visible_text(), "abc");
        assert!(tw.is_complete());
    }

    #[test]
    fn empty_text_is_complete_immediately() {
        let tw = typewriter("");
        assert!(tw.is_complete());
        assert_eq!(tw.visible_text(), "");
    }

    #[test]
    fn grapheme_boundaries_are_respected() {
        let mut tw = typewriter("héllo");
        tw.tick(Duration::from_millis(LEAD_IN_MS + CHAR_EVERY_MS));
        assert_eq!(tw.visible_text(), "hé");
    }

    #[test]
    fn accumulating_small_ticks_matches_one_big_tick() {
        let mut a = typewriter("portfolio");
        let mut b = typewriter("portfolio");
        a.tick(Duration::from_millis(LEAD_IN_MS + 5 * CHAR_EVERY_MS));
        for _ in 0..(LEAD_IN_MS + 5 * CHAR_EVERY_MS) {
            b.tick(Duration::from_millis(1));
        }
        assert_eq!(a.visible_text(), b.visible_text());
    }
}
