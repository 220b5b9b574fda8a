#![forbid(unsafe_code)]

//! Deadline bookkeeping for the poll loop.
//!
//! All waiting in vitrine is expressed as owned `Instant` deadlines
//! (debounced close, deferred navigation, animation frames). The loop
//! clamps its input-poll timeout to the nearest one so no deadline fires
//! late by more than the poll granularity.

use std::time::{Duration, Instant};

/// The earliest of a set of optional deadlines.
#[must_use]
pub fn nearest(deadlines: impl IntoIterator<Item = Option<Instant>>) -> Option<Instant> {
    deadlines.into_iter().flatten().min()
}

/// Poll timeout until `deadline`, clamped to `cap`.
///
/// With no deadline the cap is used, keeping decorative animation ticking.
/// A deadline already in the past yields a zero timeout.
#[must_use]
pub fn timeout_until(deadline: Option<Instant>, now: Instant, cap: Duration) -> Duration {
    match deadline {
        Some(d) => d.saturating_duration_since(now).min(cap),
        None => cap,
    }
}
