#![forbid(unsafe_code)]

//! Presentation widgets for Vitrine.

pub mod form;
pub mod gallery;
pub mod panel;
pub mod typewriter;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Truncate `s` to at most `max_width` display cells, appending a single-cell
/// ellipsis when anything was cut.
pub(crate) fn ellipsize(s: &str, max_width: usize) -> std::borrow::Cow<'_, str> {
    let total = UnicodeWidthStr::width(s);
    if total <= max_width {
        return std::borrow::Cow::Borrowed(s);
    }
    if max_width == 0 {
        return std::borrow::Cow::Borrowed("");
    }
    if max_width == 1 {
        return std::borrow::Cow::Borrowed("…");
    }

    let mut out = String::new();
    let mut used = 0usize;
    let target = max_width - 1;

    for g in s.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        if w == 0 {
            continue;
        }
        if used + w > target {
            break;
        }
        out.push_str(g);
        used += w;
    }

    out.push('…');
    std::borrow::Cow::Owned(out)
}

/// Convert a ratatui area into the core hit-test rectangle.
pub(crate) fn core_rect(area: ratatui::layout::Rect) -> vitrine_core::geometry::Rect {
    vitrine_core::geometry::Rect::new(area.x, area.y, area.width, area.height)
}
