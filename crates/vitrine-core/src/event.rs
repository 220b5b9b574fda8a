#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! The standard event types consumed by the vitrine runtime. All events
//! derive `Clone`, `PartialEq`, and `Eq` for use in tests and pattern
//! matching.
//!
//! # Design Notes
//!
//! - Mouse coordinates are 0-indexed (terminal is 1-indexed internally)
//! - `KeyEventKind` defaults to `Press` when the terminal cannot distinguish
//! - `Modifiers` use bitflags for easy combination

use bitflags::bitflags;
#[cfg(not(target_arch = "wasm32"))]
use crossterm::event as cte;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A mouse event.
    Mouse(MouseEvent),

    /// Terminal was resized.
    Resize {
        /// New terminal width in columns.
        width: u16,
        /// New terminal height in rows.
        height: u16,
    },

    /// Terminal focus gained or lost.
    ///
    /// `true` = focus gained, `false` = focus lost.
    Focus(bool),

    /// A tick event from the runtime.
    ///
    /// Fired when a scheduled deadline or frame interval elapses. Drives
    /// debounce expiry, deferred navigation, and decorative animation.
    Tick,
}

impl Event {
    /// Convert a Crossterm event into a vitrine [`Event`].
    ///
    /// Returns `None` for event kinds vitrine does not consume.
    #[must_use]
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        match event {
            cte::Event::Key(key) => map_key(key).map(Event::Key),
            cte::Event::Mouse(mouse) => map_mouse(mouse).map(Event::Mouse),
            cte::Event::Resize(width, height) => Some(Event::Resize { width, height }),
            cte::Event::FocusGained => Some(Event::Focus(true)),
            cte::Event::FocusLost => Some(Event::Focus(false)),
            cte::Event::Paste(_) => None,
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Whether the event is a press or repeat (not a release).
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Backspace key.
    Backspace,

    /// Tab key.
    Tab,

    /// Shift+Tab (back-tab).
    BackTab,

    /// Delete key.
    Delete,

    /// Home key.
    Home,

    /// End key.
    End,

    /// Page Up key.
    PageUp,

    /// Page Down key.
    PageDown,

    /// Up arrow key.
    Up,

    /// Down arrow key.
    Down,

    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// The type of mouse event.
    pub kind: MouseEventKind,

    /// X coordinate (0-indexed, leftmost column is 0).
    pub x: u16,

    /// Y coordinate (0-indexed, topmost row is 0).
    pub y: u16,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Create a new mouse event with no modifiers.
    #[must_use]
    pub const fn new(kind: MouseEventKind, x: u16, y: u16) -> Self {
        Self {
            kind,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }
}

/// The type of mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// Mouse button pressed.
    Down(MouseButton),

    /// Mouse button released.
    Up(MouseButton),

    /// Mouse moved (includes drags).
    Moved,

    /// Scroll wheel up.
    ScrollUp,

    /// Scroll wheel down.
    ScrollDown,
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button.
    Left,
    /// Right button.
    Right,
    /// Middle button.
    Middle,
}

// ---------------------------------------------------------------------------
// Crossterm mapping
// ---------------------------------------------------------------------------

#[cfg(not(target_arch = "wasm32"))]
fn map_key(key: cte::KeyEvent) -> Option<KeyEvent> {
    let code = match key.code {
        cte::KeyCode::Char(c) => KeyCode::Char(c),
        cte::KeyCode::Enter => KeyCode::Enter,
        cte::KeyCode::Esc => KeyCode::Escape,
        cte::KeyCode::Backspace => KeyCode::Backspace,
        cte::KeyCode::Tab => KeyCode::Tab,
        cte::KeyCode::BackTab => KeyCode::BackTab,
        cte::KeyCode::Delete => KeyCode::Delete,
        cte::KeyCode::Home => KeyCode::Home,
        cte::KeyCode::End => KeyCode::End,
        cte::KeyCode::PageUp => KeyCode::PageUp,
        cte::KeyCode::PageDown => KeyCode::PageDown,
        cte::KeyCode::Up => KeyCode::Up,
        cte::KeyCode::Down => KeyCode::Down,
        cte::KeyCode::Left => KeyCode::Left,
        cte::KeyCode::Right => KeyCode::Right,
        _ => return None,
    };
    let kind = match key.kind {
        cte::KeyEventKind::Press => KeyEventKind::Press,
        cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
        cte::KeyEventKind::Release => KeyEventKind::Release,
    };
    Some(KeyEvent {
        code,
        modifiers: map_modifiers(key.modifiers),
        kind,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn map_modifiers(m: cte::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(cte::KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if m.contains(cte::KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if m.contains(cte::KeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    out
}

#[cfg(not(target_arch = "wasm32"))]
fn map_mouse(mouse: cte::MouseEvent) -> Option<MouseEvent> {
    let kind = match mouse.kind {
        cte::MouseEventKind::Down(b) => MouseEventKind::Down(map_button(b)?),
        cte::MouseEventKind::Up(b) => MouseEventKind::Up(map_button(b)?),
        cte::MouseEventKind::Moved | cte::MouseEventKind::Drag(_) => MouseEventKind::Moved,
        cte::MouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        cte::MouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        cte::MouseEventKind::ScrollLeft | cte::MouseEventKind::ScrollRight => return None,
    };
    Some(MouseEvent {
        kind,
        x: mouse.column,
        y: mouse.row,
        modifiers: map_modifiers(mouse.modifiers),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn map_button(b: cte::MouseButton) -> Option<MouseButton> {
    match b {
        cte::MouseButton::Left => Some(MouseButton::Left),
        cte::MouseButton::Right => Some(MouseButton::Right),
        cte::MouseButton::Middle => Some(MouseButton::Middle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_helpers() {
        let ev = KeyEvent::new(KeyCode::Char('q')).with_modifiers(Modifiers::CTRL);
        assert!(ev.is_char('q'));
        assert!(!ev.is_char('x'));
        assert!(ev.ctrl());
        assert!(ev.is_press());
    }

    #[test]
    fn release_is_not_press() {
        let ev = KeyEvent {
            code: KeyCode::Enter,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Release,
        };
        assert!(!ev.is_press());
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod crossterm_mapping {
        use super::super::*;

        #[test]
        fn maps_escape_key() {
            let ct = cte::Event::Key(cte::KeyEvent::new(
                cte::KeyCode::Esc,
                cte::KeyModifiers::NONE,
            ));
            assert_eq!(
                Event::from_crossterm(ct),
                Some(Event::Key(KeyEvent::new(KeyCode::Escape)))
            );
        }

        #[test]
        fn maps_resize() {
            let ct = cte::Event::Resize(80, 24);
            assert_eq!(
                Event::from_crossterm(ct),
                Some(Event::Resize {
                    width: 80,
                    height: 24
                })
            );
        }

        #[test]
        fn maps_focus_events() {
            assert_eq!(
                Event::from_crossterm(cte::Event::FocusGained),
                Some(Event::Focus(true))
            );
            assert_eq!(
                Event::from_crossterm(cte::Event::FocusLost),
                Some(Event::Focus(false))
            );
        }

        #[test]
        fn drag_collapses_to_moved() {
            let ct = cte::Event::Mouse(cte::MouseEvent {
                kind: cte::MouseEventKind::Drag(cte::MouseButton::Left),
                column: 4,
                row: 7,
                modifiers: cte::KeyModifiers::NONE,
            });
            assert_eq!(
                Event::from_crossterm(ct),
                Some(Event::Mouse(MouseEvent::new(MouseEventKind::Moved, 4, 7)))
            );
        }

        #[test]
        fn unmapped_keys_are_dropped() {
            let ct = cte::Event::Key(cte::KeyEvent::new(
                cte::KeyCode::F(5),
                cte::KeyModifiers::NONE,
            ));
            assert_eq!(Event::from_crossterm(ct), None);
        }
    }
}
