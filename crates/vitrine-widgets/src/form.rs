#![forbid(unsafe_code)]

//! Contact form: three required fields and a submit control.
//!
//! Validation happens entirely client-side before anything reaches the
//! persistence collaborator: every field is trimmed and all three must be
//! non-empty. A failed validation blocks the submission and surfaces one
//! blocking message; the collaborator is never called. The collaborator
//! itself sits behind [`MessageSink`] and answers with a plain success or
//! error message.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::StatefulWidget;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use vitrine_core::event::{KeyCode, KeyEvent};

/// Icon shown in front of the blocking validation message.
pub const ERROR_ICON: &str = "⚠";

// ---------------------------------------------------------------------------
// Field editing
// ---------------------------------------------------------------------------

/// The three form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    /// Sender name.
    Name,
    /// Sender email.
    Email,
    /// Message body.
    Message,
}

impl FieldId {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Message => "Message",
        }
    }
}

/// A single-line editable field with a grapheme-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBuffer {
    value: String,
    cursor: usize,
}

impl FieldBuffer {
    /// Current value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in graphemes.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the trimmed value is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn byte_at(&self, grapheme_idx: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Insert a character at the cursor.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_at(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the grapheme before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.byte_at(self.cursor - 1);
        let end = self.byte_at(self.cursor);
        self.value.replace_range(start..end, "");
        self.cursor -= 1;
    }

    /// Delete the grapheme under the cursor.
    pub fn delete(&mut self) {
        if self.cursor >= self.grapheme_count() {
            return;
        }
        let start = self.byte_at(self.cursor);
        let end = self.byte_at(self.cursor + 1);
        self.value.replace_range(start..end, "");
    }

    /// Move the cursor one grapheme left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor one grapheme right.
    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.grapheme_count());
    }

    /// Move the cursor to the start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor past the last grapheme.
    pub fn move_end(&mut self) {
        self.cursor = self.grapheme_count();
    }
}

// ---------------------------------------------------------------------------
// Validation and delivery
// ---------------------------------------------------------------------------

/// A validated, trimmed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Message body.
    pub message: String,
}

/// Client-side validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    /// At least one required field is empty after trimming.
    #[error("Fill in name, email, and message before sending.")]
    MissingFields,
}

/// The persistence collaborator boundary.
///
/// Implementations accept a validated submission and reply with a plain
/// success message, or a plain error message on failure.
pub trait MessageSink {
    /// Deliver a submission.
    fn deliver(&mut self, message: &ContactMessage) -> Result<String, String>;
}

/// What a submit attempt resulted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Blocked,
    /// The collaborator accepted the submission.
    Delivered(String),
    /// The collaborator reported an error.
    Rejected(String),
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// Where form input is directed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    /// Editing a field.
    Field(FieldId),
    /// The submit control.
    Submit,
}

/// The contact form.
#[derive(Debug, Clone)]
pub struct ContactForm {
    name: FieldBuffer,
    email: FieldBuffer,
    message: FieldBuffer,
    focus: FormFocus,
    error: Option<FormError>,
    reply: Option<Result<String, String>>,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            name: FieldBuffer::default(),
            email: FieldBuffer::default(),
            message: FieldBuffer::default(),
            focus: FormFocus::Field(FieldId::Name),
            error: None,
            reply: None,
        }
    }
}

impl ContactForm {
    /// Create an empty form focused on the name field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Access a field buffer.
    #[must_use]
    pub fn field(&self, id: FieldId) -> &FieldBuffer {
        match id {
            FieldId::Name => &self.name,
            FieldId::Email => &self.email,
            FieldId::Message => &self.message,
        }
    }

    fn field_mut(&mut self, id: FieldId) -> &mut FieldBuffer {
        match id {
            FieldId::Name => &mut self.name,
            FieldId::Email => &mut self.email,
            FieldId::Message => &mut self.message,
        }
    }

    /// Current focus target.
    #[must_use]
    pub fn focus(&self) -> FormFocus {
        self.focus
    }

    /// Advance focus: name → email → message → submit → name.
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormFocus::Field(FieldId::Name) => FormFocus::Field(FieldId::Email),
            FormFocus::Field(FieldId::Email) => FormFocus::Field(FieldId::Message),
            FormFocus::Field(FieldId::Message) => FormFocus::Submit,
            FormFocus::Submit => FormFocus::Field(FieldId::Name),
        };
    }

    /// Move focus backwards.
    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FormFocus::Field(FieldId::Name) => FormFocus::Submit,
            FormFocus::Field(FieldId::Email) => FormFocus::Field(FieldId::Name),
            FormFocus::Field(FieldId::Message) => FormFocus::Field(FieldId::Email),
            FormFocus::Submit => FormFocus::Field(FieldId::Message),
        };
    }

    /// The blocking validation message, if the last submit was blocked.
    #[must_use]
    pub fn error(&self) -> Option<FormError> {
        self.error
    }

    /// The collaborator's last reply, if any.
    #[must_use]
    pub fn reply(&self) -> Option<&Result<String, String>> {
        self.reply.as_ref()
    }

    /// Route a key into the form. Returns `true` when consumed.
    ///
    /// Enter is not handled here: the caller decides whether Enter on the
    /// submit control triggers [`submit`](ContactForm::submit).
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !key.is_press() {
            return false;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                true
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                true
            }
            _ => {
                let FormFocus::Field(id) = self.focus else {
                    return false;
                };
                let consumed = match key.code {
                    KeyCode::Char(c) => {
                        self.field_mut(id).insert(c);
                        true
                    }
                    KeyCode::Backspace => {
                        self.field_mut(id).backspace();
                        true
                    }
                    KeyCode::Delete => {
                        self.field_mut(id).delete();
                        true
                    }
                    KeyCode::Left => {
                        self.field_mut(id).move_left();
                        true
                    }
                    KeyCode::Right => {
                        self.field_mut(id).move_right();
                        true
                    }
                    KeyCode::Home => {
                        self.field_mut(id).move_home();
                        true
                    }
                    KeyCode::End => {
                        self.field_mut(id).move_end();
                        true
                    }
                    _ => false,
                };
                if consumed {
                    // Edits invalidate the previous outcome display.
                    self.error = None;
                    self.reply = None;
                }
                consumed
            }
        }
    }

    /// Validate the trimmed field values.
    pub fn validate(&self) -> Result<ContactMessage, FormError> {
        let name = self.name.value().trim();
        let email = self.email.value().trim();
        let message = self.message.value().trim();
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(FormError::MissingFields);
        }
        Ok(ContactMessage {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }

    /// Attempt a submission.
    ///
    /// Blocked submissions never reach the sink. Delivery replies are kept
    /// for display until the next edit.
    pub fn submit(&mut self, sink: &mut dyn MessageSink) -> SubmitOutcome {
        match self.validate() {
            Err(err) => {
                self.error = Some(err);
                SubmitOutcome::Blocked
            }
            Ok(message) => {
                self.error = None;
                match sink.deliver(&message) {
                    Ok(reply) => {
                        self.reply = Some(Ok(reply.clone()));
                        SubmitOutcome::Delivered(reply)
                    }
                    Err(reply) => {
                        self.reply = Some(Err(reply.clone()));
                        SubmitOutcome::Rejected(reply)
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// The contact form view.
#[derive(Debug, Clone)]
pub struct ContactFormView {
    label_style: Style,
    value_style: Style,
    cursor_style: Style,
    submit_style: Style,
    focused_style: Style,
    error_style: Style,
    notice_style: Style,
}

impl Default for ContactFormView {
    fn default() -> Self {
        Self {
            label_style: Style::new().fg(Color::DarkGray),
            value_style: Style::new(),
            cursor_style: Style::new().add_modifier(Modifier::REVERSED),
            submit_style: Style::new().fg(Color::Cyan),
            focused_style: Style::new().add_modifier(Modifier::REVERSED),
            error_style: Style::new().fg(Color::Red),
            notice_style: Style::new().fg(Color::Green),
        }
    }
}

impl ContactFormView {
    /// Create a view with default styling.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style of the blocking validation message.
    #[must_use]
    pub fn error_style(mut self, style: Style) -> Self {
        self.error_style = style;
        self
    }

    const LABEL_WIDTH: u16 = 9;

    fn render_field(
        &self,
        buf: &mut Buffer,
        area: Rect,
        y: u16,
        id: FieldId,
        form: &ContactForm,
    ) {
        let focused = form.focus() == FormFocus::Field(id);
        let label = format!("{:<width$}", id.label(), width = Self::LABEL_WIDTH as usize - 2);
        buf.set_stringn(
            area.x,
            y,
            &label,
            area.width as usize,
            self.label_style,
        );

        let field = form.field(id);
        let value_x = area.x + Self::LABEL_WIDTH;
        let avail = area.width.saturating_sub(Self::LABEL_WIDTH) as usize;
        if avail == 0 {
            return;
        }
        buf.set_stringn(value_x, y, field.value(), avail, self.value_style);

        if focused {
            // Cursor cell, clamped to the visible span.
            let cursor_col: usize = field
                .value()
                .graphemes(true)
                .take(field.cursor())
                .map(UnicodeWidthStr::width)
                .sum();
            let cx = value_x + (cursor_col.min(avail.saturating_sub(1))) as u16;
            buf.set_style(Rect::new(cx, y, 1, 1), self.cursor_style);
        }
    }
}

impl StatefulWidget for ContactFormView {
    type State = ContactForm;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width < Self::LABEL_WIDTH + 2 || area.height < 6 {
            return;
        }

        self.render_field(buf, area, area.y, FieldId::Name, state);
        self.render_field(buf, area, area.y + 1, FieldId::Email, state);
        self.render_field(buf, area, area.y + 2, FieldId::Message, state);

        let submit_style = if state.focus() == FormFocus::Submit {
            self.focused_style
        } else {
            self.submit_style
        };
        buf.set_stringn(
            area.x,
            area.y + 4,
            "[ Send message ]",
            area.width as usize,
            submit_style,
        );

        let status_y = area.y + 5;
        if let Some(err) = state.error() {
            let line = format!("{ERROR_ICON} {err}");
            buf.set_stringn(area.x, status_y, &line, area.width as usize, self.error_style);
        } else if let Some(reply) = state.reply() {
            let (text, style) = match reply {
                Ok(msg) => (msg.as_str(), self.notice_style),
                Err(msg) => (msg.as_str(), self.error_style),
            };
            buf.set_stringn(area.x, status_y, text, area.width as usize, style);
        }
    }
}
