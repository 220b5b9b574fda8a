#![forbid(unsafe_code)]

//! The event loop.
//!
//! Single-threaded and cooperative: one loop polls the terminal for input,
//! clamping the poll timeout to the application's nearest deadline so
//! debounce and commit timers fire on time, and synthesizes [`Event::Tick`]
//! when the poll times out. Events reach the application strictly in the
//! order the terminal delivers them.

use std::io;
use std::time::{Duration, Instant};

use vitrine_core::event::Event;

use crate::schedule;
use crate::terminal::TerminalSession;

/// Upper bound on the poll timeout, keeping decorative animation ticking
/// even with no deadline pending (~30 fps).
pub const FRAME_INTERVAL_MS: u64 = 33;

/// Loop control returned from updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep running.
    Continue,
    /// Leave the loop.
    Quit,
}

/// An application driven by the loop.
pub trait App {
    /// Process one event. `now` is sampled once per delivery.
    fn update(&mut self, event: Event, now: Instant) -> Control;

    /// Render the current state.
    fn view(&mut self, frame: &mut ratatui::Frame<'_>);

    /// The nearest pending deadline, used to clamp the poll timeout.
    fn next_deadline(&self) -> Option<Instant> {
        None
    }

    /// Cancel pending work. Called once after the loop ends, before the
    /// terminal is restored.
    fn teardown(&mut self) {}
}

/// Run `app` until it quits, owning the terminal for the duration.
pub fn run<A: App>(app: &mut A) -> io::Result<()> {
    let mut session = TerminalSession::new()?;
    let result = run_loop(app, &mut session);
    app.teardown();
    result
}

fn run_loop<A: App>(app: &mut A, session: &mut TerminalSession) -> io::Result<()> {
    loop {
        session.terminal_mut().draw(|frame| app.view(frame))?;

        let now = Instant::now();
        let timeout = schedule::timeout_until(
            app.next_deadline(),
            now,
            Duration::from_millis(FRAME_INTERVAL_MS),
        );

        let control = if crossterm::event::poll(timeout)? {
            match Event::from_crossterm(crossterm::event::read()?) {
                Some(event) => app.update(event, Instant::now()),
                None => Control::Continue,
            }
        } else {
            app.update(Event::Tick, Instant::now())
        };

        if control == Control::Quit {
            return Ok(());
        }
    }
}
