//! The real-time driver: waits for the next timer or key press, whichever
//! comes first, and feeds both to the session.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::Event;
use rand::Rng;
use tracing::{debug, info};

use crate::audio::AudioSink;
use crate::input::{is_quit, Command};
use crate::session::Session;
use crate::store::ScoreStore;
use crate::term::TermCanvas;

/// How long to block on input when no timer is armed.
const IDLE_POLL: Duration = Duration::from_millis(250);

pub struct SnakeGame<A, S, R> {
    session: Session<TermCanvas, A, S, R>,
    clock: Instant,
    last_status: String,
}

impl<A: AudioSink, S: ScoreStore, R: Rng> SnakeGame<A, S, R> {
    pub fn new(session: Session<TermCanvas, A, S, R>) -> Self {
        SnakeGame { session, clock: Instant::now(), last_status: String::new() }
    }

    pub fn initialize(&mut self) -> Result<()> {
        let canvas = self.session.canvas_mut();
        canvas.setup()?;
        canvas.draw_frame()
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.session.canvas_mut().restore()
    }

    /// Shows the controls and waits for a key. Returns false on quit.
    pub fn show_intro(&mut self) -> Result<bool> {
        self.session.show_board()?;
        self.session.canvas_mut().show_message(&[
            "Arrow keys or WASD to move",
            "Enter to start, R to reset",
            "Q, Esc or CTRL+C to quit",
            "",
            "Press any key",
        ])?;
        self.update_status()?;

        loop {
            if let Some(Event::Key(ev)) = self.session.canvas().poll_event(IDLE_POLL)? {
                if is_quit(ev) {
                    return Ok(false);
                }
                break;
            }
        }

        self.session.show_board()?;
        Ok(true)
    }

    /// Runs until the player quits.
    pub fn play(&mut self) -> Result<()> {
        loop {
            self.session.advance(self.now())?;
            self.update_status()?;

            let wait = match self.session.next_deadline() {
                Some(deadline) => deadline.saturating_sub(self.now()),
                None => IDLE_POLL,
            };

            match self.session.canvas().poll_event(wait)? {
                Some(Event::Key(ev)) => match Command::from_key_event(ev) {
                    Some(Command::Quit) => {
                        info!(score = self.session.score(), "quitting");
                        return Ok(());
                    }
                    Some(command) => self.dispatch(command)?,
                    None => {}
                },
                Some(Event::Resize(w, h)) => {
                    debug!(w, h, "terminal resized");
                    self.session.canvas_mut().invalidate()?;
                    self.last_status.clear();
                }
                _ => {}
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn dispatch(&mut self, command: Command) -> Result<()> {
        let now = self.now();
        match command {
            Command::Turn(dir) => {
                if !self.session.turn(dir) {
                    debug!(?dir, "direction change ignored");
                }
            }
            Command::Start => {
                self.session.start(now)?;
            }
            Command::Reset => self.session.reset(now)?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn update_status(&mut self) -> Result<()> {
        let start = if self.session.start_enabled() { "[Enter] start" } else { "" };
        let status = format!(
            "Score: {}  Best: {}  {}",
            self.session.score(),
            self.session.best_score(),
            start
        );

        if status != self.last_status {
            self.session.canvas_mut().status(&status)?;
            self.last_status = status;
        }
        Ok(())
    }

    fn now(&self) -> Duration {
        self.clock.elapsed()
    }
}
