//! Main Application
//!
//! The App owns the [`Session`] and drives it from two sources:
//! - terminal events (keys, resizes) from the crossterm `EventStream`
//! - a single optional tick deadline, armed while anything animates or
//!   counts down and dropped as soon as the scheduler goes quiet
//!
//! A frame is drawn after every event and every tick. With nothing pending
//! the loop sleeps on the event stream alone.

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::Backend;
use ratatui::{Frame, Terminal};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use ticklist_core::{KeyInput, Moment, Session, TickReport};

use crate::{input, view};

/// Main application state
pub struct App {
    /// The interactive task list
    session: Session,
    /// When the next tick fires, if one is armed
    next_tick: Option<Instant>,
    /// Is the app still running?
    running: bool,
    /// Noise source for deletion frames
    rng: StdRng,
}

impl App {
    /// Wrap a session; a tick is armed right away if the loaded tasks need one
    #[must_use]
    pub fn new(session: Session) -> Self {
        let mut app = Self {
            session,
            next_tick: None,
            running: true,
            rng: StdRng::from_entropy(),
        };
        if app.session.needs_tick() {
            app.arm_tick();
        }
        app
    }

    /// The wrapped session
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether the loop is still running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a tick is armed
    #[must_use]
    pub fn tick_armed(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut events = EventStream::new();
        info!(tasks = self.session.store().len(), "Entering event loop");

        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(&event),
                    Some(Err(e)) => warn!(error = %e, "Terminal event error"),
                    None => {
                        info!("Terminal event stream closed");
                        self.running = false;
                    }
                },

                () = wait_for(self.next_tick) => {
                    self.on_tick();
                }
            }

            if self.running {
                self.render(terminal)?;
            }
        }

        info!("Event loop finished");
        Ok(())
    }

    /// Handle a terminal event
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) => {
                if let Some(key) = input::translate(*key) {
                    self.handle_key(key);
                }
            }
            Event::Resize(width, height) => debug!(width, height, "Terminal resized"),
            _ => {}
        }
    }

    /// Feed a key to the session
    pub fn handle_key(&mut self, key: KeyInput) {
        let reaction = self.session.handle_key(key, Moment::now());
        if reaction.quit {
            self.running = false;
        } else if reaction.wants_tick && self.next_tick.is_none() {
            self.arm_tick();
        }
    }

    /// Advance animations and deadlines; re-arms only while work remains
    pub fn on_tick(&mut self) -> TickReport {
        self.on_tick_at(Moment::now())
    }

    /// [`App::on_tick`] at an explicit time
    pub fn on_tick_at(&mut self, now: Moment) -> TickReport {
        self.next_tick = None;
        let report = self.session.tick(now);
        if report.more_ticks {
            self.arm_tick();
        } else {
            debug!("Scheduler idle");
        }
        report
    }

    fn arm_tick(&mut self) {
        self.next_tick = Some(Instant::now() + self.session.timings().frame_interval);
    }

    /// Draw the current state into a frame
    pub fn draw(&mut self, frame: &mut Frame) {
        view::draw(frame, &self.session, Moment::now(), &mut self.rng);
    }

    fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }
}

/// Resolves at the deadline, or never
async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
