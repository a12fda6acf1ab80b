//! Application state shared by the binary and the headless tests.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::{Config, ConfigStore};
use crate::keymap::KeymapState;
use crate::runtime::AppEvent;
use crate::session::{KeyInput, Session};
use crate::theme::Theme;

/// What the event loop should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub session: Session,
    pub keymap: KeymapState,
    pub config: Config,
    pub config_store: Box<dyn ConfigStore>,
}

impl App {
    pub fn new(config: Config, config_store: Box<dyn ConfigStore>) -> Self {
        let session = Session::new(config.session_config());
        Self::with_session(session, config, config_store)
    }

    pub fn with_session(session: Session, config: Config, config_store: Box<dyn ConfigStore>) -> Self {
        Self {
            session,
            keymap: KeymapState::new(),
            config,
            config_store,
        }
    }

    pub fn theme(&self) -> Theme {
        self.config.theme
    }

    /// Dispatch one runner event observed at `now`.
    pub fn handle_event(&mut self, event: AppEvent, now: Instant) -> Flow {
        match event {
            AppEvent::Tick => {
                self.on_tick(now);
                Flow::Continue
            }
            AppEvent::Resize => Flow::Continue,
            AppEvent::Key(key) => self.on_key(key, now),
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        let was_running = self.session.is_running();
        self.session.poll_timer(now);
        self.keymap.expire(now);
        if was_running && self.session.is_finished() {
            let stats = self.session.final_snapshot();
            tracing::info!(
                target: "app",
                wpm = stats.wpm,
                accuracy = stats.accuracy,
                duration = self.session.config().duration.secs(),
                "session_complete"
            );
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if ctrl => return Flow::Quit,
            KeyCode::Char('t') if ctrl => {
                self.config.theme = self.config.theme.next();
                self.persist();
            }
            KeyCode::Tab => {
                self.keymap.reset();
                self.session
                    .handle_key(KeyInput::Restart, now, &mut self.keymap);
            }
            KeyCode::Left | KeyCode::Right => {
                let duration = self.config.duration;
                let next = if key.code == KeyCode::Left {
                    duration.prev()
                } else {
                    duration.next()
                };
                if self.session.set_duration(next) {
                    self.config.duration = next;
                    self.persist();
                }
            }
            KeyCode::Up | KeyCode::Down => {
                let language = self.config.language;
                let next = if key.code == KeyCode::Up {
                    language.prev()
                } else {
                    language.next()
                };
                if self.session.set_language(next) {
                    self.config.language = next;
                    self.persist();
                }
            }
            KeyCode::Backspace => {
                self.session
                    .handle_key(KeyInput::Backspace, now, &mut self.keymap);
            }
            KeyCode::Char(' ') => {
                self.session.handle_key(KeyInput::Space, now, &mut self.keymap);
            }
            KeyCode::Char(c) if !ctrl => {
                self.session
                    .handle_key(KeyInput::Char(c), now, &mut self.keymap);
            }
            _ => {}
        }

        Flow::Continue
    }

    fn persist(&self) {
        if let Err(err) = self.config_store.save(&self.config) {
            tracing::warn!(target: "config", %err, "config_save_failed");
        }
    }
}
