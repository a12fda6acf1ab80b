//! Signals for the on-screen keyboard.
//!
//! The session reports two things after keystrokes: which key is expected
//! next, and a short-lived flash telling whether the last key was right.
//! [`KeymapState`] is the observer the terminal UI renders from.

use std::time::{Duration, Instant};

/// How long a flashed key stays lit.
pub const FLASH_DURATION: Duration = Duration::from_millis(250);

pub const KEY_ROWS: [&str; 4] = ["1234567890-=", "qwertyuiop[]", "asdfghjkl;'", "zxcvbnm,./"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKey {
    Char(char),
    Space,
    Backspace,
}

impl FlashKey {
    /// Whether this flash lights up the on-screen key `key`.
    pub fn lights(&self, key: char) -> bool {
        match self {
            FlashKey::Char(c) => c.to_lowercase().eq(std::iter::once(key)),
            FlashKey::Space => key == ' ',
            FlashKey::Backspace => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyFlash {
    pub key: FlashKey,
    pub ok: bool,
}

/// Receives keyboard signals from a session.
pub trait KeyboardObserver {
    /// The character the user should type next (space between words).
    fn next_expected(&mut self, key: char);
    /// Outcome of a keystroke that was just applied.
    fn flash(&mut self, flash: KeyFlash, at: Instant);
}

/// Observer that drops every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl KeyboardObserver for NoopObserver {
    fn next_expected(&mut self, _key: char) {}
    fn flash(&mut self, _flash: KeyFlash, _at: Instant) {}
}

#[derive(Debug, Clone, Default)]
pub struct KeymapState {
    highlighted: Option<char>,
    flash: Option<(KeyFlash, Instant)>,
}

impl KeymapState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlighted(&self) -> Option<char> {
        self.highlighted
    }

    /// The last flash if it has not expired at `now`.
    pub fn active_flash(&self, now: Instant) -> Option<KeyFlash> {
        self.flash
            .filter(|(_, at)| now.saturating_duration_since(*at) < FLASH_DURATION)
            .map(|(flash, _)| flash)
    }

    /// Drop an expired flash. Returns true if something changed.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.flash.is_some() && self.active_flash(now).is_none() {
            self.flash = None;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl KeyboardObserver for KeymapState {
    fn next_expected(&mut self, key: char) {
        self.highlighted = Some(key);
    }

    fn flash(&mut self, flash: KeyFlash, at: Instant) {
        self.flash = Some((flash, at));
    }
}
