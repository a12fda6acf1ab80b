//! A single timed typing session.
//!
//! The session owns the target words, the typed log, the countdown and the
//! per-second WPM series. Presentation code drives it through
//! [`Session::handle_key`] and [`Session::poll_timer`] and pulls derived
//! stats with [`Session::snapshot`]; nothing is cached between calls.

use std::time::Instant;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::keymap::{FlashKey, KeyFlash, KeyboardObserver};
use crate::language::Language;
use crate::runtime::Countdown;
use crate::scoring::{compute_stats, ScoringSnapshot};
use crate::time_series::WpmTimeSeries;
use crate::typing_policy;
use crate::word_generator::{WordGenConfig, WordGenerator, DISPLAY_WINDOW};

/// Selectable test lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
pub enum TestDuration {
    #[default]
    #[value(name = "15")]
    #[serde(rename = "15")]
    Fifteen,
    #[value(name = "30")]
    #[serde(rename = "30")]
    Thirty,
    #[value(name = "60")]
    #[serde(rename = "60")]
    Sixty,
}

impl TestDuration {
    pub const ALL: [TestDuration; 3] = [
        TestDuration::Fifteen,
        TestDuration::Thirty,
        TestDuration::Sixty,
    ];

    pub fn secs(&self) -> u64 {
        match self {
            TestDuration::Fifteen => 15,
            TestDuration::Thirty => 30,
            TestDuration::Sixty => 60,
        }
    }

    pub fn next(self) -> Self {
        match self {
            TestDuration::Fifteen => TestDuration::Thirty,
            TestDuration::Thirty => TestDuration::Sixty,
            TestDuration::Sixty => TestDuration::Fifteen,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            TestDuration::Fifteen => TestDuration::Sixty,
            TestDuration::Thirty => TestDuration::Fifteen,
            TestDuration::Sixty => TestDuration::Thirty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    pub duration: TestDuration,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// Keystrokes the session understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Space,
    Backspace,
    /// Abandon the current run and start over. Accepted in every phase.
    Restart,
    /// Open the reveal gate without typing (e.g. a click on the text).
    Reveal,
}

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    words: Vec<String>,
    typed: Vec<String>,
    word_index: usize,
    phase: Phase,
    revealed: bool,
    seconds_remaining: u64,
    countdown: Countdown,
    series: WpmTimeSeries,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let words = WordGenerator::new(WordGenConfig::new(config.language)).generate();
        Self::with_words(config, words)
    }

    /// Session over a fixed word list. Restarting still generates fresh words.
    pub fn with_words(config: SessionConfig, words: Vec<String>) -> Self {
        Self {
            config,
            words,
            typed: vec![String::new()],
            word_index: 0,
            phase: Phase::Idle,
            revealed: false,
            seconds_remaining: config.duration.secs(),
            countdown: Countdown::per_second(),
            series: WpmTimeSeries::new(),
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Words that fit on screen.
    pub fn visible_words(&self) -> &[String] {
        &self.words[..self.words.len().min(DISPLAY_WINDOW)]
    }

    pub fn typed(&self) -> &[String] {
        &self.typed
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    pub fn series(&self) -> &WpmTimeSeries {
        &self.series
    }

    /// Seconds the stats are normalised by right now.
    pub fn elapsed_secs(&self) -> u64 {
        let duration = self.config.duration.secs();
        match self.phase {
            Phase::Idle => 1,
            Phase::Running => duration.saturating_sub(self.seconds_remaining).max(1),
            Phase::Finished => duration,
        }
    }

    /// Share of the run already elapsed, 0.0 before start and 1.0 when done.
    pub fn progress(&self) -> f64 {
        let duration = self.config.duration.secs();
        let elapsed = match self.phase {
            Phase::Idle => 0,
            Phase::Running => duration.saturating_sub(self.seconds_remaining),
            Phase::Finished => duration,
        };
        (elapsed as f64 / duration as f64).clamp(0.0, 1.0)
    }

    /// Live stats for the current state.
    pub fn snapshot(&self) -> ScoringSnapshot {
        compute_stats(
            &self.words,
            &self.typed,
            self.elapsed_secs(),
            self.is_finished(),
        )
    }

    /// Stats as if the run ended now, used for the results screen.
    pub fn final_snapshot(&self) -> ScoringSnapshot {
        compute_stats(&self.words, &self.typed, self.elapsed_secs(), true)
    }

    pub fn next_expected(&self) -> char {
        typing_policy::next_expected(&self.words, &self.typed, self.word_index)
    }

    /// Apply one keystroke received at `now`.
    pub fn handle_key<O: KeyboardObserver + ?Sized>(
        &mut self,
        key: KeyInput,
        now: Instant,
        observer: &mut O,
    ) {
        tracing::trace!(target: "session", ?key, phase = ?self.phase, word = self.word_index, "key");

        if key == KeyInput::Restart {
            self.restart();
            observer.next_expected(self.next_expected());
            return;
        }
        if self.phase == Phase::Finished {
            return;
        }
        if !self.revealed {
            if matches!(key, KeyInput::Space | KeyInput::Reveal) {
                self.revealed = true;
                observer.next_expected(self.next_expected());
            }
            return;
        }

        match key {
            KeyInput::Char(c) => {
                self.start(now);
                let ok = typing_policy::expected_char(&self.words, &self.typed, self.word_index)
                    .is_some_and(|expected| expected == c);
                typing_policy::push_char(&mut self.typed, self.word_index, c);
                observer.flash(
                    KeyFlash {
                        key: FlashKey::Char(c),
                        ok,
                    },
                    now,
                );
            }
            KeyInput::Backspace => {
                self.start(now);
                typing_policy::pop_char(&mut self.typed, self.word_index);
                observer.flash(
                    KeyFlash {
                        key: FlashKey::Backspace,
                        ok: true,
                    },
                    now,
                );
            }
            KeyInput::Space => {
                if self.phase != Phase::Running {
                    return;
                }
                self.word_index = typing_policy::seal_word(&mut self.typed, self.word_index);
                observer.flash(
                    KeyFlash {
                        key: FlashKey::Space,
                        ok: true,
                    },
                    now,
                );
            }
            KeyInput::Reveal | KeyInput::Restart => {}
        }

        observer.next_expected(self.next_expected());
    }

    /// Run every whole-second tick the countdown owes at `now`.
    pub fn poll_timer(&mut self, now: Instant) {
        let due = self.countdown.poll(now);
        for _ in 0..due {
            if self.phase != Phase::Running {
                break;
            }
            self.tick_second();
        }
    }

    /// Advance the countdown by one second and sample the WPM series.
    pub fn tick_second(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        if self.seconds_remaining <= 1 {
            self.seconds_remaining = 0;
            self.finish();
            return;
        }

        self.seconds_remaining -= 1;
        let elapsed = self.config.duration.secs() - self.seconds_remaining;
        let wpm = compute_stats(&self.words, &self.typed, elapsed, false).wpm;
        self.series.record(elapsed, wpm);
        tracing::trace!(target: "session", elapsed, wpm, "sampled");
    }

    /// Change the test length. Only allowed before the run starts.
    pub fn set_duration(&mut self, duration: TestDuration) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.config.duration = duration;
        self.seconds_remaining = duration.secs();
        true
    }

    /// Switch corpus. Only allowed before the run starts; regenerates the
    /// target words when the language actually changes.
    pub fn set_language(&mut self, language: Language) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        if self.config.language != language {
            self.config.language = language;
            self.words = WordGenerator::new(WordGenConfig::new(language)).generate();
            self.typed = vec![String::new()];
            self.word_index = 0;
        }
        true
    }

    /// Back to idle with fresh words, an empty log and a new countdown.
    pub fn restart(&mut self) {
        tracing::debug!(target: "session", phase = ?self.phase, "restart");
        self.countdown.stop();
        *self = Self::new(self.config);
    }

    fn start(&mut self, now: Instant) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::Running;
        self.countdown.start(now);
        tracing::debug!(
            target: "session",
            duration = self.config.duration.secs(),
            language = %self.config.language,
            "started"
        );
    }

    fn finish(&mut self) {
        self.phase = Phase::Finished;
        self.countdown.stop();

        let duration = self.config.duration.secs();
        let final_stats = compute_stats(&self.words, &self.typed, duration, true);
        self.series.record(duration, final_stats.wpm);
        tracing::debug!(
            target: "session",
            wpm = final_stats.wpm,
            raw_wpm = final_stats.raw_wpm,
            accuracy = final_stats.accuracy,
            "finished"
        );
    }
}
