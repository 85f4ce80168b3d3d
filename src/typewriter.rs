//! Typewriter engine: types a phrase, pauses, deletes it, moves to the next.
//!
//! The engine is a pure state machine. It never sleeps or spawns; callers
//! (see [`crate::actors::TypewriterActor`]) schedule the delay each transition
//! returns and call [`Typewriter::tick`] when it elapses, or feed wall-clock
//! time to [`Typewriter::advance`].
//!
//! Cadence for a word of `n` characters:
//! - `n` typing ticks, `type_speed` apart
//! - one pause of `pause` that flips the phase to deleting
//! - `n` deleting ticks, `type_speed / 2` apart; the last one moves to the
//!   next word (wrapping) and back to typing

use std::time::Duration;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, Result};

pub const DEFAULT_TYPE_SPEED_MS: u64 = 80;
pub const DEFAULT_PAUSE_MS: u64 = 2000;

fn default_type_speed_ms() -> u64 {
    DEFAULT_TYPE_SPEED_MS
}

fn default_pause_ms() -> u64 {
    DEFAULT_PAUSE_MS
}

fn default_words() -> Vec<String> {
    ["Computer Vision", "NLP", "Deep Learning", "MLOps"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypewriterConfig {
    #[serde(default = "default_words")]
    pub words: Vec<String>,
    #[serde(default = "default_type_speed_ms")]
    pub type_speed_ms: u64,
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            words: default_words(),
            type_speed_ms: DEFAULT_TYPE_SPEED_MS,
            pause_ms: DEFAULT_PAUSE_MS,
        }
    }
}

impl TypewriterConfig {
    pub fn new<I, S>(words: I, type_speed_ms: u64, pause_ms: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            type_speed_ms,
            pause_ms,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.words.is_empty() {
            return Err(Error::InvalidConfiguration(
                "typewriter.words must not be empty".to_string(),
            ));
        }
        if self.type_speed_ms == 0 {
            return Err(Error::InvalidConfiguration(
                "typewriter.type_speed_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn type_delay(&self) -> Duration {
        Duration::from_millis(self.type_speed_ms)
    }

    /// Deleting runs at twice the typing speed.
    pub fn delete_delay(&self) -> Duration {
        self.type_delay() / 2
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Typing,
    PausingAfterTyped,
    Deleting,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Typing => "typing",
            Phase::PausingAfterTyped => "pausing",
            Phase::Deleting => "deleting",
        }
    }
}

/// A phrase split into grapheme boundaries.
///
/// `bounds[k]` is the byte offset after the first `k` graphemes, so
/// `bounds.len() == graphemes + 1` and the visible prefix is a plain slice.
#[derive(Debug, Clone)]
struct Phrase {
    text: String,
    bounds: Vec<usize>,
}

impl Phrase {
    fn new(text: &str) -> Self {
        let mut bounds = Vec::with_capacity(text.len() + 1);
        bounds.push(0);
        bounds.extend(
            text.grapheme_indices(true)
                .map(|(offset, g)| offset + g.len()),
        );
        Self {
            text: text.to_string(),
            bounds,
        }
    }

    fn len(&self) -> usize {
        self.bounds.len() - 1
    }

    fn prefix(&self, graphemes: usize) -> &str {
        &self.text[..self.bounds[graphemes]]
    }
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    config: TypewriterConfig,
    phrases: Vec<Phrase>,
    index: usize,
    shown: usize,
    phase: Phase,
    /// Time left until the next tick is due.
    remaining: Duration,
    disposed: bool,
}

impl Typewriter {
    pub fn new(config: TypewriterConfig) -> Result<Self> {
        config.validate()?;
        let phrases = config.words.iter().map(|w| Phrase::new(w)).collect();
        let remaining = config.type_delay();
        Ok(Self {
            config,
            phrases,
            index: 0,
            shown: 0,
            phase: Phase::Typing,
            remaining,
            disposed: false,
        })
    }

    /// Replace the configuration and restart from the first word.
    ///
    /// Returns the delay until the first tick. On error the current state is
    /// left untouched.
    pub fn reconfigure(&mut self, config: TypewriterConfig) -> Result<Duration> {
        let fresh = Self::new(config)?;
        *self = fresh;
        Ok(self.remaining)
    }

    pub fn config(&self) -> &TypewriterConfig {
        &self.config
    }

    pub fn text(&self) -> &str {
        self.phrases[self.index].prefix(self.shown)
    }

    pub fn current_word(&self) -> &str {
        &self.phrases[self.index].text
    }

    pub fn word_index(&self) -> usize {
        self.index
    }

    pub fn word_count(&self) -> usize {
        self.phrases.len()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of characters (graphemes) currently shown.
    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Tear down: every later `tick`/`advance` is a no-op.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    /// Delay the current phase waits before its next tick.
    pub fn next_delay(&self) -> Duration {
        match self.phase {
            Phase::Typing => self.config.type_delay(),
            Phase::PausingAfterTyped => self.config.pause(),
            Phase::Deleting => self.config.delete_delay(),
        }
    }

    /// Apply exactly one transition and return the delay until the next one.
    pub fn tick(&mut self) -> Duration {
        if self.disposed {
            return self.remaining;
        }

        let word_len = self.phrases[self.index].len();
        match self.phase {
            Phase::Typing => {
                if self.shown < word_len {
                    self.shown += 1;
                }
                if self.shown == word_len {
                    self.phase = Phase::PausingAfterTyped;
                }
            }
            Phase::PausingAfterTyped => {
                self.phase = Phase::Deleting;
            }
            Phase::Deleting => {
                self.shown = self.shown.saturating_sub(1);
                if self.shown == 0 {
                    self.index = (self.index + 1) % self.phrases.len();
                    self.phase = Phase::Typing;
                }
            }
        }

        self.remaining = self.next_delay();
        self.remaining
    }

    /// Consume `elapsed` wall-clock time, applying every tick that fell due.
    ///
    /// Returns the delay until the next tick. Leftover time carries over, so
    /// `advance(a); advance(b)` ends in the same state as `advance(a + b)`.
    pub fn advance(&mut self, elapsed: Duration) -> Duration {
        if self.disposed {
            return self.remaining;
        }

        let mut budget = elapsed;
        while budget >= self.remaining {
            budget -= self.remaining;
            self.tick();
        }
        self.remaining -= budget;
        self.remaining
    }

    /// Total time for one type-pause-delete pass over every word.
    pub fn cycle_duration(&self) -> Duration {
        // An empty word still costs one typing tick and one deleting tick.
        let ticks: u32 = self.phrases.iter().map(|p| p.len().max(1) as u32).sum();
        let words = self.phrases.len() as u32;
        self.config.type_delay() * ticks
            + self.config.pause() * words
            + self.config.delete_delay() * ticks
    }
}
