//! Messages for the TEA (The Elm Architecture) pattern.
//!
//! Messages are inputs to the update function - they come from the keyboard,
//! the animation actors, or the config watcher.

use crossterm::event::KeyEvent;

use crate::config::Config;
use crate::typewriter::Phase;

/// Input messages to the update function.
#[derive(Debug)]
pub enum Message {
    // Keyboard/terminal events
    Key(KeyEvent),
    Resize(u16, u16),

    // From animation actors
    /// The typewriter ticked; `text` is the full visible prefix.
    TypewriterFrame {
        text: String,
        word_index: usize,
        phase: Phase,
    },
    /// A counter ticked (or completed without ticking, for a zero target).
    CounterFrame {
        /// Which spawn of the counters produced this; stale frames are dropped.
        generation: u64,
        index: usize,
        value: u64,
        done: bool,
    },

    // From the config watcher
    ConfigReloaded(Box<Config>),
    ConfigRejected(String),
}
