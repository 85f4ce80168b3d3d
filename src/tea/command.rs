//! Commands for the TEA (The Elm Architecture) pattern.
//!
//! Commands are outputs from the update function - they represent side effects
//! to be executed by the runtime.

use crate::counter::CounterConfig;
use crate::typewriter::TypewriterConfig;

/// Output commands from the update function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forward a viewport transition to counter `index`.
    NotifyVisibility { index: usize, visible: bool },

    /// Cancel the typewriter's pending tick and restart it with `config`.
    ReconfigureTypewriter(TypewriterConfig),

    /// Tear down every counter actor and spawn fresh ones.
    RespawnCounters {
        generation: u64,
        counters: Vec<CounterConfig>,
    },

    // App lifecycle
    Quit,
}
