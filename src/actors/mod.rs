//! Actor system for the animations.
//!
//! Each actor is an independent tokio task that owns one animation engine and
//! its timer, and reports frames to the logic thread via message passing:
//! - Typewriter phrase cycling (TypewriterActor)
//! - One viewport-triggered counter each (CounterActor)
//!
//! NOTE: Keyboard input is handled synchronously in the logic thread,
//! not via an actor, for minimum latency.

pub mod counter;
pub mod typewriter;

use tokio_util::sync::CancellationToken;

pub use counter::{CounterActor, CounterHandle};
pub use typewriter::{TypewriterActor, TypewriterHandle};

/// Handle to a running actor, used for graceful shutdown.
#[derive(Debug, Clone)]
pub struct ActorHandle {
    cancel: CancellationToken,
}

impl ActorHandle {
    /// Create a new actor handle with a cancellation token.
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Signal the actor to shut down gracefully.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Check if shutdown has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
