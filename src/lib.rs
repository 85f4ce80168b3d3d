pub mod config;
pub mod content;
pub mod counter;
pub mod error;
pub mod headless;
pub mod log;
pub mod timer;
pub mod typewriter;
pub mod viewport;
pub mod watch;

// Decoupled game loop architecture
pub mod actors;
pub mod app;
pub mod render;
pub mod tea;
pub mod ui;

pub use error::{Error, Result};
