//! The Elm Architecture (TEA) implementation for the folio TUI.
//!
//! - `Model`: page, scroll position and the latest animation frames
//! - `Message`: inputs to the update function
//! - `Command`: outputs (side effects) from the update function
//! - `update`: pure function that transforms state

pub mod command;
pub mod message;
pub mod model;
pub mod update;

pub use command::Command;
pub use message::Message;
pub use model::{CounterSlot, Model, Notification, NotificationLevel};
pub use update::update;
