//! Integration test suite for folio.
//!
//! These tests drive the model together with the real animation actors and
//! the config reloader, with tokio's clock paused so timing is exact.
//!
//! # Test Categories
//!
//! - `scenarios`: typewriter and counter timing against the actors
//! - `page_scroll`: scrolling, visibility and counters end to end
//! - `config_reload`: live reload reaching the running actors

mod fixtures;

mod config_reload;
mod page_scroll;
mod scenarios;
