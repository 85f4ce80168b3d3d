use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::content::{Page, SectionId};
use crate::tea::Notification;
use crate::typewriter::Phase;

/// Display data for one counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterView {
    pub label: String,
    pub suffix: String,
    pub target: u64,
    pub value: u64,
    pub started: bool,
    pub done: bool,
}

impl CounterView {
    pub fn display_value(&self) -> String {
        format!("{}{}", self.value, self.suffix)
    }

    /// Fraction of the bar to fill, 0..=1. A zero target counts as full once
    /// it has completed.
    pub fn ratio(&self) -> f64 {
        if self.target == 0 {
            return if self.done { 1.0 } else { 0.0 };
        }
        (self.value as f64 / self.target as f64).clamp(0.0, 1.0)
    }
}

static VERSION_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn next_version() -> u64 {
    VERSION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Immutable snapshot handed to the render thread.
///
/// The page is behind an `Arc` since it only changes on resize or config
/// reload, while snapshots go out on every typewriter tick.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub version: u64,
    pub page: Arc<Page>,
    pub offset: usize,
    pub initials: String,
    pub name: String,
    pub active_section: SectionId,
    pub typed: String,
    pub phase: Phase,
    pub counters: Vec<CounterView>,
    pub notification: Option<Notification>,
    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,
}

impl RenderState {
    /// Scroll position as a percentage of the scrollable range.
    pub fn scroll_percent(&self, viewport_height: usize) -> u16 {
        let max = self.page.len().saturating_sub(viewport_height);
        if max == 0 {
            return 100;
        }
        ((self.offset.min(max) * 100) / max) as u16
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            version: 0,
            page: Arc::new(Page::default()),
            offset: 0,
            initials: String::new(),
            name: String::new(),
            active_section: SectionId::Home,
            typed: String::new(),
            phase: Phase::Typing,
            counters: Vec::new(),
            notification: None,
            show_keymap: false,
        }
    }
}
