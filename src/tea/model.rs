//! Model for the TEA (The Elm Architecture) pattern.
//!
//! The Model is pure application state - no channels, no handles, no runtime
//! infrastructure. The animation engines themselves live in their actors; the
//! model only keeps the last frame each one reported.

use std::sync::Arc;

use crate::config::Config;
use crate::content::{Page, DEFAULT_WIDTH};
use crate::counter::CounterConfig;
use crate::render::{next_version, CounterView, RenderState};
use crate::typewriter::Phase;
use crate::viewport::{Viewport, VisibilityObserver};

/// Level of a notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Error notification - displayed in red with "Error:" prefix
    Error,
    /// Informational notification - displayed in green
    Info,
}

/// A notification message to display to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Last reported state of one counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSlot {
    pub config: CounterConfig,
    pub value: u64,
    pub started: bool,
    pub done: bool,
}

impl CounterSlot {
    pub fn new(config: CounterConfig) -> Self {
        Self {
            config,
            value: 0,
            started: false,
            done: false,
        }
    }
}

pub struct Model {
    pub config: Config,

    // Layout
    pub page: Arc<Page>,
    pub width: usize,
    pub viewport: Viewport,
    /// Keys are counter indices.
    pub observer: VisibilityObserver<usize>,

    // Latest animation frames
    pub typed: String,
    pub word_index: usize,
    pub phase: Phase,
    pub counters: Vec<CounterSlot>,
    /// Bumped whenever the counter actors are respawned.
    pub counter_generation: u64,

    // UI state
    pub notification: Option<Notification>,
    pub show_keymap: bool,

    // Dirty flag - set when state changes and render is needed
    pub dirty: bool,
}

impl Model {
    /// Build the model for `config`. The viewport has zero height until the
    /// first `Resize`, so nothing counts as visible before then.
    pub fn new(config: Config) -> Self {
        let counters = config
            .counters
            .iter()
            .cloned()
            .map(CounterSlot::new)
            .collect();
        let mut model = Self {
            page: Arc::new(Page::default()),
            width: DEFAULT_WIDTH,
            viewport: Viewport::default(),
            observer: VisibilityObserver::new(),
            typed: String::new(),
            word_index: 0,
            phase: Phase::Typing,
            counters,
            counter_generation: 0,
            notification: None,
            show_keymap: false,
            dirty: true,
            config,
        };
        model.relayout();
        model
    }

    /// Rebuild the page for the current width and config, keeping what the
    /// observer already knows about each counter.
    pub fn relayout(&mut self) {
        let page = Page::build(&self.config.profile, &self.config.counters, self.width);
        for index in 0..page.counter_count() {
            if let Some(span) = page.counter_span(index) {
                self.observer.observe(index, span);
            }
        }
        self.page = Arc::new(page);
        self.viewport.clamp_offset(self.page.len());
        self.dirty = true;
    }

    /// Drop every counter and start over from `counters`. The observer is
    /// reset too, so already visible counters get reported again.
    pub fn reset_counters(&mut self, counters: &[CounterConfig]) -> u64 {
        self.counter_generation += 1;
        self.counters = counters.iter().cloned().map(CounterSlot::new).collect();
        self.observer.clear();
        self.counter_generation
    }

    pub fn total_rows(&self) -> usize {
        self.page.len()
    }

    /// Create an immutable snapshot for the render thread.
    pub fn snapshot(&self) -> RenderState {
        let counters = self
            .counters
            .iter()
            .map(|slot| CounterView {
                label: slot.config.label.clone(),
                suffix: slot.config.suffix.clone(),
                target: slot.config.target.max(0) as u64,
                value: slot.value,
                started: slot.started,
                done: slot.done,
            })
            .collect();

        RenderState {
            version: next_version(),
            page: self.page.clone(),
            offset: self.viewport.offset,
            initials: self.config.profile.initials(),
            name: self.config.profile.name.clone(),
            active_section: self.page.section_at(self.viewport.offset),
            typed: self.typed.clone(),
            phase: self.phase,
            counters,
            notification: self.notification.clone(),
            show_keymap: self.show_keymap,
        }
    }
}
