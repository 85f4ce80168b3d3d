//! Viewport counter: counts from 0 up to a target the first time it is seen.
//!
//! The animation always takes [`STEPS`] ticks, [`TICK_INTERVAL`] apart, no
//! matter how large the target is. Visibility only matters once: after the
//! first `true` the counter runs to completion and ignores the viewport.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Fixed number of ticks from 0 to the target.
pub const STEPS: u32 = 50;

pub const TICK_INTERVAL: Duration = Duration::from_millis(30);

fn default_suffix() -> String {
    "%".to_string()
}

/// A counter as written in the config file. `label` and `suffix` are only
/// used for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterConfig {
    pub target: i64,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl CounterConfig {
    pub fn new(target: i64, label: impl Into<String>) -> Self {
        Self {
            target,
            label: label.into(),
            suffix: default_suffix(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.target < 0 {
            return Err(Error::InvalidConfiguration(format!(
                "counter '{}' has negative target {}",
                self.label, self.target
            )));
        }
        Ok(())
    }

    pub fn format_value(&self, value: u64) -> String {
        format!("{}{}", value, self.suffix)
    }
}

/// What a visibility change did to the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Already started, or not visible yet.
    Ignored,
    /// Started; the caller must tick every [`TICK_INTERVAL`] until done.
    Started,
    /// Started and finished in one go (zero target); schedule nothing.
    Completed,
}

#[derive(Debug, Clone)]
pub struct ViewportCounter {
    target: u64,
    step: f64,
    ticks: u32,
    displayed: u64,
    started: bool,
    done: bool,
    disposed: bool,
}

impl ViewportCounter {
    pub fn new(target: i64) -> Result<Self> {
        let target = u64::try_from(target).map_err(|_| {
            Error::InvalidConfiguration(format!("counter target must be >= 0, got {}", target))
        })?;
        Ok(Self {
            target,
            step: target as f64 / STEPS as f64,
            ticks: 0,
            displayed: 0,
            started: false,
            done: false,
            disposed: false,
        })
    }

    pub fn from_config(config: &CounterConfig) -> Result<Self> {
        Self::new(config.target)
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn value(&self) -> u64 {
        self.displayed
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether the caller should still be ticking.
    pub fn is_running(&self) -> bool {
        self.started && !self.done && !self.disposed
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn on_visibility_changed(&mut self, visible: bool) -> Trigger {
        if self.disposed || self.started || !visible {
            return Trigger::Ignored;
        }

        self.started = true;
        if self.target == 0 {
            self.done = true;
            return Trigger::Completed;
        }
        Trigger::Started
    }

    /// Advance one step. Returns `true` once the target has been reached.
    ///
    /// Ticks before the start, after completion, or after disposal change
    /// nothing.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return self.done;
        }

        self.ticks += 1;
        // Computed from the tick count rather than summed, so 50 * 0.74 does
        // not come out at 36.999...
        let accumulated = self.step * self.ticks as f64;
        if self.ticks >= STEPS || accumulated >= self.target as f64 {
            self.displayed = self.target;
            self.done = true;
        } else {
            self.displayed = (accumulated.floor() as u64).min(self.target);
        }
        self.done
    }

    /// Upper bound on the animation time once started.
    pub fn duration(&self) -> Duration {
        if self.target == 0 {
            Duration::ZERO
        } else {
            TICK_INTERVAL * STEPS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(counter: &mut ViewportCounter) -> Vec<u64> {
        let mut values = Vec::new();
        while counter.is_running() {
            counter.tick();
            values.push(counter.value());
        }
        values
    }

    #[test]
    fn test_starts_idle() {
        let counter = ViewportCounter::new(10).unwrap();
        assert_eq!(counter.value(), 0);
        assert!(!counter.is_started());
        assert!(!counter.is_done());
    }

    #[test]
    fn test_negative_target_rejected() {
        let err = ViewportCounter::new(-1).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert!(CounterConfig::new(-5, "bad").validate().is_err());
    }

    #[test]
    fn test_invisible_does_not_start() {
        let mut counter = ViewportCounter::new(10).unwrap();
        assert_eq!(counter.on_visibility_changed(false), Trigger::Ignored);
        assert!(!counter.is_started());
        assert!(!counter.tick());
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn test_target_100_takes_exactly_50_ticks() {
        let mut counter = ViewportCounter::new(100).unwrap();
        assert_eq!(counter.step(), 2.0);
        assert_eq!(counter.on_visibility_changed(true), Trigger::Started);

        let values = run_to_end(&mut counter);
        assert_eq!(values.len(), 50);
        assert_eq!(values[0], 2);
        assert_eq!(values[24], 50);
        assert_eq!(*values.last().unwrap(), 100);
        assert_eq!(counter.ticks(), 50);
    }

    #[test]
    fn test_target_37_clamps_exactly() {
        let mut counter = ViewportCounter::new(37).unwrap();
        assert!((counter.step() - 0.74).abs() < 1e-12);
        counter.on_visibility_changed(true);

        let values = run_to_end(&mut counter);
        assert_eq!(values.len(), 50);
        assert_eq!(values[0], 0);
        assert_eq!(values[1], 1); // floor(1.48)
        assert_eq!(values[48], 36); // floor(36.26)
        assert_eq!(values[49], 37);
        assert!(values.iter().all(|&v| v <= 37));
    }

    #[test]
    fn test_values_never_decrease() {
        for target in [1, 7, 49, 50, 51, 99, 1234, 1_000_000] {
            let mut counter = ViewportCounter::new(target).unwrap();
            counter.on_visibility_changed(true);
            let values = run_to_end(&mut counter);
            assert!(values.windows(2).all(|w| w[0] <= w[1]), "target {}", target);
            assert_eq!(*values.last().unwrap(), target as u64);
            assert!(values.len() <= STEPS as usize);
        }
    }

    #[test]
    fn test_terminal_state_is_idempotent() {
        let mut counter = ViewportCounter::new(20).unwrap();
        counter.on_visibility_changed(true);
        run_to_end(&mut counter);

        for _ in 0..10 {
            assert!(counter.tick());
            assert_eq!(counter.value(), 20);
        }
        assert_eq!(counter.ticks(), 50);
    }

    #[test]
    fn test_visibility_toggles_after_start_are_ignored() {
        let mut counter = ViewportCounter::new(100).unwrap();
        counter.on_visibility_changed(true);
        for _ in 0..10 {
            counter.tick();
        }
        assert_eq!(counter.value(), 20);

        assert_eq!(counter.on_visibility_changed(false), Trigger::Ignored);
        assert_eq!(counter.on_visibility_changed(true), Trigger::Ignored);
        assert!(counter.is_started());
        assert_eq!(counter.value(), 20);
        assert_eq!(counter.ticks(), 10);
    }

    #[test]
    fn test_zero_target_completes_immediately() {
        let mut counter = ViewportCounter::new(0).unwrap();
        assert_eq!(counter.on_visibility_changed(true), Trigger::Completed);
        assert!(counter.is_done());
        assert!(!counter.is_running());
        assert_eq!(counter.value(), 0);
        assert_eq!(counter.duration(), Duration::ZERO);
        assert!(counter.tick());
        assert_eq!(counter.ticks(), 0);
    }

    #[test]
    fn test_dispose_freezes_value() {
        let mut counter = ViewportCounter::new(100).unwrap();
        counter.on_visibility_changed(true);
        counter.tick();
        counter.dispose();
        assert!(!counter.tick());
        assert_eq!(counter.value(), 2);
        assert!(!counter.is_running());
    }

    #[test]
    fn test_dispose_before_start_blocks_trigger() {
        let mut counter = ViewportCounter::new(5).unwrap();
        counter.dispose();
        assert_eq!(counter.on_visibility_changed(true), Trigger::Ignored);
        assert!(!counter.is_started());
    }

    #[test]
    fn test_counter_config_toml_defaults() {
        let config: CounterConfig =
            toml::from_str("target = 90\nlabel = \"OCR accuracy\"").unwrap();
        assert_eq!(config.suffix, "%");
        assert_eq!(config.format_value(42), "42%");

        let plain = CounterConfig::new(8, "Projects").with_suffix("+");
        assert_eq!(plain.format_value(8), "8+");
    }
}
