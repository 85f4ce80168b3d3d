//! Single-slot cooperative timer.
//!
//! A [`TimerSlot`] holds at most one pending deadline, either one-shot or
//! repeating. Scheduling always replaces whatever was pending, so an owner can
//! never have two ticks in flight. The owning task awaits [`TimerSlot::fired`]
//! inside its `select!` loop; nothing runs on another thread.

use std::future::pending;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schedule {
    Once { at: Instant },
    Every { at: Instant, period: Duration },
}

impl Schedule {
    fn deadline(&self) -> Instant {
        match *self {
            Schedule::Once { at } | Schedule::Every { at, .. } => at,
        }
    }
}

#[derive(Debug, Default)]
pub struct TimerSlot {
    schedule: Option<Schedule>,
    fired: u64,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire once after `delay`, cancelling anything already pending.
    pub fn once(&mut self, delay: Duration) {
        self.schedule = Some(Schedule::Once {
            at: Instant::now() + delay,
        });
    }

    /// Fire every `period`, first after one full period, cancelling anything
    /// already pending.
    pub fn every(&mut self, period: Duration) {
        self.schedule = Some(Schedule::Every {
            at: Instant::now() + period,
            period,
        });
    }

    pub fn cancel(&mut self) {
        self.schedule = None;
    }

    pub fn is_armed(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn is_repeating(&self) -> bool {
        matches!(self.schedule, Some(Schedule::Every { .. }))
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.schedule.map(|s| s.deadline())
    }

    /// How many times this slot has fired since it was created.
    pub fn fire_count(&self) -> u64 {
        self.fired
    }

    /// Wait for the pending deadline. Never resolves while disarmed.
    ///
    /// Cancel safe: the slot is only updated after the deadline is reached,
    /// so dropping this future inside `select!` loses nothing. A one-shot
    /// disarms itself on firing; a repeating timer moves its deadline one
    /// period forward (from the old deadline, so it does not drift).
    pub async fn fired(&mut self) {
        let Some(schedule) = self.schedule else {
            return pending().await;
        };

        sleep_until(schedule.deadline()).await;

        self.fired += 1;
        self.schedule = match schedule {
            Schedule::Once { .. } => None,
            Schedule::Every { at, period } => Some(Schedule::Every {
                at: at + period,
                period,
            }),
        };
    }
}
