//! # Autosave Scheduler
//!
//! Debounces document changes into saves.
//!
//! Each change (re)arms a single deadline `quiet_period` in the future. The
//! scheduler only says *when* a save is due; the editor performs it. While a
//! save is in flight nothing new fires. A change that lands during the
//! flight re-arms the deadline from the moment the flight completes.
//!
//! Time is passed in explicitly so the state machine stays deterministic.

use pagecraft_common::AutosaveConfig;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
pub struct AutosaveScheduler {
    enabled: bool,

    quiet_period: Duration,

    saved_indicator: Duration,

    /// Pending debounce deadline
    deadline: Option<Instant>,

    saves_in_flight: u32,

    changed_during_flight: bool,

    just_saved_until: Option<Instant>,
}

impl AutosaveScheduler {
    pub fn new(config: &AutosaveConfig) -> Self {
        Self {
            enabled: config.enabled,
            quiet_period: Duration::from_millis(config.quiet_period_ms),
            saved_indicator: Duration::from_millis(config.saved_indicator_ms),
            deadline: None,
            saves_in_flight: 0,
            changed_during_flight: false,
            just_saved_until: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling drops the pending deadline; manual saves are unaffected
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel();
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Restart the countdown
    pub fn notify_changed(&mut self, now: Instant) {
        if !self.enabled {
            return;
        }
        if self.is_saving() {
            self.changed_during_flight = true;
            return;
        }
        self.deadline = Some(now + self.quiet_period);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
        self.changed_during_flight = false;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.enabled
            && !self.is_saving()
            && self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// A save (automatic or manual) has started
    pub fn begin_save(&mut self) {
        self.saves_in_flight += 1;
        self.deadline = None;
    }

    /// A save finished; failures and mid-flight changes re-arm the timer
    pub fn finish_save(&mut self, succeeded: bool, now: Instant) {
        self.saves_in_flight = self.saves_in_flight.saturating_sub(1);

        if succeeded {
            self.just_saved_until = Some(now + self.saved_indicator);
        }

        if self.is_saving() {
            return;
        }

        let retry = !succeeded || self.changed_during_flight;
        self.changed_during_flight = false;
        if retry && self.enabled {
            self.deadline = Some(now + self.quiet_period);
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saves_in_flight > 0
    }

    /// True for a short window after a successful save
    pub fn just_saved(&self, now: Instant) -> bool {
        self.just_saved_until.is_some_and(|until| now < until)
    }
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(&AutosaveConfig::default())
    }
}
