//! Fixed-period pipeline worker
//!
//! One cycle at a time, never overlapping. After a cycle the worker sleeps
//! for whatever is left of the target period; an overrunning cycle is
//! followed immediately by the next one. While detection is toggled off the
//! worker only polls the toggle.

use super::settings::Settings;
use super::slot::SummarySlot;
use crate::markers::FrameSummary;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub target_period_ms: u64,
    pub suspended_poll_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            target_period_ms: 500,
            suspended_poll_ms: 500,
        }
    }
}

impl PacingConfig {
    pub fn target_period(&self) -> Duration {
        Duration::from_millis(self.target_period_ms)
    }

    pub fn suspended_poll(&self) -> Duration {
        Duration::from_millis(self.suspended_poll_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Detection is off; nothing captured, nothing emitted
    Suspended,
    Emitted {
        elapsed: Duration,
        /// An unread summary was overwritten
        replaced: bool,
    },
}

pub struct PacedWorker<F> {
    settings: Arc<Settings>,
    slot: Arc<SummarySlot>,
    pacing: PacingConfig,
    cycle: F,
    suspended: bool,
    cycles: u64,
}

impl<F> PacedWorker<F>
where
    F: FnMut() -> FrameSummary,
{
    pub fn new(settings: Arc<Settings>, slot: Arc<SummarySlot>, pacing: PacingConfig, cycle: F) -> Self {
        Self {
            settings,
            slot,
            pacing,
            cycle,
            suspended: false,
            cycles: 0,
        }
    }

    /// Run at most one cycle, honoring the detection toggle.
    pub fn step(&mut self) -> StepOutcome {
        if !self.settings.detection_enabled() {
            if !self.suspended {
                info!("Detection suspended");
                self.suspended = true;
            }
            return StepOutcome::Suspended;
        }
        if self.suspended {
            info!("Detection resumed");
            self.suspended = false;
        }

        let start = Instant::now();
        let summary = (self.cycle)();
        let replaced = self.slot.publish(summary);
        let elapsed = start.elapsed();

        self.cycles += 1;
        debug!(
            "Cycle {} finished in {}ms{}",
            self.cycles,
            elapsed.as_millis(),
            if replaced { " (unread summary replaced)" } else { "" }
        );

        StepOutcome::Emitted { elapsed, replaced }
    }

    /// How long to wait before the next step.
    pub fn delay_after(&self, outcome: &StepOutcome) -> Duration {
        match outcome {
            StepOutcome::Suspended => self.pacing.suspended_poll(),
            StepOutcome::Emitted { elapsed, .. } => self.pacing.target_period().saturating_sub(*elapsed),
        }
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Loop forever. There is no shutdown protocol; the process ending stops it.
    pub fn run(mut self) {
        loop {
            let outcome = self.step();
            let delay = self.delay_after(&outcome);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
    }
}

impl<F> PacedWorker<F>
where
    F: FnMut() -> FrameSummary + Send + 'static,
{
    /// Start the loop on its own detached thread.
    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("radar-pipeline".into())
            .spawn(move || self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn counting_worker(
        settings: Arc<Settings>,
        slot: Arc<SummarySlot>,
        pacing: PacingConfig,
    ) -> PacedWorker<impl FnMut() -> FrameSummary> {
        let mut n = 0u32;
        PacedWorker::new(settings, slot, pacing, move || {
            n += 1;
            FrameSummary {
                enemy_zones: BTreeSet::from([format!("cycle{n}")]),
                ..Default::default()
            }
        })
    }

    #[test]
    fn test_toggle_off_halts_and_toggle_on_resumes() {
        let settings = Arc::new(Settings::new());
        let slot = Arc::new(SummarySlot::new());
        let pacing = PacingConfig::default();
        let mut worker = counting_worker(settings.clone(), slot.clone(), pacing);

        assert!(matches!(worker.step(), StepOutcome::Emitted { .. }));
        assert_eq!(slot.try_take().unwrap().enemy_text(), "cycle1");

        settings.set_detection_enabled(false);
        for _ in 0..3 {
            let outcome = worker.step();
            assert_eq!(outcome, StepOutcome::Suspended);
            assert_eq!(worker.delay_after(&outcome), pacing.suspended_poll());
            assert!(slot.try_take().is_none());
        }
        assert_eq!(worker.cycles(), 1);

        settings.set_detection_enabled(true);
        let outcome = worker.step();
        assert!(matches!(outcome, StepOutcome::Emitted { .. }));
        assert!(worker.delay_after(&outcome) <= pacing.target_period());
        assert_eq!(slot.try_take().unwrap().enemy_text(), "cycle2");
    }

    #[test]
    fn test_overrunning_cycle_has_no_delay() {
        let settings = Arc::new(Settings::new());
        let slot = Arc::new(SummarySlot::new());
        let worker = counting_worker(settings, slot, PacingConfig::default());

        let overrun = StepOutcome::Emitted {
            elapsed: Duration::from_millis(750),
            replaced: false,
        };
        assert_eq!(worker.delay_after(&overrun), Duration::ZERO);

        let quick = StepOutcome::Emitted {
            elapsed: Duration::from_millis(120),
            replaced: false,
        };
        assert_eq!(worker.delay_after(&quick), Duration::from_millis(380));
    }

    #[test]
    fn test_unread_summary_is_replaced() {
        let settings = Arc::new(Settings::new());
        let slot = Arc::new(SummarySlot::new());
        let mut worker = counting_worker(settings, slot.clone(), PacingConfig::default());

        worker.step();
        assert!(matches!(worker.step(), StepOutcome::Emitted { replaced: true, .. }));
        assert_eq!(slot.try_take().unwrap().enemy_text(), "cycle2");
    }

    #[test]
    fn test_spawned_worker_emits() {
        let settings = Arc::new(Settings::new());
        let slot = Arc::new(SummarySlot::new());
        let pacing = PacingConfig {
            target_period_ms: 5,
            suspended_poll_ms: 5,
        };
        let _handle = counting_worker(settings, slot.clone(), pacing).spawn().unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut received = None;
        while received.is_none() && Instant::now() < deadline {
            received = slot.try_take();
            thread::sleep(Duration::from_millis(2));
        }
        assert!(received.is_some());
    }
}
