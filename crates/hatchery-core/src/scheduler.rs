//! Fixed-period scheduler driving the engine from a host timer
//!
//! The host calls [`Scheduler::poll`] as often as it likes with the current
//! clock reading; at most one step runs per call and only once a full period
//! has passed since the previous one. Late polls do not replay missed steps.

use crate::engine::SimulationEngine;
use crate::report::StepReport;

/// Drives [`SimulationEngine::step`] at a fixed period
#[derive(Debug, Clone)]
pub struct Scheduler {
    period_ms: u64,
    running: bool,
    /// Set while a step and its after-hook are executing
    in_flight: bool,
    next_due: u64,
}

impl Scheduler {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            running: false,
            in_flight: false,
            next_due: 0,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Start ticking; the first step is due one period after `now`.
    /// Returns false (and warns) if already running.
    pub fn start(&mut self, now: u64) -> bool {
        if self.running {
            log::warn!("Scheduler already running; start ignored");
            return false;
        }
        self.running = true;
        self.in_flight = false;
        self.next_due = now.saturating_add(self.period_ms);
        true
    }

    /// Stop ticking. Returns false (and warns) if not running.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            log::warn!("Scheduler not running; stop ignored");
            return false;
        }
        self.running = false;
        true
    }

    /// Run one step if one is due, then hand the engine and report to
    /// `after` (render, leaderboard save, ...).
    ///
    /// A step is refused while the previous one is still in flight, which
    /// only happens if `after` unwound and the host caught the panic. Call
    /// `stop` then `start` to recover.
    pub fn poll<F>(
        &mut self,
        engine: &mut SimulationEngine,
        now: u64,
        after: F,
    ) -> Option<StepReport>
    where
        F: FnOnce(&SimulationEngine, &StepReport),
    {
        if !self.running || now < self.next_due {
            return None;
        }
        if self.in_flight {
            log::warn!("Previous step still in flight; skipping tick at {}", now);
            return None;
        }

        self.in_flight = true;
        let report = engine.step(now);
        after(engine, &report);
        self.in_flight = false;

        self.next_due = now.saturating_add(self.period_ms);
        Some(report)
    }
}
