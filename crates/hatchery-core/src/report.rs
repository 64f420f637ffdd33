//! Per-step report handed back to the host.

use hatchery_logic::events::EventTemplate;

use crate::components::AnimalId;
use crate::error::Diagnostic;
use crate::systems::{GameOverReason, ServiceKind};

/// What happened during one call to `SimulationEngine::step`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Clock reading the step ran at (ms)
    pub now: u64,
    /// Coins earned this step
    pub income: f64,
    /// Animals that hatched
    pub hatched: Vec<AnimalId>,
    /// Animals moved from a waiting line into a service
    pub promoted: Vec<(ServiceKind, AnimalId)>,
    /// Treatments that finished
    pub treated: Vec<(ServiceKind, AnimalId)>,
    /// Animals that fell sick
    pub fell_sick: Vec<AnimalId>,
    /// Events that fired
    pub triggered: Vec<EventTemplate>,
    /// Timed events that ran out and were reverted
    pub expired: Vec<EventTemplate>,
    /// Non-fatal problems found along the way
    pub diagnostics: Vec<Diagnostic>,
    /// Set on the step that ended the run
    pub game_over: Option<GameOverReason>,
    /// The run was already over; nothing was simulated
    pub frozen: bool,
}

impl StepReport {
    pub fn new(now: u64) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    /// Report for a step skipped because the run has ended.
    pub fn frozen(now: u64) -> Self {
        Self {
            now,
            frozen: true,
            ..Self::default()
        }
    }

    /// Record a diagnostic and log it as a warning.
    pub fn diagnose(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}
