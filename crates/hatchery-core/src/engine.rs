//! Simulation engine - main entry point for running the simulation

use hatchery_logic::catalog::{EggType, HabitatKind};
use hatchery_logic::config::GameConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::*;
use crate::error::ActionError;
use crate::report::StepReport;
use crate::state::RunState;
use crate::systems::*;

/// Main simulation engine
///
/// Owns the config, the current run and the permanent prestige record. The
/// host calls [`step`](Self::step) once per period and the action methods in
/// between; every action returns a typed result and never panics.
pub struct SimulationEngine {
    config: GameConfig,
    /// Current run
    pub state: RunState,
    /// Permanent progress
    pub prestige: PrestigeRecord,
    rng: StdRng,
}

impl SimulationEngine {
    /// Create a fresh run at `now`, seeded from OS entropy
    pub fn new(config: GameConfig, now: u64) -> Self {
        Self::with_rng(config, StdRng::from_entropy(), now)
    }

    /// Create a fresh run with a deterministic random source
    pub fn with_seed(config: GameConfig, seed: u64, now: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed), now)
    }

    fn with_rng(config: GameConfig, rng: StdRng, now: u64) -> Self {
        let state = RunState::new(&config, config.starting_balance, now);
        Self {
            config,
            state,
            prestige: PrestigeRecord::default(),
            rng,
        }
    }

    /// Advance the simulation by one step.
    ///
    /// Runs every pipeline stage in order. Once the run is over this is a
    /// no-op returning a frozen report until [`restart`](Self::restart).
    pub fn step(&mut self, now: u64) -> StepReport {
        if self.state.outcome.is_game_over {
            return StepReport::frozen(now);
        }

        let mut report = StepReport::new(now);
        let mut ctx = StepContext {
            state: &mut self.state,
            config: &self.config,
            prestige_multiplier: self.prestige.global_multiplier,
            rng: &mut self.rng,
            now,
            report: &mut report,
        };
        for stage in PIPELINE {
            stage.step(&mut ctx);
        }
        report
    }

    fn ensure_running(&self) -> Result<(), ActionError> {
        if self.state.outcome.is_game_over {
            return Err(ActionError::GameOver);
        }
        Ok(())
    }

    // --- Player actions ---

    pub fn purchase_egg(&mut self, egg_type: EggType, now: u64) -> Result<EggId, ActionError> {
        self.ensure_running()?;
        purchase_egg(&mut self.state, &self.config, egg_type, now)
    }

    /// Returns the price paid
    pub fn feed(&mut self, id: AnimalId) -> Result<f64, ActionError> {
        self.ensure_running()?;
        tend_animal(&mut self.state, &self.config, id, Tending::Feed)
    }

    /// Returns the price paid
    pub fn clean(&mut self, id: AnimalId) -> Result<f64, ActionError> {
        self.ensure_running()?;
        tend_animal(&mut self.state, &self.config, id, Tending::Clean)
    }

    /// Returns the sale value plus any service refund
    pub fn sell(&mut self, id: AnimalId) -> Result<f64, ActionError> {
        self.ensure_running()?;
        sell_animal(&mut self.state, &self.config, id)
    }

    pub fn send_to_bath(&mut self, id: AnimalId) -> Result<f64, ActionError> {
        self.ensure_running()?;
        enqueue_service(&mut self.state, &self.config, ServiceKind::Bath, id)
    }

    pub fn send_to_clinic(&mut self, id: AnimalId) -> Result<f64, ActionError> {
        self.ensure_running()?;
        enqueue_service(&mut self.state, &self.config, ServiceKind::Clinic, id)
    }

    /// Returns the refund (zero if the treatment was already under way)
    pub fn cancel_bath(&mut self, id: AnimalId) -> Result<f64, ActionError> {
        self.ensure_running()?;
        cancel_service(&mut self.state, ServiceKind::Bath, id)
    }

    /// Returns the refund (zero if the treatment was already under way)
    pub fn cancel_clinic(&mut self, id: AnimalId) -> Result<f64, ActionError> {
        self.ensure_running()?;
        cancel_service(&mut self.state, ServiceKind::Clinic, id)
    }

    pub fn assign_habitat(&mut self, id: AnimalId, kind: HabitatKind) -> Result<(), ActionError> {
        self.ensure_running()?;
        assign_habitat(&mut self.state, &self.config, id, kind)
    }

    pub fn unassign_habitat(&mut self, id: AnimalId) -> Result<HabitatKind, ActionError> {
        self.ensure_running()?;
        unassign_habitat(&mut self.state, id)
    }

    /// Returns the price paid
    pub fn upgrade_habitat(&mut self, kind: HabitatKind) -> Result<f64, ActionError> {
        self.ensure_running()?;
        upgrade_habitat(&mut self.state, &self.config, kind)
    }

    pub fn can_prestige(&self) -> bool {
        !self.state.outcome.is_game_over && can_prestige(&self.state, &self.config)
    }

    /// Trade the current run for permanent progress. The returned summary is
    /// meant for a [`Leaderboard`](crate::leaderboard::Leaderboard).
    pub fn prestige(&mut self, now: u64) -> Result<RunSummary, ActionError> {
        self.ensure_running()?;
        prestige_run(&mut self.state, &mut self.prestige, &self.config, now)
    }

    /// Start a fresh run. Allowed at any time, including after game over.
    pub fn restart(&mut self, now: u64) {
        restart_run(&mut self.state, &self.config, now);
    }

    // --- Read access ---

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn balance(&self) -> f64 {
        self.state.balance
    }

    /// Income earned by the last step
    pub fn income_per_step(&self) -> f64 {
        self.state.income_per_step
    }

    /// All animals in hatch order
    pub fn animals(&self) -> Vec<AnimalRecord> {
        self.state.animal_records()
    }

    pub fn animal(&self, id: AnimalId) -> Option<AnimalRecord> {
        self.state.animal_record(id)
    }

    pub fn animal_count(&self) -> usize {
        self.state.animal_count()
    }

    /// Incubating eggs in purchase order
    pub fn eggs(&self) -> Vec<Egg> {
        self.state.eggs()
    }

    pub fn bath(&self) -> &ServiceQueue {
        &self.state.bath
    }

    pub fn clinic(&self) -> &ServiceQueue {
        &self.state.clinic
    }

    pub fn habitats(&self) -> &HabitatTable {
        &self.state.habitats
    }

    /// Timed events currently in effect
    pub fn active_events(&self) -> &[EventRecord] {
        &self.state.events.active
    }

    pub fn event_history(&self) -> impl Iterator<Item = &EventRecord> + '_ {
        self.state.events.history.iter()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.outcome.is_game_over
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.state.outcome.reason
    }

    pub fn prestige_record(&self) -> &PrestigeRecord {
        &self.prestige
    }

    /// Save the run and prestige record to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), crate::persistence::SaveError> {
        crate::persistence::save_run(writer, &self.state, &self.prestige)
    }

    /// Replace the run and prestige record with a saved one
    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), crate::persistence::SaveError> {
        let (state, prestige) = crate::persistence::load_run(reader)?;
        self.state = state;
        self.prestige = prestige;
        log::info!(
            "Loaded run: {} animals, {} eggs, {:.0} coins",
            self.state.animal_count(),
            self.state.egg_count(),
            self.state.balance
        );
        Ok(())
    }
}
