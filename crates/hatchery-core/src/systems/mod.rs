//! Systems - logic that operates on components
//!
//! Each system is a set of free functions over [`RunState`] plus a unit
//! struct implementing [`Tickable`]. [`PIPELINE`] fixes the order the engine
//! runs them in; later stages read what earlier stages wrote this step.

mod care;
mod economy;
mod events;
mod habitat;
mod happiness;
mod incubation;
mod lose;
mod prestige;
mod service;

pub use care::*;
pub use economy::*;
pub use events::*;
pub use habitat::*;
pub use happiness::*;
pub use incubation::*;
pub use lose::*;
pub use prestige::*;
pub use service::*;

use hatchery_logic::config::GameConfig;
use rand::RngCore;

use crate::report::StepReport;
use crate::state::RunState;

/// Everything a stage may read or mutate during one step
pub struct StepContext<'a> {
    pub state: &'a mut RunState,
    pub config: &'a GameConfig,
    /// Permanent income multiplier earned through prestige
    pub prestige_multiplier: f64,
    pub rng: &'a mut dyn RngCore,
    /// Clock reading (ms)
    pub now: u64,
    pub report: &'a mut StepReport,
}

/// One stage of the step pipeline
pub trait Tickable {
    fn name(&self) -> &'static str;
    fn step(&self, ctx: &mut StepContext<'_>);
}

/// Stages in execution order.
pub const PIPELINE: &[&dyn Tickable] = &[
    &Incubation,
    &ServiceQueues,
    &CareDecay,
    &HabitatEffects,
    &HappinessUpdate,
    &EventInjector,
    &IncomeUpdate,
    &LoseCheck,
];
