//! Hatchery Core - Idle Creature Hatchery Simulation Engine
//!
//! A tick-driven simulation of an egg hatchery: eggs incubate into animals,
//! animals need feeding, cleaning and the occasional clinic visit, and happy
//! animals earn coins.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Animals and eggs
//! - **Components**: Pure data attached to entities (Animal, Care, Placement, Egg, ...)
//! - **Systems**: Free functions over the run state, run as a fixed pipeline
//!   (incubation, service queues, care decay, habitat, happiness, events,
//!   economy, lose check)
//!
//! Everything a step touches lives in one [`state::RunState`] owned by the
//! [`engine::SimulationEngine`]. Player actions return
//! `Result<_, ActionError>`; the step itself never fails and reports
//! problems as diagnostics.
//!
//! # Example
//!
//! ```rust,no_run
//! use hatchery_core::prelude::*;
//! use hatchery_logic::catalog::EggType;
//!
//! let mut engine = SimulationEngine::new(GameConfig::default(), 0);
//! let mut scheduler = Scheduler::new(engine.config().tick_ms);
//! scheduler.start(0);
//!
//! engine.purchase_egg(EggType::Common, 0).expect("enough coins");
//!
//! let mut now = 0;
//! loop {
//!     now += 250;
//!     scheduler.poll(&mut engine, now, |engine, report| {
//!         println!("{:.1} coins (+{:.1})", engine.balance(), report.income);
//!     });
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod report;
pub mod scheduler;
pub mod state;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::GameConfig;
    pub use crate::engine::SimulationEngine;
    pub use crate::error::{ActionError, Diagnostic};
    pub use crate::leaderboard::{Leaderboard, MemoryLeaderboard, RankedRun};
    pub use crate::report::StepReport;
    pub use crate::scheduler::Scheduler;
    pub use crate::systems::{GameOverReason, RunSummary, ServiceKind};
}
