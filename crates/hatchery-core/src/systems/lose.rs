//! Lose-condition evaluator

use hatchery_logic::config::GameConfig;
use serde::{Deserialize, Serialize};

use super::{StepContext, Tickable};
use crate::components::Care;
use crate::state::RunState;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    Bankrupt,
    NoAnimals,
    AllUnhappy,
}

impl GameOverReason {
    pub fn key(self) -> &'static str {
        match self {
            GameOverReason::Bankrupt => "bankrupt",
            GameOverReason::NoAnimals => "no_animals",
            GameOverReason::AllUnhappy => "all_unhappy",
        }
    }
}

/// Terminal flag and reason of the current run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub is_game_over: bool,
    pub reason: Option<GameOverReason>,
}

impl Outcome {
    fn end(&mut self, reason: GameOverReason) {
        self.is_game_over = true;
        self.reason = Some(reason);
    }
}

/// First matching lose condition, in priority order.
pub fn lose_condition(state: &RunState, config: &GameConfig) -> Option<GameOverReason> {
    if state.balance < 0.0 {
        return Some(GameOverReason::Bankrupt);
    }

    let animals = state.animal_count();
    let cheapest = config.catalog.cheapest_egg_price().unwrap_or(0.0);
    if animals == 0 && state.egg_count() == 0 && state.balance < cheapest {
        return Some(GameOverReason::NoAnimals);
    }

    if animals > 0
        && state
            .world
            .query::<&Care>()
            .iter()
            .all(|(_, care)| care.happiness <= 0.0)
    {
        return Some(GameOverReason::AllUnhappy);
    }
    None
}

/// Evaluate the lose conditions once. Returns the reason if this call ended
/// the run; an already-ended run is left untouched.
pub fn evaluate_lose(state: &mut RunState, config: &GameConfig) -> Option<GameOverReason> {
    if state.outcome.is_game_over {
        return None;
    }
    let reason = lose_condition(state, config)?;
    state.outcome.end(reason);
    log::info!("Game over: {}", reason.key());
    Some(reason)
}

/// Pipeline stage for [`evaluate_lose`]
pub struct LoseCheck;

impl Tickable for LoseCheck {
    fn name(&self) -> &'static str {
        "lose_check"
    }

    fn step(&self, ctx: &mut StepContext<'_>) {
        if let Some(reason) = evaluate_lose(ctx.state, ctx.config) {
            ctx.report.game_over = Some(reason);
        }
    }
}
