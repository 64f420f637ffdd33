//! Run and prestige management
//!
//! A prestige trades the current run for a permanent income multiplier. A
//! restart abandons the run with no reward. Both rebuild [`RunState`] from
//! scratch; only [`PrestigeRecord`] carries over.

use hatchery_logic::catalog::Rarity;
use hatchery_logic::config::GameConfig;
use hatchery_logic::economy::prestige_points;
use serde::{Deserialize, Serialize};

use crate::components::Animal;
use crate::error::ActionError;
use crate::state::RunState;

/// Summary of a finished run, handed to the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub balance: f64,
    /// Animals owned at the end of the run
    pub animal_count: usize,
    pub highest_rarity: Option<Rarity>,
    pub elapsed_ms: u64,
    pub prestige_before: u32,
    pub prestige_after: u32,
}

/// Permanent progress; survives restart and prestige
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrestigeRecord {
    pub count: u32,
    /// Cumulative prestige points
    pub points: u64,
    /// Permanent income multiplier applied to every animal
    pub global_multiplier: f64,
    /// Every prestiged run, oldest first
    pub archive: Vec<RunSummary>,
}

impl Default for PrestigeRecord {
    fn default() -> Self {
        Self {
            count: 0,
            points: 0,
            global_multiplier: 1.0,
            archive: Vec::new(),
        }
    }
}

/// Check the prestige thresholds, explaining the first one not met.
pub fn check_prestige(state: &RunState, config: &GameConfig) -> Result<(), ActionError> {
    let tuning = &config.prestige;
    if state.balance < tuning.min_balance {
        return Err(ActionError::PrestigeLocked {
            reason: format!(
                "need {:.0} coins, have {:.0}",
                tuning.min_balance, state.balance
            ),
        });
    }
    let animals = state.animal_count();
    if animals < tuning.min_animals {
        return Err(ActionError::PrestigeLocked {
            reason: format!("need {} animals, have {}", tuning.min_animals, animals),
        });
    }
    Ok(())
}

pub fn can_prestige(state: &RunState, config: &GameConfig) -> bool {
    check_prestige(state, config).is_ok()
}

/// Snapshot the current run.
pub fn summarize_run(state: &RunState, record: &PrestigeRecord, now: u64) -> RunSummary {
    let highest_rarity = state
        .world
        .query::<&Animal>()
        .iter()
        .map(|(_, animal)| animal.rarity)
        .max();

    RunSummary {
        balance: state.balance,
        animal_count: state.animal_count(),
        highest_rarity,
        elapsed_ms: now.saturating_sub(state.started_at),
        prestige_before: record.count,
        prestige_after: record.count + 1,
    }
}

/// Cash in the current run. On success the permanent record is credited, the
/// summary archived, and `state` replaced by a fresh run.
pub fn prestige_run(
    state: &mut RunState,
    record: &mut PrestigeRecord,
    config: &GameConfig,
    now: u64,
) -> Result<RunSummary, ActionError> {
    check_prestige(state, config)?;

    let summary = summarize_run(state, record, now);
    let points = prestige_points(state.balance, config.prestige.points_divisor);

    record.count += 1;
    record.points += points;
    record.global_multiplier += config.prestige.multiplier_increment;
    record.archive.push(summary.clone());

    *state = RunState::new(config, config.prestige.starting_balance, now);
    log::info!(
        "Prestige #{}: +{} points, multiplier now {:.2}x",
        record.count,
        points,
        record.global_multiplier
    );
    Ok(summary)
}

/// Abandon the current run and start over. Permanent progress is untouched.
pub fn restart_run(state: &mut RunState, config: &GameConfig, now: u64) {
    *state = RunState::new(config, config.starting_balance, now);
    log::info!("Run restarted with {:.0} coins", state.balance);
}
