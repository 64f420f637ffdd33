//! Happiness drift and the happiness → income multiplier table.

use crate::clamp_stat;
use crate::config::HappinessTuning;

/// Apply one step of happiness change and clamp to `[0, 100]`.
///
/// Drift always applies. Hunger below the well-fed threshold, cleanliness
/// below the clean threshold, and sickness each add a penalty; when none of
/// the three hold the content bonus is added instead.
pub fn next_happiness(
    happiness: f64,
    hunger: f64,
    cleanliness: f64,
    sick: bool,
    tuning: &HappinessTuning,
) -> f64 {
    let hungry = hunger < tuning.well_fed_threshold;
    let dirty = cleanliness < tuning.clean_threshold;

    let mut delta = -tuning.drift;
    if hungry {
        delta -= tuning.hungry_penalty;
    }
    if dirty {
        delta -= tuning.dirty_penalty;
    }
    if sick {
        delta -= tuning.sick_penalty;
    }
    if !hungry && !dirty && !sick {
        delta += tuning.content_bonus;
    }

    clamp_stat(happiness + delta)
}

/// Discrete income multiplier for a happiness value.
pub fn income_multiplier(happiness: f64, tuning: &HappinessTuning) -> f64 {
    tuning
        .tiers
        .iter()
        .find(|tier| happiness >= tier.min)
        .map(|tier| tier.multiplier)
        .unwrap_or(tuning.floor_multiplier)
}
