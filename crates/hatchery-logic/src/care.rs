//! Pure care decay, neglect, and sickness logic.
//!
//! Health is a two-state machine: `Healthy → Sick` after sustained neglect,
//! `Sick → Healthy` only through a clinic treatment. Nothing in here ever
//! heals an animal.

use crate::clamp_stat;
use crate::config::CareTuning;

/// Result of one decay step for a single animal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayOutcome {
    pub hunger: f64,
    pub cleanliness: f64,
    pub neglect: u32,
    /// True only on the step the animal transitions to sick.
    pub fell_sick: bool,
}

/// Lower a stat by `rate`, floored at zero.
pub fn decay_stat(value: f64, rate: f64) -> f64 {
    clamp_stat(value - rate)
}

/// Both hunger and cleanliness are below their neglect thresholds.
pub fn is_neglected(hunger: f64, cleanliness: f64, tuning: &CareTuning) -> bool {
    hunger < tuning.neglect_hunger_below && cleanliness < tuning.neglect_cleanliness_below
}

/// Advance the saturating neglect counter.
pub fn next_neglect(counter: u32, neglected: bool, ceiling: u32) -> u32 {
    if neglected {
        counter.saturating_add(1).min(ceiling)
    } else {
        counter.saturating_sub(1)
    }
}

/// A healthy animal whose neglect counter reached the threshold falls sick.
pub fn should_fall_sick(neglect: u32, healthy: bool, threshold: u32) -> bool {
    healthy && neglect >= threshold
}

/// Run one care step: decay, neglect accounting, sickness check.
pub fn decay_step(
    hunger: f64,
    cleanliness: f64,
    neglect: u32,
    healthy: bool,
    tuning: &CareTuning,
) -> DecayOutcome {
    let hunger = decay_stat(hunger, tuning.hunger_decay);
    let cleanliness = decay_stat(cleanliness, tuning.cleanliness_decay);
    let neglected = is_neglected(hunger, cleanliness, tuning);
    let neglect = next_neglect(neglect, neglected, tuning.neglect_ceiling);

    DecayOutcome {
        hunger,
        cleanliness,
        neglect,
        fell_sick: should_fall_sick(neglect, healthy, tuning.sickness_threshold),
    }
}
