//! Pure game rules for Hatchery.
//!
//! This crate contains all game logic that is independent of the ECS world,
//! the scheduler, or any host. Functions take plain data and return results,
//! making them unit-testable and reusable by the engine, the headless
//! harness, and any UI shell.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Egg types, rarities, habitats and their static content tables |
//! | [`config`] | Tunable `GameConfig` (rates, thresholds, costs, multipliers) |
//! | [`care`] | Hunger/cleanliness decay, neglect counter, sickness trigger |
//! | [`happiness`] | Happiness drift and the happiness → income multiplier table |
//! | [`habitat`] | Habitat capacity and origin-fit multipliers |
//! | [`economy`] | Effective income, income gating, service and sale prices |
//! | [`events`] | Random event templates and their forward/revert effects |

pub mod care;
pub mod catalog;
pub mod config;
pub mod economy;
pub mod events;
pub mod habitat;
pub mod happiness;

/// Lower bound for hunger, cleanliness and happiness.
pub const STAT_MIN: f64 = 0.0;

/// Upper bound for hunger, cleanliness and happiness.
pub const STAT_MAX: f64 = 100.0;

/// Clamp a care stat into `[STAT_MIN, STAT_MAX]`.
pub fn clamp_stat(value: f64) -> f64 {
    if value.is_nan() {
        return STAT_MIN;
    }
    value.clamp(STAT_MIN, STAT_MAX)
}
