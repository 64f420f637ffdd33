//! Habitat capacity and origin fit.

use crate::catalog::{EggType, HabitatSpec};
use crate::config::HabitatTuning;

/// How well an animal's placement suits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitatFit {
    /// Not assigned to any habitat.
    Homeless,
    /// Habitat lists the animal's origin as compatible.
    Compatible,
    /// Assigned, but the habitat does not suit the origin.
    Mismatched,
}

/// Capacity of a habitat at `level` (levels start at 1).
pub fn capacity(spec: &HabitatSpec, level: u32) -> u32 {
    let extra_levels = level.max(1) - 1;
    spec.base_capacity + spec.capacity_per_level * extra_levels
}

/// Classify a placement. `spec` is `None` for homeless animals.
pub fn classify(origin: EggType, spec: Option<&HabitatSpec>) -> HabitatFit {
    match spec {
        None => HabitatFit::Homeless,
        Some(spec) if spec.is_compatible(origin) => HabitatFit::Compatible,
        Some(_) => HabitatFit::Mismatched,
    }
}

/// Income multiplier for a placement.
pub fn fit_multiplier(fit: HabitatFit, spec: Option<&HabitatSpec>) -> f64 {
    match (fit, spec) {
        (HabitatFit::Compatible, Some(spec)) => spec.bonus_multiplier,
        (HabitatFit::Mismatched, Some(spec)) => spec.penalty_multiplier,
        _ => 1.0,
    }
}

/// Per-step happiness change for a placement.
pub fn fit_happiness_delta(fit: HabitatFit, tuning: &HabitatTuning) -> f64 {
    match fit {
        HabitatFit::Homeless => -tuning.homeless_drain,
        HabitatFit::Compatible => tuning.fit_gain,
        HabitatFit::Mismatched => -tuning.mismatch_loss,
    }
}

/// Coins needed to raise a habitat from `level` to `level + 1`.
pub fn upgrade_cost(level: u32, tuning: &HabitatTuning) -> f64 {
    tuning.upgrade_base_cost * level.max(1) as f64
}
