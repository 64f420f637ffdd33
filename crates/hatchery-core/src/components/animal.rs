//! Animal components - identity, care stats, placement, earnings.

use hatchery_logic::catalog::{CreatureTemplate, EggType, HabitatKind, Rarity};
use hatchery_logic::clamp_stat;
use hatchery_logic::config::CareTuning;
use serde::{Deserialize, Serialize};

/// Monotonic animal identifier, assigned in hatch order.
pub type AnimalId = u32;

/// Identity of an owned creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,
    pub name: String,
    pub icon: String,
    pub rarity: Rarity,
    /// Egg type this animal hatched from
    pub origin: EggType,
    /// Coins per step before multipliers
    pub base_income: f64,
}

impl Animal {
    pub fn from_template(id: AnimalId, origin: EggType, template: &CreatureTemplate) -> Self {
        Self {
            id,
            name: template.name.clone(),
            icon: template.icon.clone(),
            rarity: template.rarity,
            origin,
            base_income: template.base_income,
        }
    }
}

/// Health state machine: healthy ⇄ sick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Health {
    Healthy,
    Sick,
}

/// Care stats - all three values stay within [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Care {
    pub hunger: f64,
    pub cleanliness: f64,
    pub happiness: f64,
    pub health: Health,
    /// Consecutive-neglect counter (saturating)
    pub neglect: u32,
}

impl Care {
    /// Stats of a freshly hatched animal
    pub fn fresh(tuning: &CareTuning) -> Self {
        Self {
            hunger: clamp_stat(tuning.fresh_hunger),
            cleanliness: clamp_stat(tuning.fresh_cleanliness),
            happiness: clamp_stat(tuning.fresh_happiness),
            health: Health::Healthy,
            neglect: 0,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.health == Health::Healthy
    }

    pub fn add_hunger(&mut self, amount: f64) {
        self.hunger = clamp_stat(self.hunger + amount);
    }

    pub fn add_cleanliness(&mut self, amount: f64) {
        self.cleanliness = clamp_stat(self.cleanliness + amount);
    }

    pub fn add_happiness(&mut self, amount: f64) {
        self.happiness = clamp_stat(self.happiness + amount);
    }
}

/// Habitat placement and its fit multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub habitat: Option<HabitatKind>,
    pub multiplier: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            habitat: None,
            multiplier: 1.0,
        }
    }
}

/// Derived income values, refreshed every step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Earnings {
    pub happiness_multiplier: f64,
    pub effective_income: f64,
}

impl Earnings {
    pub fn neutral(base_income: f64) -> Self {
        Self {
            happiness_multiplier: 1.0,
            effective_income: base_income,
        }
    }
}

/// Owned snapshot of every component of one animal.
///
/// Handed to the presentation layer and written to save files; the live
/// data stays in the ECS world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalRecord {
    pub animal: Animal,
    pub care: Care,
    pub placement: Placement,
    pub earnings: Earnings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_care_defaults() {
        let care = Care::fresh(&CareTuning::default());
        assert_eq!(care.hunger, 100.0);
        assert_eq!(care.cleanliness, 100.0);
        assert_eq!(care.happiness, 70.0);
        assert!(care.is_healthy());
        assert_eq!(care.neglect, 0);
    }

    #[test]
    fn test_care_mutators_clamp() {
        let mut care = Care::fresh(&CareTuning::default());
        care.add_hunger(50.0);
        care.add_cleanliness(-500.0);
        care.add_happiness(45.0);
        assert_eq!(care.hunger, 100.0);
        assert_eq!(care.cleanliness, 0.0);
        assert_eq!(care.happiness, 100.0);
    }
}
