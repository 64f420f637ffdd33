//! Tunable game configuration.
//!
//! Every rate, threshold and multiplier the simulation uses lives here so the
//! host can rebalance without touching the engine. All sections implement
//! `Default` and are `#[serde(default)]`, so a JSON override only needs the
//! fields it changes.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::events::EventTemplate;

/// Top-level configuration handed to the engine at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Coins at the start of a fresh run.
    pub starting_balance: f64,
    /// Scheduler period in milliseconds.
    pub tick_ms: u64,
    pub care: CareTuning,
    pub happiness: HappinessTuning,
    pub service: ServiceTuning,
    pub habitat: HabitatTuning,
    pub events: EventTuning,
    pub economy: EconomyTuning,
    pub prestige: PrestigeTuning,
    pub catalog: Catalog,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: 100.0,
            tick_ms: 1_000,
            care: CareTuning::default(),
            happiness: HappinessTuning::default(),
            service: ServiceTuning::default(),
            habitat: HabitatTuning::default(),
            events: EventTuning::default(),
            economy: EconomyTuning::default(),
            prestige: PrestigeTuning::default(),
            catalog: Catalog::default(),
        }
    }
}

impl GameConfig {
    /// Check cross-field consistency. Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_ms == 0 {
            return Err("tick_ms must be positive".to_string());
        }
        if self.care.sickness_threshold == 0 {
            return Err("care.sickness_threshold must be positive".to_string());
        }
        if self.care.neglect_ceiling < self.care.sickness_threshold {
            return Err(format!(
                "care.neglect_ceiling ({}) is below sickness_threshold ({})",
                self.care.neglect_ceiling, self.care.sickness_threshold
            ));
        }
        if self.happiness.tiers.windows(2).any(|w| w[0].min <= w[1].min) {
            return Err("happiness.tiers must be sorted by descending min".to_string());
        }
        if !(0.0..=1.0).contains(&self.events.trigger_chance) {
            return Err("events.trigger_chance must lie in [0, 1]".to_string());
        }
        for factor in [self.events.boost_factor, self.events.slump_factor] {
            if factor <= 0.0 {
                return Err("event income factors must be positive".to_string());
            }
        }
        if self.prestige.points_divisor <= 0.0 {
            return Err("prestige.points_divisor must be positive".to_string());
        }
        if self.habitat.max_level == 0 {
            return Err("habitat.max_level must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Hunger/cleanliness decay, neglect and sickness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareTuning {
    /// Hunger lost per step.
    pub hunger_decay: f64,
    /// Cleanliness lost per step.
    pub cleanliness_decay: f64,
    /// Hunger strictly below this counts toward neglect.
    pub neglect_hunger_below: f64,
    /// Cleanliness strictly below this counts toward neglect.
    pub neglect_cleanliness_below: f64,
    /// The neglect counter never exceeds this.
    pub neglect_ceiling: u32,
    /// Neglect count at which a healthy animal falls sick.
    pub sickness_threshold: u32,
    /// One-time happiness loss when falling sick.
    pub sickness_happiness_penalty: f64,
    pub fresh_hunger: f64,
    pub fresh_cleanliness: f64,
    pub fresh_happiness: f64,
    /// Hunger restored by a manual feed.
    pub feed_amount: f64,
    /// Cleanliness restored by a manual clean.
    pub clean_amount: f64,
    /// Happiness gained from a manual feed or clean.
    pub tending_happiness: f64,
}

impl Default for CareTuning {
    fn default() -> Self {
        Self {
            hunger_decay: 1.0,
            cleanliness_decay: 0.8,
            neglect_hunger_below: 30.0,
            neglect_cleanliness_below: 30.0,
            neglect_ceiling: 30,
            sickness_threshold: 20,
            sickness_happiness_penalty: 15.0,
            fresh_hunger: 100.0,
            fresh_cleanliness: 100.0,
            fresh_happiness: 70.0,
            feed_amount: 40.0,
            clean_amount: 40.0,
            tending_happiness: 2.0,
        }
    }
}

/// One row of the happiness → income multiplier table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HappinessTier {
    /// Inclusive lower bound on happiness.
    pub min: f64,
    pub multiplier: f64,
}

/// Happiness drift, penalties, bonus and the multiplier table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HappinessTuning {
    /// Natural loss per step.
    pub drift: f64,
    /// Hunger below this is "hungry".
    pub well_fed_threshold: f64,
    /// Cleanliness below this is "dirty".
    pub clean_threshold: f64,
    pub hungry_penalty: f64,
    pub dirty_penalty: f64,
    pub sick_penalty: f64,
    /// Gain when well fed, clean and healthy at once.
    pub content_bonus: f64,
    /// Sorted by descending `min`.
    pub tiers: Vec<HappinessTier>,
    /// Multiplier when no tier matches.
    pub floor_multiplier: f64,
}

impl Default for HappinessTuning {
    fn default() -> Self {
        Self {
            drift: 0.2,
            well_fed_threshold: 50.0,
            clean_threshold: 50.0,
            hungry_penalty: 0.5,
            dirty_penalty: 0.5,
            sick_penalty: 1.0,
            content_bonus: 0.6,
            tiers: vec![
                HappinessTier { min: 90.0, multiplier: 1.3 },
                HappinessTier { min: 80.0, multiplier: 1.2 },
                HappinessTier { min: 60.0, multiplier: 1.1 },
                HappinessTier { min: 40.0, multiplier: 1.0 },
                HappinessTier { min: 20.0, multiplier: 0.75 },
            ],
            floor_multiplier: 0.5,
        }
    }
}

/// Bath house and clinic parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceTuning {
    /// Bath cost = base income × this.
    pub bath_cost_multiplier: f64,
    pub bath_duration_ms: u64,
    pub bath_happiness_boost: f64,
    /// Clinic cost = base income × this.
    pub clinic_cost_multiplier: f64,
    pub clinic_duration_ms: u64,
    pub clinic_happiness_boost: f64,
}

impl Default for ServiceTuning {
    fn default() -> Self {
        Self {
            bath_cost_multiplier: 6.0,
            bath_duration_ms: 7_000,
            bath_happiness_boost: 5.0,
            clinic_cost_multiplier: 10.0,
            clinic_duration_ms: 12_000,
            clinic_happiness_boost: 10.0,
        }
    }
}

/// Habitat happiness effects and upgrades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitatTuning {
    /// Happiness lost per step while unassigned.
    pub homeless_drain: f64,
    /// Happiness gained per step in a compatible habitat.
    pub fit_gain: f64,
    /// Happiness lost per step in an incompatible habitat.
    pub mismatch_loss: f64,
    /// Upgrade cost = this × current level.
    pub upgrade_base_cost: f64,
    pub max_level: u32,
}

impl Default for HabitatTuning {
    fn default() -> Self {
        Self {
            homeless_drain: 0.1,
            fit_gain: 0.2,
            mismatch_loss: 0.1,
            upgrade_base_cost: 100.0,
            max_level: 5,
        }
    }
}

/// Random event trigger and effect sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventTuning {
    /// Minimum time between two triggered events.
    pub cooldown_ms: u64,
    /// Chance per eligible step that an event fires.
    pub trigger_chance: f64,
    /// Templates eligible for the uniform draw.
    pub templates: Vec<EventTemplate>,
    /// How many past events the history keeps.
    pub history_len: usize,
    pub coin_shower_amount: f64,
    pub tax_amount: f64,
    pub feast_hunger: f64,
    pub mud_cleanliness: f64,
    pub sunshine_happiness: f64,
    /// Income factor while a golden hour is active. Powers of two keep the
    /// revert exact in floating point.
    pub boost_factor: f64,
    pub boost_duration_ms: u64,
    /// Income factor while a gloomy spell is active.
    pub slump_factor: f64,
    pub slump_duration_ms: u64,
}

impl Default for EventTuning {
    fn default() -> Self {
        Self {
            cooldown_ms: 60_000,
            trigger_chance: 0.05,
            templates: EventTemplate::ALL.to_vec(),
            history_len: 20,
            coin_shower_amount: 50.0,
            tax_amount: 25.0,
            feast_hunger: 30.0,
            mud_cleanliness: 20.0,
            sunshine_happiness: 10.0,
            boost_factor: 2.0,
            boost_duration_ms: 30_000,
            slump_factor: 0.5,
            slump_duration_ms: 20_000,
        }
    }
}

/// Per-animal prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    /// Sale value = base income × this.
    pub sale_multiplier: f64,
    /// Feed cost = base income × this.
    pub feed_cost_multiplier: f64,
    /// Clean cost = base income × this.
    pub clean_cost_multiplier: f64,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            sale_multiplier: 10.0,
            feed_cost_multiplier: 1.0,
            clean_cost_multiplier: 1.0,
        }
    }
}

/// Prestige thresholds and rewards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrestigeTuning {
    pub min_balance: f64,
    pub min_animals: usize,
    /// Added to the permanent income multiplier per prestige.
    pub multiplier_increment: f64,
    /// Balance a run starts with after prestiging.
    pub starting_balance: f64,
    /// Points awarded = floor(balance / this), at least one.
    pub points_divisor: f64,
}

impl Default for PrestigeTuning {
    fn default() -> Self {
        Self {
            min_balance: 10_000.0,
            min_animals: 10,
            multiplier_increment: 0.1,
            starting_balance: 100.0,
            points_divisor: 1_000.0,
        }
    }
}
