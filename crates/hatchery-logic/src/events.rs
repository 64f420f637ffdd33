//! Random event templates and their effects.
//!
//! Instant events apply once and are gone. Timed events scale the global
//! event income multiplier on start and undo the same factor on expiry.

use serde::{Deserialize, Serialize};

use crate::config::EventTuning;

/// Whether an event applies once or stays active for a while.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Instant,
    Timed,
}

/// All event templates the injector can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTemplate {
    /// Coins fall from the sky.
    CoinShower,
    /// A flat fee is collected. Can push the balance below zero.
    TaxCollector,
    /// Every animal's hunger is topped up.
    FeastDay,
    /// Every animal gets muddy.
    MudSlide,
    /// Every animal cheers up.
    Sunshine,
    /// Income is boosted for a while.
    GoldenHour,
    /// Income is reduced for a while.
    GloomySpell,
}

/// What an event does to shared state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventEffect {
    /// Add to the balance (negative subtracts).
    Coins(f64),
    /// Add to every animal's hunger.
    Hunger(f64),
    /// Add to every animal's cleanliness.
    Cleanliness(f64),
    /// Add to every animal's happiness.
    Happiness(f64),
    /// Multiply the global event income multiplier while active.
    IncomeFactor(f64),
}

impl EventTemplate {
    pub const ALL: [EventTemplate; 7] = [
        EventTemplate::CoinShower,
        EventTemplate::TaxCollector,
        EventTemplate::FeastDay,
        EventTemplate::MudSlide,
        EventTemplate::Sunshine,
        EventTemplate::GoldenHour,
        EventTemplate::GloomySpell,
    ];

    pub fn kind(self) -> EventKind {
        match self {
            EventTemplate::GoldenHour | EventTemplate::GloomySpell => EventKind::Timed,
            _ => EventKind::Instant,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EventTemplate::CoinShower => "Coin shower",
            EventTemplate::TaxCollector => "Tax collector",
            EventTemplate::FeastDay => "Feast day",
            EventTemplate::MudSlide => "Mud slide",
            EventTemplate::Sunshine => "Sunshine",
            EventTemplate::GoldenHour => "Golden hour",
            EventTemplate::GloomySpell => "Gloomy spell",
        }
    }

    /// Active duration in milliseconds; zero for instant events.
    pub fn duration_ms(self, tuning: &EventTuning) -> u64 {
        match self {
            EventTemplate::GoldenHour => tuning.boost_duration_ms,
            EventTemplate::GloomySpell => tuning.slump_duration_ms,
            _ => 0,
        }
    }

    /// Forward effect applied when the event triggers.
    pub fn effect(self, tuning: &EventTuning) -> EventEffect {
        match self {
            EventTemplate::CoinShower => EventEffect::Coins(tuning.coin_shower_amount),
            EventTemplate::TaxCollector => EventEffect::Coins(-tuning.tax_amount),
            EventTemplate::FeastDay => EventEffect::Hunger(tuning.feast_hunger),
            EventTemplate::MudSlide => EventEffect::Cleanliness(-tuning.mud_cleanliness),
            EventTemplate::Sunshine => EventEffect::Happiness(tuning.sunshine_happiness),
            EventTemplate::GoldenHour => EventEffect::IncomeFactor(tuning.boost_factor),
            EventTemplate::GloomySpell => EventEffect::IncomeFactor(tuning.slump_factor),
        }
    }
}

/// Apply a timed factor to the global event multiplier.
pub fn apply_factor(multiplier: f64, factor: f64) -> f64 {
    multiplier * factor
}

/// Undo [`apply_factor`].
pub fn revert_factor(multiplier: f64, factor: f64) -> f64 {
    if factor == 0.0 {
        return multiplier;
    }
    multiplier / factor
}
