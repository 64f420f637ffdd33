//! Events system - random events that shake up the run
//!
//! At most one event fires per cooldown window. Instant events apply once;
//! timed events scale the global event income multiplier and undo exactly
//! the same factor when they expire.

use std::collections::VecDeque;

use hatchery_logic::config::{EventTuning, GameConfig};
use hatchery_logic::events::{apply_factor, revert_factor, EventEffect, EventKind, EventTemplate};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::{StepContext, Tickable};
use crate::components::Care;
use crate::report::StepReport;
use crate::state::RunState;

/// A triggered event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique event ID
    pub id: u32,
    pub template: EventTemplate,
    pub kind: EventKind,
    /// When the event fired (ms)
    pub started_at: u64,
    /// Zero for instant events
    pub duration_ms: u64,
    /// Forward effect as applied
    pub effect: EventEffect,
}

impl EventRecord {
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.started_at) >= self.duration_ms
    }
}

/// Manages active and past events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventManager {
    /// Timed events still in effect
    pub active: Vec<EventRecord>,
    /// Most recent events, newest last
    pub history: VecDeque<EventRecord>,
    /// Global income multiplier from timed events
    pub income_multiplier: f64,
    /// When the last event fired; starts at run start
    pub last_trigger_at: u64,
    next_id: u32,
}

impl EventManager {
    pub fn new(now: u64) -> Self {
        Self {
            active: Vec::new(),
            history: VecDeque::new(),
            income_multiplier: 1.0,
            last_trigger_at: now,
            next_id: 0,
        }
    }

    pub fn cooldown_elapsed(&self, now: u64, cooldown_ms: u64) -> bool {
        now.saturating_sub(self.last_trigger_at) >= cooldown_ms
    }

    /// Revert and drop every timed event whose duration has run out.
    pub fn expire(&mut self, now: u64) -> Vec<EventRecord> {
        let (expired, still_active): (Vec<EventRecord>, Vec<EventRecord>) = self
            .active
            .drain(..)
            .partition(|event| event.is_expired(now));
        self.active = still_active;

        for event in &expired {
            if let EventEffect::IncomeFactor(factor) = event.effect {
                self.income_multiplier = revert_factor(self.income_multiplier, factor);
            }
        }
        if self.active.is_empty() {
            self.income_multiplier = 1.0;
        }
        expired
    }

    fn record(&mut self, template: EventTemplate, now: u64, tuning: &EventTuning) -> EventRecord {
        let event = EventRecord {
            id: self.next_id,
            template,
            kind: template.kind(),
            started_at: now,
            duration_ms: template.duration_ms(tuning),
            effect: template.effect(tuning),
        };
        self.next_id += 1;

        self.history.push_back(event.clone());
        while self.history.len() > tuning.history_len {
            self.history.pop_front();
        }
        event
    }
}

/// Apply an event's forward effect to the run.
pub fn apply_event(state: &mut RunState, effect: EventEffect) {
    match effect {
        EventEffect::Coins(amount) => state.balance += amount,
        EventEffect::IncomeFactor(factor) => {
            state.events.income_multiplier = apply_factor(state.events.income_multiplier, factor);
        }
        EventEffect::Hunger(amount) => {
            for (_, care) in state.world.query_mut::<&mut Care>() {
                care.add_hunger(amount);
            }
        }
        EventEffect::Cleanliness(amount) => {
            for (_, care) in state.world.query_mut::<&mut Care>() {
                care.add_cleanliness(amount);
            }
        }
        EventEffect::Happiness(amount) => {
            for (_, care) in state.world.query_mut::<&mut Care>() {
                care.add_happiness(amount);
            }
        }
    }
}

/// Fire a specific template now, bypassing the cooldown roll.
pub fn trigger_event(
    state: &mut RunState,
    config: &GameConfig,
    template: EventTemplate,
    now: u64,
) -> EventRecord {
    let event = state.events.record(template, now, &config.events);
    apply_event(state, event.effect);
    if event.kind == EventKind::Timed {
        state.events.active.push(event.clone());
    }
    state.events.last_trigger_at = now;
    log::info!("Event: {} ({:?})", template.label(), event.effect);
    event
}

/// Expire finished events, then maybe fire a new one.
pub fn event_system(
    state: &mut RunState,
    config: &GameConfig,
    now: u64,
    rng: &mut dyn RngCore,
    report: &mut StepReport,
) {
    for event in state.events.expire(now) {
        log::info!("Event ended: {}", event.template.label());
        report.expired.push(event.template);
    }

    let tuning = &config.events;
    if !state.events.cooldown_elapsed(now, tuning.cooldown_ms) {
        return;
    }
    if rng.gen::<f64>() >= tuning.trigger_chance {
        return;
    }
    if let Some(&template) = tuning.templates.choose(rng) {
        trigger_event(state, config, template, now);
        report.triggered.push(template);
    }
}

/// Pipeline stage for [`event_system`]
pub struct EventInjector;

impl Tickable for EventInjector {
    fn name(&self) -> &'static str {
        "events"
    }

    fn step(&self, ctx: &mut StepContext<'_>) {
        event_system(ctx.state, ctx.config, ctx.now, ctx.rng, ctx.report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatchery_logic::catalog::{CreatureTemplate, EggType, Rarity};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (RunState, GameConfig) {
        let config = GameConfig::default();
        let mut state = RunState::new(&config, 100.0, 0);
        let template = CreatureTemplate::new("Crab", "🦀", Rarity::Common, 5.0);
        state.spawn_animal(EggType::Ocean, &template, &config);
        (state, config)
    }

    #[test]
    fn test_timed_event_reverts_exactly() {
        let (mut state, config) = setup();
        let mut report = StepReport::new(0);
        let mut rng = StdRng::seed_from_u64(0);

        trigger_event(&mut state, &config, EventTemplate::GoldenHour, 1_000);
        assert_eq!(state.events.income_multiplier, 2.0);
        assert_eq!(state.events.active.len(), 1);

        event_system(&mut state, &config, 30_999, &mut rng, &mut report);
        assert_eq!(state.events.income_multiplier, 2.0);

        event_system(&mut state, &config, 31_000, &mut rng, &mut report);
        assert_eq!(state.events.income_multiplier, 1.0);
        assert!(state.events.active.is_empty());
        assert_eq!(report.expired, vec![EventTemplate::GoldenHour]);
    }

    #[test]
    fn test_overlapping_timed_events() {
        let (mut state, config) = setup();
        trigger_event(&mut state, &config, EventTemplate::GoldenHour, 0);
        trigger_event(&mut state, &config, EventTemplate::GloomySpell, 15_000);
        assert_eq!(state.events.income_multiplier, 1.0);

        // Golden hour ends first while the gloomy spell is still running
        let expired = state.events.expire(30_000);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].template, EventTemplate::GoldenHour);
        assert_eq!(state.events.active.len(), 1);
        assert_eq!(state.events.income_multiplier, 0.5);

        assert!(state.events.expire(34_999).is_empty());
        assert_eq!(state.events.income_multiplier, 0.5);

        let expired = state.events.expire(35_000);
        assert_eq!(expired[0].template, EventTemplate::GloomySpell);
        assert_eq!(state.events.income_multiplier, 1.0);
    }

    #[test]
    fn test_instant_events_not_active() {
        let (mut state, config) = setup();
        trigger_event(&mut state, &config, EventTemplate::CoinShower, 0);
        assert_eq!(state.balance, 150.0);
        trigger_event(&mut state, &config, EventTemplate::TaxCollector, 0);
        assert_eq!(state.balance, 125.0);
        assert!(state.events.active.is_empty());
        assert_eq!(state.events.history.len(), 2);
    }

    #[test]
    fn test_stat_events_clamp() {
        let (mut state, config) = setup();
        trigger_event(&mut state, &config, EventTemplate::FeastDay, 0);
        trigger_event(&mut state, &config, EventTemplate::Sunshine, 0);
        let care = state.animal_record(0).unwrap().care;
        assert_eq!(care.hunger, 100.0);
        assert_eq!(care.happiness, 80.0);

        for _ in 0..10 {
            trigger_event(&mut state, &config, EventTemplate::MudSlide, 0);
        }
        assert_eq!(state.animal_record(0).unwrap().care.cleanliness, 0.0);
    }

    #[test]
    fn test_cooldown_gates_triggers() {
        let (mut state, mut config) = setup();
        config.events.trigger_chance = 1.0;
        config.events.templates = vec![EventTemplate::CoinShower];
        let mut rng = StdRng::seed_from_u64(9);
        let mut report = StepReport::new(0);

        event_system(&mut state, &config, 59_999, &mut rng, &mut report);
        assert!(report.triggered.is_empty());

        event_system(&mut state, &config, 60_000, &mut rng, &mut report);
        event_system(&mut state, &config, 61_000, &mut rng, &mut report);
        assert_eq!(report.triggered, vec![EventTemplate::CoinShower]);
        assert_eq!(state.events.last_trigger_at, 60_000);

        event_system(&mut state, &config, 120_000, &mut rng, &mut report);
        assert_eq!(report.triggered.len(), 2);
    }

    #[test]
    fn test_zero_chance_never_fires() {
        let (mut state, mut config) = setup();
        config.events.trigger_chance = 0.0;
        let mut rng = StdRng::seed_from_u64(1);
        let mut report = StepReport::new(0);
        for step in 0..500u64 {
            event_system(&mut state, &config, step * 60_000, &mut rng, &mut report);
        }
        assert!(report.triggered.is_empty());
        assert!(state.events.history.is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let (mut state, mut config) = setup();
        config.events.history_len = 3;
        for i in 0..10 {
            trigger_event(&mut state, &config, EventTemplate::Sunshine, i);
        }
        let ids: Vec<u32> = state.events.history.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
    }
}
