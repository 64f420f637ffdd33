//! Care system - hunger/cleanliness decay, neglect and sickness, plus the
//! manual feed and clean actions

use hatchery_logic::care::decay_step;
use hatchery_logic::config::{CareTuning, GameConfig};
use hatchery_logic::economy::service_cost;

use super::{ServiceKind, StepContext, Tickable};
use crate::components::{Animal, AnimalId, Care, Health};
use crate::error::ActionError;
use crate::report::StepReport;
use crate::state::RunState;

/// Decay every animal's care stats by one step.
///
/// Animals in the bath this step are skipped, including one whose bath just
/// finished, and so are animals that hatched this step. A healthy animal whose neglect counter reaches the threshold
/// falls sick and loses happiness once.
pub fn care_decay_system(
    state: &mut RunState,
    tuning: &CareTuning,
    report: &mut StepReport,
) {
    let mut skipped: Vec<AnimalId> = report
        .treated
        .iter()
        .filter(|(kind, _)| *kind == ServiceKind::Bath)
        .map(|(_, id)| *id)
        .collect();
    skipped.extend(state.bath.active_animal());
    skipped.extend_from_slice(&report.hatched);

    for (_, (animal, care)) in state.world.query_mut::<(&Animal, &mut Care)>() {
        if skipped.contains(&animal.id) {
            continue;
        }

        let out = decay_step(
            care.hunger,
            care.cleanliness,
            care.neglect,
            care.is_healthy(),
            tuning,
        );
        care.hunger = out.hunger;
        care.cleanliness = out.cleanliness;
        care.neglect = out.neglect;

        if out.fell_sick {
            care.health = Health::Sick;
            care.add_happiness(-tuning.sickness_happiness_penalty);
            log::info!("{} (animal {}) fell sick from neglect", animal.name, animal.id);
            report.fell_sick.push(animal.id);
        }
    }
}

/// Which stat a manual tending action restores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tending {
    Feed,
    Clean,
}

/// Pay to feed or clean an animal on the spot. Returns the price.
pub fn tend_animal(
    state: &mut RunState,
    config: &GameConfig,
    id: AnimalId,
    tending: Tending,
) -> Result<f64, ActionError> {
    let entity = state.find_animal(id).ok_or(ActionError::UnknownAnimal(id))?;

    if tending == Tending::Clean && state.bath.active_animal() == Some(id) {
        return Err(ActionError::AlreadyQueued {
            animal: id,
            service: ServiceKind::Bath,
        });
    }

    let (base_income, current) = {
        let animal = state
            .world
            .get::<&Animal>(entity)
            .map_err(|_| ActionError::UnknownAnimal(id))?;
        let care = state
            .world
            .get::<&Care>(entity)
            .map_err(|_| ActionError::UnknownAnimal(id))?;
        let current = match tending {
            Tending::Feed => care.hunger,
            Tending::Clean => care.cleanliness,
        };
        (animal.base_income, current)
    };

    if current >= 100.0 {
        return Err(ActionError::AlreadyMaxed);
    }

    let multiplier = match tending {
        Tending::Feed => config.economy.feed_cost_multiplier,
        Tending::Clean => config.economy.clean_cost_multiplier,
    };
    let cost = service_cost(base_income, multiplier);
    state.charge(cost)?;

    if let Ok(mut care) = state.world.get::<&mut Care>(entity) {
        match tending {
            Tending::Feed => care.add_hunger(config.care.feed_amount),
            Tending::Clean => care.add_cleanliness(config.care.clean_amount),
        }
        care.add_happiness(config.care.tending_happiness);
    }
    Ok(cost)
}

/// Pipeline stage for [`care_decay_system`]
pub struct CareDecay;

impl Tickable for CareDecay {
    fn name(&self) -> &'static str {
        "care_decay"
    }

    fn step(&self, ctx: &mut StepContext<'_>) {
        care_decay_system(ctx.state, &ctx.config.care, ctx.report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{enqueue_service, step_service};
    use hatchery_logic::catalog::{CreatureTemplate, EggType, Rarity};

    fn setup(balance: f64) -> (RunState, GameConfig) {
        let config = GameConfig::default();
        let mut state = RunState::new(&config, balance, 0);
        let template = CreatureTemplate::new("Chick", "🐤", Rarity::Common, 2.0);
        state.spawn_animal(EggType::Common, &template, &config);
        (state, config)
    }

    fn set_care(state: &mut RunState, id: AnimalId, f: impl FnOnce(&mut Care)) {
        let entity = state.find_animal(id).unwrap();
        let mut care = state.world.get::<&mut Care>(entity).unwrap();
        f(&mut *care);
    }

    fn care_of(state: &RunState, id: AnimalId) -> Care {
        state.animal_record(id).unwrap().care
    }

    #[test]
    fn test_decay_lowers_stats() {
        let (mut state, config) = setup(0.0);
        let mut report = StepReport::new(0);
        care_decay_system(&mut state, &config.care, &mut report);
        let care = care_of(&state, 0);
        assert_eq!(care.hunger, 99.0);
        assert!((care.cleanliness - 99.2).abs() < 1e-9);
    }

    #[test]
    fn test_sick_at_twentieth_neglected_step() {
        let (mut state, config) = setup(0.0);
        set_care(&mut state, 0, |c| {
            c.hunger = 10.0;
            c.cleanliness = 10.0;
        });

        for step in 1..=config.care.sickness_threshold {
            let mut report = StepReport::new(0);
            care_decay_system(&mut state, &config.care, &mut report);
            let care = care_of(&state, 0);
            if step < config.care.sickness_threshold {
                assert_eq!(care.health, Health::Healthy, "sick too early at {}", step);
            } else {
                assert_eq!(care.health, Health::Sick);
                assert_eq!(report.fell_sick, vec![0]);
            }
        }
    }

    #[test]
    fn test_sickness_penalty_applied_once() {
        let (mut state, config) = setup(0.0);
        set_care(&mut state, 0, |c| {
            c.hunger = 0.0;
            c.cleanliness = 0.0;
            c.happiness = 80.0;
            c.neglect = config.care.sickness_threshold - 1;
        });
        let mut report = StepReport::new(0);
        care_decay_system(&mut state, &config.care, &mut report);
        assert_eq!(care_of(&state, 0).happiness, 65.0);
        care_decay_system(&mut state, &config.care, &mut report);
        assert_eq!(care_of(&state, 0).happiness, 65.0);
        assert_eq!(report.fell_sick.len(), 1);
    }

    #[test]
    fn test_sickness_never_self_resolves() {
        let (mut state, config) = setup(0.0);
        set_care(&mut state, 0, |c| c.health = Health::Sick);
        let mut report = StepReport::new(0);
        for _ in 0..50 {
            care_decay_system(&mut state, &config.care, &mut report);
        }
        assert_eq!(care_of(&state, 0).health, Health::Sick);
    }

    #[test]
    fn test_bathing_animal_does_not_decay() {
        let (mut state, config) = setup(100.0);
        let mut report = StepReport::new(0);
        set_care(&mut state, 0, |c| c.hunger = 50.0);
        enqueue_service(&mut state, &config, ServiceKind::Bath, 0).unwrap();
        step_service(&mut state, &config, ServiceKind::Bath, 0, &mut report);

        care_decay_system(&mut state, &config.care, &mut report);
        assert_eq!(care_of(&state, 0).hunger, 50.0);
    }

    #[test]
    fn test_freshly_bathed_animal_does_not_decay() {
        let (mut state, config) = setup(100.0);
        let mut report = StepReport::new(0);
        enqueue_service(&mut state, &config, ServiceKind::Bath, 0).unwrap();
        step_service(&mut state, &config, ServiceKind::Bath, 0, &mut report);

        let mut report = StepReport::new(7_000);
        step_service(&mut state, &config, ServiceKind::Bath, 7_000, &mut report);
        care_decay_system(&mut state, &config.care, &mut report);
        assert_eq!(care_of(&state, 0).cleanliness, 100.0);
    }

    #[test]
    fn test_hatchling_keeps_fresh_stats() {
        let (mut state, config) = setup(0.0);
        let mut report = StepReport::new(8_000);
        report.hatched.push(0);
        care_decay_system(&mut state, &config.care, &mut report);
        let care = care_of(&state, 0);
        assert_eq!(care.hunger, 100.0);
        assert_eq!(care.cleanliness, 100.0);

        let mut report = StepReport::new(9_000);
        care_decay_system(&mut state, &config.care, &mut report);
        assert_eq!(care_of(&state, 0).hunger, 99.0);
    }

    #[test]
    fn test_feed_and_clean() {
        let (mut state, config) = setup(100.0);
        set_care(&mut state, 0, |c| {
            c.hunger = 30.0;
            c.cleanliness = 90.0;
        });

        assert_eq!(tend_animal(&mut state, &config, 0, Tending::Feed), Ok(2.0));
        assert_eq!(care_of(&state, 0).hunger, 70.0);
        assert_eq!(state.balance, 98.0);

        assert_eq!(tend_animal(&mut state, &config, 0, Tending::Clean), Ok(2.0));
        assert_eq!(care_of(&state, 0).cleanliness, 100.0);

        assert_eq!(
            tend_animal(&mut state, &config, 0, Tending::Clean),
            Err(ActionError::AlreadyMaxed)
        );
        assert_eq!(
            tend_animal(&mut state, &config, 5, Tending::Feed),
            Err(ActionError::UnknownAnimal(5))
        );
    }

    #[test]
    fn test_feed_needs_funds() {
        let (mut state, config) = setup(1.0);
        set_care(&mut state, 0, |c| c.hunger = 30.0);
        assert!(matches!(
            tend_animal(&mut state, &config, 0, Tending::Feed),
            Err(ActionError::InsufficientFunds { .. })
        ));
        assert_eq!(care_of(&state, 0).hunger, 30.0);
    }
}
