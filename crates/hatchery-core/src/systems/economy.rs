//! Economy system - per-animal income aggregation and selling

use hatchery_logic::config::GameConfig;
use hatchery_logic::economy::{contribution, effective_income, sale_value, IncomeFactors};

use super::{release_from_services, StepContext, Tickable};
use crate::components::{Animal, AnimalId, Care, Earnings, Placement};
use crate::error::ActionError;
use crate::report::StepReport;
use crate::state::RunState;

/// Compute every animal's effective income, pay out the earners, and record
/// the total as this step's income.
pub fn income_system(state: &mut RunState, prestige_multiplier: f64, report: &mut StepReport) {
    let event_multiplier = state.events.income_multiplier;
    let bathing = state.bath.active_animal();
    let treated = state.clinic.active_animal();

    let mut total = 0.0;
    for (_, (animal, care, placement, earnings)) in state
        .world
        .query_mut::<(&Animal, &Care, &Placement, &mut Earnings)>()
    {
        let factors = IncomeFactors {
            base: animal.base_income,
            happiness: earnings.happiness_multiplier,
            habitat: placement.multiplier,
            prestige: prestige_multiplier,
            event: event_multiplier,
        };
        let in_treatment = bathing == Some(animal.id) || treated == Some(animal.id);
        earnings.effective_income = effective_income(&factors);
        total += contribution(
            &factors,
            care.is_healthy(),
            in_treatment,
            care.hunger,
            care.cleanliness,
        );
    }

    state.balance += total;
    state.income_per_step = total;
    report.income = total;
}

/// Sell an animal for its sale value. Waiting service entries are refunded
/// and the animal leaves its habitat. Returns the coins received.
pub fn sell_animal(
    state: &mut RunState,
    config: &GameConfig,
    id: AnimalId,
) -> Result<f64, ActionError> {
    let base = state.base_income(id).ok_or(ActionError::UnknownAnimal(id))?;

    let refund = release_from_services(state, id);
    state.habitats.vacate(id);
    state.remove_animal(id);

    let value = sale_value(base, config.economy.sale_multiplier);
    state.balance += value;
    log::debug!("Sold animal {} for {:.1} (refund {:.1})", id, value, refund);
    Ok(value + refund)
}

/// Pipeline stage for [`income_system`]
pub struct IncomeUpdate;

impl Tickable for IncomeUpdate {
    fn name(&self) -> &'static str {
        "economy"
    }

    fn step(&self, ctx: &mut StepContext<'_>) {
        income_system(ctx.state, ctx.prestige_multiplier, ctx.report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Health;
    use crate::systems::{enqueue_service, step_service, ServiceKind};
    use hatchery_logic::catalog::{CreatureTemplate, EggType, HabitatKind, Rarity};

    fn setup(base: f64, balance: f64) -> (RunState, GameConfig) {
        let config = GameConfig::default();
        let mut state = RunState::new(&config, balance, 0);
        let template = CreatureTemplate::new("Bunny", "🐰", Rarity::Common, base);
        state.spawn_animal(EggType::Common, &template, &config);
        (state, config)
    }

    fn set_care(state: &mut RunState, f: impl FnOnce(&mut Care)) {
        let entity = state.find_animal(0).unwrap();
        let mut care = state.world.get::<&mut Care>(entity).unwrap();
        f(&mut *care);
    }

    fn set_happiness_multiplier(state: &mut RunState, multiplier: f64) {
        let entity = state.find_animal(0).unwrap();
        state
            .world
            .get::<&mut Earnings>(entity)
            .unwrap()
            .happiness_multiplier = multiplier;
    }

    #[test]
    fn test_reference_contribution() {
        let (mut state, _) = setup(2.0, 0.0);
        set_care(&mut state, |c| {
            c.hunger = 50.0;
            c.cleanliness = 50.0;
        });
        set_happiness_multiplier(&mut state, 1.1);
        let mut report = StepReport::new(0);

        income_system(&mut state, 1.0, &mut report);

        assert!((report.income - 2.2).abs() < 1e-9);
        assert!((state.balance - 2.2).abs() < 1e-9);
        assert_eq!(state.income_per_step, report.income);
    }

    #[test]
    fn test_all_multipliers_compose() {
        let (mut state, _) = setup(2.0, 0.0);
        set_happiness_multiplier(&mut state, 1.2);
        let entity = state.find_animal(0).unwrap();
        state.world.get::<&mut Placement>(entity).unwrap().multiplier = 1.25;
        state.events.income_multiplier = 2.0;
        let mut report = StepReport::new(0);

        income_system(&mut state, 1.5, &mut report);
        assert!((report.income - 2.0 * 1.2 * 1.25 * 1.5 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_income_gating() {
        let gated: [fn(&mut Care); 3] = [
            |c| c.hunger = 0.0,
            |c| c.cleanliness = 0.0,
            |c| c.health = Health::Sick,
        ];
        for gate in gated {
            let (mut state, _) = setup(5.0, 0.0);
            set_care(&mut state, gate);
            let mut report = StepReport::new(0);
            income_system(&mut state, 3.0, &mut report);
            assert_eq!(report.income, 0.0);
            assert_eq!(state.balance, 0.0);
        }
    }

    #[test]
    fn test_bathing_animal_earns_nothing() {
        let (mut state, config) = setup(1.0, 100.0);
        let mut report = StepReport::new(0);
        enqueue_service(&mut state, &config, ServiceKind::Bath, 0).unwrap();
        step_service(&mut state, &config, ServiceKind::Bath, 0, &mut report);

        income_system(&mut state, 1.0, &mut report);
        assert_eq!(report.income, 0.0);
    }

    #[test]
    fn test_sell_refunds_waiting_service() {
        let (mut state, config) = setup(3.0, 100.0);
        let template = CreatureTemplate::new("Bunny", "🐰", Rarity::Common, 3.0);
        state.spawn_animal(EggType::Common, &template, &config);
        let mut report = StepReport::new(0);

        enqueue_service(&mut state, &config, ServiceKind::Bath, 0).unwrap();
        step_service(&mut state, &config, ServiceKind::Bath, 0, &mut report);
        enqueue_service(&mut state, &config, ServiceKind::Bath, 1).unwrap();
        assert_eq!(state.balance, 64.0);

        assert_eq!(sell_animal(&mut state, &config, 1), Ok(30.0 + 18.0));
        assert_eq!(state.balance, 112.0);
        assert!(!state.bath.contains(1));
        assert!(!state.contains_animal(1));

        // The bath already under way is forfeited
        assert_eq!(sell_animal(&mut state, &config, 0), Ok(30.0));
        assert_eq!(state.balance, 142.0);
        assert!(state.bath.is_empty());
    }

    #[test]
    fn test_sell_leaves_habitat() {
        let (mut state, config) = setup(3.0, 100.0);
        crate::systems::assign_habitat(&mut state, &config, 0, HabitatKind::Meadow).unwrap();
        sell_animal(&mut state, &config, 0).unwrap();
        assert!(state.habitats.get(HabitatKind::Meadow).unwrap().assigned.is_empty());
        assert_eq!(sell_animal(&mut state, &config, 0), Err(ActionError::UnknownAnimal(0)));
    }
}
