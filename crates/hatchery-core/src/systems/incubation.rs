//! Incubation system - egg purchase and hatching

use hecs::Entity;
use hatchery_logic::catalog::EggType;
use hatchery_logic::config::GameConfig;
use rand::seq::SliceRandom;
use rand::RngCore;

use super::{StepContext, Tickable};
use crate::components::{Egg, EggId};
use crate::error::{ActionError, Diagnostic};
use crate::report::StepReport;
use crate::state::RunState;

/// Buy an egg and start incubating it at `now`.
pub fn purchase_egg(
    state: &mut RunState,
    config: &GameConfig,
    egg_type: EggType,
    now: u64,
) -> Result<EggId, ActionError> {
    let spec = config
        .catalog
        .egg(egg_type)
        .ok_or(ActionError::UnknownEggType(egg_type))?;
    state.charge(spec.price)?;
    let id = state.spawn_egg(egg_type, now, spec.hatch_ms);
    log::debug!("Bought {} (egg {}) for {:.1}", spec.name, id, spec.price);
    Ok(id)
}

/// Hatch every egg whose incubation time has elapsed.
///
/// Each due egg is removed and replaced by one animal drawn uniformly from
/// its pool. An egg with no usable pool resolves without an animal.
pub fn hatch_eggs(
    state: &mut RunState,
    config: &GameConfig,
    now: u64,
    rng: &mut dyn RngCore,
    report: &mut StepReport,
) {
    let mut due: Vec<(Entity, Egg)> = state
        .world
        .query::<&Egg>()
        .iter()
        .filter(|(_, egg)| egg.is_due(now))
        .map(|(entity, egg)| (entity, egg.clone()))
        .collect();
    due.sort_by_key(|(_, egg)| egg.id);

    for (entity, egg) in due {
        let _ = state.world.despawn(entity);

        let pool = config
            .catalog
            .egg(egg.egg_type)
            .map(|spec| spec.pool.as_slice())
            .unwrap_or(&[]);

        match pool.choose(rng) {
            Some(template) => {
                let id = state.spawn_animal(egg.egg_type, template, config);
                log::info!(
                    "Egg {} hatched into {} {} (animal {})",
                    egg.id,
                    template.icon,
                    template.name,
                    id
                );
                report.hatched.push(id);
            }
            None => report.diagnose(Diagnostic::EmptyCreaturePool(egg.egg_type)),
        }
    }
}

/// Pipeline stage for [`hatch_eggs`]
pub struct Incubation;

impl Tickable for Incubation {
    fn name(&self) -> &'static str {
        "incubation"
    }

    fn step(&self, ctx: &mut StepContext<'_>) {
        hatch_eggs(ctx.state, ctx.config, ctx.now, ctx.rng, ctx.report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup(balance: f64) -> (RunState, GameConfig) {
        let config = GameConfig::default();
        (RunState::new(&config, balance, 0), config)
    }

    #[test]
    fn test_purchase_deducts_price() {
        let (mut state, config) = setup(100.0);
        let id = purchase_egg(&mut state, &config, EggType::Common, 0).unwrap();
        assert_eq!(id, 0);
        assert_eq!(state.balance, 80.0);
        assert_eq!(state.egg_count(), 1);
    }

    #[test]
    fn test_purchase_insufficient_funds() {
        let (mut state, config) = setup(10.0);
        let err = purchase_egg(&mut state, &config, EggType::Common, 0).unwrap_err();
        assert!(matches!(err, ActionError::InsufficientFunds { .. }));
        assert_eq!(state.balance, 10.0);
        assert_eq!(state.egg_count(), 0);
    }

    #[test]
    fn test_purchase_unknown_type() {
        let (mut state, mut config) = setup(1_000.0);
        config.catalog.eggs.retain(|e| e.egg_type != EggType::Mystic);
        let err = purchase_egg(&mut state, &config, EggType::Mystic, 0).unwrap_err();
        assert_eq!(err, ActionError::UnknownEggType(EggType::Mystic));
    }

    #[test]
    fn test_hatch_produces_exactly_one_animal() {
        let (mut state, config) = setup(100.0);
        let mut rng = StdRng::seed_from_u64(7);
        let mut report = StepReport::new(0);
        purchase_egg(&mut state, &config, EggType::Common, 1_000).unwrap();

        hatch_eggs(&mut state, &config, 8_999, &mut rng, &mut report);
        assert_eq!(state.egg_count(), 1);
        assert_eq!(state.animal_count(), 0);

        hatch_eggs(&mut state, &config, 9_000, &mut rng, &mut report);
        assert_eq!(state.egg_count(), 0);
        assert_eq!(state.animal_count(), 1);
        assert_eq!(report.hatched, vec![0]);

        let record = state.animal_record(0).unwrap();
        assert_eq!(record.care.hunger, 100.0);
        assert_eq!(record.care.cleanliness, 100.0);
        assert_eq!(record.care.happiness, 70.0);
        assert!(record.care.is_healthy());
        assert_eq!(record.placement.habitat, None);
        assert_eq!(record.animal.origin, EggType::Common);
    }

    #[test]
    fn test_pending_eggs_keep_order() {
        let (mut state, config) = setup(1_000.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut report = StepReport::new(0);
        purchase_egg(&mut state, &config, EggType::Forest, 0).unwrap();
        purchase_egg(&mut state, &config, EggType::Common, 0).unwrap();
        purchase_egg(&mut state, &config, EggType::Ocean, 0).unwrap();

        hatch_eggs(&mut state, &config, 10_000, &mut rng, &mut report);
        let left: Vec<EggType> = state.eggs().iter().map(|e| e.egg_type).collect();
        assert_eq!(left, vec![EggType::Forest, EggType::Ocean]);
    }

    #[test]
    fn test_empty_pool_resolves_with_diagnostic() {
        let (mut state, mut config) = setup(100.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut report = StepReport::new(0);
        purchase_egg(&mut state, &config, EggType::Common, 0).unwrap();
        for egg in &mut config.catalog.eggs {
            egg.pool.clear();
        }

        hatch_eggs(&mut state, &config, 8_000, &mut rng, &mut report);
        assert_eq!(state.egg_count(), 0);
        assert_eq!(state.animal_count(), 0);
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::EmptyCreaturePool(EggType::Common)]
        );
    }
}
