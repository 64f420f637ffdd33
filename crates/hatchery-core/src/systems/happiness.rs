//! Happiness system - drift, care penalties, and the income multiplier

use hatchery_logic::config::HappinessTuning;
use hatchery_logic::happiness::{income_multiplier, next_happiness};

use super::{StepContext, Tickable};
use crate::components::{Animal, AnimalId, Care, Earnings};

/// Update happiness for every animal and derive its income multiplier.
/// Animals in `hatched` keep their fresh-hatch mood for this step.
pub fn happiness_system(world: &mut hecs::World, tuning: &HappinessTuning, hatched: &[AnimalId]) {
    for (_, (animal, care, earnings)) in world.query_mut::<(&Animal, &mut Care, &mut Earnings)>() {
        if hatched.contains(&animal.id) {
            continue;
        }
        care.happiness = next_happiness(
            care.happiness,
            care.hunger,
            care.cleanliness,
            !care.is_healthy(),
            tuning,
        );
        earnings.happiness_multiplier = income_multiplier(care.happiness, tuning);
        earnings.effective_income = animal.base_income * earnings.happiness_multiplier;
    }
}

/// Pipeline stage for [`happiness_system`]
pub struct HappinessUpdate;

impl Tickable for HappinessUpdate {
    fn name(&self) -> &'static str {
        "happiness"
    }

    fn step(&self, ctx: &mut StepContext<'_>) {
        happiness_system(&mut ctx.state.world, &ctx.config.happiness, &ctx.report.hatched);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Health, Placement};
    use hecs::World;
    use hatchery_logic::catalog::{EggType, Rarity};
    use hatchery_logic::config::CareTuning;

    fn spawn(world: &mut World, care: Care) -> hecs::Entity {
        let animal = Animal {
            id: 0,
            name: "Owl".to_string(),
            icon: "🦉".to_string(),
            rarity: Rarity::Uncommon,
            origin: EggType::Forest,
            base_income: 4.0,
        };
        world.spawn((animal, care, Placement::default(), Earnings::neutral(4.0)))
    }

    #[test]
    fn test_content_animal_earns_bonus_tier() {
        let mut world = World::new();
        let tuning = HappinessTuning::default();
        let entity = spawn(&mut world, Care {
            happiness: 89.8,
            ..Care::fresh(&CareTuning::default())
        });

        happiness_system(&mut world, &tuning, &[]);

        let earnings = *world.get::<&Earnings>(entity).unwrap();
        assert_eq!(earnings.happiness_multiplier, 1.3);
        assert!((earnings.effective_income - 5.2).abs() < 1e-9);
    }

    #[test]
    fn test_miserable_animal_hits_floor() {
        let mut world = World::new();
        let tuning = HappinessTuning::default();
        let entity = spawn(&mut world, Care {
            hunger: 0.0,
            cleanliness: 0.0,
            happiness: 1.0,
            health: Health::Sick,
            neglect: 30,
        });

        happiness_system(&mut world, &tuning, &[]);

        let care = *world.get::<&Care>(entity).unwrap();
        let earnings = *world.get::<&Earnings>(entity).unwrap();
        assert_eq!(care.happiness, 0.0);
        assert_eq!(earnings.happiness_multiplier, 0.5);
    }

    #[test]
    fn test_hatchling_mood_untouched() {
        let mut world = World::new();
        let tuning = HappinessTuning::default();
        let entity = spawn(&mut world, Care::fresh(&CareTuning::default()));

        happiness_system(&mut world, &tuning, &[0]);

        let care = *world.get::<&Care>(entity).unwrap();
        let earnings = *world.get::<&Earnings>(entity).unwrap();
        assert_eq!(care.happiness, 70.0);
        assert_eq!(earnings.happiness_multiplier, 1.0);
    }
}
