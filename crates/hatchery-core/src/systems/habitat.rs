//! Habitat system - capacity-bounded placement and fit multipliers

use std::collections::{BTreeMap, BTreeSet};

use hatchery_logic::catalog::{Catalog, HabitatKind};
use hatchery_logic::config::GameConfig;
use hatchery_logic::habitat::{
    capacity, classify, fit_happiness_delta, fit_multiplier, upgrade_cost,
};
use serde::{Deserialize, Serialize};

use super::{StepContext, Tickable};
use crate::components::{Animal, AnimalId, Care, Placement};
use crate::error::{ActionError, Diagnostic};
use crate::report::StepReport;
use crate::state::RunState;

/// Live state of one habitat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitatSlot {
    pub level: u32,
    pub assigned: BTreeSet<AnimalId>,
}

impl Default for HabitatSlot {
    fn default() -> Self {
        Self {
            level: 1,
            assigned: BTreeSet::new(),
        }
    }
}

/// All habitats of the current run, keyed by kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitatTable {
    pub slots: BTreeMap<HabitatKind, HabitatSlot>,
}

impl HabitatTable {
    /// One level-1 slot per configured habitat.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            slots: catalog
                .habitats
                .iter()
                .map(|spec| (spec.kind, HabitatSlot::default()))
                .collect(),
        }
    }

    pub fn get(&self, kind: HabitatKind) -> Option<&HabitatSlot> {
        self.slots.get(&kind)
    }

    /// Habitat currently holding `id`.
    pub fn habitat_of(&self, id: AnimalId) -> Option<HabitatKind> {
        self.slots
            .iter()
            .find(|(_, slot)| slot.assigned.contains(&id))
            .map(|(kind, _)| *kind)
    }

    /// Remove `id` from whichever habitat holds it.
    pub(crate) fn vacate(&mut self, id: AnimalId) -> Option<HabitatKind> {
        let kind = self.habitat_of(id)?;
        if let Some(slot) = self.slots.get_mut(&kind) {
            slot.assigned.remove(&id);
        }
        Some(kind)
    }
}

/// Move an animal into a habitat, leaving any previous one.
pub fn assign_habitat(
    state: &mut RunState,
    config: &GameConfig,
    id: AnimalId,
    kind: HabitatKind,
) -> Result<(), ActionError> {
    let entity = state.find_animal(id).ok_or(ActionError::UnknownAnimal(id))?;
    let spec = config
        .catalog
        .habitat(kind)
        .ok_or(ActionError::UnknownHabitat(kind))?;
    let slot = state
        .habitats
        .slots
        .get(&kind)
        .ok_or(ActionError::UnknownHabitat(kind))?;

    if slot.assigned.contains(&id) {
        return Ok(());
    }
    let cap = capacity(spec, slot.level);
    if slot.assigned.len() as u32 >= cap {
        return Err(ActionError::HabitatFull {
            habitat: kind,
            capacity: cap,
        });
    }

    state.habitats.vacate(id);
    if let Some(slot) = state.habitats.slots.get_mut(&kind) {
        slot.assigned.insert(id);
    }
    if let Ok(mut placement) = state.world.get::<&mut Placement>(entity) {
        placement.habitat = Some(kind);
    }
    log::debug!("Animal {} moved into {}", id, spec.name);
    Ok(())
}

/// Take an animal out of its habitat.
pub fn unassign_habitat(state: &mut RunState, id: AnimalId) -> Result<HabitatKind, ActionError> {
    let entity = state.find_animal(id).ok_or(ActionError::UnknownAnimal(id))?;
    let kind = state.habitats.vacate(id).ok_or(ActionError::NotInHabitat(id))?;
    if let Ok(mut placement) = state.world.get::<&mut Placement>(entity) {
        *placement = Placement::default();
    }
    Ok(kind)
}

/// Raise a habitat by one level. Returns the price paid.
pub fn upgrade_habitat(
    state: &mut RunState,
    config: &GameConfig,
    kind: HabitatKind,
) -> Result<f64, ActionError> {
    let level = state
        .habitats
        .get(kind)
        .map(|slot| slot.level)
        .ok_or(ActionError::UnknownHabitat(kind))?;
    if level >= config.habitat.max_level {
        return Err(ActionError::AlreadyMaxed);
    }

    let cost = upgrade_cost(level, &config.habitat);
    state.charge(cost)?;
    if let Some(slot) = state.habitats.slots.get_mut(&kind) {
        slot.level += 1;
        log::info!("{} upgraded to level {}", kind.key(), slot.level);
    }
    Ok(cost)
}

/// Prune stale entries, then refresh each animal's habitat multiplier and
/// apply the per-step happiness effect of its placement. Animals that
/// hatched this step are left alone until the next one.
pub fn habitat_system(state: &mut RunState, config: &GameConfig, report: &mut StepReport) {
    let live: BTreeSet<AnimalId> = state.animal_ids().into_iter().collect();
    for (kind, slot) in state.habitats.slots.iter_mut() {
        let stale: Vec<AnimalId> = slot.assigned.difference(&live).copied().collect();
        for animal in stale {
            slot.assigned.remove(&animal);
            report.diagnose(Diagnostic::StaleHabitatEntry {
                animal,
                habitat: *kind,
            });
        }
    }

    let mut missing = BTreeSet::new();
    for (_, (animal, care, placement)) in state
        .world
        .query_mut::<(&Animal, &mut Care, &mut Placement)>()
    {
        if report.hatched.contains(&animal.id) {
            continue;
        }
        let spec = match placement.habitat {
            Some(kind) => match config.catalog.habitat(kind) {
                Some(spec) => Some(spec),
                None => {
                    missing.insert(kind);
                    placement.multiplier = 1.0;
                    continue;
                }
            },
            None => None,
        };

        let fit = classify(animal.origin, spec);
        placement.multiplier = fit_multiplier(fit, spec);
        care.add_happiness(fit_happiness_delta(fit, &config.habitat));
    }

    for kind in missing {
        report.diagnose(Diagnostic::MissingHabitatSpec(kind));
    }
}

/// Pipeline stage for [`habitat_system`]
pub struct HabitatEffects;

impl Tickable for HabitatEffects {
    fn name(&self) -> &'static str {
        "habitat"
    }

    fn step(&self, ctx: &mut StepContext<'_>) {
        habitat_system(ctx.state, ctx.config, ctx.report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatchery_logic::catalog::{CreatureTemplate, EggType, Rarity};

    fn setup(origins: &[EggType]) -> (RunState, GameConfig) {
        let config = GameConfig::default();
        let mut state = RunState::new(&config, 1_000.0, 0);
        for &origin in origins {
            let template = CreatureTemplate::new("Critter", "🐾", Rarity::Common, 1.0);
            state.spawn_animal(origin, &template, &config);
        }
        (state, config)
    }

    fn record(state: &RunState, id: AnimalId) -> crate::components::AnimalRecord {
        state.animal_record(id).unwrap()
    }

    #[test]
    fn test_assign_is_exclusive() {
        let (mut state, config) = setup(&[EggType::Common]);
        assign_habitat(&mut state, &config, 0, HabitatKind::Meadow).unwrap();
        assign_habitat(&mut state, &config, 0, HabitatKind::Aquarium).unwrap();

        assert!(state.habitats.get(HabitatKind::Meadow).unwrap().assigned.is_empty());
        assert!(state.habitats.get(HabitatKind::Aquarium).unwrap().assigned.contains(&0));
        assert_eq!(record(&state, 0).placement.habitat, Some(HabitatKind::Aquarium));
    }

    #[test]
    fn test_capacity_enforced_and_upgrade_lifts_it() {
        let (mut state, config) = setup(&[EggType::Common; 4]);
        for id in 0..3 {
            assign_habitat(&mut state, &config, id, HabitatKind::Meadow).unwrap();
        }
        assert_eq!(
            assign_habitat(&mut state, &config, 3, HabitatKind::Meadow),
            Err(ActionError::HabitatFull {
                habitat: HabitatKind::Meadow,
                capacity: 3
            })
        );

        assert_eq!(upgrade_habitat(&mut state, &config, HabitatKind::Meadow), Ok(100.0));
        assert!(assign_habitat(&mut state, &config, 3, HabitatKind::Meadow).is_ok());
        assert_eq!(state.balance, 900.0);
    }

    #[test]
    fn test_upgrade_stops_at_max_level() {
        let (mut state, mut config) = setup(&[]);
        config.habitat.max_level = 2;
        upgrade_habitat(&mut state, &config, HabitatKind::Dunes).unwrap();
        assert_eq!(
            upgrade_habitat(&mut state, &config, HabitatKind::Dunes),
            Err(ActionError::AlreadyMaxed)
        );
    }

    #[test]
    fn test_reassign_same_habitat_is_noop() {
        let (mut state, config) = setup(&[EggType::Common; 3]);
        for id in 0..3 {
            assign_habitat(&mut state, &config, id, HabitatKind::Meadow).unwrap();
        }
        assert!(assign_habitat(&mut state, &config, 2, HabitatKind::Meadow).is_ok());
    }

    #[test]
    fn test_multipliers_and_happiness() {
        let (mut state, config) = setup(&[EggType::Common, EggType::Ocean, EggType::Forest]);
        let mut report = StepReport::new(0);
        assign_habitat(&mut state, &config, 0, HabitatKind::Meadow).unwrap();
        assign_habitat(&mut state, &config, 1, HabitatKind::Meadow).unwrap();

        habitat_system(&mut state, &config, &mut report);

        let fit = record(&state, 0);
        let misfit = record(&state, 1);
        let homeless = record(&state, 2);
        assert_eq!(fit.placement.multiplier, 1.25);
        assert_eq!(misfit.placement.multiplier, 0.85);
        assert_eq!(homeless.placement.multiplier, 1.0);
        assert!(fit.care.happiness > 70.0);
        assert!(misfit.care.happiness < 70.0);
        assert!(homeless.care.happiness < 70.0);
    }

    #[test]
    fn test_hatchling_skipped_until_next_step() {
        let (mut state, config) = setup(&[EggType::Common]);
        let mut report = StepReport::new(8_000);
        report.hatched.push(0);
        habitat_system(&mut state, &config, &mut report);
        assert_eq!(record(&state, 0).care.happiness, 70.0);

        let mut report = StepReport::new(9_000);
        habitat_system(&mut state, &config, &mut report);
        assert!(record(&state, 0).care.happiness < 70.0);
    }

    #[test]
    fn test_stale_entries_pruned() {
        let (mut state, config) = setup(&[EggType::Common, EggType::Common]);
        let mut report = StepReport::new(0);
        assign_habitat(&mut state, &config, 0, HabitatKind::Meadow).unwrap();
        state.remove_animal(0);

        habitat_system(&mut state, &config, &mut report);
        assert!(state.habitats.get(HabitatKind::Meadow).unwrap().assigned.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_missing_spec_is_neutral() {
        let (mut state, mut config) = setup(&[EggType::Common]);
        let mut report = StepReport::new(0);
        assign_habitat(&mut state, &config, 0, HabitatKind::Meadow).unwrap();
        config.catalog.habitats.retain(|h| h.kind != HabitatKind::Meadow);

        habitat_system(&mut state, &config, &mut report);
        assert_eq!(record(&state, 0).placement.multiplier, 1.0);
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::MissingHabitatSpec(HabitatKind::Meadow)]
        );
    }

    #[test]
    fn test_unassign() {
        let (mut state, config) = setup(&[EggType::Common]);
        assign_habitat(&mut state, &config, 0, HabitatKind::Meadow).unwrap();
        assert_eq!(unassign_habitat(&mut state, 0), Ok(HabitatKind::Meadow));
        assert_eq!(record(&state, 0).placement.habitat, None);
        assert_eq!(unassign_habitat(&mut state, 0), Err(ActionError::NotInHabitat(0)));
    }
}
