//! Run state - the single mutable structure every system steps against.

use hecs::{Entity, World};
use hatchery_logic::catalog::{CreatureTemplate, EggType};
use hatchery_logic::config::GameConfig;

use crate::components::*;
use crate::error::ActionError;
use crate::systems::{EventManager, HabitatTable, Outcome, ServiceKind, ServiceQueue};

/// Transient state of one run. Wiped on restart and prestige.
pub struct RunState {
    /// ECS world holding animal and egg entities
    pub world: World,
    pub balance: f64,
    /// Income earned by the last step (display value)
    pub income_per_step: f64,
    pub bath: ServiceQueue,
    pub clinic: ServiceQueue,
    pub habitats: HabitatTable,
    pub events: EventManager,
    pub outcome: Outcome,
    /// Clock reading when this run began (ms)
    pub started_at: u64,
    pub(crate) next_animal_id: AnimalId,
    pub(crate) next_egg_id: EggId,
}

impl RunState {
    /// Fresh run starting with `balance` coins at `now`.
    pub fn new(config: &GameConfig, balance: f64, now: u64) -> Self {
        Self {
            world: World::new(),
            balance,
            income_per_step: 0.0,
            bath: ServiceQueue::new(ServiceKind::Bath),
            clinic: ServiceQueue::new(ServiceKind::Clinic),
            habitats: HabitatTable::new(&config.catalog),
            events: EventManager::new(now),
            outcome: Outcome::default(),
            started_at: now,
            next_animal_id: 0,
            next_egg_id: 0,
        }
    }

    /// Deduct `cost` if the balance covers it.
    pub fn charge(&mut self, cost: f64) -> Result<(), ActionError> {
        if self.balance < cost {
            return Err(ActionError::InsufficientFunds {
                needed: cost,
                available: self.balance,
            });
        }
        self.balance -= cost;
        Ok(())
    }

    pub fn find_animal(&self, id: AnimalId) -> Option<Entity> {
        self.world
            .query::<&Animal>()
            .iter()
            .find(|(_, animal)| animal.id == id)
            .map(|(entity, _)| entity)
    }

    pub fn contains_animal(&self, id: AnimalId) -> bool {
        self.find_animal(id).is_some()
    }

    pub fn animal_count(&self) -> usize {
        self.world.query::<&Animal>().iter().count()
    }

    pub fn egg_count(&self) -> usize {
        self.world.query::<&Egg>().iter().count()
    }

    /// Base income of an animal, if it exists.
    pub fn base_income(&self, id: AnimalId) -> Option<f64> {
        let entity = self.find_animal(id)?;
        let animal = self.world.get::<&Animal>(entity).ok()?;
        Some(animal.base_income)
    }

    /// Snapshot of one animal.
    pub fn animal_record(&self, id: AnimalId) -> Option<AnimalRecord> {
        let entity = self.find_animal(id)?;
        self.record_for(entity)
    }

    fn record_for(&self, entity: Entity) -> Option<AnimalRecord> {
        let mut query = self
            .world
            .query_one::<(&Animal, &Care, &Placement, &Earnings)>(entity)
            .ok()?;
        let (animal, care, placement, earnings) = query.get()?;
        let record = AnimalRecord {
            animal: animal.clone(),
            care: *care,
            placement: *placement,
            earnings: *earnings,
        };
        Some(record)
    }

    /// Snapshots of all animals in hatch order.
    pub fn animal_records(&self) -> Vec<AnimalRecord> {
        let mut entities: Vec<(AnimalId, Entity)> = self
            .world
            .query::<&Animal>()
            .iter()
            .map(|(entity, animal)| (animal.id, entity))
            .collect();
        entities.sort_by_key(|(id, _)| *id);
        entities
            .into_iter()
            .filter_map(|(_, entity)| self.record_for(entity))
            .collect()
    }

    /// Ids of all animals in hatch order.
    pub fn animal_ids(&self) -> Vec<AnimalId> {
        let mut ids: Vec<AnimalId> = self
            .world
            .query::<&Animal>()
            .iter()
            .map(|(_, animal)| animal.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Incubating eggs in purchase order.
    pub fn eggs(&self) -> Vec<Egg> {
        let mut eggs: Vec<Egg> = self
            .world
            .query::<&Egg>()
            .iter()
            .map(|(_, egg)| egg.clone())
            .collect();
        eggs.sort_by_key(|egg| egg.id);
        eggs
    }

    /// Spawn a freshly hatched animal and return its id.
    pub fn spawn_animal(
        &mut self,
        origin: EggType,
        template: &CreatureTemplate,
        config: &GameConfig,
    ) -> AnimalId {
        let id = self.next_animal_id;
        self.next_animal_id += 1;
        self.insert_animal(AnimalRecord {
            animal: Animal::from_template(id, origin, template),
            care: Care::fresh(&config.care),
            placement: Placement::default(),
            earnings: Earnings::neutral(template.base_income),
        });
        id
    }

    /// Insert an animal with all its components.
    pub(crate) fn insert_animal(&mut self, record: AnimalRecord) -> Entity {
        self.next_animal_id = self.next_animal_id.max(record.animal.id + 1);
        self.world
            .spawn((record.animal, record.care, record.placement, record.earnings))
    }

    pub fn spawn_egg(&mut self, egg_type: EggType, started_at: u64, duration_ms: u64) -> EggId {
        let id = self.next_egg_id;
        self.next_egg_id += 1;
        self.insert_egg(Egg {
            id,
            egg_type,
            started_at,
            duration_ms,
        });
        id
    }

    pub(crate) fn insert_egg(&mut self, egg: Egg) -> Entity {
        self.next_egg_id = self.next_egg_id.max(egg.id + 1);
        self.world.spawn((egg,))
    }

    /// Despawn an animal. Returns false if it did not exist.
    pub fn remove_animal(&mut self, id: AnimalId) -> bool {
        match self.find_animal(id) {
            Some(entity) => self.world.despawn(entity).is_ok(),
            None => false,
        }
    }

    /// Whether the animal occupies the active slot of either service.
    pub fn in_treatment(&self, id: AnimalId) -> bool {
        self.bath.active_animal() == Some(id) || self.clinic.active_animal() == Some(id)
    }

    pub fn queue(&self, kind: ServiceKind) -> &ServiceQueue {
        match kind {
            ServiceKind::Bath => &self.bath,
            ServiceKind::Clinic => &self.clinic,
        }
    }

    pub fn queue_mut(&mut self, kind: ServiceKind) -> &mut ServiceQueue {
        match kind {
            ServiceKind::Bath => &mut self.bath,
            ServiceKind::Clinic => &mut self.clinic,
        }
    }
}
