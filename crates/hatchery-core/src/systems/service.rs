//! Service queues - the bath house and the clinic
//!
//! Both are single-server FIFO lines. Payment happens at enqueue time; a
//! waiting animal can be cancelled for a full refund, an active one forfeits
//! its treatment. Each step either finishes the active treatment or promotes
//! the head of the line, never both.

use std::collections::{BTreeMap, VecDeque};

use hatchery_logic::config::{GameConfig, ServiceTuning};
use hatchery_logic::economy::service_cost;
use serde::{Deserialize, Serialize};

use super::{StepContext, Tickable};
use crate::components::{Animal, AnimalId, Care, Health};
use crate::error::{ActionError, Diagnostic};
use crate::report::StepReport;
use crate::state::RunState;

/// Which service a queue provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    Bath,
    Clinic,
}

impl ServiceKind {
    pub fn label(self) -> &'static str {
        match self {
            ServiceKind::Bath => "bath house",
            ServiceKind::Clinic => "clinic",
        }
    }

    pub fn cost_multiplier(self, tuning: &ServiceTuning) -> f64 {
        match self {
            ServiceKind::Bath => tuning.bath_cost_multiplier,
            ServiceKind::Clinic => tuning.clinic_cost_multiplier,
        }
    }

    pub fn duration_ms(self, tuning: &ServiceTuning) -> u64 {
        match self {
            ServiceKind::Bath => tuning.bath_duration_ms,
            ServiceKind::Clinic => tuning.clinic_duration_ms,
        }
    }

    fn other(self) -> ServiceKind {
        match self {
            ServiceKind::Bath => ServiceKind::Clinic,
            ServiceKind::Clinic => ServiceKind::Bath,
        }
    }

    /// Restore the stat this service treats.
    pub fn complete(self, care: &mut Care, tuning: &ServiceTuning) {
        match self {
            ServiceKind::Bath => {
                care.cleanliness = 100.0;
                care.add_happiness(tuning.bath_happiness_boost);
            }
            ServiceKind::Clinic => {
                care.health = Health::Healthy;
                care.neglect = 0;
                care.add_happiness(tuning.clinic_happiness_boost);
            }
        }
    }
}

/// The animal currently being treated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveTreatment {
    pub animal: AnimalId,
    pub started_at: u64,
    pub duration_ms: u64,
    /// Price paid at enqueue time
    pub paid: f64,
}

impl ActiveTreatment {
    pub fn is_done(&self, now: u64) -> bool {
        now.saturating_sub(self.started_at) >= self.duration_ms
    }
}

/// Single-server FIFO queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceQueue {
    pub kind: ServiceKind,
    waiting: VecDeque<AnimalId>,
    active: Option<ActiveTreatment>,
    /// Price paid by each waiting animal, kept for refunds
    paid: BTreeMap<AnimalId, f64>,
}

impl ServiceQueue {
    pub fn new(kind: ServiceKind) -> Self {
        Self {
            kind,
            waiting: VecDeque::new(),
            active: None,
            paid: BTreeMap::new(),
        }
    }

    /// Waiting animals, head first.
    pub fn waiting(&self) -> impl Iterator<Item = AnimalId> + '_ {
        self.waiting.iter().copied()
    }

    pub fn active(&self) -> Option<&ActiveTreatment> {
        self.active.as_ref()
    }

    pub fn active_animal(&self) -> Option<AnimalId> {
        self.active.map(|a| a.animal)
    }

    pub fn is_waiting(&self, id: AnimalId) -> bool {
        self.waiting.contains(&id)
    }

    /// Waiting or active.
    pub fn contains(&self, id: AnimalId) -> bool {
        self.is_waiting(id) || self.active_animal() == Some(id)
    }

    /// Price recorded for a waiting animal.
    pub fn paid_for(&self, id: AnimalId) -> Option<f64> {
        self.paid.get(&id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty() && self.active.is_none()
    }

    fn push(&mut self, id: AnimalId, cost: f64) {
        self.waiting.push_back(id);
        self.paid.insert(id, cost);
    }

    /// Remove a waiting animal and return its recorded price.
    fn withdraw(&mut self, id: AnimalId) -> Option<f64> {
        let index = self.waiting.iter().position(|&w| w == id)?;
        self.waiting.remove(index);
        Some(self.paid.remove(&id).unwrap_or(0.0))
    }

    /// Clear the active slot if `id` holds it.
    fn evict(&mut self, id: AnimalId) -> Option<ActiveTreatment> {
        if self.active_animal() == Some(id) {
            self.active.take()
        } else {
            None
        }
    }

    fn promote(&mut self, now: u64, duration_ms: u64) -> Option<AnimalId> {
        let animal = self.waiting.pop_front()?;
        let paid = self.paid.remove(&animal).unwrap_or(0.0);
        self.active = Some(ActiveTreatment {
            animal,
            started_at: now,
            duration_ms,
            paid,
        });
        Some(animal)
    }
}

/// Pay for a treatment and join the back of the line. Returns the price.
pub fn enqueue_service(
    state: &mut RunState,
    config: &GameConfig,
    kind: ServiceKind,
    id: AnimalId,
) -> Result<f64, ActionError> {
    let entity = state.find_animal(id).ok_or(ActionError::UnknownAnimal(id))?;

    for queue in [kind, kind.other()] {
        if state.queue(queue).contains(id) {
            return Err(ActionError::AlreadyQueued {
                animal: id,
                service: queue,
            });
        }
    }

    let (base_income, sick) = {
        let animal = state
            .world
            .get::<&Animal>(entity)
            .map_err(|_| ActionError::UnknownAnimal(id))?;
        let care = state
            .world
            .get::<&Care>(entity)
            .map_err(|_| ActionError::UnknownAnimal(id))?;
        (animal.base_income, care.health == Health::Sick)
    };

    if kind == ServiceKind::Clinic && !sick {
        return Err(ActionError::NotSick(id));
    }

    let cost = service_cost(base_income, kind.cost_multiplier(&config.service));
    state.charge(cost)?;
    state.queue_mut(kind).push(id, cost);
    log::debug!("Animal {} joined the {} line ({:.1} paid)", id, kind.label(), cost);
    Ok(cost)
}

/// Leave a service. Waiting animals are refunded; an active treatment is
/// forfeited. Returns the refund.
pub fn cancel_service(
    state: &mut RunState,
    kind: ServiceKind,
    id: AnimalId,
) -> Result<f64, ActionError> {
    let queue = state.queue_mut(kind);
    if let Some(refund) = queue.withdraw(id) {
        state.balance += refund;
        log::debug!("Animal {} left the {} line, refunded {:.1}", id, kind.label(), refund);
        return Ok(refund);
    }
    if queue.evict(id).is_some() {
        log::debug!("Animal {} pulled out of the {} mid-treatment", id, kind.label());
        return Ok(0.0);
    }
    Err(ActionError::NotQueued {
        animal: id,
        service: kind,
    })
}

/// Drop an animal from both services before it leaves the run.
///
/// Waiting entries are refunded. An active clinic treatment refunds the
/// price it paid; an active bath is forfeited. Returns the total refund.
pub fn release_from_services(state: &mut RunState, id: AnimalId) -> f64 {
    let mut refund = 0.0;
    for kind in [ServiceKind::Bath, ServiceKind::Clinic] {
        let queue = state.queue_mut(kind);
        if let Some(paid) = queue.withdraw(id) {
            refund += paid;
        }
        if let Some(active) = queue.evict(id) {
            if kind == ServiceKind::Clinic {
                refund += active.paid;
            }
        }
    }
    state.balance += refund;
    refund
}

/// Advance one queue by one step.
pub fn step_service(
    state: &mut RunState,
    config: &GameConfig,
    kind: ServiceKind,
    now: u64,
    report: &mut StepReport,
) {
    if let Some(active) = state.queue(kind).active().copied() {
        if !active.is_done(now) {
            return;
        }
        state.queue_mut(kind).active = None;

        let entity = state.find_animal(active.animal);
        let care = entity.and_then(|e| state.world.get::<&mut Care>(e).ok());
        match care {
            Some(mut care) => {
                kind.complete(&mut care, &config.service);
                log::info!("Animal {} finished at the {}", active.animal, kind.label());
                report.treated.push((kind, active.animal));
            }
            None => report.diagnose(Diagnostic::MissingTreatedAnimal {
                animal: active.animal,
                service: kind,
            }),
        }
        return;
    }

    let duration = kind.duration_ms(&config.service);
    if let Some(animal) = state.queue_mut(kind).promote(now, duration) {
        report.promoted.push((kind, animal));
    }
}

/// Pipeline stage: bath house, then clinic
pub struct ServiceQueues;

impl Tickable for ServiceQueues {
    fn name(&self) -> &'static str {
        "service_queues"
    }

    fn step(&self, ctx: &mut StepContext<'_>) {
        for kind in [ServiceKind::Bath, ServiceKind::Clinic] {
            step_service(ctx.state, ctx.config, kind, ctx.now, ctx.report);
        }
    }
}
