//! Error and diagnostic types.
//!
//! Player actions return `Result<_, ActionError>`. Problems found while
//! stepping never abort the step; they are collected as [`Diagnostic`]s in
//! the step report and logged.

use hatchery_logic::catalog::{EggType, HabitatKind};

use crate::components::AnimalId;
use crate::systems::ServiceKind;

/// Why a player action was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    UnknownAnimal(AnimalId),
    UnknownEggType(EggType),
    UnknownHabitat(HabitatKind),
    InsufficientFunds { needed: f64, available: f64 },
    HabitatFull { habitat: HabitatKind, capacity: u32 },
    NotInHabitat(AnimalId),
    /// Already waiting for or undergoing a treatment
    AlreadyQueued { animal: AnimalId, service: ServiceKind },
    NotSick(AnimalId),
    NotQueued { animal: AnimalId, service: ServiceKind },
    /// Stat already full, or habitat at max level
    AlreadyMaxed,
    /// The run has ended; only restart is allowed
    GameOver,
    PrestigeLocked { reason: String },
}

impl ActionError {
    /// Human-readable reason for the presentation layer.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::UnknownAnimal(id) => write!(f, "No animal with id {}", id),
            ActionError::UnknownEggType(t) => write!(f, "Egg type '{}' is not for sale", t.key()),
            ActionError::UnknownHabitat(k) => write!(f, "Habitat '{}' does not exist", k.key()),
            ActionError::InsufficientFunds { needed, available } => write!(
                f,
                "Not enough coins: need {:.1}, have {:.1}",
                needed, available
            ),
            ActionError::HabitatFull { habitat, capacity } => {
                write!(f, "{} is full ({} slots)", habitat.key(), capacity)
            }
            ActionError::NotInHabitat(id) => write!(f, "Animal {} has no habitat", id),
            ActionError::AlreadyQueued { animal, service } => {
                write!(f, "Animal {} is already at the {}", animal, service.label())
            }
            ActionError::NotSick(id) => write!(f, "Animal {} is not sick", id),
            ActionError::NotQueued { animal, service } => {
                write!(f, "Animal {} is not at the {}", animal, service.label())
            }
            ActionError::AlreadyMaxed => write!(f, "Already at maximum"),
            ActionError::GameOver => write!(f, "Game over - restart to keep playing"),
            ActionError::PrestigeLocked { reason } => write!(f, "Cannot prestige: {}", reason),
        }
    }
}

impl std::error::Error for ActionError {}

/// A non-fatal inconsistency found during a step
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Egg type has no spec or an empty creature pool; the egg hatched empty
    EmptyCreaturePool(EggType),
    /// Assigned habitat has no spec; treated as neutral
    MissingHabitatSpec(HabitatKind),
    /// Treatment finished for an animal that no longer exists
    MissingTreatedAnimal { animal: AnimalId, service: ServiceKind },
    /// Habitat listed an animal that no longer exists
    StaleHabitatEntry { animal: AnimalId, habitat: HabitatKind },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::EmptyCreaturePool(t) => {
                write!(f, "egg type '{}' has no creature pool; hatch skipped", t.key())
            }
            Diagnostic::MissingHabitatSpec(k) => {
                write!(f, "habitat '{}' has no config; treated as neutral", k.key())
            }
            Diagnostic::MissingTreatedAnimal { animal, service } => write!(
                f,
                "{} finished for missing animal {}; slot cleared",
                service.label(),
                animal
            ),
            Diagnostic::StaleHabitatEntry { animal, habitat } => {
                write!(f, "pruned missing animal {} from {}", animal, habitat.key())
            }
        }
    }
}
