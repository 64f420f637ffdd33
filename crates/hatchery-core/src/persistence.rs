//! Save/Load functionality for persisting a run
//!
//! Uses bincode for a compact binary snapshot. Animal and egg entities are
//! flattened into owned records and respawned on load; everything else is
//! serialized as-is.

use hecs::World;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::components::*;
use crate::state::RunState;
use crate::systems::{EventManager, HabitatTable, Outcome, PrestigeRecord, ServiceQueue};

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of a run plus permanent progress
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub balance: f64,
    pub income_per_step: f64,
    pub started_at: u64,
    pub next_animal_id: AnimalId,
    pub next_egg_id: EggId,
    pub bath: ServiceQueue,
    pub clinic: ServiceQueue,
    pub habitats: HabitatTable,
    pub events: EventManager,
    pub outcome: Outcome,
    /// Animals in hatch order
    pub animals: Vec<AnimalRecord>,
    /// Eggs in purchase order
    pub eggs: Vec<Egg>,
    pub prestige: PrestigeRecord,
}

/// Save a run and the prestige record to a writer
pub fn save_run<W: Write>(
    writer: W,
    state: &RunState,
    prestige: &PrestigeRecord,
) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        balance: state.balance,
        income_per_step: state.income_per_step,
        started_at: state.started_at,
        next_animal_id: state.next_animal_id,
        next_egg_id: state.next_egg_id,
        bath: state.bath.clone(),
        clinic: state.clinic.clone(),
        habitats: state.habitats.clone(),
        events: state.events.clone(),
        outcome: state.outcome,
        animals: state.animal_records(),
        eggs: state.eggs(),
        prestige: prestige.clone(),
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a run and the prestige record from a reader
pub fn load_run<R: Read>(reader: R) -> Result<(RunState, PrestigeRecord), SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let mut state = RunState {
        world: World::new(),
        balance: save_data.balance,
        income_per_step: save_data.income_per_step,
        bath: save_data.bath,
        clinic: save_data.clinic,
        habitats: save_data.habitats,
        events: save_data.events,
        outcome: save_data.outcome,
        started_at: save_data.started_at,
        next_animal_id: 0,
        next_egg_id: 0,
    };
    for record in save_data.animals {
        state.insert_animal(record);
    }
    for egg in save_data.eggs {
        state.insert_egg(egg);
    }
    // Keep ids of sold animals retired
    state.next_animal_id = state.next_animal_id.max(save_data.next_animal_id);
    state.next_egg_id = state.next_egg_id.max(save_data.next_egg_id);

    Ok((state, save_data.prestige))
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{assign_habitat, enqueue_service, trigger_event, ServiceKind};
    use hatchery_logic::catalog::{CreatureTemplate, EggType, HabitatKind, Rarity};
    use hatchery_logic::config::GameConfig;
    use hatchery_logic::events::EventTemplate;

    #[test]
    fn test_save_load_roundtrip() {
        let config = GameConfig::default();
        let mut state = RunState::new(&config, 500.0, 1_000);
        let template = CreatureTemplate::new("Seal", "🦭", Rarity::Rare, 3.0);
        for _ in 0..3 {
            state.spawn_animal(EggType::Arctic, &template, &config);
        }
        state.remove_animal(2);
        state.spawn_egg(EggType::Mystic, 1_500, 90_000);
        assign_habitat(&mut state, &config, 0, HabitatKind::Glacier).unwrap();
        enqueue_service(&mut state, &config, ServiceKind::Bath, 1).unwrap();
        trigger_event(&mut state, &config, EventTemplate::GoldenHour, 2_000);

        let mut prestige = PrestigeRecord::default();
        prestige.count = 2;
        prestige.global_multiplier = 1.2;

        let mut save_buffer = Vec::new();
        save_run(&mut save_buffer, &state, &prestige).expect("Save failed");
        let (loaded, loaded_prestige) = load_run(&save_buffer[..]).expect("Load failed");

        assert_eq!(loaded.balance, state.balance);
        assert_eq!(loaded.animal_records(), state.animal_records());
        assert_eq!(loaded.eggs(), state.eggs());
        assert_eq!(loaded.bath, state.bath);
        assert_eq!(loaded.habitats, state.habitats);
        assert_eq!(loaded.events, state.events);
        assert_eq!(loaded.next_animal_id, 3);
        assert_eq!(loaded_prestige, prestige);
    }

    #[test]
    fn test_version_mismatch() {
        let config = GameConfig::default();
        let state = RunState::new(&config, 100.0, 0);
        let mut save_buffer = Vec::new();
        save_run(&mut save_buffer, &state, &PrestigeRecord::default()).unwrap();
        // version is the leading little-endian u32
        save_buffer[0] = 99;

        match load_run(&save_buffer[..]) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!((expected, found), (SAVE_VERSION, 99));
            }
            other => panic!("expected version mismatch, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_truncated_input() {
        let result = load_run(&[1u8, 0, 0][..]);
        assert!(matches!(result, Err(SaveError::Bincode(_))));
    }
}
