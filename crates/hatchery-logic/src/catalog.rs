//! Static content: egg types, creature pools, rarities, habitats.
//!
//! Egg types and habitats are closed enums so that dispatch over them is
//! checked for exhaustiveness. The tables themselves are plain data in a
//! [`Catalog`], which can be overridden from JSON by the host.

use serde::{Deserialize, Serialize};

/// Rarity tier of a creature, ordered from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Display label shown next to the creature.
    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

/// Kinds of egg the player can buy. Also used as an animal's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EggType {
    Common,
    Forest,
    Ocean,
    Desert,
    Arctic,
    Mystic,
}

impl EggType {
    pub const ALL: [EggType; 6] = [
        EggType::Common,
        EggType::Forest,
        EggType::Ocean,
        EggType::Desert,
        EggType::Arctic,
        EggType::Mystic,
    ];

    /// Stable string key (used by UI shells and saved leaderboards).
    pub fn key(self) -> &'static str {
        match self {
            EggType::Common => "common",
            EggType::Forest => "forest",
            EggType::Ocean => "ocean",
            EggType::Desert => "desert",
            EggType::Arctic => "arctic",
            EggType::Mystic => "mystic",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

/// Habitat zones an animal can be placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HabitatKind {
    Meadow,
    Woodland,
    Aquarium,
    Dunes,
    Glacier,
    Sanctuary,
}

impl HabitatKind {
    pub const ALL: [HabitatKind; 6] = [
        HabitatKind::Meadow,
        HabitatKind::Woodland,
        HabitatKind::Aquarium,
        HabitatKind::Dunes,
        HabitatKind::Glacier,
        HabitatKind::Sanctuary,
    ];

    pub fn key(self) -> &'static str {
        match self {
            HabitatKind::Meadow => "meadow",
            HabitatKind::Woodland => "woodland",
            HabitatKind::Aquarium => "aquarium",
            HabitatKind::Dunes => "dunes",
            HabitatKind::Glacier => "glacier",
            HabitatKind::Sanctuary => "sanctuary",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }
}

/// One entry of an egg's creature pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub name: String,
    pub icon: String,
    pub rarity: Rarity,
    /// Coins per second before any multiplier.
    pub base_income: f64,
}

impl CreatureTemplate {
    pub fn new(name: &str, icon: &str, rarity: Rarity, base_income: f64) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            rarity,
            base_income,
        }
    }
}

/// Purchase and hatch parameters for one egg type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EggSpec {
    pub egg_type: EggType,
    pub name: String,
    pub icon: String,
    pub price: f64,
    /// Incubation time in milliseconds.
    pub hatch_ms: u64,
    /// Uniform draw pool. An empty pool is a configuration error.
    pub pool: Vec<CreatureTemplate>,
}

/// Placement parameters for one habitat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitatSpec {
    pub kind: HabitatKind,
    pub name: String,
    /// Origins that count as a good fit.
    pub compatible: Vec<EggType>,
    pub bonus_multiplier: f64,
    pub penalty_multiplier: f64,
    /// Capacity at level 1.
    pub base_capacity: u32,
    /// Extra slots gained per level above 1.
    pub capacity_per_level: u32,
}

impl HabitatSpec {
    pub fn is_compatible(&self, origin: EggType) -> bool {
        self.compatible.contains(&origin)
    }
}

/// All static content consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub eggs: Vec<EggSpec>,
    pub habitats: Vec<HabitatSpec>,
}

impl Catalog {
    pub fn egg(&self, egg_type: EggType) -> Option<&EggSpec> {
        self.eggs.iter().find(|e| e.egg_type == egg_type)
    }

    pub fn habitat(&self, kind: HabitatKind) -> Option<&HabitatSpec> {
        self.habitats.iter().find(|h| h.kind == kind)
    }

    /// Price of the cheapest purchasable egg, if any egg is configured.
    pub fn cheapest_egg_price(&self) -> Option<f64> {
        self.eggs
            .iter()
            .map(|e| e.price)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            eggs: EggType::ALL.into_iter().map(default_egg).collect(),
            habitats: HabitatKind::ALL.into_iter().map(default_habitat).collect(),
        }
    }
}

/// Standard egg table.
pub fn default_egg(egg_type: EggType) -> EggSpec {
    use Rarity::*;

    let (name, icon, price, hatch_ms, pool) = match egg_type {
        EggType::Common => (
            "Common Egg",
            "🥚",
            20.0,
            8_000,
            vec![
                CreatureTemplate::new("Chick", "🐤", Common, 1.0),
                CreatureTemplate::new("Bunny", "🐰", Common, 1.2),
                CreatureTemplate::new("Piglet", "🐷", Uncommon, 2.0),
            ],
        ),
        EggType::Forest => (
            "Forest Egg",
            "🌲",
            60.0,
            15_000,
            vec![
                CreatureTemplate::new("Fox", "🦊", Common, 3.0),
                CreatureTemplate::new("Owl", "🦉", Uncommon, 4.0),
                CreatureTemplate::new("Deer", "🦌", Rare, 6.0),
            ],
        ),
        EggType::Ocean => (
            "Ocean Egg",
            "🌊",
            120.0,
            20_000,
            vec![
                CreatureTemplate::new("Crab", "🦀", Common, 5.0),
                CreatureTemplate::new("Turtle", "🐢", Uncommon, 7.0),
                CreatureTemplate::new("Dolphin", "🐬", Rare, 10.0),
            ],
        ),
        EggType::Desert => (
            "Desert Egg",
            "🏜️",
            250.0,
            30_000,
            vec![
                CreatureTemplate::new("Lizard", "🦎", Uncommon, 12.0),
                CreatureTemplate::new("Scorpion", "🦂", Rare, 16.0),
                CreatureTemplate::new("Camel", "🐪", Epic, 22.0),
            ],
        ),
        EggType::Arctic => (
            "Arctic Egg",
            "❄️",
            500.0,
            45_000,
            vec![
                CreatureTemplate::new("Penguin", "🐧", Rare, 25.0),
                CreatureTemplate::new("Seal", "🦭", Rare, 30.0),
                CreatureTemplate::new("Polar Bear", "🐻‍❄️", Epic, 40.0),
            ],
        ),
        EggType::Mystic => (
            "Mystic Egg",
            "🔮",
            1_500.0,
            90_000,
            vec![
                CreatureTemplate::new("Unicorn", "🦄", Epic, 80.0),
                CreatureTemplate::new("Dragon", "🐉", Legendary, 150.0),
                CreatureTemplate::new("Phoenix", "🐦‍🔥", Legendary, 180.0),
            ],
        ),
    };

    EggSpec {
        egg_type,
        name: name.to_string(),
        icon: icon.to_string(),
        price,
        hatch_ms,
        pool,
    }
}

/// Standard habitat table.
pub fn default_habitat(kind: HabitatKind) -> HabitatSpec {
    let (name, compatible) = match kind {
        HabitatKind::Meadow => ("Meadow", vec![EggType::Common]),
        HabitatKind::Woodland => ("Woodland", vec![EggType::Forest]),
        HabitatKind::Aquarium => ("Aquarium", vec![EggType::Ocean]),
        HabitatKind::Dunes => ("Dunes", vec![EggType::Desert]),
        HabitatKind::Glacier => ("Glacier", vec![EggType::Arctic]),
        HabitatKind::Sanctuary => ("Sanctuary", vec![EggType::Mystic]),
    };

    HabitatSpec {
        kind,
        name: name.to_string(),
        compatible,
        bonus_multiplier: 1.25,
        penalty_multiplier: 0.85,
        base_capacity: 3,
        capacity_per_level: 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for t in EggType::ALL {
            assert_eq!(EggType::from_key(t.key()), Some(t));
        }
        for k in HabitatKind::ALL {
            assert_eq!(HabitatKind::from_key(k.key()), Some(k));
        }
        assert_eq!(EggType::from_key("plasma"), None);
    }

    #[test]
    fn test_default_catalog_is_complete() {
        let catalog = Catalog::default();
        for t in EggType::ALL {
            let spec = catalog.egg(t).expect("egg spec");
            assert!(!spec.pool.is_empty());
            assert!(spec.price > 0.0);
        }
        for k in HabitatKind::ALL {
            assert!(catalog.habitat(k).is_some());
        }
    }

    #[test]
    fn test_common_egg_matches_reference_values() {
        let spec = default_egg(EggType::Common);
        assert_eq!(spec.price, 20.0);
        assert_eq!(spec.hatch_ms, 8_000);
    }

    #[test]
    fn test_cheapest_egg_price() {
        let mut catalog = Catalog::default();
        assert_eq!(catalog.cheapest_egg_price(), Some(20.0));
        catalog.eggs.clear();
        assert_eq!(catalog.cheapest_egg_price(), None);
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Legendary > Rarity::Epic);
        assert!(Rarity::Common < Rarity::Uncommon);
    }
}
