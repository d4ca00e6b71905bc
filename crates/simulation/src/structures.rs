//! Structure types, the static structure table, per-player availability and
//! structure entities.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{MAX_PLAYERS, RESEARCH_POINTS_PER_TICK};
use crate::objects::{spawn_object, GameObject, PlayerId};
use crate::research::ResearchFacility;
use crate::Saveable;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode,
    Decode,
)]
pub struct StructureStatsId(pub u16);

impl StructureStatsId {
    pub const COMMAND_CENTER: Self = Self(0);
    pub const FACTORY: Self = Self(1);
    pub const RESEARCH_FACILITY: Self = Self(2);
    pub const POWER_GENERATOR: Self = Self(3);
    pub const OIL_DERRICK: Self = Self(4);
    pub const TANK_TRAP: Self = Self(5);
    pub const HARDPOINT_WALL: Self = Self(6);
    pub const MG_TOWER: Self = Self(7);
    pub const HARDENED_MG_TOWER: Self = Self(8);
    pub const REPAIR_FACILITY: Self = Self(9);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Headquarters,
    Factory,
    Research,
    PowerGenerator,
    ResourceExtractor,
    Defense,
    Wall,
    RepairFacility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureStats {
    pub id: StructureStatsId,
    pub name: String,
    pub kind: StructureKind,
    pub power_to_build: u32,
    pub build_points: u32,
    /// Maximum number a player may own at once.
    pub limit: Option<u32>,
    pub is_favorite: bool,
}

/// Static structure table. Only the favourite flags change at runtime.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct StructureCatalog {
    stats: Vec<StructureStats>,
}

impl Default for StructureCatalog {
    fn default() -> Self {
        use StructureKind::*;
        let table: [(&str, StructureKind, u32, u32, Option<u32>); 10] = [
            ("Command Center", Headquarters, 100, 500, Some(1)),
            ("Factory", Factory, 250, 800, Some(5)),
            ("Research Facility", Research, 100, 500, Some(5)),
            ("Power Generator", PowerGenerator, 50, 500, None),
            ("Oil Derrick", ResourceExtractor, 50, 200, None),
            ("Tank Trap", Defense, 25, 100, None),
            ("Hardpoint Wall", Wall, 50, 150, None),
            ("Machinegun Guard Tower", Defense, 100, 300, None),
            ("Hardened Machinegun Tower", Defense, 150, 400, None),
            ("Repair Facility", RepairFacility, 175, 600, Some(5)),
        ];
        let stats = table
            .into_iter()
            .enumerate()
            .map(|(i, (name, kind, power, points, limit))| StructureStats {
                id: StructureStatsId(i as u16),
                name: name.to_string(),
                kind,
                power_to_build: power,
                build_points: points,
                limit,
                is_favorite: false,
            })
            .collect();
        Self { stats }
    }
}

impl StructureCatalog {
    pub fn from_stats(stats: Vec<StructureStats>) -> Self {
        Self { stats }
    }

    pub fn get(&self, id: StructureStatsId) -> Option<&StructureStats> {
        self.stats.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StructureStats> {
        self.stats.iter()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn name(&self, id: StructureStatsId) -> &str {
        self.get(id).map_or("", |stats| stats.name.as_str())
    }

    pub fn is_favorite(&self, id: StructureStatsId) -> bool {
        self.get(id).is_some_and(|stats| stats.is_favorite)
    }

    pub fn set_favorite(&mut self, id: StructureStatsId, favorite: bool) {
        if let Some(stats) = self.stats.get_mut(id.index()) {
            stats.is_favorite = favorite;
        }
    }

    fn favorite_ids(&self) -> Vec<u16> {
        self.stats
            .iter()
            .filter(|stats| stats.is_favorite)
            .map(|stats| stats.id.0)
            .collect()
    }
}

#[derive(Encode, Decode, Default)]
struct FavoritesSave {
    favorites: Vec<u16>,
}

impl Saveable for StructureCatalog {
    const SAVE_KEY: &'static str = "structure_favorites";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        let favorites = self.favorite_ids();
        if favorites.is_empty() {
            return None;
        }
        Some(bitcode::encode(&FavoritesSave { favorites }))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        let save: FavoritesSave = crate::decode_or_warn(Self::SAVE_KEY, bytes);
        let mut catalog = Self::default();
        for id in save.favorites {
            catalog.set_favorite(StructureStatsId(id), true);
        }
        catalog
    }
}

// ---------------------------------------------------------------------------
// Per-player availability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    Unavailable,
    Available,
    /// Still buildable, but superseded by a better design.
    Redundant,
}

#[derive(Resource, Debug, Clone)]
pub struct StructureAvailability {
    players: Vec<Vec<Availability>>,
}

impl Default for StructureAvailability {
    fn default() -> Self {
        let starter = [
            StructureStatsId::COMMAND_CENTER,
            StructureStatsId::FACTORY,
            StructureStatsId::RESEARCH_FACILITY,
            StructureStatsId::POWER_GENERATOR,
            StructureStatsId::OIL_DERRICK,
        ];
        let table_len = StructureCatalog::default().len();
        let mut row = vec![Availability::Unavailable; table_len];
        for id in starter {
            row[id.index()] = Availability::Available;
        }
        Self {
            players: vec![row; MAX_PLAYERS],
        }
    }
}

impl StructureAvailability {
    pub fn get(&self, player: PlayerId, id: StructureStatsId) -> Availability {
        self.players
            .get(player.index())
            .and_then(|row| row.get(id.index()))
            .copied()
            .unwrap_or_default()
    }

    pub fn set(&mut self, player: PlayerId, id: StructureStatsId, availability: Availability) {
        let Some(row) = self.players.get_mut(player.index()) else {
            warn!("StructureAvailability: no slot for player {}", player.0);
            return;
        };
        if row.len() <= id.index() {
            row.resize(id.index() + 1, Availability::Unavailable);
        }
        row[id.index()] = availability;
    }
}

// ---------------------------------------------------------------------------
// Structure entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StructureStatus {
    #[default]
    BeingBuilt,
    Built,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Structure {
    pub stats: StructureStatsId,
    pub status: StructureStatus,
    pub pos: (i32, i32),
    pub current_build_points: u32,
    /// Build points added on the most recent construction tick.
    pub last_build_rate: u32,
    pub power_accrued: u32,
}

impl Structure {
    pub fn is_built(&self) -> bool {
        self.status == StructureStatus::Built
    }
}

/// Spawn a structure. Research facilities get their research component.
pub fn spawn_structure(
    world: &mut World,
    player: PlayerId,
    stats: StructureStatsId,
    status: StructureStatus,
    pos: (i32, i32),
) -> Entity {
    let (name, kind, build_points, power) = {
        let catalog = world.get_resource_or_insert_with(StructureCatalog::default);
        match catalog.get(stats) {
            Some(s) => (s.name.clone(), Some(s.kind), s.build_points, s.power_to_build),
            None => {
                warn!("spawn_structure: unknown structure stats {}", stats.0);
                (String::from("Unknown"), None, 0, 0)
            }
        }
    };
    let built = status == StructureStatus::Built;
    let structure = Structure {
        stats,
        status,
        pos,
        current_build_points: if built { build_points } else { 0 },
        last_build_rate: 0,
        power_accrued: if built { power } else { 0 },
    };
    let entity = spawn_object(world, player, name, structure);
    if kind == Some(StructureKind::Research) {
        world.entity_mut(entity).insert(ResearchFacility {
            points_per_tick: RESEARCH_POINTS_PER_TICK,
            ..default()
        });
    }
    entity
}

/// Number of living structures of a type owned by a player.
pub fn count_living(world: &mut World, player: PlayerId, stats: StructureStatsId) -> u32 {
    let mut query = world.query::<(&GameObject, &Structure)>();
    query
        .iter(world)
        .filter(|(object, structure)| {
            object.player == player && !object.died && structure.stats == stats
        })
        .count() as u32
}

/// A living structure site of the given type at a tile, if any.
pub fn structure_at(
    world: &mut World,
    player: PlayerId,
    stats: StructureStatsId,
    pos: (i32, i32),
) -> Option<Entity> {
    let mut query = world.query::<(Entity, &GameObject, &Structure)>();
    query
        .iter(world)
        .find(|(_, object, structure)| {
            object.player == player
                && !object.died
                && structure.stats == stats
                && structure.pos == pos
        })
        .map(|(entity, _, _)| entity)
}
