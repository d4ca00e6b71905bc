use bevy::prelude::*;
use std::collections::BTreeMap;

pub mod config;
pub mod construction;
pub mod droids;
pub mod game_actions;
pub mod objects;
pub mod orders;
pub mod research;
pub mod simulation_sets;
pub mod structures;
pub mod world_init;

#[cfg(test)]
mod integration_tests;
#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use simulation_sets::SimulationSet;

use config::TICKS_PER_SECOND;
use construction::construction_tick;
use game_actions::{execute_queued_actions, GameActionsPlugin};
use objects::{LocalPlayer, NetworkMode, ObjectIdAllocator};
use research::{research_tick, PlayerResearch, ResearchCatalog};
use structures::{StructureAvailability, StructureCatalog};

// ---------------------------------------------------------------------------
// Saveable trait + registry for the extension map save pattern
// ---------------------------------------------------------------------------

/// Trait for resources that can be saved/loaded via the extension map.
///
/// Each implementing resource provides its own serialization logic; the
/// persistence layer only ever sees the [`SaveableRegistry`].
pub trait Saveable: Resource + Default + Send + Sync + 'static {
    /// Unique key for this resource in the save file's extension map.
    /// Must be stable across versions (used for deserialization lookup).
    const SAVE_KEY: &'static str;

    /// Serialize this resource to bytes.
    /// Return `None` to skip saving (e.g. when the resource is at its default state).
    fn save_to_bytes(&self) -> Option<Vec<u8>>;

    /// Deserialize from bytes, returning the restored resource.
    fn load_from_bytes(bytes: &[u8]) -> Self;
}

/// Decode bytes via `bitcode::decode`, logging a warning and returning `Default` on failure.
pub fn decode_or_warn<T: bitcode::DecodeOwned + Default>(key: &str, bytes: &[u8]) -> T {
    match bitcode::decode(bytes) {
        Ok(v) => v,
        Err(e) => {
            warn!(
                "Saveable {}: failed to decode {} bytes, falling back to default: {}",
                key,
                bytes.len(),
                e
            );
            T::default()
        }
    }
}

pub type SaveFn = Box<dyn Fn(&World) -> Option<Vec<u8>> + Send + Sync>;
pub type LoadFn = Box<dyn Fn(&mut World, &[u8]) + Send + Sync>;
pub type ResetFn = Box<dyn Fn(&mut World) + Send + Sync>;

/// Type-erased save/load/reset operations for a single registered resource.
pub struct SaveableEntry {
    pub key: String,
    pub save_fn: SaveFn,
    pub load_fn: LoadFn,
    pub reset_fn: ResetFn,
}

/// Registry of all saveable resources, populated during plugin setup.
#[derive(Resource, Default)]
pub struct SaveableRegistry {
    pub entries: Vec<SaveableEntry>,
}

impl SaveableRegistry {
    /// Register a resource type that implements `Saveable`.
    ///
    /// Panics in debug builds if a resource with the same `SAVE_KEY` is already
    /// registered.
    pub fn register<T: Saveable>(&mut self) {
        let key = T::SAVE_KEY.to_string();
        if self.entries.iter().any(|e| e.key == key) {
            warn!(
                "SaveableRegistry: duplicate key '{}', ignoring second registration",
                key
            );
            debug_assert!(false, "SaveableRegistry: duplicate key '{}'", key);
            return;
        }
        self.entries.push(SaveableEntry {
            key,
            save_fn: Box::new(|world: &World| {
                world.get_resource::<T>().and_then(|r| r.save_to_bytes())
            }),
            load_fn: Box::new(|world: &mut World, bytes: &[u8]| {
                let value = T::load_from_bytes(bytes);
                world.insert_resource(value);
            }),
            reset_fn: Box::new(|world: &mut World| {
                world.insert_resource(T::default());
            }),
        });
    }

    /// Save all registered resources into an extension map.
    pub fn save_all(&self, world: &World) -> BTreeMap<String, Vec<u8>> {
        let mut extensions = BTreeMap::new();
        for entry in &self.entries {
            if let Some(bytes) = (entry.save_fn)(world) {
                extensions.insert(entry.key.clone(), bytes);
            }
        }
        extensions
    }

    /// Load registered resources from an extension map.
    /// Resources whose key is absent are left unchanged.
    pub fn load_all(&self, world: &mut World, extensions: &BTreeMap<String, Vec<u8>>) {
        for entry in &self.entries {
            if let Some(bytes) = extensions.get(&entry.key) {
                (entry.load_fn)(world, bytes);
            }
        }
    }

    /// Reset all registered resources to their defaults.
    pub fn reset_all(&self, world: &mut World) {
        for entry in &self.entries {
            (entry.reset_fn)(world);
        }
    }
}

// ---------------------------------------------------------------------------
// Core resources
// ---------------------------------------------------------------------------

/// Global tick counter incremented each FixedUpdate.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

pub fn tick_counter(mut tick: ResMut<TickCounter>) {
    tick.0 = tick.0.wrapping_add(1);
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TickCounter>()
            .init_resource::<ObjectIdAllocator>()
            .init_resource::<LocalPlayer>()
            .init_resource::<NetworkMode>()
            .init_resource::<StructureCatalog>()
            .init_resource::<StructureAvailability>()
            .init_resource::<ResearchCatalog>()
            .init_resource::<PlayerResearch>()
            .insert_resource(Time::<Fixed>::from_hz(TICKS_PER_SECOND as f64))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::PreSim,
                    SimulationSet::Simulation,
                    SimulationSet::PostSim,
                )
                    .chain(),
            )
            .add_systems(Startup, world_init::init_world)
            .add_systems(
                FixedUpdate,
                tick_counter
                    .in_set(SimulationSet::PreSim)
                    .before(execute_queued_actions),
            )
            .add_systems(
                FixedUpdate,
                (construction_tick, research_tick)
                    .chain()
                    .in_set(SimulationSet::Simulation),
            );

        app.add_plugins(GameActionsPlugin);

        // Favourite flags survive restarts.
        app.init_resource::<SaveableRegistry>();
        let mut registry = app.world_mut().resource_mut::<SaveableRegistry>();
        registry.register::<StructureCatalog>();
        registry.register::<ResearchCatalog>();
    }
}

#[cfg(test)]
mod saveable_tests {
    use super::*;
    use research::ResearchId;
    use structures::StructureStatsId;

    /// A trivial resource implementing `Saveable` for testing.
    #[derive(Resource, Default, Debug, PartialEq)]
    struct TestCounter {
        value: u32,
    }

    impl Saveable for TestCounter {
        const SAVE_KEY: &'static str = "test_counter";

        fn save_to_bytes(&self) -> Option<Vec<u8>> {
            if self.value == 0 {
                None
            } else {
                Some(self.value.to_le_bytes().to_vec())
            }
        }

        fn load_from_bytes(bytes: &[u8]) -> Self {
            let value = u32::from_le_bytes(bytes.try_into().unwrap_or([0; 4]));
            TestCounter { value }
        }
    }

    #[test]
    fn test_registry_save_skips_default() {
        let mut world = World::new();
        world.insert_resource(TestCounter { value: 0 });

        let mut registry = SaveableRegistry::default();
        registry.register::<TestCounter>();

        assert!(registry.save_all(&world).is_empty());
    }

    #[test]
    fn test_registry_load_ignores_unknown_keys() {
        let mut world = World::new();
        world.insert_resource(TestCounter { value: 5 });

        let mut registry = SaveableRegistry::default();
        registry.register::<TestCounter>();

        let mut extensions = BTreeMap::new();
        extensions.insert("unknown_feature".to_string(), vec![0xFF, 0xFF]);
        registry.load_all(&mut world, &extensions);

        assert_eq!(world.resource::<TestCounter>().value, 5);
    }

    #[test]
    fn test_registry_reset_all() {
        let mut world = World::new();
        world.insert_resource(TestCounter { value: 999 });

        let mut registry = SaveableRegistry::default();
        registry.register::<TestCounter>();
        registry.reset_all(&mut world);

        assert_eq!(world.resource::<TestCounter>().value, 0);
    }

    #[test]
    fn test_favorites_survive_registry_roundtrip() {
        let mut world = World::new();
        let mut structures = StructureCatalog::default();
        structures.set_favorite(StructureStatsId::OIL_DERRICK, true);
        let mut research = ResearchCatalog::default();
        research.set_favorite(ResearchId::POWER_MODULE, true);
        world.insert_resource(structures);
        world.insert_resource(research);

        let mut registry = SaveableRegistry::default();
        registry.register::<StructureCatalog>();
        registry.register::<ResearchCatalog>();
        let extensions = registry.save_all(&world);
        assert_eq!(extensions.len(), 2);

        registry.reset_all(&mut world);
        assert!(!world
            .resource::<StructureCatalog>()
            .is_favorite(StructureStatsId::OIL_DERRICK));

        registry.load_all(&mut world, &extensions);
        assert!(world
            .resource::<StructureCatalog>()
            .is_favorite(StructureStatsId::OIL_DERRICK));
        assert!(world
            .resource::<ResearchCatalog>()
            .is_favorite(ResearchId::POWER_MODULE));
    }

    #[test]
    #[should_panic(expected = "duplicate key")]
    fn test_registry_duplicate_key_panics_in_debug() {
        let mut registry = SaveableRegistry::default();
        registry.register::<TestCounter>();
        registry.register::<TestCounter>();
    }
}
