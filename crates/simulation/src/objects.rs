//! Identity, ownership and liveness shared by every selectable game object.
//!
//! Droids and structures are ordinary entities carrying a [`GameObject`]
//! component. Object ids are allocated monotonically, so sorting by id yields
//! the simulation's enumeration (creation) order. Dead objects keep their
//! entity with `died = true` until something despawns them, which is why every
//! consumer re-checks liveness instead of trusting a cached handle.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    Encode, Decode,
)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode,
    Decode,
)]
pub struct ObjectId(pub u32);

/// Common state of every droid and structure.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct GameObject {
    pub id: ObjectId,
    pub player: PlayerId,
    pub name: String,
    /// Multi-selection flag, set by box/ctrl selection.
    pub selected: bool,
    pub died: bool,
}

/// Hands out object ids in creation order.
#[derive(Resource, Debug, Default)]
pub struct ObjectIdAllocator {
    next: u32,
}

impl ObjectIdAllocator {
    pub fn allocate(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next += 1;
        id
    }
}

/// The player whose HUD is on screen.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct LocalPlayer(pub PlayerId);

/// Whether player orders execute immediately or travel through the
/// [`ActionQueue`](crate::game_actions::ActionQueue) first.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkMode {
    #[default]
    Local,
    Networked,
}

/// Spawn a new object with the next id, plus any type-specific components.
pub fn spawn_object(
    world: &mut World,
    player: PlayerId,
    name: impl Into<String>,
    bundle: impl Bundle,
) -> Entity {
    world.init_resource::<ObjectIdAllocator>();
    let id = world.resource_mut::<ObjectIdAllocator>().allocate();
    world
        .spawn((
            GameObject {
                id,
                player,
                name: name.into(),
                selected: false,
                died: false,
            },
            bundle,
        ))
        .id()
}

/// Every object owned by `player`, dead or alive, in enumeration order.
pub fn player_objects(world: &mut World, player: PlayerId) -> Vec<Entity> {
    let mut query = world.query::<(Entity, &GameObject)>();
    let mut found: Vec<(ObjectId, Entity)> = query
        .iter(world)
        .filter(|(_, object)| object.player == player)
        .map(|(entity, object)| (object.id, entity))
        .collect();
    found.sort_unstable_by_key(|(id, _)| *id);
    found.into_iter().map(|(_, entity)| entity).collect()
}

/// Resolve an object id to its entity.
pub fn find_object(world: &mut World, id: ObjectId) -> Option<Entity> {
    let mut query = world.query::<(Entity, &GameObject)>();
    query
        .iter(world)
        .find(|(_, object)| object.id == id)
        .map(|(entity, _)| entity)
}

pub fn is_alive(world: &World, entity: Entity) -> bool {
    world
        .get::<GameObject>(entity)
        .is_some_and(|object| !object.died)
}

pub fn owner_of(world: &World, entity: Entity) -> Option<PlayerId> {
    world.get::<GameObject>(entity).map(|object| object.player)
}

pub fn object_id(world: &World, entity: Entity) -> Option<ObjectId> {
    world.get::<GameObject>(entity).map(|object| object.id)
}

pub fn object_name(world: &World, entity: Entity) -> Option<&str> {
    world
        .get::<GameObject>(entity)
        .map(|object| object.name.as_str())
}

pub fn is_flagged_selected(world: &World, entity: Entity) -> bool {
    world
        .get::<GameObject>(entity)
        .is_some_and(|object| object.selected)
}

pub fn set_selected(world: &mut World, entity: Entity, selected: bool) {
    if let Some(mut object) = world.get_mut::<GameObject>(entity) {
        object.selected = selected;
    }
}

pub fn mark_dead(world: &mut World, entity: Entity) {
    if let Some(mut object) = world.get_mut::<GameObject>(entity) {
        object.died = true;
        object.selected = false;
    }
}
