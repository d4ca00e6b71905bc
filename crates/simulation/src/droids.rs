use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::objects::{spawn_object, PlayerId};
use crate::orders::DroidOrders;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DroidType {
    Construct,
    CyborgConstruct,
    Weapon,
    Sensor,
    Repair,
}

impl DroidType {
    /// Construction droids and cyborg engineers can build structures.
    pub fn is_constructor(self) -> bool {
        matches!(self, DroidType::Construct | DroidType::CyborgConstruct)
    }
}

#[derive(Component, Debug, Clone)]
pub struct Droid {
    pub droid_type: DroidType,
}

pub fn spawn_droid(
    world: &mut World,
    player: PlayerId,
    droid_type: DroidType,
    name: impl Into<String>,
) -> Entity {
    spawn_object(
        world,
        player,
        name,
        (Droid { droid_type }, DroidOrders::default()),
    )
}

/// Returns `true` if the entity is a construction-capable droid.
pub fn is_builder(world: &World, entity: Entity) -> bool {
    world
        .get::<Droid>(entity)
        .is_some_and(|droid| droid.droid_type.is_constructor())
}
