//! Query and simulation-tick methods for `TestGame`.

use bevy::prelude::*;

use crate::game_actions::ActionResultLog;
use crate::objects::{object_id, ObjectId};
use crate::orders::DroidOrders;
use crate::research::ResearchFacility;
use crate::structures::Structure;
use crate::TickCounter;

use super::TestGame;

impl TestGame {
    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run N fixed-update ticks by directly executing the `FixedUpdate`
    /// schedule. This bypasses Bevy's time system, which `MinimalPlugins`
    /// does not advance between updates.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    /// Run one frame of the `Update` schedule (HUD systems).
    pub fn frame(&mut self) {
        self.app.world_mut().run_schedule(Update);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn tick_count(&self) -> u64 {
        self.resource::<TickCounter>().0
    }

    pub fn object_id(&self, entity: Entity) -> ObjectId {
        object_id(self.app.world(), entity).unwrap_or(ObjectId(u32::MAX))
    }

    pub fn orders(&self, droid: Entity) -> &DroidOrders {
        self.app
            .world()
            .get::<DroidOrders>(droid)
            .expect("entity is not a droid")
    }

    pub fn structure(&self, entity: Entity) -> &Structure {
        self.app
            .world()
            .get::<Structure>(entity)
            .expect("entity is not a structure")
    }

    pub fn facility(&self, entity: Entity) -> &ResearchFacility {
        self.app
            .world()
            .get::<ResearchFacility>(entity)
            .expect("entity is not a research facility")
    }

    pub fn action_log(&self) -> &ActionResultLog {
        self.resource::<ActionResultLog>()
    }
}
