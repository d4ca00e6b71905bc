//! World setup builders for `TestGame`.

use bevy::prelude::*;

use crate::droids::{spawn_droid, DroidType};
use crate::objects::{NetworkMode, PlayerId};
use crate::research::{PlayerResearch, ResearchId, TopicState};
use crate::structures::{
    spawn_structure, Availability, StructureAvailability, StructureStatsId, StructureStatus,
};

use super::TestGame;

impl TestGame {
    // -----------------------------------------------------------------------
    // Builder methods (consume and return Self)
    // -----------------------------------------------------------------------

    pub fn networked(mut self) -> Self {
        self.app.insert_resource(NetworkMode::Networked);
        self
    }

    pub fn with_completed_research(mut self, player: PlayerId, topic: ResearchId) -> Self {
        if let Some(mut research) = self.app.world_mut().get_resource_mut::<PlayerResearch>() {
            research.set_state(player, topic, TopicState::Completed);
        }
        self
    }

    pub fn with_availability(
        mut self,
        player: PlayerId,
        stats: StructureStatsId,
        availability: Availability,
    ) -> Self {
        if let Some(mut table) = self
            .app
            .world_mut()
            .get_resource_mut::<StructureAvailability>()
        {
            table.set(player, stats, availability);
        }
        self
    }

    // -----------------------------------------------------------------------
    // Spawning (returns the new entity)
    // -----------------------------------------------------------------------

    pub fn spawn_droid(&mut self, player: PlayerId, droid_type: DroidType) -> Entity {
        let name = match droid_type {
            DroidType::Construct => "Truck",
            DroidType::CyborgConstruct => "Combat Engineer",
            DroidType::Weapon => "Viper MG",
            DroidType::Sensor => "Sensor Turret",
            DroidType::Repair => "Repair Turret",
        };
        spawn_droid(self.app.world_mut(), player, droid_type, name)
    }

    pub fn spawn_built(&mut self, player: PlayerId, stats: StructureStatsId, pos: (i32, i32)) -> Entity {
        spawn_structure(self.app.world_mut(), player, stats, StructureStatus::Built, pos)
    }

    pub fn spawn_site(&mut self, player: PlayerId, stats: StructureStatsId, pos: (i32, i32)) -> Entity {
        spawn_structure(
            self.app.world_mut(),
            player,
            stats,
            StructureStatus::BeingBuilt,
            pos,
        )
    }
}
