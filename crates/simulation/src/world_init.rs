// =============================================================================
// Demo skirmish start: a base and a few units for the local player, plus a
// small opposing base so ownership filtering has something to filter.
// =============================================================================

use bevy::prelude::*;

use crate::droids::{spawn_droid, DroidType};
use crate::objects::{LocalPlayer, PlayerId};
use crate::structures::{spawn_structure, StructureStatsId, StructureStatus};

/// Marker resource that, when present, causes `init_world` to skip the demo
/// base. Used by the test harness to start from an empty map.
#[derive(Resource)]
pub struct SkipWorldInit;

pub fn init_world(world: &mut World) {
    if world.contains_resource::<SkipWorldInit>() {
        return;
    }
    let local = world.get_resource::<LocalPlayer>().map_or(PlayerId(0), |p| p.0);
    let rival = PlayerId(if local.0 == 0 { 1 } else { 0 });

    let base = [
        (StructureStatsId::COMMAND_CENTER, (10, 10)),
        (StructureStatsId::FACTORY, (14, 10)),
        (StructureStatsId::RESEARCH_FACILITY, (10, 14)),
        (StructureStatsId::RESEARCH_FACILITY, (14, 14)),
        (StructureStatsId::POWER_GENERATOR, (18, 10)),
        (StructureStatsId::OIL_DERRICK, (20, 12)),
    ];
    for (stats, pos) in base {
        spawn_structure(world, local, stats, StructureStatus::Built, pos);
    }

    spawn_droid(world, local, DroidType::Construct, "Truck Viper Wheels");
    spawn_droid(world, local, DroidType::Construct, "Truck Viper Wheels");
    spawn_droid(world, local, DroidType::CyborgConstruct, "Combat Engineer");
    spawn_droid(world, local, DroidType::Weapon, "Machinegun Viper Wheels");

    spawn_structure(
        world,
        rival,
        StructureStatsId::RESEARCH_FACILITY,
        StructureStatus::Built,
        (80, 80),
    );
    spawn_droid(world, rival, DroidType::Construct, "Truck Viper Wheels");

    info!(
        "Demo world ready: player {} vs player {}",
        local.0, rival.0
    );
}
