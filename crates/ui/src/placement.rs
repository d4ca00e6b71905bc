//! Leaving the build panel's placement modes: the chosen tile or demolish
//! target becomes an order for every selected builder.

use bevy::prelude::*;

use simulation::droids::is_builder;
use simulation::game_actions::{dispatch_action, ActionError, ActionResult, GameAction};
use simulation::objects::{
    is_alive, is_flagged_selected, object_id, object_name, player_objects, ObjectId, PlayerId,
};
use simulation::structures::Structure;

use crate::session::{HudSession, InteractionMode};

/// Builders an order goes to: the flagged multi-selection, or the panel's
/// selected builder when nothing is flagged.
pub fn selected_builders(world: &mut World, session: &HudSession) -> Vec<Entity> {
    let owned = player_objects(world, session.player);
    let world: &World = world;
    let flagged: Vec<Entity> = owned
        .into_iter()
        .filter(|&entity| {
            is_alive(world, entity) && is_builder(world, entity) && is_flagged_selected(world, entity)
        })
        .collect();
    if !flagged.is_empty() {
        return flagged;
    }
    session
        .selected_object
        .filter(|&entity| is_alive(world, entity) && is_builder(world, entity))
        .into_iter()
        .collect()
}

fn dispatch_to_builders(
    world: &mut World,
    session: &HudSession,
    make: impl Fn(ObjectId) -> GameAction,
) -> ActionResult {
    let builders = selected_builders(world, session);
    if builders.is_empty() {
        warn!("placement: no live builder selected");
        return ActionResult::Error(ActionError::NotFound);
    }
    let mut outcome = ActionResult::Success;
    for builder in builders {
        let Some(id) = object_id(world, builder) else {
            continue;
        };
        let result = dispatch_action(world, session.player, make(id));
        if !result.is_success() {
            outcome = result;
        }
    }
    outcome
}

/// Build the pending structure from `pos` to `end` (the same tile for a
/// single structure). `queued` appends to each builder's order list.
pub fn complete_placement(
    world: &mut World,
    session: &mut HudSession,
    pos: (i32, i32),
    end: (i32, i32),
    queued: bool,
) -> ActionResult {
    let InteractionMode::BuildPlacement(stats) = session.mode else {
        warn!("complete_placement: not placing a structure ({:?})", session.mode);
        return ActionResult::Error(ActionError::InvalidTarget);
    };
    let result = dispatch_to_builders(world, session, |droid| GameAction::OrderBuild {
        droid,
        stats,
        pos,
        pos2: end,
        queued,
    });
    session.mode = InteractionMode::Normal;
    result
}

pub fn complete_demolish(world: &mut World, session: &mut HudSession, target: Entity) -> ActionResult {
    if session.mode != InteractionMode::DemolishSelection {
        warn!("complete_demolish: not selecting a demolish target ({:?})", session.mode);
        return ActionResult::Error(ActionError::InvalidTarget);
    }
    let Some(target) = object_id(world, target) else {
        warn!("complete_demolish: {:?} is not a game object", target);
        return ActionResult::Error(ActionError::NotFound);
    };
    let result = dispatch_to_builders(world, session, |droid| GameAction::OrderDemolish {
        droid,
        target,
    });
    session.mode = InteractionMode::Normal;
    result
}

pub fn cancel_placement(session: &mut HudSession) {
    session.mode = InteractionMode::Normal;
}

/// A structure the player could pick while selecting a demolish target.
#[derive(Debug, Clone, PartialEq)]
pub struct DemolishTarget {
    pub entity: Entity,
    pub name: String,
    pub pos: (i32, i32),
}

pub fn demolish_targets(world: &mut World, player: PlayerId) -> Vec<DemolishTarget> {
    let owned = player_objects(world, player);
    let world: &World = world;
    owned
        .into_iter()
        .filter(|&entity| is_alive(world, entity))
        .filter_map(|entity| {
            let structure = world.get::<Structure>(entity)?;
            Some(DemolishTarget {
                entity,
                name: object_name(world, entity).unwrap_or_default().to_string(),
                pos: structure.pos,
            })
        })
        .collect()
}
