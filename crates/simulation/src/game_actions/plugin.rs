//! Wires the action queue, executor and result log into `FixedUpdate`, plus
//! the pass that settles the HUD's optimistic research markers once queued
//! research orders have run.

use bevy::prelude::*;

use super::executor::execute_queued_actions;
use super::result_log::{ActionResultLog, LoggedAction};
use super::{ActionQueue, ActionResult, GameAction};
use crate::objects::{find_object, owner_of};
use crate::research::ResearchFacility;
use crate::SimulationSet;

pub struct GameActionsPlugin;

impl Plugin for GameActionsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActionQueue>()
            .init_resource::<ActionResultLog>()
            .add_systems(
                FixedUpdate,
                (execute_queued_actions, reconcile_pending_research)
                    .chain()
                    .in_set(SimulationSet::PreSim),
            );
    }
}

/// A research order that failed or had nothing to do leaves its facility's
/// pending marker describing something that never happened. Reset it from
/// the authoritative subject for every such order logged since the last run.
pub fn reconcile_pending_research(world: &mut World, mut seen: Local<u64>) {
    let fresh: Vec<LoggedAction> = match world.get_resource::<ActionResultLog>() {
        Some(log) => {
            let fresh = log.since(*seen).to_vec();
            *seen = log.recorded();
            fresh
        }
        None => return,
    };
    for entry in fresh {
        discard_unapplied(world, &entry);
    }
}

/// Reset the pending marker of the facility `entry` addressed, unless the
/// order went through cleanly.
pub fn discard_unapplied(world: &mut World, entry: &LoggedAction) {
    if entry.result == ActionResult::Success {
        return;
    }
    let facility = match entry.action {
        GameAction::StartResearch { facility, .. }
        | GameAction::CancelResearch { facility }
        | GameAction::HoldResearch { facility }
        | GameAction::ReleaseResearch { facility } => facility,
        GameAction::OrderBuild { .. } | GameAction::OrderDemolish { .. } => return,
    };
    let Some(entity) = find_object(world, facility) else {
        return;
    };
    if owner_of(world, entity) != Some(entry.player) {
        return;
    }
    if let Some(mut state) = world.get_mut::<ResearchFacility>(entity) {
        debug!(
            "Research order {:?} did not apply ({:?}); pending marker reset",
            entry.action, entry.result
        );
        state.discard_pending();
    }
}
