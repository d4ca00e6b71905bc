//! Action executor: applies [`GameAction`]s to the world, either straight away
//! (local play) or when [`execute_queued_actions`] drains the [`ActionQueue`]
//! on a fixed tick (networked play). Every result lands in the
//! [`ActionResultLog`].
//!
//! Each action variant has a dedicated execution function that validates
//! ownership and liveness, mutates the relevant components and returns an
//! [`ActionResult`].

use bevy::prelude::*;

use crate::config::MAP_SIZE;
use crate::droids::is_builder;
use crate::objects::{find_object, is_alive, owner_of, GameObject, NetworkMode, PlayerId};
use crate::orders::{DroidOrder, DroidOrders};
use crate::research::{PlayerResearch, ResearchCatalog, ResearchFacility, ResearchId, TopicState};
use crate::structures::{
    count_living, Availability, Structure, StructureAvailability, StructureCatalog,
    StructureStatsId,
};
use crate::TickCounter;

use super::result_log::ActionResultLog;
use super::{ActionError, ActionQueue, ActionResult, GameAction};

// ---------------------------------------------------------------------------
// Systems / entry points
// ---------------------------------------------------------------------------

/// Drains all pending actions from the queue and executes them in order.
pub fn execute_queued_actions(world: &mut World) {
    let actions = match world.get_resource_mut::<ActionQueue>() {
        Some(mut queue) if !queue.is_empty() => queue.drain(),
        _ => return,
    };
    let tick = current_tick(world);
    for queued in actions {
        let result = apply_action(world, queued.player, &queued.action, tick);
        record(world, queued.player, queued.action, result);
    }
}

/// Issue an order for `player`.
///
/// Under [`NetworkMode::Networked`] the order is queued for a later tick and
/// reported as `Success` immediately; locally it is applied on the spot.
pub fn dispatch_action(world: &mut World, player: PlayerId, action: GameAction) -> ActionResult {
    let mode = world
        .get_resource::<NetworkMode>()
        .copied()
        .unwrap_or_default();
    let tick = current_tick(world);
    match mode {
        NetworkMode::Networked => {
            debug!("Queued {:?} for player {} at tick {}", action, player.0, tick);
            world
                .get_resource_or_insert_with(ActionQueue::default)
                .push(tick, player, action);
            ActionResult::Success
        }
        NetworkMode::Local => {
            let result = apply_action(world, player, &action, tick);
            record(world, player, action, result.clone());
            result
        }
    }
}

fn current_tick(world: &World) -> u64 {
    world.get_resource::<TickCounter>().map_or(0, |tick| tick.0)
}

fn record(world: &mut World, player: PlayerId, action: GameAction, result: ActionResult) {
    match &result {
        ActionResult::Error(err) => {
            warn!("Player {} action {:?} failed: {:?}", player.0, action, err)
        }
        ActionResult::SuccessWithWarning(msg) => {
            debug!("Player {} action {:?}: {}", player.0, action, msg)
        }
        ActionResult::Success => {}
    }
    world
        .get_resource_or_insert_with(ActionResultLog::default)
        .push(player, action, result);
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub fn apply_action(
    world: &mut World,
    player: PlayerId,
    action: &GameAction,
    tick: u64,
) -> ActionResult {
    let entity = match resolve_owned(world, player, action.subject()) {
        Ok(entity) => entity,
        Err(result) => return result,
    };
    match action {
        GameAction::StartResearch { topic, .. } => {
            execute_start_research(world, player, entity, *topic)
        }
        GameAction::CancelResearch { .. } => execute_cancel_research(world, player, entity),
        GameAction::HoldResearch { .. } => execute_hold_research(world, entity, tick),
        GameAction::ReleaseResearch { .. } => execute_release_research(world, entity),
        GameAction::OrderBuild {
            stats,
            pos,
            pos2,
            queued,
            ..
        } => execute_order_build(world, player, entity, *stats, *pos, *pos2, *queued),
        GameAction::OrderDemolish { target, .. } => {
            execute_order_demolish(world, player, entity, *target)
        }
    }
}

// ---------------------------------------------------------------------------
// Execution functions
// ---------------------------------------------------------------------------

fn resolve_owned(
    world: &mut World,
    player: PlayerId,
    id: crate::objects::ObjectId,
) -> Result<Entity, ActionResult> {
    let entity = find_object(world, id).ok_or(ActionResult::Error(ActionError::NotFound))?;
    if owner_of(world, entity) != Some(player) {
        return Err(ActionResult::Error(ActionError::NotOwned));
    }
    if !is_alive(world, entity) {
        return Err(ActionResult::Error(ActionError::ObjectDead));
    }
    Ok(entity)
}

/// Another living facility of the player is already on `topic`.
fn claimed_elsewhere(world: &mut World, player: PlayerId, facility: Entity, topic: ResearchId) -> bool {
    let mut query = world.query::<(Entity, &GameObject, &ResearchFacility)>();
    query.iter(world).any(|(other, object, other_facility)| {
        other != facility
            && object.player == player
            && !object.died
            && other_facility.subject == Some(topic)
    })
}

fn execute_start_research(
    world: &mut World,
    player: PlayerId,
    entity: Entity,
    topic: ResearchId,
) -> ActionResult {
    let Some(previous) = world.get::<ResearchFacility>(entity).map(|f| f.subject) else {
        return ActionResult::Error(ActionError::InvalidTarget);
    };
    let Some(prerequisites) = world
        .get_resource::<ResearchCatalog>()
        .and_then(|catalog| catalog.get(topic))
        .map(|t| t.prerequisites.clone())
    else {
        return ActionResult::Error(ActionError::NotFound);
    };
    {
        let progress = world.get_resource_or_insert_with(PlayerResearch::default);
        if progress.is_completed(player, topic)
            || !prerequisites.iter().all(|&p| progress.is_completed(player, p))
        {
            return ActionResult::Error(ActionError::NotResearchable);
        }
    }
    if claimed_elsewhere(world, player, entity, topic) {
        return ActionResult::Error(ActionError::AlreadyExists);
    }

    if previous == Some(topic) {
        if let Some(mut facility) = world.get_mut::<ResearchFacility>(entity) {
            facility.subject_pending = Some(topic);
            facility.release();
        }
        return ActionResult::Success;
    }

    {
        let mut progress = world.resource_mut::<PlayerResearch>();
        if let Some(old) = previous {
            progress.set_state(player, old, TopicState::Cancelled);
        }
        progress.set_state(player, topic, TopicState::Started);
    }
    if let Some(mut facility) = world.get_mut::<ResearchFacility>(entity) {
        facility.begin(topic);
    }
    info!("Player {} started research on topic {}", player.0, topic.0);
    ActionResult::Success
}

fn execute_cancel_research(world: &mut World, player: PlayerId, entity: Entity) -> ActionResult {
    let subject = match world.get_mut::<ResearchFacility>(entity) {
        Some(mut facility) => {
            let subject = facility.subject;
            facility.clear();
            subject
        }
        None => return ActionResult::Error(ActionError::InvalidTarget),
    };
    let Some(topic) = subject else {
        return ActionResult::SuccessWithWarning("facility is not researching".into());
    };

    let mut progress = world.get_resource_or_insert_with(PlayerResearch::default);
    if !progress.is_completed(player, topic) {
        progress.set_state(player, topic, TopicState::Cancelled);
    }
    info!("Player {} cancelled research on topic {}", player.0, topic.0);
    ActionResult::Success
}

fn execute_hold_research(world: &mut World, entity: Entity, tick: u64) -> ActionResult {
    let Some(mut facility) = world.get_mut::<ResearchFacility>(entity) else {
        return ActionResult::Error(ActionError::InvalidTarget);
    };
    if facility.subject.is_none() {
        facility.status_pending = crate::research::PendingStatus::Nothing;
        return ActionResult::SuccessWithWarning("facility is not researching".into());
    }
    facility.hold(tick);
    ActionResult::Success
}

fn execute_release_research(world: &mut World, entity: Entity) -> ActionResult {
    let Some(mut facility) = world.get_mut::<ResearchFacility>(entity) else {
        return ActionResult::Error(ActionError::InvalidTarget);
    };
    let was_held = facility.is_on_hold();
    facility.release();
    if was_held {
        ActionResult::Success
    } else {
        ActionResult::SuccessWithWarning("research was not on hold".into())
    }
}

fn execute_order_build(
    world: &mut World,
    player: PlayerId,
    droid: Entity,
    stats: StructureStatsId,
    pos: (i32, i32),
    pos2: (i32, i32),
    queued: bool,
) -> ActionResult {
    if !is_builder(world, droid) {
        return ActionResult::Error(ActionError::InvalidTarget);
    }
    if !on_map(pos) || !on_map(pos2) {
        return ActionResult::Error(ActionError::OutOfBounds);
    }
    let limit = match world
        .get_resource::<StructureCatalog>()
        .and_then(|catalog| catalog.get(stats))
    {
        Some(structure) => structure.limit,
        None => return ActionResult::Error(ActionError::NotFound),
    };
    let availability = world
        .get_resource::<StructureAvailability>()
        .map_or(Availability::Unavailable, |a| a.get(player, stats));
    if availability == Availability::Unavailable {
        return ActionResult::Error(ActionError::FeatureLocked);
    }
    if let Some(limit) = limit {
        if count_living(world, player, stats) >= limit {
            return ActionResult::Error(ActionError::LimitReached);
        }
    }

    let order = if pos == pos2 {
        DroidOrder::build(stats, pos)
    } else {
        DroidOrder::line_build(stats, pos, pos2)
    };
    let Some(mut orders) = world.get_mut::<DroidOrders>(droid) else {
        return ActionResult::Error(ActionError::InvalidTarget);
    };
    if queued {
        orders.enqueue(order);
    } else {
        orders.assign(order);
    }
    ActionResult::Success
}

fn on_map(pos: (i32, i32)) -> bool {
    (0..MAP_SIZE).contains(&pos.0) && (0..MAP_SIZE).contains(&pos.1)
}

fn execute_order_demolish(
    world: &mut World,
    player: PlayerId,
    droid: Entity,
    target: crate::objects::ObjectId,
) -> ActionResult {
    if !is_builder(world, droid) {
        return ActionResult::Error(ActionError::InvalidTarget);
    }
    let target = match resolve_owned(world, player, target) {
        Ok(entity) => entity,
        Err(result) => return result,
    };
    if world.get::<Structure>(target).is_none() {
        return ActionResult::Error(ActionError::InvalidTarget);
    }
    let Some(mut orders) = world.get_mut::<DroidOrders>(droid) else {
        return ActionResult::Error(ActionError::InvalidTarget);
    };
    orders.assign(DroidOrder::demolish(target));
    ActionResult::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::droids::{spawn_droid, DroidType};
    use crate::objects::{mark_dead, object_id, ObjectId};
    use crate::orders::{DroidAction, OrderType};
    use crate::structures::{spawn_structure, StructureStatus};

    fn world_with_tables() -> World {
        let mut world = World::new();
        world.init_resource::<StructureCatalog>();
        world.init_resource::<StructureAvailability>();
        world.init_resource::<ResearchCatalog>();
        world.init_resource::<PlayerResearch>();
        world.init_resource::<TickCounter>();
        world
    }

    fn lab(world: &mut World, player: PlayerId) -> (Entity, ObjectId) {
        let entity = spawn_structure(
            world,
            player,
            StructureStatsId::RESEARCH_FACILITY,
            StructureStatus::Built,
            (0, 0),
        );
        (entity, object_id(world, entity).expect("has id"))
    }

    #[test]
    fn test_start_research_assigns_subject() {
        let mut world = world_with_tables();
        let (entity, id) = lab(&mut world, PlayerId(0));

        let result = apply_action(
            &mut world,
            PlayerId(0),
            &GameAction::StartResearch {
                facility: id,
                topic: ResearchId::ENGINEERING,
            },
            0,
        );
        assert_eq!(result, ActionResult::Success);

        let facility = world.get::<ResearchFacility>(entity).expect("facility");
        assert_eq!(facility.subject, Some(ResearchId::ENGINEERING));
        assert!(world
            .resource::<PlayerResearch>()
            .is_started(PlayerId(0), ResearchId::ENGINEERING));
    }

    #[test]
    fn test_foreign_and_dead_objects_rejected() {
        let mut world = world_with_tables();
        let (entity, id) = lab(&mut world, PlayerId(1));
        let action = GameAction::CancelResearch { facility: id };

        assert_eq!(
            apply_action(&mut world, PlayerId(0), &action, 0),
            ActionResult::Error(ActionError::NotOwned)
        );
        mark_dead(&mut world, entity);
        assert_eq!(
            apply_action(&mut world, PlayerId(1), &action, 0),
            ActionResult::Error(ActionError::ObjectDead)
        );
        assert_eq!(
            apply_action(
                &mut world,
                PlayerId(1),
                &GameAction::CancelResearch {
                    facility: ObjectId(4040)
                },
                0
            ),
            ActionResult::Error(ActionError::NotFound)
        );
    }

    #[test]
    fn test_locked_prerequisite_not_researchable() {
        let mut world = world_with_tables();
        let (_, id) = lab(&mut world, PlayerId(0));
        let result = apply_action(
            &mut world,
            PlayerId(0),
            &GameAction::StartResearch {
                facility: id,
                topic: ResearchId::TOWER_HARDENING,
            },
            0,
        );
        assert_eq!(result, ActionResult::Error(ActionError::NotResearchable));
    }

    #[test]
    fn test_same_topic_in_two_facilities_rejected() {
        let mut world = world_with_tables();
        let (_, first) = lab(&mut world, PlayerId(0));
        let (_, second) = lab(&mut world, PlayerId(0));
        let start = |facility| GameAction::StartResearch {
            facility,
            topic: ResearchId::POWER_MODULE,
        };
        assert!(apply_action(&mut world, PlayerId(0), &start(first), 0).is_success());
        assert_eq!(
            apply_action(&mut world, PlayerId(0), &start(second), 0),
            ActionResult::Error(ActionError::AlreadyExists)
        );
    }

    #[test]
    fn test_hold_then_release() {
        let mut world = world_with_tables();
        let (entity, id) = lab(&mut world, PlayerId(0));
        apply_action(
            &mut world,
            PlayerId(0),
            &GameAction::StartResearch {
                facility: id,
                topic: ResearchId::ENGINEERING,
            },
            0,
        );
        apply_action(&mut world, PlayerId(0), &GameAction::HoldResearch { facility: id }, 5);
        assert_eq!(
            world.get::<ResearchFacility>(entity).and_then(|f| f.held_since),
            Some(5)
        );
        let release = apply_action(
            &mut world,
            PlayerId(0),
            &GameAction::ReleaseResearch { facility: id },
            6,
        );
        assert_eq!(release, ActionResult::Success);
        assert!(!world
            .get::<ResearchFacility>(entity)
            .is_some_and(|f| f.is_on_hold()));
    }

    #[test]
    fn test_order_build_respects_availability_and_limit() {
        let mut world = world_with_tables();
        let truck = spawn_droid(&mut world, PlayerId(0), DroidType::Construct, "Truck");
        let droid = object_id(&world, truck).expect("has id");
        let build = |stats| GameAction::OrderBuild {
            droid,
            stats,
            pos: (3, 3),
            pos2: (3, 3),
            queued: false,
        };

        assert_eq!(
            apply_action(&mut world, PlayerId(0), &build(StructureStatsId::MG_TOWER), 0),
            ActionResult::Error(ActionError::FeatureLocked)
        );

        spawn_structure(
            &mut world,
            PlayerId(0),
            StructureStatsId::COMMAND_CENTER,
            StructureStatus::Built,
            (9, 9),
        );
        assert_eq!(
            apply_action(
                &mut world,
                PlayerId(0),
                &build(StructureStatsId::COMMAND_CENTER),
                0
            ),
            ActionResult::Error(ActionError::LimitReached)
        );

        assert!(apply_action(&mut world, PlayerId(0), &build(StructureStatsId::FACTORY), 0)
            .is_success());
        let orders = world.get::<DroidOrders>(truck).expect("orders");
        assert_eq!(orders.current.order_type, OrderType::Build);
        assert_eq!(orders.action, DroidAction::MoveToBuild);
        assert_eq!(orders.moving_to_build(), Some(StructureStatsId::FACTORY));
    }

    #[test]
    fn test_order_build_rejects_tiles_off_the_map() {
        let mut world = world_with_tables();
        let truck = spawn_droid(&mut world, PlayerId(0), DroidType::Construct, "Truck");
        let droid = object_id(&world, truck).expect("has id");
        let build = |pos, pos2| GameAction::OrderBuild {
            droid,
            stats: StructureStatsId::POWER_GENERATOR,
            pos,
            pos2,
            queued: false,
        };

        for (pos, pos2) in [
            ((i32::MIN, 0), (i32::MAX, 0)),
            ((-1, 5), (-1, 5)),
            ((0, 0), (MAP_SIZE, 0)),
            ((3, MAP_SIZE), (3, 0)),
        ] {
            assert_eq!(
                apply_action(&mut world, PlayerId(0), &build(pos, pos2), 0),
                ActionResult::Error(ActionError::OutOfBounds),
                "{pos:?} -> {pos2:?}"
            );
        }
        let orders = world.get::<DroidOrders>(truck).expect("orders");
        assert_eq!(orders.current.order_type, OrderType::None);

        let edge = (MAP_SIZE - 1, MAP_SIZE - 1);
        assert!(apply_action(&mut world, PlayerId(0), &build((0, 0), edge), 0).is_success());
        let orders = world.get::<DroidOrders>(truck).expect("orders");
        assert_eq!(orders.current.line_length(), 2 * MAP_SIZE as u32 - 1);
    }

    #[test]
    fn test_non_builder_cannot_build() {
        let mut world = world_with_tables();
        let tank = spawn_droid(&mut world, PlayerId(0), DroidType::Weapon, "Viper");
        let droid = object_id(&world, tank).expect("has id");
        let result = apply_action(
            &mut world,
            PlayerId(0),
            &GameAction::OrderBuild {
                droid,
                stats: StructureStatsId::FACTORY,
                pos: (1, 1),
                pos2: (1, 1),
                queued: false,
            },
            0,
        );
        assert_eq!(result, ActionResult::Error(ActionError::InvalidTarget));
    }

    #[test]
    fn test_dispatch_networked_only_queues() {
        let mut world = world_with_tables();
        world.insert_resource(NetworkMode::Networked);
        let (entity, id) = lab(&mut world, PlayerId(0));

        let result = dispatch_action(
            &mut world,
            PlayerId(0),
            GameAction::StartResearch {
                facility: id,
                topic: ResearchId::ENGINEERING,
            },
        );
        assert_eq!(result, ActionResult::Success);
        assert_eq!(world.resource::<ActionQueue>().len(), 1);
        assert_eq!(
            world.get::<ResearchFacility>(entity).and_then(|f| f.subject),
            None
        );

        execute_queued_actions(&mut world);
        assert!(world.resource::<ActionQueue>().is_empty());
        assert_eq!(
            world.get::<ResearchFacility>(entity).and_then(|f| f.subject),
            Some(ResearchId::ENGINEERING)
        );
        assert_eq!(world.resource::<ActionResultLog>().len(), 1);
    }
}
