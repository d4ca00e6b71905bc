//! Construction: moving builders onto sites, paying for and raising
//! structures, and demolition.
//!
//! Movement is not simulated. A droid in `MoveToBuild` arrives on the next
//! tick, claims or creates the site and switches to `Build`.

use bevy::prelude::*;

use crate::config::{CONSTRUCT_POINTS_PER_TICK, POWER_PER_TICK};
use crate::objects::{is_alive, mark_dead, GameObject, PlayerId};
use crate::orders::{DroidAction, DroidOrder, DroidOrders, OrderType};
use crate::structures::{
    spawn_structure, structure_at, Structure, StructureCatalog, StructureStatus,
};

pub fn construction_tick(world: &mut World) {
    let mut query = world.query::<(Entity, &GameObject, &DroidOrders)>();
    let working: Vec<(Entity, PlayerId)> = query
        .iter(world)
        .filter(|(_, object, orders)| !object.died && orders.action != DroidAction::None)
        .map(|(entity, object, _)| (entity, object.player))
        .collect();

    for (droid, player) in working {
        let Some(orders) = world.get::<DroidOrders>(droid) else {
            continue;
        };
        let action = orders.action;
        let order = orders.current.clone();
        match action {
            DroidAction::MoveToBuild => arrive_at_site(world, droid, player, &order),
            DroidAction::Build => build_step(world, droid, &order),
            DroidAction::Demolish => demolish_step(world, droid, &order),
            DroidAction::None => {}
        }
    }
}

fn arrive_at_site(world: &mut World, droid: Entity, player: PlayerId, order: &DroidOrder) {
    let Some(stats) = order.stats else {
        warn!("construction_tick: build order without structure stats");
        advance(world, droid);
        return;
    };
    let site = match structure_at(world, player, stats, order.pos) {
        Some(site) => {
            if world.get::<Structure>(site).is_some_and(Structure::is_built) {
                finish_site(world, droid, order);
                return;
            }
            site
        }
        None => spawn_structure(world, player, stats, StructureStatus::BeingBuilt, order.pos),
    };
    if let Some(mut orders) = world.get_mut::<DroidOrders>(droid) {
        orders.current.target = Some(site);
        orders.action = DroidAction::Build;
    }
}

fn build_step(world: &mut World, droid: Entity, order: &DroidOrder) {
    let Some(site) = order.target.filter(|&site| is_alive(world, site)) else {
        advance(world, droid);
        return;
    };
    let Some(stats) = world.get::<Structure>(site).map(|s| s.stats) else {
        advance(world, droid);
        return;
    };
    let (power_needed, points_needed) = world
        .get_resource::<StructureCatalog>()
        .and_then(|catalog| catalog.get(stats))
        .map_or((0, 0), |s| (s.power_to_build, s.build_points));

    let Some(mut structure) = world.get_mut::<Structure>(site) else {
        return;
    };
    if structure.is_built() {
        finish_site(world, droid, order);
        return;
    }
    if structure.power_accrued < power_needed {
        structure.power_accrued = (structure.power_accrued + POWER_PER_TICK).min(power_needed);
        structure.last_build_rate = 0;
        return;
    }
    structure.current_build_points =
        (structure.current_build_points + CONSTRUCT_POINTS_PER_TICK).min(points_needed);
    structure.last_build_rate = CONSTRUCT_POINTS_PER_TICK;
    if structure.current_build_points < points_needed {
        return;
    }
    structure.status = StructureStatus::Built;
    structure.last_build_rate = 0;
    let pos = structure.pos;
    info!("Structure {} completed at {:?}", stats.0, pos);
    finish_site(world, droid, order);
}

fn demolish_step(world: &mut World, droid: Entity, order: &DroidOrder) {
    if let Some(target) = order.target.filter(|&target| is_alive(world, target)) {
        mark_dead(world, target);
        info!("Structure {:?} demolished", target);
    }
    advance(world, droid);
}

/// The droid is done with its current site. Line builds move on to the next
/// tile; everything else promotes the next queued order.
fn finish_site(world: &mut World, droid: Entity, order: &DroidOrder) {
    let Some(mut orders) = world.get_mut::<DroidOrders>(droid) else {
        return;
    };
    if order.order_type == OrderType::LineBuild && order.pos != order.pos2 {
        orders.current.pos = step_toward(order.pos, order.pos2);
        orders.current.target = None;
        orders.action = DroidAction::MoveToBuild;
    } else {
        orders.advance();
    }
}

fn advance(world: &mut World, droid: Entity) {
    if let Some(mut orders) = world.get_mut::<DroidOrders>(droid) {
        orders.advance();
    }
}

/// One tile along an L-shaped path, x first.
fn step_toward(from: (i32, i32), to: (i32, i32)) -> (i32, i32) {
    if from.0 != to.0 {
        (from.0 + to.0.cmp(&from.0) as i32, from.1)
    } else {
        (from.0, from.1 + to.1.cmp(&from.1) as i32)
    }
}
