//! Droid orders: what a droid has been told to do, and what it is doing about
//! it right now.
//!
//! The order says *what* (build this at that tile, help build that site,
//! demolish that structure); the action says *how far along* the droid is
//! (still driving to the site, or already working on it). Further orders wait
//! in a FIFO list and are promoted by [`DroidOrders::advance`].

use bevy::prelude::*;

use crate::structures::StructureStatsId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderType {
    #[default]
    None,
    Move,
    Build,
    HelpBuild,
    LineBuild,
    Demolish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DroidAction {
    #[default]
    None,
    MoveToBuild,
    Build,
    Demolish,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DroidOrder {
    pub order_type: OrderType,
    /// Structure to build, for `Build` and `LineBuild`.
    pub stats: Option<StructureStatsId>,
    /// Structure being built, helped or demolished.
    pub target: Option<Entity>,
    pub pos: (i32, i32),
    /// End tile of a line build.
    pub pos2: (i32, i32),
}

impl DroidOrder {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn move_to(pos: (i32, i32)) -> Self {
        Self {
            order_type: OrderType::Move,
            pos,
            ..default()
        }
    }

    pub fn build(stats: StructureStatsId, pos: (i32, i32)) -> Self {
        Self {
            order_type: OrderType::Build,
            stats: Some(stats),
            pos,
            pos2: pos,
            ..default()
        }
    }

    pub fn line_build(stats: StructureStatsId, pos: (i32, i32), pos2: (i32, i32)) -> Self {
        Self {
            order_type: OrderType::LineBuild,
            stats: Some(stats),
            pos,
            pos2,
            ..default()
        }
    }

    pub fn help_build(target: Entity) -> Self {
        Self {
            order_type: OrderType::HelpBuild,
            target: Some(target),
            ..default()
        }
    }

    pub fn demolish(target: Entity) -> Self {
        Self {
            order_type: OrderType::Demolish,
            target: Some(target),
            ..default()
        }
    }

    pub fn is_none(&self) -> bool {
        self.order_type == OrderType::None
    }

    /// The action a droid starts in when it picks up this order.
    pub fn initial_action(&self) -> DroidAction {
        match self.order_type {
            OrderType::Build | OrderType::LineBuild => DroidAction::MoveToBuild,
            OrderType::HelpBuild => DroidAction::Build,
            OrderType::Demolish => DroidAction::Demolish,
            OrderType::None | OrderType::Move => DroidAction::None,
        }
    }

    /// Number of tiles a line build covers, end points included.
    pub fn line_length(&self) -> u32 {
        self.pos
            .0
            .abs_diff(self.pos2.0)
            .saturating_add(self.pos.1.abs_diff(self.pos2.1))
            .saturating_add(1)
    }
}

#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct DroidOrders {
    pub current: DroidOrder,
    pub action: DroidAction,
    pub queued: Vec<DroidOrder>,
}

impl DroidOrders {
    /// Replace whatever the droid is doing and drop its queue.
    pub fn assign(&mut self, order: DroidOrder) {
        self.action = order.initial_action();
        self.current = order;
        self.queued.clear();
    }

    /// Append an order to run after the current one.
    pub fn enqueue(&mut self, order: DroidOrder) {
        if self.current.is_none() {
            self.action = order.initial_action();
            self.current = order;
        } else {
            self.queued.push(order);
        }
    }

    /// Finish the current order and promote the next queued one.
    pub fn advance(&mut self) {
        let next = if self.queued.is_empty() {
            DroidOrder::none()
        } else {
            self.queued.remove(0)
        };
        self.action = next.initial_action();
        self.current = next;
    }

    /// Structure stats of a build order whose droid is still driving to the
    /// site.
    pub fn moving_to_build(&self) -> Option<StructureStatsId> {
        if self.current.order_type == OrderType::Build && self.action == DroidAction::MoveToBuild {
            self.current.stats
        } else {
            None
        }
    }
}
