//! Build panel: the player's construction droids on the left, structures they
//! can be told to build on the right.

use bevy::prelude::*;

use simulation::droids::{is_builder, Droid};
use simulation::game_actions::{ActionError, ActionResult};
use simulation::objects::{is_alive, is_flagged_selected, set_selected, PlayerId};
use simulation::orders::{DroidAction, DroidOrder, DroidOrders, OrderType};
use simulation::structures::{
    count_living, Availability, Structure, StructureAvailability, StructureCatalog,
    StructureStatsId,
};

use crate::controller::{PanelController, Progress};
use crate::object_list::{ObjectKind, ObjectListController};
use crate::session::{HudEvent, HudSession, InteractionMode};
use crate::stats_list::{self, FavoriteTable, ListFilter, StatEntry, StatsListController};

/// One entry of the build list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildOption {
    /// Pick a structure to tear down instead of placing one.
    Demolish,
    Structure(StructureStatsId),
}

impl FavoriteTable<BuildOption> for StructureCatalog {
    fn is_favorite(&self, option: BuildOption) -> bool {
        match option {
            BuildOption::Demolish => false,
            BuildOption::Structure(id) => StructureCatalog::is_favorite(self, id),
        }
    }

    fn set_favorite(&mut self, option: BuildOption, favorite: bool) {
        if let BuildOption::Structure(id) = option {
            StructureCatalog::set_favorite(self, id, favorite);
        }
    }
}

/// Everything `player` could build right now, demolish first. Structures must
/// be available (redundant ones are flagged obsolete) and below their limit.
pub fn build_candidates(world: &mut World, player: PlayerId) -> Vec<StatEntry<BuildOption>> {
    let rows: Vec<(StructureStatsId, Option<u32>, bool, Availability)> = {
        let Some(catalog) = world.get_resource::<StructureCatalog>() else {
            warn!("build_candidates: StructureCatalog missing");
            return vec![StatEntry::pinned(BuildOption::Demolish)];
        };
        let availability = world.get_resource::<StructureAvailability>();
        catalog
            .iter()
            .map(|stats| {
                let state = availability.map_or(Availability::Unavailable, |table| {
                    table.get(player, stats.id)
                });
                (stats.id, stats.limit, stats.is_favorite, state)
            })
            .collect()
    };

    let mut candidates = vec![StatEntry::pinned(BuildOption::Demolish)];
    for (id, limit, favorite, availability) in rows {
        let obsolete = match availability {
            Availability::Unavailable => continue,
            Availability::Available => false,
            Availability::Redundant => true,
        };
        if let Some(limit) = limit {
            if count_living(world, player, id) >= limit {
                continue;
            }
        }
        candidates.push(StatEntry {
            stat: BuildOption::Structure(id),
            obsolete,
            favorite,
            pinned: false,
        });
    }
    candidates
}

/// Structure stats an order works towards, if it is a build order at all.
fn order_structure(world: &World, order: &DroidOrder) -> Option<StructureStatsId> {
    match order.order_type {
        OrderType::Build | OrderType::LineBuild => order.stats,
        OrderType::HelpBuild => order
            .target
            .and_then(|target| world.get::<Structure>(target))
            .map(|structure| structure.stats),
        _ => None,
    }
}

pub struct BuildInterfaceController {
    objects: ObjectListController,
    stats: StatsListController<BuildOption>,
}

impl Default for BuildInterfaceController {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildInterfaceController {
    pub fn new() -> Self {
        Self {
            objects: ObjectListController::new(ObjectKind::Builders),
            stats: StatsListController::default(),
        }
    }

    /// Leave the panel and wait for the player to pick a tile (or, for
    /// demolish, a structure) on the map.
    pub fn start_build_position(
        &self,
        world: &World,
        session: &mut HudSession,
        option: BuildOption,
    ) -> ActionResult {
        let Some(droid) = session.selected_object else {
            warn!("start_build_position: no builder selected");
            return ActionResult::Error(ActionError::NotFound);
        };
        if !is_alive(world, droid) || world.get::<Droid>(droid).is_none() {
            warn!("start_build_position: {:?} is not a live droid", droid);
            return ActionResult::Error(ActionError::ObjectDead);
        }

        session.push_event(HudEvent::BuildSelected);
        session.mode = match option {
            BuildOption::Demolish => InteractionMode::DemolishSelection,
            BuildOption::Structure(stats) => InteractionMode::BuildPlacement(stats),
        };
        self.close_interface(session);
        ActionResult::Success
    }

    /// Ctrl/shift-click on a builder: add it to or drop it from the
    /// multi-selection. Adding also keeps the current builder selected.
    pub fn toggle_object_selection(
        &self,
        world: &mut World,
        session: &mut HudSession,
        droid: Entity,
    ) {
        if is_flagged_selected(world, droid) {
            set_selected(world, droid, false);
        } else {
            if let Some(previous) = session.selected_object {
                set_selected(world, previous, true);
            }
            set_selected(world, droid, true);
            session.selected_object = Some(droid);
        }
        session.push_event(HudEvent::SelectionChanged);
    }

    pub fn toggle_favorite(
        &mut self,
        world: &mut World,
        session: &HudSession,
        option: BuildOption,
    ) {
        if option != BuildOption::Demolish {
            stats_list::toggle_favorite::<BuildOption, StructureCatalog>(world, option);
        }
        self.refresh_stats(world, session);
    }

    pub fn set_show_obsolete(&mut self, world: &mut World, session: &mut HudSession, show: bool) {
        session.show_obsolete = show;
        self.refresh_stats(world, session);
    }

    pub fn set_show_favorites(&mut self, world: &mut World, session: &mut HudSession, show: bool) {
        session.show_favorites = show;
        self.refresh_stats(world, session);
    }
}

impl PanelController for BuildInterfaceController {
    type Stat = BuildOption;

    fn objects(&self) -> &ObjectListController {
        &self.objects
    }

    fn objects_mut(&mut self) -> &mut ObjectListController {
        &mut self.objects
    }

    fn stats(&self) -> &StatsListController<BuildOption> {
        &self.stats
    }

    fn refresh_stats(&mut self, world: &mut World, session: &HudSession) {
        let candidates = build_candidates(world, session.player);
        self.stats.refresh(candidates, ListFilter::from_session(session));
    }

    fn get_object_stats_at(&self, world: &World, index: usize) -> Option<BuildOption> {
        let builder = self.objects.get(index)?;
        if !is_builder(world, builder) {
            return None;
        }
        let orders = world.get::<DroidOrders>(builder)?;
        if let Some(stats) = orders.moving_to_build() {
            return Some(BuildOption::Structure(stats));
        }

        let order = &orders.current;
        let live_target = order.target.filter(|&target| is_alive(world, target));
        match order.order_type {
            OrderType::Build if live_target.is_some() => order.stats.map(BuildOption::Structure),
            OrderType::HelpBuild | OrderType::LineBuild => live_target
                .and_then(|target| world.get::<Structure>(target))
                .map(|structure| BuildOption::Structure(structure.stats)),
            OrderType::Demolish => Some(BuildOption::Demolish),
            _ => None,
        }
    }

    fn menu_up_event(&self) -> HudEvent {
        HudEvent::BuildMenuUp
    }

    fn stat_name(&self, world: &World, option: BuildOption) -> String {
        match option {
            BuildOption::Demolish => String::from("Demolish"),
            BuildOption::Structure(id) => world
                .get_resource::<StructureCatalog>()
                .map_or_else(String::new, |catalog| catalog.name(id).to_string()),
        }
    }

    fn stat_cost(&self, world: &World, option: BuildOption) -> u32 {
        match option {
            BuildOption::Demolish => 0,
            BuildOption::Structure(id) => world
                .get_resource::<StructureCatalog>()
                .and_then(|catalog| catalog.get(id))
                .map_or(0, |stats| stats.power_to_build),
        }
    }

    fn stat_is_favorite(&self, world: &World, option: BuildOption) -> bool {
        world
            .get_resource::<StructureCatalog>()
            .is_some_and(|catalog| FavoriteTable::is_favorite(catalog, option))
    }

    /// Progress of the site the builder is working on. Nothing while it is
    /// still driving there.
    fn object_progress(&self, world: &World, index: usize) -> Option<Progress> {
        let builder = self.objects.get(index)?;
        let orders = world.get::<DroidOrders>(builder)?;
        if orders.action != DroidAction::Build {
            return None;
        }
        let site = orders.current.target.filter(|&site| is_alive(world, site))?;
        let structure = world.get::<Structure>(site)?;
        let stats = world
            .get_resource::<StructureCatalog>()
            .and_then(|catalog| catalog.get(structure.stats))?;
        if structure.current_build_points != 0 {
            Some(Progress::Time {
                current: structure.current_build_points,
                total: stats.build_points,
                rate: structure.last_build_rate,
                label: "Build Progress",
            })
        } else {
            Some(Progress::Power {
                accrued: structure.power_accrued,
                needed: stats.power_to_build,
            })
        }
    }

    /// Structures in the builder's unbroken run of orders for the same
    /// stats, starting with the current order. Only worth showing above one.
    fn production_run_size(&self, world: &World, index: usize) -> Option<u32> {
        let builder = self.objects.get(index)?;
        let orders = world.get::<DroidOrders>(builder)?;
        let mut run: Option<StructureStatsId> = None;
        let mut count = 0;
        for order in std::iter::once(&orders.current).chain(orders.queued.iter()) {
            let Some(stats) = order_structure(world, order) else {
                break;
            };
            if run.is_some_and(|current| current != stats) {
                break;
            }
            run = Some(stats);
            count += match order.order_type {
                OrderType::LineBuild => order.line_length(),
                _ => 1,
            };
        }
        (count > 1).then_some(count)
    }
}
