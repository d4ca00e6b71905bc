//! Behaviour shared by the build and research panels.
//!
//! A panel pairs an [`ObjectListController`] with a [`StatsListController`]
//! and knows how to derive "what is object i doing right now". Everything
//! else (refresh order, open/close, selection) is common and lives in the
//! provided methods of [`PanelController`].

use bevy::prelude::*;

use simulation::objects::{is_alive, player_objects, set_selected};

use crate::object_list::ObjectListController;
use crate::session::{HudEvent, HudSession, PanelForms};
use crate::stats_list::StatsListController;

/// Raw numbers behind a stats button's progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Work has started: points so far, points needed and the points gained
    /// per tick (0 while stalled or on hold).
    Time {
        current: u32,
        total: u32,
        rate: u32,
        label: &'static str,
    },
    /// Still waiting for the power cost to be paid.
    Power { accrued: u32, needed: u32 },
}

pub trait PanelController {
    type Stat: Copy + PartialEq;

    fn objects(&self) -> &ObjectListController;
    fn objects_mut(&mut self) -> &mut ObjectListController;
    fn stats(&self) -> &StatsListController<Self::Stat>;

    /// Rebuild the stat list for the session's selected object.
    fn refresh_stats(&mut self, world: &mut World, session: &HudSession);

    /// The stat object `index` is currently working on.
    fn get_object_stats_at(&self, world: &World, index: usize) -> Option<Self::Stat>;

    /// Event raised when the panel is shown.
    fn menu_up_event(&self) -> HudEvent;

    fn stat_name(&self, world: &World, stat: Self::Stat) -> String;
    fn stat_cost(&self, world: &World, stat: Self::Stat) -> u32;
    fn stat_is_favorite(&self, world: &World, stat: Self::Stat) -> bool;

    /// Progress bar of object `index`, if it is working on something.
    fn object_progress(&self, world: &World, index: usize) -> Option<Progress>;

    fn production_run_size(&self, _world: &World, _index: usize) -> Option<u32> {
        None
    }

    /// Whether the stats button of object `index` should blink.
    fn is_flashing(&self, _world: &World, _index: usize) -> bool {
        false
    }

    /// Objects first, then selection, then stats: the stat list depends on
    /// which object is selected.
    fn update_data(&mut self, world: &mut World, session: &mut HudSession) {
        let player = session.player;
        self.objects_mut().refresh(world, player);
        self.objects().update_selected(world, session);
        self.refresh_stats(world, session);
    }

    /// Re-derive everything. Returns `false` and closes the panel when the
    /// player has no suitable objects left.
    fn refresh(&mut self, world: &mut World, session: &mut HudSession) -> bool {
        self.update_data(world, session);
        if self.objects().is_empty() {
            self.close_interface(session);
            return false;
        }
        true
    }

    /// Returns `false` if there is nothing to show.
    fn show_interface(&mut self, world: &mut World, session: &mut HudSession) -> bool {
        self.update_data(world, session);
        if self.objects().is_empty() {
            return false;
        }
        session.forms = PanelForms {
            objects: true,
            stats: true,
        };
        session.push_event(self.menu_up_event());
        true
    }

    fn display_stats_form(&self, session: &mut HudSession) {
        if !session.forms.stats {
            session.forms.stats = true;
        }
    }

    fn close_interface(&self, session: &mut HudSession) {
        session.close_forms();
    }

    fn get_object_at(&self, index: usize) -> Option<Entity> {
        self.objects().get(index)
    }

    fn get_stat_at(&self, index: usize) -> Option<Self::Stat> {
        self.stats().get(index)
    }

    /// What the session's selected object is working on.
    fn selected_object_stat(&self, world: &World, session: &HudSession) -> Option<Self::Stat> {
        let index = session
            .selected_object
            .and_then(|entity| self.objects().position(entity))?;
        self.get_object_stats_at(world, index)
    }

    /// Preview the cost of the hovered option on the power bar.
    fn hover_option(&self, world: &World, session: &mut HudSession, index: Option<usize>) {
        session.shadow_power = index
            .and_then(|index| self.stats().get(index))
            .map_or(0, |stat| self.stat_cost(world, stat));
    }

    /// Make `entity` the single object the panel works with.
    fn select_object(&self, world: &mut World, session: &mut HudSession, entity: Entity) {
        if !is_alive(world, entity) {
            warn!("select_object: {:?} is not alive", entity);
            return;
        }
        set_selected(world, entity, true);
        session.selected_object = Some(entity);
        session.push_event(HudEvent::SelectionChanged);
    }

    /// Drop the player's multi-selection flags.
    fn clear_selection(&self, world: &mut World, session: &HudSession) {
        for entity in player_objects(world, session.player) {
            set_selected(world, entity, false);
        }
    }
}
