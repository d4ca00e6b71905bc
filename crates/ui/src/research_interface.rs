//! Research panel: the player's built research facilities and the topics the
//! selected one can take up.

use bevy::prelude::*;

use simulation::game_actions::{dispatch_action, ActionError, ActionResult, GameAction};
use simulation::objects::{is_alive, object_id, owner_of, NetworkMode};
use simulation::research::{
    fill_research_list, topics_in_progress, PlayerResearch, ResearchCatalog, ResearchFacility,
    ResearchId,
};

use crate::controller::{PanelController, Progress};
use crate::object_list::{ObjectKind, ObjectListController};
use crate::session::{HudEvent, HudSession, HudSound};
use crate::stats_list::{self, FavoriteTable, ListFilter, StatEntry, StatsListController};

impl FavoriteTable<ResearchId> for ResearchCatalog {
    fn is_favorite(&self, topic: ResearchId) -> bool {
        ResearchCatalog::is_favorite(self, topic)
    }

    fn set_favorite(&mut self, topic: ResearchId, favorite: bool) {
        ResearchCatalog::set_favorite(self, topic, favorite);
    }
}

fn is_networked(world: &World) -> bool {
    world.get_resource::<NetworkMode>().copied() == Some(NetworkMode::Networked)
}

pub struct ResearchInterfaceController {
    objects: ObjectListController,
    stats: StatsListController<ResearchId>,
}

impl Default for ResearchInterfaceController {
    fn default() -> Self {
        Self::new()
    }
}

impl ResearchInterfaceController {
    pub fn new() -> Self {
        Self {
            objects: ObjectListController::new(ObjectKind::ResearchFacilities),
            stats: StatsListController::default(),
        }
    }

    /// Put the selected facility on `topic`, or stop it when `None`.
    ///
    /// Networked orders only reach the facility on a later tick, so the
    /// topic is recorded as pending straight away for the HUD to show.
    pub fn start_research(
        &self,
        world: &mut World,
        session: &mut HudSession,
        topic: Option<ResearchId>,
    ) -> ActionResult {
        session.push_event(HudEvent::ResearchSelected);

        let Some(facility) = session
            .selected_object
            .filter(|&entity| is_alive(world, entity))
            .filter(|&entity| world.get::<ResearchFacility>(entity).is_some())
        else {
            warn!("start_research: no live research facility selected");
            return ActionResult::Error(ActionError::InvalidTarget);
        };
        let Some(id) = object_id(world, facility) else {
            return ActionResult::Error(ActionError::NotFound);
        };

        let action = match topic {
            Some(topic) => GameAction::StartResearch {
                facility: id,
                topic,
            },
            None => GameAction::CancelResearch { facility: id },
        };
        let result = dispatch_action(world, session.player, action);
        if result.is_success() && is_networked(world) {
            if let Some(mut pending) = world.get_mut::<ResearchFacility>(facility) {
                match topic {
                    Some(topic) => pending.set_pending_start(topic),
                    None => pending.set_pending_cancel(),
                }
            }
        }
        result
    }

    /// Secondary click on a facility: the first click puts running research
    /// on hold, the next one cancels it.
    pub fn request_cancellation(
        &self,
        world: &mut World,
        session: &mut HudSession,
        facility: Entity,
    ) -> ActionResult {
        let Some(state) = world.get::<ResearchFacility>(facility) else {
            warn!("request_cancellation: {:?} is not a research facility", facility);
            return ActionResult::Error(ActionError::InvalidTarget);
        };
        if !state.is_researching_pending() {
            return ActionResult::SuccessWithWarning("facility is not researching".into());
        }
        let hold = !state.is_on_hold_pending();
        let Some(id) = object_id(world, facility) else {
            return ActionResult::Error(ActionError::NotFound);
        };

        let action = if hold {
            GameAction::HoldResearch { facility: id }
        } else {
            GameAction::CancelResearch { facility: id }
        };
        let result = dispatch_action(world, session.player, action);
        if result.is_success() && is_networked(world) {
            if let Some(mut pending) = world.get_mut::<ResearchFacility>(facility) {
                if hold {
                    pending.set_pending_hold();
                } else {
                    pending.set_pending_cancel();
                }
            }
        }
        if !hold {
            session.push_event(HudEvent::PlaySound(HudSound::WindowClose));
        }
        result
    }

    /// Primary click on a facility's progress button: lift any hold, then make
    /// it the only selected facility.
    pub fn release_and_select(&self, world: &mut World, session: &mut HudSession, facility: Entity) {
        let held = world
            .get::<ResearchFacility>(facility)
            .is_some_and(|state| state.is_researching_pending() && state.is_on_hold_pending());
        if held {
            if let Some(id) = object_id(world, facility) {
                let result =
                    dispatch_action(world, session.player, GameAction::ReleaseResearch { facility: id });
                if result.is_success() && is_networked(world) {
                    if let Some(mut pending) = world.get_mut::<ResearchFacility>(facility) {
                        pending.set_pending_release();
                    }
                }
            }
        }
        self.clear_selection(world, session);
        self.select_object(world, session, facility);
        self.display_stats_form(session);
    }

    pub fn toggle_favorite(&mut self, world: &mut World, session: &HudSession, topic: ResearchId) {
        stats_list::toggle_favorite::<ResearchId, ResearchCatalog>(world, topic);
        self.refresh_stats(world, session);
    }
}

impl PanelController for ResearchInterfaceController {
    type Stat = ResearchId;

    fn objects(&self) -> &ObjectListController {
        &self.objects
    }

    fn objects_mut(&mut self) -> &mut ObjectListController {
        &mut self.objects
    }

    fn stats(&self) -> &StatsListController<ResearchId> {
        &self.stats
    }

    /// Topics are clustered by icon group. Whatever the selected facility is
    /// on stays listed even when it is claimed.
    fn refresh_stats(&mut self, world: &mut World, session: &HudSession) {
        let current = self.selected_object_stat(world, session);
        let claimed = topics_in_progress(world, session.player);
        let (Some(catalog), Some(progress)) = (
            world.get_resource::<ResearchCatalog>(),
            world.get_resource::<PlayerResearch>(),
        ) else {
            warn!("refresh_stats: research tables missing");
            self.stats.clear();
            return;
        };

        let mut topics = fill_research_list(catalog, progress, session.player, current, &claimed);
        topics.sort_by_key(|&id| catalog.get(id).map_or(u8::MAX, |topic| topic.icon_group));
        let entries = topics.into_iter().map(|id| StatEntry {
            favorite: catalog.is_favorite(id),
            pinned: Some(id) == current,
            ..StatEntry::new(id)
        });
        self.stats.refresh(entries, ListFilter::from_session(session));
    }

    fn get_object_stats_at(&self, world: &World, index: usize) -> Option<ResearchId> {
        let Some(facility) = self.objects.get(index) else {
            warn!("get_object_stats_at: no facility at index {}", index);
            return None;
        };
        let state = world.get::<ResearchFacility>(facility)?;
        if let Some(pending) = state.subject_pending {
            let completed = owner_of(world, facility).is_some_and(|player| {
                world
                    .get_resource::<PlayerResearch>()
                    .is_some_and(|progress| progress.is_completed(player, pending))
            });
            if !completed {
                return Some(pending);
            }
        }
        state.subject
    }

    fn menu_up_event(&self) -> HudEvent {
        HudEvent::ResearchMenuUp
    }

    fn stat_name(&self, world: &World, topic: ResearchId) -> String {
        world
            .get_resource::<ResearchCatalog>()
            .map_or_else(String::new, |catalog| catalog.name(topic).to_string())
    }

    fn stat_cost(&self, world: &World, topic: ResearchId) -> u32 {
        world
            .get_resource::<ResearchCatalog>()
            .and_then(|catalog| catalog.get(topic))
            .map_or(0, |topic| topic.research_power)
    }

    fn stat_is_favorite(&self, world: &World, topic: ResearchId) -> bool {
        world
            .get_resource::<ResearchCatalog>()
            .is_some_and(|catalog| catalog.is_favorite(topic))
    }

    fn object_progress(&self, world: &World, index: usize) -> Option<Progress> {
        let facility = self.objects.get(index)?;
        let state = world.get::<ResearchFacility>(facility)?;
        let subject = state.subject?;
        let player = owner_of(world, facility)?;
        let topic = world.get_resource::<ResearchCatalog>()?.get(subject)?;
        let current = world
            .get_resource::<PlayerResearch>()
            .map_or(0, |progress| progress.get(player, subject).current_points);
        if current != 0 {
            Some(Progress::Time {
                current,
                total: topic.research_points,
                rate: if state.is_on_hold() {
                    0
                } else {
                    state.points_per_tick
                },
                label: "Research Progress",
            })
        } else {
            Some(Progress::Power {
                accrued: state.power_accrued,
                needed: topic.research_power,
            })
        }
    }

    fn is_flashing(&self, world: &World, index: usize) -> bool {
        self.objects
            .get(index)
            .and_then(|facility| world.get::<ResearchFacility>(facility))
            .is_some_and(|state| state.is_researching_pending() && state.is_on_hold_pending())
    }
}
