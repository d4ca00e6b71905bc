//! The open panel and the commands that drive it.
//!
//! Widgets never hold a controller. They send index-based [`PanelCommand`]s,
//! and [`dispatch_panel_commands`] applies them to whichever controller
//! [`ActivePanel`] currently owns.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use simulation::game_actions::ActionResult;

use crate::build_interface::BuildInterfaceController;
use crate::controller::PanelController;
use crate::placement::{cancel_placement, complete_demolish, complete_placement, demolish_targets};
use crate::research_interface::ResearchInterfaceController;
use crate::session::{HudEvent, HudSession, InteractionMode};
use crate::widgets::{build_panel_view, PanelView, PlacementView};

#[derive(Resource, Default)]
pub enum ActivePanel {
    #[default]
    Closed,
    Build(BuildInterfaceController),
    Research(ResearchInterfaceController),
}

impl ActivePanel {
    pub fn is_build(&self) -> bool {
        matches!(self, ActivePanel::Build(_))
    }

    pub fn is_research(&self) -> bool {
        matches!(self, ActivePanel::Research(_))
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    OpenBuild,
    OpenResearch,
    Close,
    /// Click on the object button at `index`. `modifier` is ctrl or shift.
    ObjectClicked { index: usize, modifier: bool },
    /// Click on the stats (current activity) button under object `index`.
    StatsClicked {
        index: usize,
        modifier: bool,
        secondary: bool,
    },
    OptionClicked { index: usize, secondary: bool },
    OptionHovered(Option<usize>),
    SetShowObsolete(bool),
    SetShowFavorites(bool),
    CompletePlacement {
        pos: (i32, i32),
        end: (i32, i32),
        queued: bool,
    },
    CompleteDemolish(Entity),
    CancelPlacement,
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// B = build panel, R = research panel, Escape = leave placement or close.
/// Keys are ignored when egui has keyboard focus.
pub fn panel_keybinds(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    panel: Res<ActivePanel>,
    session: Res<HudSession>,
    mut commands: EventWriter<PanelCommand>,
) {
    if contexts.ctx_mut().wants_keyboard_input() {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyB) {
        commands.send(if panel.is_build() {
            PanelCommand::Close
        } else {
            PanelCommand::OpenBuild
        });
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        commands.send(if panel.is_research() {
            PanelCommand::Close
        } else {
            PanelCommand::OpenResearch
        });
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        commands.send(if session.mode != InteractionMode::Normal {
            PanelCommand::CancelPlacement
        } else {
            PanelCommand::Close
        });
    }
}

/// Apply this frame's commands in the order they were sent.
pub fn dispatch_panel_commands(world: &mut World) {
    let commands: Vec<PanelCommand> = match world.get_resource_mut::<Events<PanelCommand>>() {
        Some(mut events) => events.drain().collect(),
        None => return,
    };
    if commands.is_empty() {
        return;
    }
    let Some(mut session) = world.remove_resource::<HudSession>() else {
        warn!("dispatch_panel_commands: HudSession missing");
        return;
    };
    let mut panel = world.remove_resource::<ActivePanel>().unwrap_or_default();

    for command in commands {
        let result = apply_command(world, &mut session, &mut panel, command);
        if let ActionResult::Error(err) = result {
            debug!("Panel command {:?} rejected: {:?}", command, err);
        }
    }

    world.insert_resource(panel);
    world.insert_resource(session);
}

pub fn apply_command(
    world: &mut World,
    session: &mut HudSession,
    panel: &mut ActivePanel,
    command: PanelCommand,
) -> ActionResult {
    match command {
        PanelCommand::OpenBuild => {
            close(session, panel);
            let mut controller = BuildInterfaceController::new();
            if controller.show_interface(world, session) {
                *panel = ActivePanel::Build(controller);
            } else {
                info!("No construction units available");
            }
            ActionResult::Success
        }
        PanelCommand::OpenResearch => {
            close(session, panel);
            let mut controller = ResearchInterfaceController::new();
            if controller.show_interface(world, session) {
                *panel = ActivePanel::Research(controller);
            } else {
                info!("No research facilities available");
            }
            ActionResult::Success
        }
        PanelCommand::Close => {
            close(session, panel);
            ActionResult::Success
        }
        PanelCommand::CompletePlacement { pos, end, queued } => {
            complete_placement(world, session, pos, end, queued)
        }
        PanelCommand::CompleteDemolish(target) => complete_demolish(world, session, target),
        PanelCommand::CancelPlacement => {
            cancel_placement(session);
            ActionResult::Success
        }
        _ => match panel {
            ActivePanel::Closed => ActionResult::SuccessWithWarning("no panel open".into()),
            ActivePanel::Build(controller) => apply_build_command(world, session, controller, command),
            ActivePanel::Research(controller) => {
                apply_research_command(world, session, controller, command)
            }
        },
    }
}

fn close(session: &mut HudSession, panel: &mut ActivePanel) {
    session.close_forms();
    *panel = ActivePanel::Closed;
}

fn apply_build_command(
    world: &mut World,
    session: &mut HudSession,
    controller: &mut BuildInterfaceController,
    command: PanelCommand,
) -> ActionResult {
    match command {
        PanelCommand::ObjectClicked { index, modifier } => {
            let Some(droid) = controller.get_object_at(index) else {
                return stale_index("object", index);
            };
            if modifier {
                controller.toggle_object_selection(world, session, droid);
                return ActionResult::Success;
            }
            controller.clear_selection(world, session);
            controller.select_object(world, session, droid);
            controller.display_stats_form(session);
            ActionResult::Success
        }
        PanelCommand::StatsClicked {
            index, modifier, ..
        } => {
            let Some(droid) = controller.get_object_at(index) else {
                return stale_index("stats", index);
            };
            if modifier {
                controller.toggle_object_selection(world, session, droid);
            } else {
                controller.clear_selection(world, session);
                controller.select_object(world, session, droid);
            }
            controller.display_stats_form(session);
            ActionResult::Success
        }
        PanelCommand::OptionClicked { index, secondary } => {
            let Some(option) = controller.get_stat_at(index) else {
                return stale_index("option", index);
            };
            if secondary {
                controller.toggle_favorite(world, session, option);
                ActionResult::Success
            } else {
                controller.start_build_position(world, session, option)
            }
        }
        PanelCommand::OptionHovered(index) => {
            controller.hover_option(world, session, index);
            ActionResult::Success
        }
        PanelCommand::SetShowObsolete(show) => {
            controller.set_show_obsolete(world, session, show);
            ActionResult::Success
        }
        PanelCommand::SetShowFavorites(show) => {
            controller.set_show_favorites(world, session, show);
            ActionResult::Success
        }
        _ => ActionResult::Success,
    }
}

fn apply_research_command(
    world: &mut World,
    session: &mut HudSession,
    controller: &mut ResearchInterfaceController,
    command: PanelCommand,
) -> ActionResult {
    match command {
        PanelCommand::ObjectClicked { index, .. } => {
            let Some(facility) = controller.get_object_at(index) else {
                return stale_index("object", index);
            };
            controller.clear_selection(world, session);
            controller.select_object(world, session, facility);
            controller.display_stats_form(session);
            ActionResult::Success
        }
        PanelCommand::StatsClicked {
            index, secondary, ..
        } => {
            let Some(facility) = controller.get_object_at(index) else {
                return stale_index("stats", index);
            };
            if secondary {
                controller.request_cancellation(world, session, facility)
            } else {
                controller.release_and_select(world, session, facility);
                ActionResult::Success
            }
        }
        PanelCommand::OptionClicked { index, secondary } => {
            let Some(topic) = controller.get_stat_at(index) else {
                return stale_index("option", index);
            };
            if secondary {
                controller.toggle_favorite(world, session, topic);
                return ActionResult::Success;
            }
            let result = controller.start_research(world, session, Some(topic));
            session.forms.stats = false;
            result
        }
        PanelCommand::OptionHovered(index) => {
            controller.hover_option(world, session, index);
            ActionResult::Success
        }
        PanelCommand::SetShowFavorites(show) => {
            session.show_favorites = show;
            controller.refresh_stats(world, session);
            ActionResult::Success
        }
        _ => ActionResult::Success,
    }
}

fn stale_index(what: &str, index: usize) -> ActionResult {
    warn!("Panel {} index {} is out of range", what, index);
    ActionResult::Error(simulation::game_actions::ActionError::NotFound)
}

/// Re-derive the open panel from the live simulation and rebuild the views
/// the egui layer draws.
pub fn refresh_active_panel(world: &mut World) {
    let Some(mut session) = world.remove_resource::<HudSession>() else {
        return;
    };
    let mut panel = world.remove_resource::<ActivePanel>().unwrap_or_default();

    if !session.is_open() {
        panel = ActivePanel::Closed;
    }
    let still_open = match &mut panel {
        ActivePanel::Closed => false,
        ActivePanel::Build(controller) => controller.refresh(world, &mut session),
        ActivePanel::Research(controller) => controller.refresh(world, &mut session),
    };
    if !still_open {
        panel = ActivePanel::Closed;
    }

    let view = match &panel {
        ActivePanel::Closed => PanelView::default(),
        ActivePanel::Build(controller) => {
            build_panel_view(world, &session, controller, "Build", true)
        }
        ActivePanel::Research(controller) => {
            build_panel_view(world, &session, controller, "Research", false)
        }
    };
    let placement = match session.mode {
        InteractionMode::Normal => None,
        InteractionMode::BuildPlacement(_) => Some(PlacementView {
            mode: session.mode,
            targets: Vec::new(),
        }),
        InteractionMode::DemolishSelection => Some(PlacementView {
            mode: session.mode,
            targets: demolish_targets(world, session.player),
        }),
    };

    world.insert_resource(PanelView { placement, ..view });
    world.insert_resource(panel);
    world.insert_resource(session);
}

/// Forward the session outbox as Bevy events.
pub fn flush_hud_events(mut session: ResMut<HudSession>, mut events: EventWriter<HudEvent>) {
    if session.pending_events().is_empty() {
        return;
    }
    for event in session.take_events() {
        debug!("HUD event {:?}", event);
        events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulation::droids::{spawn_droid, DroidType};
    use simulation::objects::{is_flagged_selected, PlayerId};
    use simulation::research::{PlayerResearch, ResearchCatalog, ResearchId};
    use simulation::structures::{
        spawn_structure, StructureAvailability, StructureCatalog, StructureStatsId,
        StructureStatus,
    };

    use crate::build_interface::BuildOption;

    const P: PlayerId = PlayerId(0);

    fn world() -> World {
        let mut world = World::new();
        world.init_resource::<StructureCatalog>();
        world.init_resource::<StructureAvailability>();
        world.init_resource::<ResearchCatalog>();
        world.init_resource::<PlayerResearch>();
        world
    }

    fn run(world: &mut World, session: &mut HudSession, panel: &mut ActivePanel, commands: &[PanelCommand]) {
        for &command in commands {
            apply_command(world, session, panel, command);
        }
    }

    #[test]
    fn test_open_build_without_builders_stays_closed() {
        let mut world = world();
        let mut session = HudSession::new(P);
        let mut panel = ActivePanel::Closed;
        run(&mut world, &mut session, &mut panel, &[PanelCommand::OpenBuild]);
        assert!(matches!(panel, ActivePanel::Closed));
        assert!(!session.is_open());
    }

    #[test]
    fn test_option_click_enters_placement_and_closes() {
        let mut world = world();
        spawn_droid(&mut world, P, DroidType::Construct, "Truck");
        let mut session = HudSession::new(P);
        let mut panel = ActivePanel::Closed;
        run(&mut world, &mut session, &mut panel, &[PanelCommand::OpenBuild]);
        assert!(panel.is_build());

        let ActivePanel::Build(controller) = &panel else {
            panic!("build panel should be open");
        };
        let index = controller
            .stats()
            .position(BuildOption::Structure(StructureStatsId::FACTORY))
            .expect("factory is buildable");
        run(
            &mut world,
            &mut session,
            &mut panel,
            &[PanelCommand::OptionClicked {
                index,
                secondary: false,
            }],
        );
        assert_eq!(
            session.mode,
            InteractionMode::BuildPlacement(StructureStatsId::FACTORY)
        );
        assert!(!session.is_open());
    }

    #[test]
    fn test_modifier_click_multi_selects() {
        let mut world = world();
        let a = spawn_droid(&mut world, P, DroidType::Construct, "a");
        let b = spawn_droid(&mut world, P, DroidType::Construct, "b");
        let mut session = HudSession::new(P);
        let mut panel = ActivePanel::Closed;
        run(
            &mut world,
            &mut session,
            &mut panel,
            &[
                PanelCommand::OpenBuild,
                PanelCommand::ObjectClicked {
                    index: 1,
                    modifier: true,
                },
            ],
        );
        assert!(is_flagged_selected(&world, a));
        assert!(is_flagged_selected(&world, b));

        run(
            &mut world,
            &mut session,
            &mut panel,
            &[PanelCommand::StatsClicked {
                index: 0,
                modifier: false,
                secondary: false,
            }],
        );
        assert!(!is_flagged_selected(&world, a));
        assert!(is_flagged_selected(&world, b));
        assert_eq!(session.selected_object, Some(b));
    }

    #[test]
    fn test_research_option_click_hides_stats_form() {
        let mut world = world();
        let lab = spawn_structure(
            &mut world,
            P,
            StructureStatsId::RESEARCH_FACILITY,
            StructureStatus::Built,
            (0, 0),
        );
        let mut session = HudSession::new(P);
        let mut panel = ActivePanel::Closed;
        run(&mut world, &mut session, &mut panel, &[PanelCommand::OpenResearch]);
        let ActivePanel::Research(controller) = &panel else {
            panic!("research panel should be open");
        };
        let index = controller
            .stats()
            .position(ResearchId::ENGINEERING)
            .expect("engineering is a root topic");

        run(
            &mut world,
            &mut session,
            &mut panel,
            &[PanelCommand::OptionClicked {
                index,
                secondary: false,
            }],
        );
        assert!(!session.forms.stats);
        assert!(session.forms.objects);
        assert_eq!(
            world
                .get::<simulation::research::ResearchFacility>(lab)
                .and_then(|f| f.subject),
            Some(ResearchId::ENGINEERING)
        );
    }

    #[test]
    fn test_research_option_secondary_click_toggles_favourite() {
        let mut world = world();
        let lab = spawn_structure(
            &mut world,
            P,
            StructureStatsId::RESEARCH_FACILITY,
            StructureStatus::Built,
            (0, 0),
        );
        let mut session = HudSession::new(P);
        let mut panel = ActivePanel::Closed;
        run(&mut world, &mut session, &mut panel, &[PanelCommand::OpenResearch]);
        let ActivePanel::Research(controller) = &panel else {
            panic!("research panel should be open");
        };
        let index = controller
            .stats()
            .position(ResearchId::ENGINEERING)
            .expect("engineering is a root topic");

        let result = apply_command(
            &mut world,
            &mut session,
            &mut panel,
            PanelCommand::OptionClicked {
                index,
                secondary: true,
            },
        );
        assert_eq!(result, ActionResult::Success);
        assert!(world.resource::<ResearchCatalog>().is_favorite(ResearchId::ENGINEERING));
        assert!(session.forms.stats);
        assert_eq!(
            world
                .get::<simulation::research::ResearchFacility>(lab)
                .and_then(|f| f.subject),
            None
        );
    }

    #[test]
    fn test_stale_index_is_rejected() {
        let mut world = world();
        spawn_droid(&mut world, P, DroidType::Construct, "Truck");
        let mut session = HudSession::new(P);
        let mut panel = ActivePanel::Closed;
        run(&mut world, &mut session, &mut panel, &[PanelCommand::OpenBuild]);
        let result = apply_command(
            &mut world,
            &mut session,
            &mut panel,
            PanelCommand::OptionClicked {
                index: 99,
                secondary: false,
            },
        );
        assert!(result.error().is_some());
    }

    #[test]
    fn test_hover_sets_shadow_power() {
        let mut world = world();
        spawn_droid(&mut world, P, DroidType::Construct, "Truck");
        let mut session = HudSession::new(P);
        let mut panel = ActivePanel::Closed;
        run(&mut world, &mut session, &mut panel, &[PanelCommand::OpenBuild]);
        let ActivePanel::Build(controller) = &panel else {
            panic!("build panel should be open");
        };
        let index = controller
            .stats()
            .position(BuildOption::Structure(StructureStatsId::FACTORY))
            .expect("factory is buildable");

        run(
            &mut world,
            &mut session,
            &mut panel,
            &[PanelCommand::OptionHovered(Some(index))],
        );
        assert_eq!(session.shadow_power, 250);
        run(&mut world, &mut session, &mut panel, &[PanelCommand::OptionHovered(None)]);
        assert_eq!(session.shadow_power, 0);
    }
}
