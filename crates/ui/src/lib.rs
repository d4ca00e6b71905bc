use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod build_interface;
pub mod controller;
pub mod object_list;
pub mod panel;
pub mod placement;
pub mod research_interface;
pub mod session;
pub mod stats_list;
pub mod widgets;

use panel::{ActivePanel, PanelCommand};
use session::{HudEvent, HudSession};
use widgets::PanelView;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<HudSession>()
            .init_resource::<ActivePanel>()
            .init_resource::<PanelView>()
            .add_event::<PanelCommand>()
            .add_event::<HudEvent>()
            .add_systems(
                Startup,
                (session::init_hud_session, widgets::apply_hud_theme),
            )
            .add_systems(
                Update,
                (
                    panel::panel_keybinds,
                    panel::dispatch_panel_commands,
                    panel::refresh_active_panel,
                    widgets::hud_panels_ui,
                    panel::flush_hud_events,
                )
                    .chain(),
            );
    }
}
