//! The egui side of the HUD.
//!
//! Each button implements [`HudWidget`]: it draws itself and turns a click
//! into the [`PanelCommand`] the panel dispatcher applies next frame.

use bevy_egui::egui;

use crate::panel::PanelCommand;

mod progress;
mod render;
mod theme;
mod view;

pub use progress::{cost_bar, format_power, format_time, ProgressBarView};
pub use render::{hud_panels_ui, PlacementInput};
pub use theme::apply_hud_theme;
pub use view::{
    build_panel_view, ObjectButton, OptionButton, PanelView, PlacementView, StatsButton,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub secondary: bool,
    /// Ctrl or shift held.
    pub modifier: bool,
}

pub trait HudWidget {
    fn show(&self, ui: &mut egui::Ui) -> egui::Response;

    fn on_click(&self, click: Click) -> Option<PanelCommand>;

    /// Hover text. Empty means none.
    fn tooltip(&self) -> String;
}
