//! Plain view structs the egui layer draws. Rebuilt after every refresh from
//! the open controller; nothing here reads the simulation.

use bevy::prelude::*;
use bevy_egui::egui;

use simulation::objects::{is_flagged_selected, object_name};

use crate::controller::PanelController;
use crate::panel::PanelCommand;
use crate::placement::DemolishTarget;
use crate::session::{HudSession, InteractionMode};

use super::progress::{cost_bar, ProgressBarView};
use super::theme;
use super::{Click, HudWidget};

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectButton {
    pub index: usize,
    pub label: String,
    /// The session's selected object.
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsButton {
    pub index: usize,
    /// What the object is working on, if anything.
    pub stat_name: Option<String>,
    pub progress: Option<ProgressBarView>,
    /// Structures left in the builder's run, when more than one.
    pub run_size: Option<u32>,
    pub selected: bool,
    pub flashing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionButton {
    pub index: usize,
    pub name: String,
    pub cost: u32,
    pub cost_bar: u32,
    pub favorite: bool,
    /// The selected object is already working on this.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementView {
    pub mode: InteractionMode,
    pub targets: Vec<DemolishTarget>,
}

#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub struct PanelView {
    pub title: &'static str,
    pub show_objects: bool,
    pub show_stats: bool,
    pub objects: Vec<ObjectButton>,
    pub stats: Vec<StatsButton>,
    pub options: Vec<OptionButton>,
    /// `None` when the panel has no obsolete filter.
    pub show_obsolete: Option<bool>,
    pub show_favorites: bool,
    pub shadow_power: u32,
    pub placement: Option<PlacementView>,
}

impl PanelView {
    pub fn is_open(&self) -> bool {
        self.show_objects || self.show_stats
    }
}

pub fn build_panel_view<C: PanelController>(
    world: &World,
    session: &HudSession,
    controller: &C,
    title: &'static str,
    obsolete_filter: bool,
) -> PanelView {
    let current = controller.selected_object_stat(world, session);

    let objects = controller
        .objects()
        .iter()
        .enumerate()
        .map(|(index, entity)| ObjectButton {
            index,
            label: object_name(world, entity).unwrap_or_default().to_string(),
            highlighted: session.selected_object == Some(entity),
        })
        .collect();

    let stats = controller
        .objects()
        .iter()
        .enumerate()
        .map(|(index, entity)| StatsButton {
            index,
            stat_name: controller
                .get_object_stats_at(world, index)
                .map(|stat| controller.stat_name(world, stat)),
            progress: controller.object_progress(world, index).map(ProgressBarView::from),
            run_size: controller.production_run_size(world, index),
            selected: is_flagged_selected(world, entity) || session.selected_object == Some(entity),
            flashing: controller.is_flashing(world, index),
        })
        .collect();

    let options = controller
        .stats()
        .iter()
        .enumerate()
        .map(|(index, stat)| {
            let cost = controller.stat_cost(world, stat);
            OptionButton {
                index,
                name: controller.stat_name(world, stat),
                cost,
                cost_bar: cost_bar(cost),
                favorite: controller.stat_is_favorite(world, stat),
                selected: current == Some(stat),
            }
        })
        .collect();

    PanelView {
        title,
        show_objects: session.forms.objects,
        show_stats: session.forms.stats,
        objects,
        stats,
        options,
        show_obsolete: obsolete_filter.then_some(session.show_obsolete),
        show_favorites: session.show_favorites,
        shadow_power: session.shadow_power,
        placement: None,
    }
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

impl HudWidget for ObjectButton {
    fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        ui.add(
            egui::Button::new(self.label.as_str())
                .selected(self.highlighted)
                .min_size(theme::BUTTON_SIZE),
        )
    }

    fn on_click(&self, click: Click) -> Option<PanelCommand> {
        if click.secondary {
            return None;
        }
        Some(PanelCommand::ObjectClicked {
            index: self.index,
            modifier: click.modifier,
        })
    }

    fn tooltip(&self) -> String {
        self.label.clone()
    }
}

impl HudWidget for StatsButton {
    fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let label = match (&self.stat_name, self.run_size) {
            (Some(name), Some(run)) => format!("{} x{}", name, run),
            (Some(name), None) => name.clone(),
            (None, _) => String::from("-"),
        };
        // Blink twice a second while a hold is pending.
        let blink_on = ui.input(|input| (input.time * 4.0) as u64 % 2 == 0);
        let selected = if self.flashing {
            blink_on
        } else {
            self.selected
        };
        let response = ui.add(
            egui::Button::new(label)
                .selected(selected)
                .min_size(theme::BUTTON_SIZE),
        );
        if let Some(progress) = &self.progress {
            theme::bar_with_text(ui, progress.fraction, &progress.text, theme::ACCENT);
        }
        response
    }

    fn on_click(&self, click: Click) -> Option<PanelCommand> {
        Some(PanelCommand::StatsClicked {
            index: self.index,
            modifier: click.modifier,
            secondary: click.secondary,
        })
    }

    fn tooltip(&self) -> String {
        self.stat_name.clone().unwrap_or_default()
    }
}

impl HudWidget for OptionButton {
    fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let mut text = egui::RichText::new(&self.name);
        if self.favorite {
            text = text.color(theme::FAVORITE);
        }
        let response = ui.add(
            egui::Button::new(text)
                .selected(self.selected)
                .min_size(theme::BUTTON_SIZE),
        );
        theme::bar_with_text(
            ui,
            self.cost_bar as f32 / 100.0,
            &self.cost.to_string(),
            theme::COST,
        );
        response
    }

    fn on_click(&self, click: Click) -> Option<PanelCommand> {
        Some(PanelCommand::OptionClicked {
            index: self.index,
            secondary: click.secondary,
        })
    }

    fn tooltip(&self) -> String {
        if self.favorite {
            format!("{} (favourite)", self.name)
        } else {
            self.name.clone()
        }
    }
}
