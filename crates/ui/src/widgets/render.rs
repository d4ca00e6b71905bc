use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use simulation::config::MAP_SIZE;

use crate::panel::PanelCommand;
use crate::session::InteractionMode;

use super::theme;
use super::view::{PanelView, PlacementView};
use super::{Click, HudWidget};

/// Tile fields of the placement window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementInput {
    pub pos: (i32, i32),
    pub end: (i32, i32),
    pub queued: bool,
}

/// Draw `widget` and report its click, if any.
fn interact(ui: &mut egui::Ui, widget: &impl HudWidget) -> (egui::Response, Option<PanelCommand>) {
    let mut response = widget.show(ui);
    let modifier = ui.input(|i| i.modifiers.ctrl || i.modifiers.shift);
    let command = if response.clicked() {
        widget.on_click(Click {
            secondary: false,
            modifier,
        })
    } else if response.secondary_clicked() {
        widget.on_click(Click {
            secondary: true,
            modifier,
        })
    } else {
        None
    };
    let tooltip = widget.tooltip();
    if !tooltip.is_empty() {
        response = response.on_hover_text(tooltip);
    }
    (response, command)
}

pub fn hud_panels_ui(
    mut contexts: EguiContexts,
    view: Res<PanelView>,
    mut input: Local<PlacementInput>,
    mut last_hovered: Local<Option<usize>>,
    mut commands: EventWriter<PanelCommand>,
) {
    let ctx = contexts.ctx_mut();
    let mut sent: Vec<PanelCommand> = Vec::new();

    if view.is_open() {
        let mut hovered = None;
        egui::Window::new(view.title)
            .resizable(false)
            .collapsible(false)
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(8.0, -8.0))
            .show(ctx, |ui| {
                if view.show_objects {
                    egui::ScrollArea::horizontal()
                        .id_salt("hud_objects")
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                for (object, stats) in view.objects.iter().zip(&view.stats) {
                                    ui.vertical(|ui| {
                                        let (_, command) = interact(ui, object);
                                        sent.extend(command);
                                        let (_, command) = interact(ui, stats);
                                        sent.extend(command);
                                    });
                                }
                            });
                        });
                }

                if view.show_stats {
                    ui.separator();
                    ui.horizontal(|ui| {
                        if let Some(mut show_obsolete) = view.show_obsolete {
                            if ui.checkbox(&mut show_obsolete, "Obsolete").changed() {
                                sent.push(PanelCommand::SetShowObsolete(show_obsolete));
                            }
                        }
                        let mut show_favorites = view.show_favorites;
                        if ui.checkbox(&mut show_favorites, "Favourites").changed() {
                            sent.push(PanelCommand::SetShowFavorites(show_favorites));
                        }
                        if view.shadow_power > 0 {
                            ui.colored_label(theme::COST, format!("Cost {}", view.shadow_power));
                        }
                    });

                    egui::Grid::new("hud_options").show(ui, |ui| {
                        for (n, option) in view.options.iter().enumerate() {
                            let (response, command) = interact(ui, option);
                            if response.hovered() {
                                hovered = Some(option.index);
                            }
                            sent.extend(command);
                            if n % 4 == 3 {
                                ui.end_row();
                            }
                        }
                    });
                    if view.options.is_empty() {
                        ui.colored_label(theme::TEXT_MUTED, "Nothing available");
                    }
                }
            });

        if hovered != *last_hovered {
            *last_hovered = hovered;
            sent.push(PanelCommand::OptionHovered(hovered));
        }
    } else {
        *last_hovered = None;
    }

    if let Some(placement) = &view.placement {
        placement_window(ctx, placement, &mut input, &mut sent);
    }

    for command in sent {
        commands.send(command);
    }
}

fn tile_field<'a>(value: &'a mut i32, prefix: &str) -> egui::DragValue<'a> {
    egui::DragValue::new(value)
        .prefix(prefix)
        .range(0..=MAP_SIZE - 1)
}

fn placement_window(
    ctx: &egui::Context,
    placement: &PlacementView,
    input: &mut PlacementInput,
    sent: &mut Vec<PanelCommand>,
) {
    match placement.mode {
        InteractionMode::Normal => {}
        InteractionMode::BuildPlacement(_) => {
            egui::Window::new("Place Structure")
                .resizable(false)
                .collapsible(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("From");
                        ui.add(tile_field(&mut input.pos.0, "x "));
                        ui.add(tile_field(&mut input.pos.1, "y "));
                    });
                    ui.horizontal(|ui| {
                        ui.label("To");
                        ui.add(tile_field(&mut input.end.0, "x "));
                        ui.add(tile_field(&mut input.end.1, "y "));
                    });
                    ui.checkbox(&mut input.queued, "Queue");
                    ui.horizontal(|ui| {
                        if ui.button("Place").clicked() {
                            sent.push(PanelCommand::CompletePlacement {
                                pos: input.pos,
                                end: input.end,
                                queued: input.queued,
                            });
                        }
                        if ui.button("Cancel").clicked() {
                            sent.push(PanelCommand::CancelPlacement);
                        }
                    });
                });
        }
        InteractionMode::DemolishSelection => {
            egui::Window::new("Demolish")
                .resizable(false)
                .collapsible(false)
                .show(ctx, |ui| {
                    if placement.targets.is_empty() {
                        ui.colored_label(theme::TEXT_MUTED, "No structures");
                    }
                    for target in &placement.targets {
                        let label = format!("{} ({}, {})", target.name, target.pos.0, target.pos.1);
                        if ui.button(label).clicked() {
                            sent.push(PanelCommand::CompleteDemolish(target.entity));
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        sent.push(PanelCommand::CancelPlacement);
                    }
                });
        }
    }
}
