use bevy_egui::{egui, EguiContexts};

pub const PANEL: egui::Color32 = egui::Color32::from_rgb(28, 34, 30);
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(96, 168, 92);
pub const COST: egui::Color32 = egui::Color32::from_rgb(196, 160, 64);
pub const FAVORITE: egui::Color32 = egui::Color32::from_rgb(236, 200, 72);
pub const TEXT_MUTED: egui::Color32 = egui::Color32::from_rgb(140, 150, 140);

pub const BUTTON_SIZE: egui::Vec2 = egui::vec2(112.0, 30.0);
pub const BAR_WIDTH: f32 = 112.0;

pub fn apply_hud_theme(mut contexts: EguiContexts) {
    let ctx = contexts.ctx_mut();
    let mut style = (*ctx.style()).clone();

    let inactive = egui::Color32::from_rgb(44, 54, 46);
    let hover = egui::Color32::from_rgb(62, 80, 64);

    style.visuals.widgets.noninteractive.bg_fill = PANEL;
    style.visuals.widgets.inactive.bg_fill = inactive;
    style.visuals.widgets.hovered.bg_fill = hover;
    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.widgets.inactive.weak_bg_fill = inactive;
    style.visuals.widgets.hovered.weak_bg_fill = hover;
    style.visuals.widgets.active.weak_bg_fill = ACCENT;

    style.visuals.window_fill = PANEL;
    style.visuals.panel_fill = PANEL;

    // Selected buttons
    style.visuals.selection.bg_fill = ACCENT;
    style.visuals.selection.stroke = egui::Stroke::new(1.0, ACCENT);

    let corner = egui::CornerRadius::same(3);
    style.visuals.window_corner_radius = corner;
    style.visuals.widgets.inactive.corner_radius = corner;
    style.visuals.widgets.hovered.corner_radius = corner;
    style.visuals.widgets.active.corner_radius = corner;

    ctx.set_style(style);
}

/// A bar with a text overlay, clamped to `0.0..=1.0`.
pub fn bar_with_text(
    ui: &mut egui::Ui,
    fraction: f32,
    text: &str,
    fill: egui::Color32,
) -> egui::Response {
    ui.add(
        egui::ProgressBar::new(fraction.clamp(0.0, 1.0))
            .fill(fill)
            .text(text)
            .desired_width(BAR_WIDTH),
    )
}
