//! Per-HUD interaction state shared by both panels.
//!
//! Every panel operation receives the session explicitly instead of reaching
//! for process-wide "selected object" or "interaction mode" cells.

use bevy::prelude::*;

use simulation::objects::PlayerId;
use simulation::structures::StructureStatsId;

/// What a click on the map means right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Normal,
    /// Next map click places this structure.
    BuildPlacement(StructureStatsId),
    /// Next structure click is demolished.
    DemolishSelection,
}

/// Which halves of the open panel are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelForms {
    pub objects: bool,
    pub stats: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudSound {
    WindowClose,
}

/// Script-visible notifications raised by panel operations.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudEvent {
    BuildMenuUp,
    BuildSelected,
    ResearchMenuUp,
    ResearchSelected,
    SelectionChanged,
    PlaySound(HudSound),
}

#[derive(Resource, Debug, Clone, Default)]
pub struct HudSession {
    pub player: PlayerId,
    pub selected_object: Option<Entity>,
    pub mode: InteractionMode,
    pub forms: PanelForms,
    pub show_obsolete: bool,
    pub show_favorites: bool,
    /// Cost of the option under the cursor, previewed on the power bar.
    pub shadow_power: u32,
    outbox: Vec<HudEvent>,
}

impl HudSession {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            ..default()
        }
    }

    pub fn push_event(&mut self, event: HudEvent) {
        self.outbox.push(event);
    }

    pub fn take_events(&mut self) -> Vec<HudEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn pending_events(&self) -> &[HudEvent] {
        &self.outbox
    }

    pub fn is_open(&self) -> bool {
        self.forms.objects || self.forms.stats
    }

    pub fn close_forms(&mut self) {
        self.forms = PanelForms::default();
        self.shadow_power = 0;
    }
}

/// Copy the local player into the session once the simulation has settled
/// who that is.
pub fn init_hud_session(
    local: Res<simulation::objects::LocalPlayer>,
    mut session: ResMut<HudSession>,
) {
    session.player = local.0;
}
