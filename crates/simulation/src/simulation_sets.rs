//! Deterministic simulation ordering via `SystemSet` phases.
//!
//! ```text
//! PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **PreSim** – Tick counter and the action executor. Orders queued during
//!   the previous frames take effect before any work is simulated.
//! * **Simulation** – Construction and research progress.
//! * **PostSim** – Read-only aggregation. Nothing in here mutates game state,
//!   so the HUD can consume it on the next frame.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain by `SimulationPlugin`. Plugins use
/// `.in_set(SimulationSet::X)` when registering their systems and add
/// `.after()` / `.before()` constraints within a phase where needed.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    PreSim,
    Simulation,
    PostSim,
}
