//! # TestGame: headless integration test harness
//!
//! Provides a fluent builder that wraps `bevy::app::App` + `SimulationPlugin`
//! for running integration tests without a window or renderer.

mod queries;
mod setup;

use bevy::app::App;
use bevy::prelude::*;

use crate::objects::{LocalPlayer, PlayerId};
use crate::world_init::SkipWorldInit;
use crate::SimulationPlugin;

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
///
/// Use builder methods to set up the map, then call `tick()` to advance the
/// simulation and query/assert on the resulting ECS state.
pub struct TestGame {
    app: App,
}

impl TestGame {
    /// An empty map with every table at its default. The demo base is NOT
    /// spawned.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        // Insert the marker BEFORE SimulationPlugin so init_world skips.
        app.insert_resource(SkipWorldInit);
        app.insert_resource(LocalPlayer(PlayerId(0)));
        app.add_plugins(SimulationPlugin);

        // Run one update so Startup systems execute (init_world will no-op).
        app.update();

        Self { app }
    }

    /// A map with the demo base spawned by `init_world`.
    pub fn with_demo_world() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin);
        app.update();
        Self { app }
    }

    /// Wrap an already configured app, e.g. one with the HUD plugin added.
    pub fn from_app(mut app: App) -> Self {
        app.update();
        Self { app }
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

impl Default for TestGame {
    fn default() -> Self {
        Self::new()
    }
}
