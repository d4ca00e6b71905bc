//! Integration tests using the `TestGame` harness.
//!
//! These tests spin up a headless Bevy App with `SimulationPlugin` and verify
//! behavior across the executor, construction and research systems together.

mod action_queue_tests;
mod simulation_phases;
