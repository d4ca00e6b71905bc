//! Criterion benchmarks for panel refresh on a crowded map.
//!
//! Benchmarks:
//!   - build panel refresh with 200 builders, half of them with queued orders
//!   - research panel refresh with 40 labs, a topic running in every other one
//!
//! Run with: cargo bench -p ui --bench panel_refresh

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bevy::prelude::*;

use simulation::droids::DroidType;
use simulation::game_actions::{dispatch_action, GameAction};
use simulation::objects::PlayerId;
use simulation::research::ResearchId;
use simulation::structures::StructureStatsId;
use simulation::test_harness::TestGame;

use ui::build_interface::BuildInterfaceController;
use ui::controller::PanelController;
use ui::research_interface::ResearchInterfaceController;
use ui::session::HudSession;
use ui::widgets::build_panel_view;

const P: PlayerId = PlayerId(0);

fn crowded_build_game() -> TestGame {
    let mut game = TestGame::new();
    for i in 0..200 {
        let truck = game.spawn_droid(P, DroidType::Construct);
        if i % 2 == 0 {
            let droid = game.object_id(truck);
            dispatch_action(
                game.world_mut(),
                P,
                GameAction::OrderBuild {
                    droid,
                    stats: StructureStatsId::POWER_GENERATOR,
                    pos: (i, 0),
                    pos2: (i, 4),
                    queued: false,
                },
            );
        }
    }
    // Opposing units the ownership filter has to skip.
    for _ in 0..200 {
        game.spawn_droid(PlayerId(1), DroidType::Construct);
    }
    game
}

fn crowded_research_game() -> TestGame {
    let mut game = TestGame::new();
    for i in 0..40 {
        let lab = game.spawn_built(P, StructureStatsId::RESEARCH_FACILITY, (i, 10));
        if i % 2 == 0 {
            let facility = game.object_id(lab);
            let topic = if i % 4 == 0 {
                ResearchId::ENGINEERING
            } else {
                ResearchId::POWER_MODULE
            };
            dispatch_action(
                game.world_mut(),
                P,
                GameAction::StartResearch { facility, topic },
            );
        }
    }
    game
}

// ---------------------------------------------------------------------------
// Benchmark: build panel
// ---------------------------------------------------------------------------

fn bench_build_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_panel");
    let mut game = crowded_build_game();
    let mut session = HudSession::new(P);
    let mut controller = BuildInterfaceController::new();
    controller.show_interface(game.world_mut(), &mut session);

    group.bench_function("refresh_200_builders", |b| {
        b.iter(|| black_box(controller.refresh(game.world_mut(), &mut session)));
    });

    group.bench_function("view_200_builders", |b| {
        b.iter(|| {
            black_box(build_panel_view(
                game.world(),
                &session,
                &controller,
                "Build",
                true,
            ))
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: research panel
// ---------------------------------------------------------------------------

fn bench_research_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("research_panel");
    let mut game = crowded_research_game();
    let mut session = HudSession::new(P);
    let mut controller = ResearchInterfaceController::new();
    controller.show_interface(game.world_mut(), &mut session);

    group.bench_function("refresh_40_labs", |b| {
        b.iter(|| black_box(controller.refresh(game.world_mut(), &mut session)));
    });

    group.finish();
}

criterion_group!(benches, bench_build_refresh, bench_research_refresh);
criterion_main!(benches);
