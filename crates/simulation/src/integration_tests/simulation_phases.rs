use crate::objects::{GameObject, LocalPlayer, PlayerId};
use crate::research::ResearchFacility;
use crate::test_harness::TestGame;

#[test]
fn test_fixed_update_runs_and_counts_ticks() {
    // If the set chain were misconfigured (cycle, missing configure_sets)
    // running the schedule would panic here.
    let mut game = TestGame::new();
    assert_eq!(game.tick_count(), 0);
    game.tick(7);
    assert_eq!(game.tick_count(), 7);
}

#[test]
fn test_skip_world_init_leaves_map_empty() {
    let mut game = TestGame::new();
    let world = game.world_mut();
    let count = world.query::<&GameObject>().iter(world).count();
    assert_eq!(count, 0);
}

#[test]
fn test_demo_world_gives_local_player_two_labs() {
    let mut game = TestGame::with_demo_world();
    let local = game.resource::<LocalPlayer>().0;
    assert_eq!(local, PlayerId(0));
    let world = game.world_mut();
    let labs = world
        .query::<(&GameObject, &ResearchFacility)>()
        .iter(world)
        .filter(|(object, _)| object.player == local)
        .count();
    assert_eq!(labs, 2);
}
