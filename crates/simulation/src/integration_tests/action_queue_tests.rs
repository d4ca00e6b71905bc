//! The executor drains the queue on the next fixed tick and logs every result.

use crate::game_actions::{dispatch_action, ActionError, ActionQueue, ActionResult, GameAction};
use crate::objects::{ObjectId, PlayerId};
use crate::research::ResearchId;
use crate::structures::StructureStatsId;
use crate::test_harness::TestGame;

#[test]
fn test_networked_start_waits_for_tick() {
    let mut game = TestGame::new().networked();
    let lab = game.spawn_built(PlayerId(0), StructureStatsId::RESEARCH_FACILITY, (3, 3));
    let facility = game.object_id(lab);

    let result = dispatch_action(
        game.world_mut(),
        PlayerId(0),
        GameAction::StartResearch {
            facility,
            topic: ResearchId::ENGINEERING,
        },
    );
    assert_eq!(result, ActionResult::Success);
    assert_eq!(game.resource::<ActionQueue>().len(), 1);
    assert_eq!(game.facility(lab).subject, None);

    game.tick(1);
    assert!(game.resource::<ActionQueue>().is_empty());
    assert_eq!(game.facility(lab).subject, Some(ResearchId::ENGINEERING));
    assert_eq!(
        game.action_log().last().map(|entry| entry.result.clone()),
        Some(ActionResult::Success)
    );
}

#[test]
fn test_queued_failures_are_logged_not_applied() {
    let mut game = TestGame::new().networked();
    let lab = game.spawn_built(PlayerId(1), StructureStatsId::RESEARCH_FACILITY, (3, 3));
    let facility = game.object_id(lab);

    dispatch_action(
        game.world_mut(),
        PlayerId(0),
        GameAction::StartResearch {
            facility,
            topic: ResearchId::ENGINEERING,
        },
    );
    dispatch_action(
        game.world_mut(),
        PlayerId(0),
        GameAction::HoldResearch {
            facility: ObjectId(9999),
        },
    );
    game.tick(1);

    let log = game.action_log().last_n(2);
    assert_eq!(log[0].result, ActionResult::Error(ActionError::NotOwned));
    assert_eq!(log[1].result, ActionResult::Error(ActionError::NotFound));
    assert_eq!(game.facility(lab).subject, None);
}

#[test]
fn test_queue_applies_in_fifo_order() {
    let mut game = TestGame::new().networked();
    let lab = game.spawn_built(PlayerId(0), StructureStatsId::RESEARCH_FACILITY, (3, 3));
    let facility = game.object_id(lab);

    let world = game.world_mut();
    dispatch_action(
        world,
        PlayerId(0),
        GameAction::StartResearch {
            facility,
            topic: ResearchId::ENGINEERING,
        },
    );
    dispatch_action(world, PlayerId(0), GameAction::CancelResearch { facility });
    dispatch_action(
        world,
        PlayerId(0),
        GameAction::StartResearch {
            facility,
            topic: ResearchId::POWER_MODULE,
        },
    );
    game.tick(1);

    assert_eq!(game.facility(lab).subject, Some(ResearchId::POWER_MODULE));
}
