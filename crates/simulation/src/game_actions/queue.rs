use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::GameAction;
use crate::objects::PlayerId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct QueuedAction {
    pub tick: u64,
    pub player: PlayerId,
    pub action: GameAction,
}

/// Orders waiting to be applied by [`execute_queued_actions`](super::execute_queued_actions).
///
/// In networked play every player order goes through here so that all peers
/// apply it on the same tick.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionQueue {
    pending: Vec<QueuedAction>,
}

impl ActionQueue {
    pub fn push(&mut self, tick: u64, player: PlayerId, action: GameAction) {
        self.pending.push(QueuedAction {
            tick,
            player,
            action,
        });
    }

    pub fn push_queued(&mut self, queued: QueuedAction) {
        self.pending.push(queued);
    }

    pub fn drain(&mut self) -> Vec<QueuedAction> {
        self.pending.drain(..).collect()
    }

    pub fn pending(&self) -> &[QueuedAction] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectId;
    use crate::research::ResearchId;
    use crate::structures::StructureStatsId;

    #[test]
    fn push_and_drain_preserves_fifo() {
        let mut queue = ActionQueue::default();
        queue.push(
            10,
            PlayerId(0),
            GameAction::StartResearch {
                facility: ObjectId(3),
                topic: ResearchId::ENGINEERING,
            },
        );
        queue.push(
            10,
            PlayerId(1),
            GameAction::HoldResearch {
                facility: ObjectId(7),
            },
        );
        queue.push(
            11,
            PlayerId(0),
            GameAction::OrderBuild {
                droid: ObjectId(1),
                stats: StructureStatsId::FACTORY,
                pos: (5, 5),
                pos2: (5, 5),
                queued: false,
            },
        );

        assert_eq!(queue.len(), 3);
        assert!(!queue.is_empty());

        let drained = queue.drain();
        assert_eq!(drained.len(), 3);
        assert!(queue.is_empty());

        assert_eq!(drained[0].tick, 10);
        assert_eq!(drained[0].player, PlayerId(0));
        assert_eq!(drained[1].player, PlayerId(1));
        assert_eq!(
            drained[1].action,
            GameAction::HoldResearch {
                facility: ObjectId(7)
            }
        );
        assert_eq!(drained[2].tick, 11);
        assert_eq!(drained[2].action.subject(), ObjectId(1));
    }

    #[test]
    fn queued_action_bitcode_roundtrip() {
        let queued = QueuedAction {
            tick: 42,
            player: PlayerId(2),
            action: GameAction::OrderDemolish {
                droid: ObjectId(4),
                target: ObjectId(9),
            },
        };
        let bytes = bitcode::encode(&queued);
        let decoded: QueuedAction = bitcode::decode(&bytes).expect("valid bytes");
        assert_eq!(decoded, queued);
    }
}
