use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::objects::ObjectId;
use crate::research::ResearchId;
use crate::structures::StructureStatsId;

/// A player order as it travels through the [`ActionQueue`](super::ActionQueue).
///
/// Objects are addressed by [`ObjectId`] rather than `Entity` so a queued order
/// stays meaningful on every peer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Encode, Decode)]
pub enum GameAction {
    StartResearch {
        facility: ObjectId,
        topic: ResearchId,
    },
    CancelResearch {
        facility: ObjectId,
    },
    HoldResearch {
        facility: ObjectId,
    },
    ReleaseResearch {
        facility: ObjectId,
    },
    /// Build `stats` at `pos`, or a line of them from `pos` to `pos2`.
    OrderBuild {
        droid: ObjectId,
        stats: StructureStatsId,
        pos: (i32, i32),
        pos2: (i32, i32),
        /// Append to the droid's order list instead of replacing it.
        queued: bool,
    },
    OrderDemolish {
        droid: ObjectId,
        target: ObjectId,
    },
}

impl GameAction {
    /// The object whose owner must match the issuing player.
    pub fn subject(&self) -> ObjectId {
        match self {
            GameAction::StartResearch { facility, .. }
            | GameAction::CancelResearch { facility }
            | GameAction::HoldResearch { facility }
            | GameAction::ReleaseResearch { facility } => *facility,
            GameAction::OrderBuild { droid, .. } | GameAction::OrderDemolish { droid, .. } => {
                *droid
            }
        }
    }
}
