//! Ring-buffer log of recently executed game actions and their results.
//!
//! The [`ActionResultLog`] resource stores the last 64 `(PlayerId, GameAction,
//! ActionResult)` entries so the HUD and tests can see what a queued order
//! eventually did without polling the ECS every tick.

use bevy::prelude::*;

use super::{ActionResult, GameAction};
use crate::objects::PlayerId;

/// Maximum number of entries retained in the ring buffer.
const MAX_ENTRIES: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedAction {
    pub player: PlayerId,
    pub action: GameAction,
    pub result: ActionResult,
}

/// A ring-buffer log of the last [`MAX_ENTRIES`] executed actions.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActionResultLog {
    entries: Vec<LoggedAction>,
    /// Entries ever pushed, evicted ones included.
    recorded: u64,
}

impl ActionResultLog {
    /// Record a new entry. If the buffer is full the oldest entry is evicted.
    pub fn push(&mut self, player: PlayerId, action: GameAction, result: ActionResult) {
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.remove(0);
        }
        self.entries.push(LoggedAction {
            player,
            action,
            result,
        });
        self.recorded += 1;
    }

    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Entries pushed after the log had `seen` records, as far as they are
    /// still retained.
    pub fn since(&self, seen: u64) -> &[LoggedAction] {
        let fresh = self.recorded.saturating_sub(seen);
        self.last_n(usize::try_from(fresh).unwrap_or(usize::MAX))
    }

    /// Return the last `n` entries (or fewer if the log is shorter).
    pub fn last_n(&self, n: usize) -> &[LoggedAction] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn last(&self) -> Option<&LoggedAction> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_actions::ActionError;
    use crate::objects::ObjectId;

    fn hold(facility: u32) -> GameAction {
        GameAction::HoldResearch {
            facility: ObjectId(facility),
        }
    }

    #[test]
    fn push_and_last_n() {
        let mut log = ActionResultLog::default();
        log.push(PlayerId(0), hold(1), ActionResult::Success);
        log.push(
            PlayerId(0),
            hold(2),
            ActionResult::Error(ActionError::NotOwned),
        );

        let last = log.last_n(1);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].action, hold(2));
        assert_eq!(last[0].result.error(), Some(&ActionError::NotOwned));

        assert_eq!(log.last_n(10).len(), 2);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut log = ActionResultLog::default();
        for i in 0..70 {
            log.push(PlayerId(0), hold(i), ActionResult::Success);
        }
        assert_eq!(log.len(), MAX_ENTRIES);
        // 70 pushed, 64 kept
        let first = &log.last_n(MAX_ENTRIES)[0];
        assert_eq!(first.action, hold(6));
    }

    #[test]
    fn since_returns_only_fresh_entries() {
        let mut log = ActionResultLog::default();
        log.push(PlayerId(0), hold(1), ActionResult::Success);
        let seen = log.recorded();
        log.push(PlayerId(0), hold(2), ActionResult::Success);
        log.push(PlayerId(0), hold(3), ActionResult::Success);

        let fresh = log.since(seen);
        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh[0].action, hold(2));
        assert!(log.since(log.recorded()).is_empty());

        // More fresh entries than the buffer holds: only the retained ones.
        for i in 0..100 {
            log.push(PlayerId(0), hold(i), ActionResult::Success);
        }
        assert_eq!(log.since(seen).len(), MAX_ENTRIES);
    }

    #[test]
    fn clear_empties_log() {
        let mut log = ActionResultLog::default();
        log.push(PlayerId(1), hold(0), ActionResult::Success);
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
        assert!(log.last().is_none());
    }
}
