//! The right-hand list of a panel: what the selected object could be told to
//! do next.

use bevy::prelude::*;

use crate::session::HudSession;

/// A catalog whose entries carry a player-editable favourite flag.
pub trait FavoriteTable<S> {
    fn is_favorite(&self, stat: S) -> bool;
    fn set_favorite(&mut self, stat: S, favorite: bool);
}

/// Flip the favourite flag of `stat` in the catalog resource `T`. Every panel
/// reading that catalog sees the change. Returns the new flag.
pub fn toggle_favorite<S, T>(world: &mut World, stat: S) -> bool
where
    S: Copy,
    T: FavoriteTable<S> + Resource,
{
    let Some(mut table) = world.get_resource_mut::<T>() else {
        warn!(
            "toggle_favorite: {} is not loaded",
            std::any::type_name::<T>()
        );
        return false;
    };
    let favorite = !table.is_favorite(stat);
    table.set_favorite(stat, favorite);
    favorite
}

/// A candidate before filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatEntry<S> {
    pub stat: S,
    pub obsolete: bool,
    pub favorite: bool,
    /// Listed regardless of the filter toggles.
    pub pinned: bool,
}

impl<S> StatEntry<S> {
    pub fn new(stat: S) -> Self {
        Self {
            stat,
            obsolete: false,
            favorite: false,
            pinned: false,
        }
    }

    pub fn pinned(stat: S) -> Self {
        Self {
            pinned: true,
            ..Self::new(stat)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListFilter {
    pub show_obsolete: bool,
    pub show_favorites: bool,
}

impl ListFilter {
    pub fn from_session(session: &HudSession) -> Self {
        Self {
            show_obsolete: session.show_obsolete,
            show_favorites: session.show_favorites,
        }
    }

    pub fn admits<S>(&self, entry: &StatEntry<S>) -> bool {
        if entry.pinned {
            return true;
        }
        if entry.obsolete && !self.show_obsolete {
            return false;
        }
        !self.show_favorites || entry.favorite
    }
}

#[derive(Debug, Clone)]
pub struct StatsListController<S> {
    stats: Vec<S>,
}

impl<S> Default for StatsListController<S> {
    fn default() -> Self {
        Self { stats: Vec::new() }
    }
}

impl<S: Copy + PartialEq> StatsListController<S> {
    /// Replace the list with the candidates that pass `filter`, keeping their
    /// order.
    pub fn refresh(&mut self, candidates: impl IntoIterator<Item = StatEntry<S>>, filter: ListFilter) {
        self.stats = candidates
            .into_iter()
            .filter(|entry| filter.admits(entry))
            .map(|entry| entry.stat)
            .collect();
    }

    pub fn clear(&mut self) {
        self.stats.clear();
    }

    pub fn get(&self, index: usize) -> Option<S> {
        self.stats.get(index).copied()
    }

    pub fn position(&self, stat: S) -> Option<usize> {
        self.stats.iter().position(|&s| s == stat)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = S> + '_ {
        self.stats.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct Flags(Vec<bool>);

    impl FavoriteTable<usize> for Flags {
        fn is_favorite(&self, stat: usize) -> bool {
            self.0.get(stat).copied().unwrap_or(false)
        }

        fn set_favorite(&mut self, stat: usize, favorite: bool) {
            if let Some(flag) = self.0.get_mut(stat) {
                *flag = favorite;
            }
        }
    }

    fn entries() -> Vec<StatEntry<u8>> {
        vec![
            StatEntry::pinned(0),
            StatEntry::new(1),
            StatEntry {
                obsolete: true,
                ..StatEntry::new(2)
            },
            StatEntry {
                favorite: true,
                ..StatEntry::new(3)
            },
            StatEntry {
                favorite: true,
                obsolete: true,
                ..StatEntry::new(4)
            },
        ]
    }

    fn listed(filter: ListFilter) -> Vec<u8> {
        let mut list = StatsListController::default();
        list.refresh(entries(), filter);
        list.iter().collect()
    }

    #[test]
    fn test_default_filter_hides_obsolete() {
        assert_eq!(listed(ListFilter::default()), vec![0, 1, 3]);
    }

    #[test]
    fn test_show_obsolete() {
        let filter = ListFilter {
            show_obsolete: true,
            show_favorites: false,
        };
        assert_eq!(listed(filter), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_favorites_only_keeps_pinned() {
        let filter = ListFilter {
            show_obsolete: false,
            show_favorites: true,
        };
        assert_eq!(listed(filter), vec![0, 3]);

        let both = ListFilter {
            show_obsolete: true,
            show_favorites: true,
        };
        assert_eq!(listed(both), vec![0, 3, 4]);
    }

    #[test]
    fn test_get_out_of_range_is_none() {
        let mut list = StatsListController::default();
        list.refresh(entries(), ListFilter::default());
        assert_eq!(list.get(1), Some(1));
        assert_eq!(list.get(99), None);
        assert_eq!(list.position(3), Some(2));
    }

    #[test]
    fn test_toggle_favorite_twice_restores() {
        let mut world = World::new();
        world.insert_resource(Flags(vec![false, true]));

        assert!(toggle_favorite::<usize, Flags>(&mut world, 0));
        assert!(world.resource::<Flags>().is_favorite(0));
        assert!(!toggle_favorite::<usize, Flags>(&mut world, 0));
        assert!(!world.resource::<Flags>().is_favorite(0));

        assert!(!toggle_favorite::<usize, Flags>(&mut world, 1));
        assert!(toggle_favorite::<usize, Flags>(&mut world, 1));
    }
}
