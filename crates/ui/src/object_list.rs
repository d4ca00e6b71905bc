//! The left-hand list of a panel: the player's builders or research
//! facilities, newest first, plus which one the panel is working with.

use bevy::prelude::*;

use simulation::droids::is_builder;
use simulation::objects::{is_alive, is_flagged_selected, player_objects, PlayerId};
use simulation::research::ResearchFacility;
use simulation::structures::Structure;

use crate::session::HudSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Builders,
    ResearchFacilities,
}

impl ObjectKind {
    pub fn matches(self, world: &World, entity: Entity) -> bool {
        match self {
            ObjectKind::Builders => is_builder(world, entity),
            ObjectKind::ResearchFacilities => {
                world.get::<ResearchFacility>(entity).is_some()
                    && world.get::<Structure>(entity).is_some_and(Structure::is_built)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjectListController {
    kind: ObjectKind,
    objects: Vec<Entity>,
}

impl ObjectListController {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            objects: Vec::new(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Rebuild from the live simulation. Dead objects and objects of other
    /// kinds are dropped; the most recently created object comes first.
    pub fn refresh(&mut self, world: &mut World, player: PlayerId) {
        let kind = self.kind;
        let all = player_objects(world, player);
        let world: &World = world;
        self.objects = all
            .into_iter()
            .rev()
            .filter(|&entity| is_alive(world, entity) && kind.matches(world, entity))
            .collect();
    }

    /// Pick the object the panel works with: a flagged selection wins, then
    /// the previous choice if still listed, then the first entry.
    pub fn update_selected(&self, world: &World, session: &mut HudSession) {
        let flagged = self
            .objects
            .iter()
            .copied()
            .find(|&entity| is_flagged_selected(world, entity));
        let previous = session
            .selected_object
            .filter(|entity| self.objects.contains(entity));
        session.selected_object = flagged.or(previous).or_else(|| self.objects.first().copied());
    }

    pub fn get(&self, index: usize) -> Option<Entity> {
        self.objects.get(index).copied()
    }

    pub fn position(&self, entity: Entity) -> Option<usize> {
        self.objects.iter().position(|&e| e == entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.objects.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.objects.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulation::droids::{spawn_droid, DroidType};
    use simulation::objects::{mark_dead, set_selected};
    use simulation::structures::{spawn_structure, StructureStatsId, StructureStatus};

    fn lab(world: &mut World, player: PlayerId) -> Entity {
        spawn_structure(
            world,
            player,
            StructureStatsId::RESEARCH_FACILITY,
            StructureStatus::Built,
            (0, 0),
        )
    }

    #[test]
    fn test_builders_newest_first_and_filtered() {
        let mut world = World::new();
        let p = PlayerId(0);
        let a = spawn_droid(&mut world, p, DroidType::Construct, "a");
        let _tank = spawn_droid(&mut world, p, DroidType::Weapon, "tank");
        let b = spawn_droid(&mut world, p, DroidType::CyborgConstruct, "b");
        let _theirs = spawn_droid(&mut world, PlayerId(1), DroidType::Construct, "theirs");
        let c = spawn_droid(&mut world, p, DroidType::Construct, "c");
        mark_dead(&mut world, c);
        let _lab = lab(&mut world, p);

        let mut list = ObjectListController::new(ObjectKind::Builders);
        list.refresh(&mut world, p);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![b, a]);
        assert_eq!(list.get(0), Some(b));
        assert_eq!(list.get(2), None);
    }

    #[test]
    fn test_facilities_list() {
        let mut world = World::new();
        let p = PlayerId(0);
        let first = lab(&mut world, p);
        let _truck = spawn_droid(&mut world, p, DroidType::Construct, "t");
        let second = lab(&mut world, p);
        let _unfinished = spawn_structure(
            &mut world,
            p,
            StructureStatsId::RESEARCH_FACILITY,
            StructureStatus::BeingBuilt,
            (2, 2),
        );

        let mut list = ObjectListController::new(ObjectKind::ResearchFacilities);
        list.refresh(&mut world, p);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![second, first]);
    }

    #[test]
    fn test_selection_prefers_flag_then_previous_then_first() {
        let mut world = World::new();
        let p = PlayerId(0);
        let a = spawn_droid(&mut world, p, DroidType::Construct, "a");
        let b = spawn_droid(&mut world, p, DroidType::Construct, "b");
        let c = spawn_droid(&mut world, p, DroidType::Construct, "c");
        let mut list = ObjectListController::new(ObjectKind::Builders);
        list.refresh(&mut world, p);
        let mut session = HudSession::new(p);

        list.update_selected(&world, &mut session);
        assert_eq!(session.selected_object, Some(c));

        session.selected_object = Some(a);
        list.update_selected(&world, &mut session);
        assert_eq!(session.selected_object, Some(a));

        set_selected(&mut world, b, true);
        list.update_selected(&world, &mut session);
        assert_eq!(session.selected_object, Some(b));
    }

    #[test]
    fn test_dead_previous_selection_falls_back_to_first() {
        let mut world = World::new();
        let p = PlayerId(0);
        let a = spawn_droid(&mut world, p, DroidType::Construct, "a");
        let b = spawn_droid(&mut world, p, DroidType::Construct, "b");
        let mut list = ObjectListController::new(ObjectKind::Builders);
        let mut session = HudSession::new(p);
        session.selected_object = Some(b);

        mark_dead(&mut world, b);
        list.refresh(&mut world, p);
        list.update_selected(&world, &mut session);
        assert_eq!(session.selected_object, Some(a));
    }

    #[test]
    fn test_empty_list_clears_selection() {
        let mut world = World::new();
        let mut list = ObjectListController::new(ObjectKind::ResearchFacilities);
        let mut session = HudSession::new(PlayerId(0));
        session.selected_object = Some(Entity::from_raw(42));
        list.refresh(&mut world, PlayerId(0));
        list.update_selected(&world, &mut session);
        assert_eq!(session.selected_object, None);
    }
}
