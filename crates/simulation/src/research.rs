//! Research topics, per-player research progress and research facilities.
//!
//! A facility has an authoritative `subject` that only the action executor
//! changes, and an optimistic `subject_pending`/`status_pending` pair the HUD
//! writes when it has queued an order that the executor has not processed
//! yet. Once the executor applies the order the two views agree again.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{MAX_PLAYERS, POWER_PER_TICK};
use crate::objects::{GameObject, PlayerId};
use crate::structures::{Availability, Structure, StructureAvailability, StructureStatsId};
use crate::{Saveable, TickCounter};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode,
    Decode,
)]
pub struct ResearchId(pub u16);

impl ResearchId {
    pub const ENGINEERING: Self = Self(0);
    pub const HARDPOINT_CONSTRUCTION: Self = Self(1);
    pub const MACHINEGUN_TOWER: Self = Self(2);
    pub const TOWER_HARDENING: Self = Self(3);
    pub const REPAIR_SYSTEMS: Self = Self(4);
    pub const POWER_MODULE: Self = Self(5);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchTopic {
    pub id: ResearchId,
    pub name: String,
    pub research_points: u32,
    pub research_power: u32,
    pub prerequisites: Vec<ResearchId>,
    /// Sort key for the research list; topics sharing an icon group cluster.
    pub icon_group: u8,
    /// Structures that become available on completion.
    pub unlocks: Vec<StructureStatsId>,
    /// Structures that become redundant on completion.
    pub obsoletes: Vec<StructureStatsId>,
    pub is_favorite: bool,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ResearchCatalog {
    topics: Vec<ResearchTopic>,
}

impl Default for ResearchCatalog {
    fn default() -> Self {
        let topic = |id: ResearchId,
                     name: &str,
                     points: u32,
                     power: u32,
                     prerequisites: &[ResearchId],
                     icon_group: u8,
                     unlocks: &[StructureStatsId],
                     obsoletes: &[StructureStatsId]| ResearchTopic {
            id,
            name: name.to_string(),
            research_points: points,
            research_power: power,
            prerequisites: prerequisites.to_vec(),
            icon_group,
            unlocks: unlocks.to_vec(),
            obsoletes: obsoletes.to_vec(),
            is_favorite: false,
        };
        Self {
            topics: vec![
                topic(
                    ResearchId::ENGINEERING,
                    "Engineering",
                    480,
                    60,
                    &[],
                    3,
                    &[StructureStatsId::TANK_TRAP],
                    &[],
                ),
                topic(
                    ResearchId::HARDPOINT_CONSTRUCTION,
                    "Hardpoint Construction",
                    720,
                    75,
                    &[ResearchId::ENGINEERING],
                    2,
                    &[StructureStatsId::HARDPOINT_WALL],
                    &[],
                ),
                topic(
                    ResearchId::MACHINEGUN_TOWER,
                    "Machinegun Guard Tower",
                    600,
                    75,
                    &[ResearchId::ENGINEERING],
                    1,
                    &[StructureStatsId::MG_TOWER],
                    &[],
                ),
                topic(
                    ResearchId::TOWER_HARDENING,
                    "Tower Hardening",
                    960,
                    100,
                    &[ResearchId::MACHINEGUN_TOWER],
                    1,
                    &[StructureStatsId::HARDENED_MG_TOWER],
                    &[StructureStatsId::MG_TOWER],
                ),
                topic(
                    ResearchId::REPAIR_SYSTEMS,
                    "Vehicle Repair Systems",
                    840,
                    90,
                    &[ResearchId::HARDPOINT_CONSTRUCTION],
                    4,
                    &[StructureStatsId::REPAIR_FACILITY],
                    &[],
                ),
                topic(
                    ResearchId::POWER_MODULE,
                    "Power Module",
                    600,
                    80,
                    &[],
                    0,
                    &[],
                    &[],
                ),
            ],
        }
    }
}

impl ResearchCatalog {
    pub fn from_topics(topics: Vec<ResearchTopic>) -> Self {
        Self { topics }
    }

    pub fn get(&self, id: ResearchId) -> Option<&ResearchTopic> {
        self.topics.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResearchTopic> {
        self.topics.iter()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn name(&self, id: ResearchId) -> &str {
        self.get(id).map_or("", |topic| topic.name.as_str())
    }

    pub fn is_favorite(&self, id: ResearchId) -> bool {
        self.get(id).is_some_and(|topic| topic.is_favorite)
    }

    pub fn set_favorite(&mut self, id: ResearchId, favorite: bool) {
        if let Some(topic) = self.topics.get_mut(id.index()) {
            topic.is_favorite = favorite;
        }
    }
}

#[derive(Encode, Decode, Default)]
struct FavoritesSave {
    favorites: Vec<u16>,
}

impl Saveable for ResearchCatalog {
    const SAVE_KEY: &'static str = "research_favorites";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        let favorites: Vec<u16> = self
            .topics
            .iter()
            .filter(|topic| topic.is_favorite)
            .map(|topic| topic.id.0)
            .collect();
        if favorites.is_empty() {
            return None;
        }
        Some(bitcode::encode(&FavoritesSave { favorites }))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        let save: FavoritesSave = crate::decode_or_warn(Self::SAVE_KEY, bytes);
        let mut catalog = Self::default();
        for id in save.favorites {
            catalog.set_favorite(ResearchId(id), true);
        }
        catalog
    }
}

// ---------------------------------------------------------------------------
// Per-player progress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopicState {
    #[default]
    NotStarted,
    Started,
    /// Stopped before completion. Accumulated points are kept.
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopicProgress {
    pub current_points: u32,
    pub state: TopicState,
}

#[derive(Resource, Debug, Clone)]
pub struct PlayerResearch {
    players: Vec<Vec<TopicProgress>>,
}

impl Default for PlayerResearch {
    fn default() -> Self {
        let topics = ResearchCatalog::default().len();
        Self {
            players: vec![vec![TopicProgress::default(); topics]; MAX_PLAYERS],
        }
    }
}

impl PlayerResearch {
    pub fn get(&self, player: PlayerId, id: ResearchId) -> TopicProgress {
        self.players
            .get(player.index())
            .and_then(|row| row.get(id.index()))
            .copied()
            .unwrap_or_default()
    }

    pub fn get_mut(&mut self, player: PlayerId, id: ResearchId) -> Option<&mut TopicProgress> {
        let row = self.players.get_mut(player.index())?;
        if row.len() <= id.index() {
            row.resize(id.index() + 1, TopicProgress::default());
        }
        row.get_mut(id.index())
    }

    pub fn is_completed(&self, player: PlayerId, id: ResearchId) -> bool {
        self.get(player, id).state == TopicState::Completed
    }

    pub fn is_started(&self, player: PlayerId, id: ResearchId) -> bool {
        self.get(player, id).state == TopicState::Started
    }

    pub fn set_state(&mut self, player: PlayerId, id: ResearchId, state: TopicState) {
        match self.get_mut(player, id) {
            Some(progress) => progress.state = state,
            None => warn!("PlayerResearch: no slot for player {}", player.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Facilities
// ---------------------------------------------------------------------------

/// An order the HUD has queued but the executor has not applied yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingStatus {
    #[default]
    Nothing,
    Start,
    Hold,
    Release,
    Cancel,
}

#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct ResearchFacility {
    pub subject: Option<ResearchId>,
    pub subject_pending: Option<ResearchId>,
    pub status_pending: PendingStatus,
    /// Tick at which research was put on hold.
    pub held_since: Option<u64>,
    pub power_accrued: u32,
    pub points_per_tick: u32,
}

impl ResearchFacility {
    /// Researching as far as the HUD knows, including queued starts.
    pub fn is_researching_pending(&self) -> bool {
        self.subject_pending.is_some()
    }

    /// On hold as far as the HUD knows, including queued holds/releases.
    pub fn is_on_hold_pending(&self) -> bool {
        match self.status_pending {
            PendingStatus::Hold => true,
            PendingStatus::Release | PendingStatus::Start | PendingStatus::Cancel => false,
            PendingStatus::Nothing => self.held_since.is_some(),
        }
    }

    pub fn is_on_hold(&self) -> bool {
        self.held_since.is_some()
    }

    pub fn set_pending_start(&mut self, topic: ResearchId) {
        self.subject_pending = Some(topic);
        self.status_pending = PendingStatus::Start;
    }

    pub fn set_pending_hold(&mut self) {
        self.status_pending = PendingStatus::Hold;
    }

    pub fn set_pending_release(&mut self) {
        self.status_pending = PendingStatus::Release;
    }

    pub fn set_pending_cancel(&mut self) {
        self.subject_pending = None;
        self.status_pending = PendingStatus::Cancel;
    }

    /// Drop a queued order that did not take effect: the HUD goes back to
    /// showing what the facility is really doing.
    pub fn discard_pending(&mut self) {
        self.subject_pending = self.subject;
        self.status_pending = PendingStatus::Nothing;
    }

    /// Authoritative start.
    pub fn begin(&mut self, topic: ResearchId) {
        self.subject = Some(topic);
        self.subject_pending = Some(topic);
        self.status_pending = PendingStatus::Nothing;
        self.held_since = None;
        self.power_accrued = 0;
    }

    /// Authoritative stop, used for both cancellation and completion.
    pub fn clear(&mut self) {
        self.subject = None;
        self.subject_pending = None;
        self.status_pending = PendingStatus::Nothing;
        self.held_since = None;
        self.power_accrued = 0;
    }

    pub fn hold(&mut self, tick: u64) {
        if self.subject.is_some() {
            self.held_since = Some(tick);
        }
        self.status_pending = PendingStatus::Nothing;
    }

    pub fn release(&mut self) {
        self.held_since = None;
        self.status_pending = PendingStatus::Nothing;
    }
}

/// Topics currently claimed by any of the player's living facilities, counting
/// queued starts.
pub fn topics_in_progress(world: &mut World, player: PlayerId) -> Vec<ResearchId> {
    let mut query = world.query::<(&GameObject, &ResearchFacility)>();
    let mut topics: Vec<ResearchId> = query
        .iter(world)
        .filter(|(object, _)| object.player == player && !object.died)
        .flat_map(|(_, facility)| [facility.subject, facility.subject_pending])
        .flatten()
        .collect();
    topics.sort_unstable();
    topics.dedup();
    topics
}

/// Topics a facility may be set to research.
///
/// `current` is what the facility is already on; it is always listed. Other
/// topics must be unfinished, absent from `claimed` and have every
/// prerequisite completed. A topic left `Started` by a facility that has since
/// died is offered again.
pub fn fill_research_list(
    catalog: &ResearchCatalog,
    progress: &PlayerResearch,
    player: PlayerId,
    current: Option<ResearchId>,
    claimed: &[ResearchId],
) -> Vec<ResearchId> {
    catalog
        .iter()
        .filter(|topic| {
            if Some(topic.id) == current {
                return true;
            }
            if progress.is_completed(player, topic.id) {
                return false;
            }
            if claimed.contains(&topic.id) {
                return false;
            }
            topic
                .prerequisites
                .iter()
                .all(|&prerequisite| progress.is_completed(player, prerequisite))
        })
        .map(|topic| topic.id)
        .collect()
}

/// Apply a completed topic's results to the player's structure availability.
pub fn apply_research_results(
    topic: &ResearchTopic,
    player: PlayerId,
    availability: &mut StructureAvailability,
) {
    for &stats in &topic.unlocks {
        if availability.get(player, stats) == Availability::Unavailable {
            availability.set(player, stats, Availability::Available);
        }
    }
    for &stats in &topic.obsoletes {
        availability.set(player, stats, Availability::Redundant);
    }
}

/// Advance every active, un-held facility: first pay the topic's power cost,
/// then accumulate research points until the topic completes.
pub fn research_tick(
    tick: Res<TickCounter>,
    catalog: Res<ResearchCatalog>,
    mut progress: ResMut<PlayerResearch>,
    mut availability: ResMut<StructureAvailability>,
    mut facilities: Query<(&GameObject, &Structure, &mut ResearchFacility)>,
) {
    for (object, structure, mut facility) in &mut facilities {
        if object.died || !structure.is_built() || facility.is_on_hold() {
            continue;
        }
        let Some(subject) = facility.subject else {
            continue;
        };
        let Some(topic) = catalog.get(subject) else {
            warn!("research_tick: facility {:?} has unknown topic {}", object.id, subject.0);
            facility.clear();
            continue;
        };

        if facility.power_accrued < topic.research_power {
            facility.power_accrued = (facility.power_accrued + POWER_PER_TICK).min(topic.research_power);
            continue;
        }

        let points = facility.points_per_tick;
        let Some(entry) = progress.get_mut(object.player, subject) else {
            continue;
        };
        entry.current_points = (entry.current_points + points).min(topic.research_points);
        if entry.current_points < topic.research_points {
            continue;
        }

        entry.state = TopicState::Completed;
        apply_research_results(topic, object.player, &mut availability);
        facility.clear();
        info!(
            "Player {} completed research '{}' at tick {}",
            object.player.0, topic.name, tick.0
        );
    }
}
