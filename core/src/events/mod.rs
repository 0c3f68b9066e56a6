//! Mine events: the encounter overlay attached to mine cells by coordinate.

use alloc::string::String;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;
pub use content::*;
pub use interaction::*;
pub use store::*;

mod content;
mod interaction;
mod store;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventType {
    Combat,
    Chest,
    Dialogue,
    Shrine,
    /// Terminal "ending" text. Only placed through forced layout tags.
    Sentence,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        Self::Combat,
        Self::Chest,
        Self::Dialogue,
        Self::Shrine,
        Self::Sentence,
    ];
}

/// Valid transitions:
/// - Hidden -> Revealed
/// - Revealed -> Resolved
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventState {
    #[default]
    Hidden,
    Revealed,
    Resolved,
}

impl EventState {
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatParams {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Creature force: damage dealt per exchange and starting HP.
    pub force: u32,
    #[serde(default)]
    pub reward: Reward,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChestParams {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_trapped: bool,
    #[serde(default)]
    pub trap_damage: u32,
    #[serde(default)]
    pub reward: Reward,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueOption {
    pub label: String,
    #[serde(default)]
    pub risk: RiskHint,
    #[serde(default)]
    pub hp_delta: i32,
    #[serde(default)]
    pub reward: Reward,
    #[serde(default)]
    pub result_text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueParams {
    pub character_id: String,
    /// Display name looked up from `character_id` when the event is assigned.
    #[serde(default)]
    pub speaker: String,
    pub text: String,
    pub options: SmallVec<[DialogueOption; 3]>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShrineParams {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sacrifice_cost: u32,
    #[serde(default)]
    pub reward: Reward,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceParams {
    pub title: String,
    pub text: String,
}

/// Type-specific parameters; exactly one block per event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventParams {
    Combat(CombatParams),
    Chest(ChestParams),
    Dialogue(DialogueParams),
    Shrine(ShrineParams),
    Sentence(SentenceParams),
}

impl EventParams {
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::Combat(_) => EventType::Combat,
            Self::Chest(_) => EventType::Chest,
            Self::Dialogue(_) => EventType::Dialogue,
            Self::Shrine(_) => EventType::Shrine,
            Self::Sentence(_) => EventType::Sentence,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Combat(params) => &params.name,
            Self::Chest(params) => &params.name,
            Self::Dialogue(params) => &params.speaker,
            Self::Shrine(params) => &params.name,
            Self::Sentence(params) => &params.title,
        }
    }
}

/// What happened when an event was resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOutcome {
    /// `None` when a penalty interaction resolved the event without a choice.
    pub choice: Option<PlayerChoice>,
    pub kind: InteractionKind,
    pub hp_delta: i32,
    pub reward: Reward,
    pub result_text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineEvent {
    coords: Coord2,
    state: EventState,
    params: EventParams,
    outcome: Option<EventOutcome>,
}

impl MineEvent {
    pub fn new(coords: Coord2, params: EventParams) -> Self {
        Self {
            coords,
            state: EventState::Hidden,
            params,
            outcome: None,
        }
    }

    pub fn coords(&self) -> Coord2 {
        self.coords
    }

    pub fn event_type(&self) -> EventType {
        self.params.event_type()
    }

    pub fn state(&self) -> EventState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state.is_resolved()
    }

    pub fn params(&self) -> &EventParams {
        &self.params
    }

    pub fn outcome(&self) -> Option<&EventOutcome> {
        self.outcome.as_ref()
    }

    /// Hidden -> Revealed; returns whether the state changed.
    pub(crate) fn mark_revealed(&mut self) -> bool {
        if matches!(self.state, EventState::Hidden) {
            self.state = EventState::Revealed;
            true
        } else {
            false
        }
    }

    /// Moves to Resolved and records the outcome. Already resolved events are left untouched.
    pub(crate) fn mark_resolved(&mut self, outcome: EventOutcome) -> bool {
        if self.state.is_resolved() {
            log::debug!("Event at {:?} already resolved, ignoring", self.coords);
            return false;
        }
        self.state = EventState::Resolved;
        self.outcome = Some(outcome);
        true
    }
}
