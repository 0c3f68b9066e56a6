use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// One committed encounter resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunEvent {
    pub index: usize,
    pub event_type: EventType,
    pub coords: Coord2,
    pub choice: Option<PlayerChoice>,
    pub kind: InteractionKind,
    pub hp_before: i32,
    pub hp_after: i32,
    pub reward: Reward,
}

/// Append-only record of every resolved interaction in the current run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLog {
    entries: Vec<RunEvent>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, overwriting its `index` with the next sequential one.
    pub fn record(&mut self, mut event: RunEvent) -> &RunEvent {
        let index = self.entries.len();
        event.index = index;
        self.entries.push(event);
        &self.entries[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &RunEvent> {
        self.entries.iter()
    }

    pub fn by_type(&self, event_type: EventType) -> impl Iterator<Item = &RunEvent> {
        self.entries
            .iter()
            .filter(move |entry| entry.event_type == event_type)
    }

    pub fn at(&self, coords: Coord2) -> impl Iterator<Item = &RunEvent> {
        self.entries.iter().filter(move |entry| entry.coords == coords)
    }

    pub fn last(&self) -> Option<&RunEvent> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
