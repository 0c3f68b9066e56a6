use alloc::string::String;
use alloc::vec::Vec;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::smallvec;

use super::*;

/// Relative weights used to pick an event type for a mine without a forced type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDistribution {
    pub combat: u32,
    pub chest: u32,
    pub dialogue: u32,
    pub shrine: u32,
}

impl Default for EventDistribution {
    fn default() -> Self {
        Self {
            combat: 40,
            chest: 25,
            dialogue: 20,
            shrine: 15,
        }
    }
}

impl EventDistribution {
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> EventType {
        let weighted = [
            (EventType::Combat, self.combat),
            (EventType::Chest, self.chest),
            (EventType::Dialogue, self.dialogue),
            (EventType::Shrine, self.shrine),
        ];
        let total: u32 = weighted.iter().map(|&(_, weight)| weight).sum();
        if total == 0 {
            log::warn!("Event distribution has no weight, falling back to combat");
            return EventType::Combat;
        }

        let mut roll = rng.random_range(0..total);
        for (event_type, weight) in weighted {
            if roll < weight {
                return event_type;
            }
            roll -= weight;
        }
        EventType::Combat
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
}

/// Per-type template pools plus the character roster used by dialogue.
///
/// The pools may come from static assets or from a generator upstream; only the final shape matters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPools {
    pub characters: Vec<Character>,
    pub combat: Vec<CombatParams>,
    pub chest: Vec<ChestParams>,
    pub dialogue: Vec<DialogueParams>,
    pub shrine: Vec<ShrineParams>,
    pub sentence: Vec<SentenceParams>,
}

impl ContentPools {
    pub fn character_name(&self, id: &str) -> Option<&str> {
        self.characters
            .iter()
            .find(|character| character.id == id)
            .map(|character| character.name.as_str())
    }
}

/// Hands out every entry of a pool once in shuffled order, then repeats at random.
#[derive(Clone, Debug)]
pub struct ContentDeck<'a, T> {
    pool: &'a [T],
    order: Vec<usize>,
    next: usize,
}

impl<'a, T> ContentDeck<'a, T> {
    pub fn new<R: Rng + ?Sized>(pool: &'a [T], rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..pool.len()).collect();
        order.shuffle(rng);
        Self {
            pool,
            order,
            next: 0,
        }
    }

    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&'a T> {
        if self.pool.is_empty() {
            return None;
        }
        let index = match self.order.get(self.next) {
            Some(&index) => {
                self.next += 1;
                index
            }
            None => rng.random_range(0..self.pool.len()),
        };
        Some(&self.pool[index])
    }
}

impl CombatParams {
    pub fn placeholder() -> Self {
        Self {
            name: String::from("Shade"),
            description: String::from("A shape that dissolves as you look at it."),
            force: 0,
            reward: Reward::None,
        }
    }
}

impl ChestParams {
    pub fn placeholder() -> Self {
        Self {
            name: String::from("Empty chest"),
            description: String::from("The lid hangs open."),
            ..Default::default()
        }
    }
}

impl DialogueParams {
    pub fn placeholder() -> Self {
        Self {
            character_id: String::new(),
            speaker: String::from(PLACEHOLDER_SPEAKER),
            text: String::from("..."),
            options: smallvec![DialogueOption {
                label: String::from("Leave"),
                risk: RiskHint::Safe,
                ..Default::default()
            }],
        }
    }
}

impl ShrineParams {
    pub fn placeholder() -> Self {
        Self {
            name: String::from("Broken shrine"),
            description: String::from("Whatever lived here is gone."),
            ..Default::default()
        }
    }
}

impl SentenceParams {
    pub fn placeholder() -> Self {
        Self {
            title: String::from("Silence"),
            text: String::from("Nothing is written here."),
        }
    }
}

pub const PLACEHOLDER_SPEAKER: &str = "Stranger";
