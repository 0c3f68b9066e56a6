use serde::{Deserialize, Serialize};

use crate::*;

/// The run's player: HP pool, discover radius and the combat buff counter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub hp: i32,
    pub vision_radius: u8,
    pub buff_combats: u32,
}

impl Player {
    pub const fn new(hp: i32, vision_radius: u8) -> Self {
        Self {
            hp,
            vision_radius,
            buff_combats: 0,
        }
    }

    pub const fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub const fn is_buffed(&self) -> bool {
        self.buff_combats > 0
    }

    /// Consumes one buffed combat, if any remain.
    pub fn consume_buff(&mut self) {
        self.buff_combats = self.buff_combats.saturating_sub(1);
    }
}

impl RewardTarget for Player {
    fn adjust_hp(&mut self, delta: i32) {
        self.hp = self.hp.saturating_add(delta);
    }

    fn vision_radius(&self) -> u8 {
        self.vision_radius
    }

    fn set_vision_radius(&mut self, radius: u8) {
        self.vision_radius = radius;
    }

    fn set_buff(&mut self, combats: u32) {
        self.buff_combats = combats;
    }
}
