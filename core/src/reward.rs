use alloc::format;
use alloc::string::String;
use serde::{Deserialize, Serialize};

/// What a resolved encounter hands the player, with its magnitude.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reward {
    #[default]
    None,
    HpGain(u32),
    /// Permanent increase of the discover radius for the rest of the run.
    VisionGain(u8),
    /// Number of upcoming combats fought with reduced incoming damage.
    Buff(u32),
}

impl Reward {
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

/// Player-side state a reward can touch.
pub trait RewardTarget {
    fn adjust_hp(&mut self, delta: i32);

    fn vision_radius(&self) -> u8;

    fn set_vision_radius(&mut self, radius: u8);

    /// Sets the "combats remaining" counter consulted by combat damage reduction.
    fn set_buff(&mut self, combats: u32);
}

/// Applies `reward` to `target` and describes the effect for transient feedback.
pub fn apply_reward<T: RewardTarget + ?Sized>(reward: Reward, target: &mut T) -> String {
    match reward {
        Reward::None => String::new(),
        Reward::HpGain(amount) => {
            target.adjust_hp(i32::try_from(amount).unwrap_or(i32::MAX));
            format!("+{} HP", amount)
        }
        Reward::VisionGain(amount) => {
            let radius = target.vision_radius().saturating_add(amount);
            target.set_vision_radius(radius);
            format!("Vision +{} (radius {})", amount, radius)
        }
        Reward::Buff(combats) => {
            target.set_buff(combats);
            if combats == 1 {
                String::from("Blessed for the next combat")
            } else {
                format!("Blessed for the next {} combats", combats)
            }
        }
    }
}
