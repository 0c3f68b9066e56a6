use alloc::format;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use super::*;

/// Player-side inputs to a fight that do not live on the event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatContext {
    /// Player force: damage dealt to the creature per exchange.
    pub player_force: u32,
    /// Whether a blessing is active for this fight.
    pub buffed: bool,
    /// Incoming damage is divided by this while buffed.
    pub buff_divisor: u32,
}

impl Default for CombatContext {
    fn default() -> Self {
        Self {
            player_force: 1,
            buffed: false,
            buff_divisor: 2,
        }
    }
}

impl CombatContext {
    /// Damage the player takes each exchange against a creature of `creature_force`.
    pub fn damage_received(&self, creature_force: u32, penalty: bool) -> u32 {
        let mut damage = creature_force;
        if penalty {
            damage = damage.saturating_mul(2);
        }
        if self.buffed {
            damage /= self.buff_divisor.max(1);
        }
        damage
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatExchange {
    pub index: u32,
    pub damage_dealt: u32,
    pub creature_hp: u32,
    pub damage_received: u32,
}

/// Trades blows until the creature or the player runs out of HP. No randomness.
pub fn resolve_combat(
    params: &CombatParams,
    current_hp: i32,
    context: &CombatContext,
    penalty: bool,
) -> ResolutionResult {
    let force = context.player_force.max(1);
    let received = context.damage_received(params.force, penalty);

    let mut creature_hp = params.force;
    let mut player_hp = i64::from(current_hp);
    let mut total_received: u32 = 0;
    let mut exchanges = Vec::new();

    while creature_hp > 0 && player_hp > 0 {
        creature_hp = creature_hp.saturating_sub(force);
        player_hp -= i64::from(received);
        total_received = total_received.saturating_add(received);
        exchanges.push(CombatExchange {
            index: exchanges.len() as u32,
            damage_dealt: force,
            creature_hp,
            damage_received: received,
        });
    }

    let hp_delta = -i32::try_from(total_received).unwrap_or(i32::MAX);
    let died = i64::from(current_hp) + i64::from(hp_delta) <= 0;
    let (reward, result_text) = if died {
        (Reward::None, format!("The {} overwhelms you.", params.name))
    } else if exchanges.is_empty() {
        (params.reward, format!("The {} fades without a fight.", params.name))
    } else {
        (
            params.reward,
            format!(
                "You defeat the {} in {} exchanges, taking {} damage.",
                params.name,
                exchanges.len(),
                total_received
            ),
        )
    };

    log::debug!(
        "Combat against {} (force {}): {} exchanges, {} damage taken",
        params.name,
        params.force,
        exchanges.len(),
        total_received
    );

    let mut result = ResolutionResult::new(hp_delta, reward, result_text, current_hp);
    result.exchanges = exchanges;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    fn creature(force: u32) -> CombatParams {
        CombatParams {
            name: String::from("Ghoul"),
            force,
            reward: Reward::VisionGain(1),
            ..Default::default()
        }
    }

    fn context(player_force: u32) -> CombatContext {
        CombatContext {
            player_force,
            ..Default::default()
        }
    }

    #[test]
    fn exchanges_until_creature_falls() {
        let result = resolve_combat(&creature(7), 30, &context(3), false);

        // creature hp 7 -> 4 -> 1 -> 0, player takes 7 per exchange
        assert_eq!(result.exchanges.len(), 3);
        assert_eq!(result.hp_delta, -21);
        assert!(!result.player_died);
        assert_eq!(result.reward, Reward::VisionGain(1));
        assert_eq!(result.exchanges[1].creature_hp, 1);
        assert_eq!(result.exchanges[2].creature_hp, 0);
    }

    #[test]
    fn player_can_die_mid_fight() {
        let result = resolve_combat(&creature(10), 15, &context(2), false);

        // player hp 15 -> 5 -> -5 after two exchanges
        assert_eq!(result.exchanges.len(), 2);
        assert_eq!(result.hp_delta, -20);
        assert!(result.player_died);
        assert_eq!(result.reward, Reward::None);
    }

    #[test]
    fn resolution_is_deterministic() {
        let first = resolve_combat(&creature(9), 40, &context(4), true);
        let second = resolve_combat(&creature(9), 40, &context(4), true);

        assert_eq!(first, second);
        assert_eq!(first.hp_delta, -54);
    }

    #[test]
    fn zero_force_player_still_fights() {
        let result = resolve_combat(&creature(2), 10, &context(0), false);

        assert_eq!(result.exchanges.len(), 2);
        assert_eq!(result.hp_delta, -4);
    }

    #[test]
    fn buff_reduces_incoming_damage() {
        let buffed = CombatContext {
            player_force: 5,
            buffed: true,
            buff_divisor: 2,
        };

        let result = resolve_combat(&creature(5), 10, &buffed, false);

        assert_eq!(result.hp_delta, -2);
    }

    #[test]
    fn harmless_creature_yields_no_exchanges() {
        let result = resolve_combat(&creature(0), 10, &context(1), false);

        assert!(result.exchanges.is_empty());
        assert_eq!(result.hp_delta, 0);
        assert_eq!(result.reward, Reward::VisionGain(1));
    }
}
