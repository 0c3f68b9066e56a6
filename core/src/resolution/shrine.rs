use alloc::format;

use super::*;

pub(super) fn resolve_shrine(
    params: &ShrineParams,
    choice: PlayerChoice,
    current_hp: i32,
) -> ResolutionResult {
    if choice != PlayerChoice::Sacrifice {
        return ResolutionResult::nothing(format!("You turn away from the {}.", params.name), current_hp);
    }

    let hp_delta = -i32::try_from(params.sacrifice_cost).unwrap_or(i32::MAX);
    ResolutionResult::new(
        hp_delta,
        params.reward,
        format!("The {} accepts your offering.", params.name),
        current_hp,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    fn shrine() -> ShrineParams {
        ShrineParams {
            name: String::from("altar"),
            sacrifice_cost: 6,
            reward: Reward::VisionGain(1),
            ..Default::default()
        }
    }

    #[test]
    fn sacrifice_costs_hp_and_rewards() {
        let result = resolve_shrine(&shrine(), PlayerChoice::Sacrifice, 20);

        assert_eq!(result.hp_delta, -6);
        assert_eq!(result.reward, Reward::VisionGain(1));
        assert!(!result.player_died);
    }

    #[test]
    fn refusing_has_no_effect() {
        let result = resolve_shrine(&shrine(), PlayerChoice::Refuse, 20);

        assert_eq!(result.hp_delta, 0);
        assert_eq!(result.reward, Reward::None);
    }

    #[test]
    fn sacrifice_can_be_fatal() {
        assert!(resolve_shrine(&shrine(), PlayerChoice::Sacrifice, 6).player_died);
    }
}
