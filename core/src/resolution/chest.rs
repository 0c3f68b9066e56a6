use alloc::format;

use super::*;

/// Opening springs the trap (if any) and hands out the reward; ignoring reveals nothing.
pub(super) fn resolve_chest(
    params: &ChestParams,
    choice: PlayerChoice,
    current_hp: i32,
) -> ResolutionResult {
    if choice != PlayerChoice::Open {
        return ResolutionResult::nothing(format!("You leave the {} alone.", params.name), current_hp);
    }

    let hp_delta = if params.is_trapped {
        -i32::try_from(params.trap_damage).unwrap_or(i32::MAX)
    } else {
        0
    };
    let result_text = match (params.is_trapped, params.reward.is_none()) {
        (true, true) => format!("The {} was trapped.", params.name),
        (true, false) => format!("The {} was trapped, but something was left inside.", params.name),
        (false, true) => format!("The {} is empty.", params.name),
        (false, false) => format!("You open the {}.", params.name),
    };

    ResolutionResult::new(hp_delta, params.reward, result_text, current_hp)
}
