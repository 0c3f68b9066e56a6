use super::*;

/// Looks up the authored option; nothing is computed.
pub(super) fn resolve_dialogue(
    params: &DialogueParams,
    index: u8,
    current_hp: i32,
) -> Result<ResolutionResult> {
    let option = params
        .options
        .get(usize::from(index))
        .ok_or(GameError::InvalidChoice)?;

    Ok(ResolutionResult::new(
        option.hp_delta,
        option.reward,
        option.result_text.clone(),
        current_hp,
    ))
}
