//! Pure encounter resolution: `(event, choice, kind, hp) -> ResolutionResult`.
//!
//! Nothing here mutates player or event state; the game applies results once a choice is final.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;
pub use combat::*;

mod chest;
mod combat;
mod dialogue;
mod shrine;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerChoice {
    Fight,
    Open,
    Ignore,
    Sacrifice,
    Refuse,
    /// Index into a dialogue's option list.
    Answer(u8),
    /// Acknowledges an ending text.
    Continue,
}

/// How the player reached the encounter.
///
/// `Penalty` is the wrong-interaction path (e.g. accusing a mine before seeing it): combat hits
/// twice as hard and every other encounter is destroyed without effect.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionKind {
    #[default]
    Normal,
    Penalty,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub hp_delta: i32,
    pub reward: Reward,
    pub result_text: String,
    /// Whether applying `hp_delta` to the HP the resolution saw leaves the player at or below 0.
    pub player_died: bool,
    /// Per-exchange breakdown, only filled for combat.
    pub exchanges: Vec<CombatExchange>,
}

impl ResolutionResult {
    pub fn new(hp_delta: i32, reward: Reward, result_text: String, current_hp: i32) -> Self {
        Self {
            hp_delta,
            reward,
            result_text,
            player_died: current_hp.saturating_add(hp_delta) <= 0,
            exchanges: Vec::new(),
        }
    }

    fn nothing(result_text: String, current_hp: i32) -> Self {
        Self::new(0, Reward::None, result_text, current_hp)
    }
}

/// Resolves `event` for `choice`.
///
/// Fails with [`GameError::InvalidChoice`] when a normal interaction picks a choice the event
/// does not offer; penalty interactions ignore the choice.
pub fn resolve(
    event: &MineEvent,
    choice: PlayerChoice,
    kind: InteractionKind,
    current_hp: i32,
    combat: &CombatContext,
) -> Result<ResolutionResult> {
    let params = event.params();

    if kind == InteractionKind::Penalty {
        return Ok(match params {
            EventParams::Combat(params) => combat::resolve_combat(params, current_hp, combat, true),
            other => ResolutionResult::nothing(
                format!("{} crumbles to dust.", other.title()),
                current_hp,
            ),
        });
    }

    match (params, choice) {
        (EventParams::Combat(params), PlayerChoice::Fight) => Ok(combat::resolve_combat(
            params, current_hp, combat, false,
        )),
        (EventParams::Chest(params), PlayerChoice::Open | PlayerChoice::Ignore) => {
            Ok(chest::resolve_chest(params, choice, current_hp))
        }
        (EventParams::Dialogue(params), PlayerChoice::Answer(index)) => {
            dialogue::resolve_dialogue(params, index, current_hp)
        }
        (EventParams::Shrine(params), PlayerChoice::Sacrifice | PlayerChoice::Refuse) => {
            Ok(shrine::resolve_shrine(params, choice, current_hp))
        }
        (EventParams::Sentence(params), PlayerChoice::Continue) => {
            Ok(ResolutionResult::nothing(params.text.clone(), current_hp))
        }
        (params, choice) => {
            log::warn!(
                "{:?} is not a valid choice for a {:?} event",
                choice,
                params.event_type()
            );
            Err(GameError::InvalidChoice)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn chest(trapped: bool) -> MineEvent {
        MineEvent::new(
            (0, 0),
            EventParams::Chest(ChestParams {
                name: String::from("Chest"),
                is_trapped: trapped,
                trap_damage: 8,
                reward: Reward::HpGain(5),
                ..Default::default()
            }),
        )
    }

    #[test]
    fn trapped_chest_reports_damage_and_reward_separately() {
        let result = resolve(
            &chest(true),
            PlayerChoice::Open,
            InteractionKind::Normal,
            50,
            &CombatContext::default(),
        )
        .unwrap();

        assert_eq!(result.hp_delta, -8);
        assert_eq!(result.reward, Reward::HpGain(5));
        assert!(!result.player_died);
    }

    #[test]
    fn dialogue_lookup_ignores_current_hp() {
        let event = MineEvent::new(
            (0, 0),
            EventParams::Dialogue(DialogueParams {
                character_id: String::from("hermit"),
                speaker: String::from("Hermit"),
                text: String::from("Well?"),
                options: smallvec![
                    DialogueOption {
                        label: String::from("Help"),
                        hp_delta: -3,
                        ..Default::default()
                    },
                    DialogueOption {
                        label: String::from("Harm"),
                        hp_delta: 0,
                        reward: Reward::HpGain(5),
                        result_text: String::from("You take what he has."),
                        ..Default::default()
                    },
                ],
            }),
        );

        for hp in [1, 50, 500] {
            let result = resolve(
                &event,
                PlayerChoice::Answer(1),
                InteractionKind::Normal,
                hp,
                &CombatContext::default(),
            )
            .unwrap();

            assert_eq!(result.hp_delta, 0);
            assert_eq!(result.reward, Reward::HpGain(5));
            assert_eq!(result.result_text, "You take what he has.");
        }
    }

    #[test]
    fn penalty_destroys_non_combat_content() {
        for kind_of_choice in [PlayerChoice::Open, PlayerChoice::Ignore, PlayerChoice::Fight] {
            let result = resolve(
                &chest(true),
                kind_of_choice,
                InteractionKind::Penalty,
                50,
                &CombatContext::default(),
            )
            .unwrap();

            assert_eq!(result.hp_delta, 0);
            assert_eq!(result.reward, Reward::None);
        }
    }

    #[test]
    fn penalty_doubles_combat_damage() {
        let event = MineEvent::new(
            (0, 0),
            EventParams::Combat(CombatParams {
                name: String::from("Wolf"),
                force: 3,
                ..Default::default()
            }),
        );
        let context = CombatContext {
            player_force: 3,
            ..Default::default()
        };

        let normal = resolve(&event, PlayerChoice::Fight, InteractionKind::Normal, 20, &context)
            .unwrap();
        let penalty = resolve(&event, PlayerChoice::Fight, InteractionKind::Penalty, 20, &context)
            .unwrap();

        assert_eq!(normal.hp_delta, -3);
        assert_eq!(penalty.hp_delta, -6);
    }

    #[test]
    fn mismatched_choice_is_rejected() {
        assert_eq!(
            resolve(
                &chest(false),
                PlayerChoice::Sacrifice,
                InteractionKind::Normal,
                10,
                &CombatContext::default(),
            ),
            Err(GameError::InvalidChoice)
        );
    }

    #[test]
    fn sentence_continues_without_effect() {
        let event = MineEvent::new(
            (0, 0),
            EventParams::Sentence(SentenceParams {
                title: String::from("The End"),
                text: String::from("It is over."),
            }),
        );

        let result = resolve(
            &event,
            PlayerChoice::Continue,
            InteractionKind::Normal,
            10,
            &CombatContext::default(),
        )
        .unwrap();

        assert_eq!(result.hp_delta, 0);
        assert_eq!(result.result_text, "It is over.");
    }
}
