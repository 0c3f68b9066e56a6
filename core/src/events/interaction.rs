use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use super::*;

/// Coarse danger hint shown next to a choice. Never carries the underlying numbers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskHint {
    Safe,
    #[default]
    Unknown,
    Costly,
    Dangerous,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceDescriptor {
    pub choice: PlayerChoice,
    pub label: String,
    pub risk: RiskHint,
}

impl ChoiceDescriptor {
    fn new(choice: PlayerChoice, label: impl Into<String>, risk: RiskHint) -> Self {
        Self {
            choice,
            label: label.into(),
            risk,
        }
    }
}

/// What the presentation layer needs to offer an encounter to the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionDescriptor {
    pub coords: Coord2,
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub choices: Vec<ChoiceDescriptor>,
    pub resolved: bool,
}

impl InteractionDescriptor {
    pub fn offers(&self, choice: PlayerChoice) -> bool {
        self.choices.iter().any(|offered| offered.choice == choice)
    }
}

fn or_default(text: &str, fallback: impl FnOnce() -> String) -> String {
    if text.is_empty() {
        fallback()
    } else {
        String::from(text)
    }
}

impl MineEvent {
    pub fn interaction(&self) -> InteractionDescriptor {
        let title = String::from(self.params().title());

        if let Some(outcome) = self.outcome() {
            return InteractionDescriptor {
                coords: self.coords(),
                event_type: self.event_type(),
                title,
                description: outcome.result_text.clone(),
                choices: Vec::new(),
                resolved: true,
            };
        }

        use PlayerChoice::{Continue, Fight, Ignore, Open, Refuse, Sacrifice};
        use RiskHint::*;

        let (description, choices) = match self.params() {
            EventParams::Combat(params) => (
                or_default(&params.description, || {
                    format!("{} bars the way.", params.name)
                }),
                alloc::vec![ChoiceDescriptor::new(Fight, "Fight", Dangerous)],
            ),
            EventParams::Chest(params) => (
                or_default(&params.description, || String::from("A chest sits in the dark.")),
                alloc::vec![
                    ChoiceDescriptor::new(Open, "Open it", Unknown),
                    ChoiceDescriptor::new(Ignore, "Leave it", Safe),
                ],
            ),
            EventParams::Dialogue(params) => (
                params.text.clone(),
                params
                    .options
                    .iter()
                    .enumerate()
                    .map(|(index, option)| {
                        ChoiceDescriptor::new(
                            PlayerChoice::Answer(index as u8),
                            option.label.as_str(),
                            option.risk,
                        )
                    })
                    .collect(),
            ),
            EventParams::Shrine(params) => (
                or_default(&params.description, || {
                    format!("{} asks for blood.", params.name)
                }),
                alloc::vec![
                    ChoiceDescriptor::new(Sacrifice, "Make an offering", Costly),
                    ChoiceDescriptor::new(Refuse, "Walk away", Safe),
                ],
            ),
            EventParams::Sentence(params) => (
                params.text.clone(),
                alloc::vec![ChoiceDescriptor::new(Continue, "Continue", Safe)],
            ),
        };

        InteractionDescriptor {
            coords: self.coords(),
            event_type: self.event_type(),
            title,
            description,
            choices,
            resolved: false,
        }
    }
}
