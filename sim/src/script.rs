use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use umbra_core::{Coord, Coord2, PlayerChoice};

/// One scripted player action.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Primary(Coord2),
    Secondary(Coord2),
    Choose(PlayerChoice),
    Cancel,
    Acknowledge,
    Restart,
}

/// Splits a script on `;` or newlines and parses every non-empty command.
pub fn parse_script(script: &str) -> Result<Vec<Command>> {
    script
        .split([';', '\n'])
        .map(str::trim)
        .filter(|command| !command.is_empty())
        .enumerate()
        .map(|(index, command)| {
            command
                .parse::<Command>()
                .with_context(|| format!("script command #{index} `{command}`"))
        })
        .collect()
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(command: &str) -> Result<Self> {
        let mut words = command.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };
        let command = match verb {
            "p" | "primary" => Command::Primary(parse_coords(&mut words)?),
            "s" | "secondary" => Command::Secondary(parse_coords(&mut words)?),
            "c" | "choose" => {
                let choice = words.next().context("missing choice")?;
                Command::Choose(parse_choice(choice)?)
            }
            "x" | "cancel" => Command::Cancel,
            "a" | "ack" => Command::Acknowledge,
            "r" | "restart" => Command::Restart,
            other => bail!("unknown command `{other}`"),
        };
        if let Some(extra) = words.next() {
            bail!("unexpected argument `{extra}`");
        }
        Ok(command)
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Coord2> {
    let mut next = |axis: &str| -> Result<Coord> {
        let word = words.next().with_context(|| format!("missing {axis} coordinate"))?;
        word.parse::<Coord>()
            .with_context(|| format!("invalid {axis} coordinate `{word}`"))
    };
    Ok((next("x")?, next("y")?))
}

fn parse_choice(word: &str) -> Result<PlayerChoice> {
    Ok(match word {
        "fight" => PlayerChoice::Fight,
        "open" => PlayerChoice::Open,
        "ignore" => PlayerChoice::Ignore,
        "sacrifice" => PlayerChoice::Sacrifice,
        "refuse" => PlayerChoice::Refuse,
        "continue" => PlayerChoice::Continue,
        index => PlayerChoice::Answer(
            index
                .parse::<u8>()
                .with_context(|| format!("unknown choice `{index}`"))?,
        ),
    })
}

/// Script spelling of a choice, the inverse of the `c` command argument.
pub fn choice_token(choice: PlayerChoice) -> String {
    match choice {
        PlayerChoice::Fight => "fight".into(),
        PlayerChoice::Open => "open".into(),
        PlayerChoice::Ignore => "ignore".into(),
        PlayerChoice::Sacrifice => "sacrifice".into(),
        PlayerChoice::Refuse => "refuse".into(),
        PlayerChoice::Continue => "continue".into(),
        PlayerChoice::Answer(index) => index.to_string(),
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Primary((x, y)) => write!(f, "p {x} {y}"),
            Command::Secondary((x, y)) => write!(f, "s {x} {y}"),
            Command::Choose(choice) => write!(f, "c {}", choice_token(*choice)),
            Command::Cancel => f.write_str("x"),
            Command::Acknowledge => f.write_str("a"),
            Command::Restart => f.write_str("r"),
        }
    }
}
