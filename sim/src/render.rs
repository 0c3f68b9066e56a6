use std::fmt::Write;

use umbra_core::*;

use crate::script::choice_token;

/// Draws the grid one row per line. Dark cells are `~`, lit but hidden cells `+`.
pub fn render_board(game: &Game, show_mines: bool) -> String {
    let grid = game.grid();
    let (width, height) = grid.size();
    let mut out = String::from("   ");
    for x in 0..width {
        out.push(char::from(b'0' + x % 10));
    }
    out.push('\n');

    for y in 0..height {
        let _ = write!(out, "{y:>2} ");
        for x in 0..width {
            out.push(cell_char(game, (x, y), show_mines));
        }
        out.push('\n');
    }
    out
}

fn cell_char(game: &Game, coords: Coord2, show_mines: bool) -> char {
    let cell = &game.grid()[coords];
    if !cell.is_active() {
        return '#';
    }
    if cell.is_flagged() {
        return 'F';
    }
    if cell.has_mine() {
        match game.event_store().get(coords).map(MineEvent::state) {
            Some(EventState::Resolved) => return 'x',
            Some(EventState::Revealed) => return '!',
            _ if show_mines => return '*',
            _ => {}
        }
    } else if cell.is_revealed() {
        return match cell.adjacent_mines() {
            0 => '.',
            count => char::from(b'0' + count),
        };
    }
    if cell.is_lit() { '+' } else { '~' }
}

pub fn describe_primary(outcome: &PrimaryOutcome) -> String {
    match outcome {
        PrimaryOutcome::Ignored => "nothing to reveal".into(),
        PrimaryOutcome::CannotAfford { cost, hp } => {
            format!("cannot afford reveal: costs {cost} HP, {hp} left")
        }
        PrimaryOutcome::Exhausted { cost } => format!("paid {cost} HP to reveal and collapsed"),
        PrimaryOutcome::Encounter(descriptor) => describe_encounter(descriptor),
        PrimaryOutcome::Discovered { revealed, lit } => {
            format!("revealed {revealed} cells, lit {lit}")
        }
    }
}

pub fn describe_secondary(outcome: &SecondaryOutcome) -> String {
    match outcome {
        SecondaryOutcome::Ignored => "nothing to flag".into(),
        SecondaryOutcome::Flag(flag) => format!("{flag:?}"),
        SecondaryOutcome::FalseAccusation { penalty, revealed } => {
            format!("no mine there: -{penalty} HP, revealed {revealed} cells")
        }
        SecondaryOutcome::Penalty(outcome) => {
            format!("accused too early! {}", describe_resolution(outcome))
        }
    }
}

pub fn describe_encounter(descriptor: &InteractionDescriptor) -> String {
    let mut out = format!(
        "{:?} encounter: {}\n    {}",
        descriptor.event_type, descriptor.title, descriptor.description
    );
    for offered in &descriptor.choices {
        let _ = write!(
            out,
            "\n    [{}] {} ({:?})",
            choice_token(offered.choice),
            offered.label,
            offered.risk
        );
    }
    out
}

pub fn describe_resolution(outcome: &ResolutionOutcome) -> String {
    let mut out = format!(
        "{} HP {} -> {}",
        outcome.result.result_text, outcome.hp_before, outcome.hp_after
    );
    if !outcome.reward_text.is_empty() {
        let _ = write!(out, " ({})", outcome.reward_text);
    }
    out
}

pub fn describe_run_event(event: &RunEvent) -> String {
    let choice = match event.choice {
        Some(choice) => choice_token(choice),
        None => "-".into(),
    };
    format!(
        "#{:<3} {:?} at {:?}, {} ({:?}): HP {} -> {}, reward {:?}",
        event.index,
        event.event_type,
        event.coords,
        choice,
        event.kind,
        event.hp_before,
        event.hp_after,
        event.reward
    )
}
