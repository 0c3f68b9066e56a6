use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use umbra_core::{CellCount, ContentPools, Game, GameConfig, GameEvent, MineSource};

use crate::script::Command;

mod render;
mod script;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Encounter content pools (JSON)
    #[arg(short, long)]
    content: Option<PathBuf>,

    /// Painted level layout (JSON); mines are random when omitted
    #[arg(short, long)]
    level: Option<PathBuf>,

    /// Game configuration (JSON); command-line values override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Force a seed
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long)]
    width: Option<u8>,

    #[arg(long)]
    height: Option<u8>,

    /// Mine count for random mode
    #[arg(short, long, default_value_t = 10)]
    mines: CellCount,

    /// Commands separated by `;`: `p x y`, `s x y`, `c <choice>`, `x`, `a`, `r`
    #[arg(long, default_value = "")]
    script: String,

    /// Draw hidden mines on the final board
    #[arg(long)]
    show_mines: bool,

    /// Print the run log as JSON
    #[arg(long)]
    json: bool,
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {what} file {}", path.display()))
}

fn game_config(args: &Args) -> Result<GameConfig> {
    let mut config: GameConfig = match &args.config {
        Some(path) => load_json(path, "config")?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.size.0 = width;
    }
    if let Some(height) = args.height {
        config.size.1 = height;
    }
    Ok(config)
}

fn run_command(game: &mut Game, command: Command) -> umbra_core::Result<String> {
    Ok(match command {
        Command::Primary(coords) => render::describe_primary(&game.primary(coords)?),
        Command::Secondary(coords) => render::describe_secondary(&game.secondary(coords)?),
        Command::Choose(choice) => render::describe_resolution(&game.choose(choice)?),
        Command::Cancel => {
            game.cancel_encounter()?;
            "encounter closed".into()
        }
        Command::Acknowledge => {
            let encounter = game.acknowledge()?;
            format!("encounter at {:?} done", encounter.coords)
        }
        Command::Restart => {
            game.restart()?;
            "restarted".into()
        }
    })
}

fn report_events(game: &mut Game) {
    for event in game.drain_events() {
        match event {
            GameEvent::LightChanged(cells) => log::debug!("{} cells lit", cells.len()),
            event => log::info!("{event:?}"),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    log::debug!("seed: {:?}", args.seed);

    let config = game_config(&args)?;
    let content: ContentPools = match &args.content {
        Some(path) => load_json(path, "content")?,
        None => {
            log::warn!("No content file given, encounters use placeholders");
            ContentPools::default()
        }
    };
    let source = match &args.level {
        Some(path) => MineSource::Layout(load_json(path, "level")?),
        None => MineSource::Random {
            mines: args.mines,
            bootstrap: None,
        },
    };
    let commands = script::parse_script(&args.script)?;

    let mut game = Game::new(config, content, source).context("failed to start game")?;
    report_events(&mut game);

    for command in commands {
        println!("> {command}");
        match run_command(&mut game, command) {
            Ok(text) => println!("  {text}"),
            Err(err) => println!("  refused: {err}"),
        }
        report_events(&mut game);
    }

    println!();
    print!("{}", render::render_board(&game, args.show_mines));
    println!(
        "{:?}: HP {}, mines remaining {}",
        game.state(),
        game.player().hp,
        game.mines_remaining()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(game.run_log())?);
    } else {
        for event in game.run_log().iter() {
            println!("{}", render::describe_run_event(event));
        }
    }
    Ok(())
}
