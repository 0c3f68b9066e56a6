#![no_std]

extern crate alloc;

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use game::*;
pub use generator::*;
pub use grid::*;
pub use level::*;
pub use player::*;
pub use resolution::*;
pub use reward::*;
pub use run_log::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod events;
mod game;
mod generator;
mod grid;
mod level;
mod player;
mod resolution;
mod reward;
mod run_log;
mod types;
