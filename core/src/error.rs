use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Layout shape does not match grid size")]
    InvalidBoardShape,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("An encounter is still open")]
    EncounterPending,
    #[error("No encounter is open")]
    NoEncounter,
    #[error("Choice is not offered by this encounter")]
    InvalidChoice,
    #[error("Cell holds no mine event")]
    NotAMine,
    #[error("Event is already resolved")]
    AlreadyResolved,
}

pub type Result<T> = core::result::Result<T, GameError>;
