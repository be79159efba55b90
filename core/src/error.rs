use thiserror::Error;

use crate::{CellCount, Coord2, Mode, Phase, PlayerId};

/// Why a player name was refused by the roster.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NameIssue {
    Empty,
    Duplicate,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates {0:?} are outside the board")]
    OutOfBounds(Coord2),
    #[error("Board must have at least one row and one column")]
    InvalidDimensions,
    #[error("Too many mines: {mines} requested but only {cells} cells")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("Invalid player name {name:?}: {reason:?}")]
    InvalidPlayerName { name: String, reason: NameIssue },
    #[error("Need at least {required} players, have {actual}")]
    InsufficientPlayers { required: usize, actual: usize },
    #[error("No player with id {0:?}")]
    UnknownPlayer(PlayerId),
    #[error("Not allowed while the session is in phase {0:?}")]
    WrongPhase(Phase),
    #[error("Not available in {0:?} mode")]
    WrongMode(Mode),
}

pub type Result<T> = std::result::Result<T, GameError>;
