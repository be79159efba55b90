use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use config::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use player::*;
pub use reveal::*;
pub use scoreboard::*;
pub use session::*;
pub use timer::*;
pub use types::*;

mod cell;
mod config;
mod error;
mod generator;
mod grid;
mod player;
mod reveal;
mod scoreboard;
mod session;
mod timer;
mod types;

/// Board shape and mine count for one round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl Difficulty {
    pub const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    /// Validated constructor, at least one safe cell must remain for the first click.
    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidDimensions);
        }
        let cells = mult(rows, cols);
        if mines >= cells {
            return Err(GameError::TooManyMines { mines, cells });
        }
        Ok(Self::new_unchecked(rows, cols, mines))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        level.difficulty()
    }
}

/// Fixed difficulty presets offered at setup.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

    pub const fn difficulty(self) -> Difficulty {
        use Level::*;
        match self {
            Easy => Difficulty::new_unchecked(9, 9, 10),
            Medium => Difficulty::new_unchecked(16, 16, 40),
            Hard => Difficulty::new_unchecked(16, 30, 99),
        }
    }

    pub const fn name(self) -> &'static str {
        use Level::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown difficulty {s:?}, expected easy, medium or hard"))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Single,
    Multi,
}

impl Mode {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            _ => Err(format!("unknown mode {s:?}, expected single or multi")),
        }
    }
}

/// Outcome of toggling a flag
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Why a game or round ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    MineHit,
    AllSafeRevealed,
}

/// Notification for the presentation layer when a game (single) or round (multi) ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEnd {
    pub winner_name: Option<String>,
    pub reason: EndReason,
    pub elapsed_secs: Option<u32>,
    pub points_awarded: Option<u32>,
}

impl GameEnd {
    pub const fn is_win(&self) -> bool {
        matches!(self.reason, EndReason::AllSafeRevealed)
    }
}

/// Outcome of a primary action (reveal)
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    NoChange,
    /// Safe cells were opened, `points` is zero in single-player mode
    Revealed { cells: CellCount, points: u32 },
    /// A multiplayer turn ended on a mine
    HitMine { player: PlayerId, penalty: u32 },
    Ended(GameEnd),
}

impl ActionOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(&self) -> bool {
        !matches!(self, Self::NoChange)
    }
}
