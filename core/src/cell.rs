use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// One board position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub neighbor_mines: u8,
    pub revealed_by: Option<PlayerId>,
}

impl Cell {
    /// Hidden and not flagged, so a reveal may open it
    pub const fn is_openable(&self) -> bool {
        !self.is_revealed && !self.is_flagged
    }

    pub const fn is_revealed_safe(&self) -> bool {
        self.is_revealed && !self.is_mine
    }
}

/// What the presentation layer is allowed to know about a cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    /// Only disclosed once the cell is revealed or the game is over
    pub is_mine: Option<bool>,
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub neighbor_mines: u8,
    pub revealed_by_color: Option<String>,
}
