use core::fmt;
use serde::{Deserialize, Serialize};

/// Stable handle for a player, survives roster edits and is what cells record as their revealer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Colors handed out to players that did not pick one, in order.
pub const DEFAULT_COLORS: [&str; 8] = [
    "#3498db", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#34495e", "#e67e22",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    /// Sum of settled rounds
    pub total_score: u32,
    /// Points in the round being played, never below zero
    pub round_score: u32,
}

impl Player {
    pub(crate) fn new(id: PlayerId, name: String, color: String) -> Self {
        Self {
            id,
            name,
            color,
            total_score: 0,
            round_score: 0,
        }
    }
}

/// Per-player state exposed for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    pub total_score: u32,
    pub round_score: u32,
    pub is_current_turn: bool,
}
