use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Everything picked on the setup screens, loadable from JSON.
///
/// ```json
/// { "mode": "multi", "level": "medium", "players": [{ "name": "Alice" }, { "name": "Bob", "color": "#e74c3c" }] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: Mode,
    pub level: Level,
    pub players: Vec<PlayerConfig>,
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Builds a session in setup with the roster filled in, through the same validation as manual entry.
    pub fn into_session(self) -> Result<Session> {
        let difficulty = self.level.difficulty();
        let mut session = match self.seed {
            Some(seed) => Session::seeded(self.mode, difficulty, seed)?,
            None => Session::new(self.mode, difficulty)?,
        };

        if self.mode == Mode::Single {
            if !self.players.is_empty() {
                log::warn!(
                    "Ignoring {} configured players in single-player mode",
                    self.players.len()
                );
            }
            return Ok(session);
        }

        for player in &self.players {
            session.add_player(&player.name, player.color.as_deref())?;
        }
        Ok(session)
    }
}
