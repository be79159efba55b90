use serde::{Deserialize, Serialize};

use crate::*;

/// Result of settling a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub winner: PlayerId,
    pub winner_name: String,
    pub winner_points: u32,
}

/// Ordered roster with per-round and cumulative scores. List order is turn order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBoard {
    players: Vec<Player>,
    next_id: u32,
    color_index: usize,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|player| player.id == id)
            .ok_or(GameError::UnknownPlayer(id))
    }

    pub fn player_at(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    /// The color the next player gets when none is given.
    pub fn next_default_color(&self) -> &'static str {
        DEFAULT_COLORS[self.color_index % DEFAULT_COLORS.len()]
    }

    /// Appends a player. Names are trimmed and must be non-empty and unique; the roster is untouched on error.
    pub fn add_player(&mut self, name: &str, color: Option<&str>) -> Result<PlayerId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidPlayerName {
                name: name.to_owned(),
                reason: NameIssue::Empty,
            });
        }
        if self.players.iter().any(|player| player.name == name) {
            return Err(GameError::InvalidPlayerName {
                name: name.to_owned(),
                reason: NameIssue::Duplicate,
            });
        }

        let color = match color.map(str::trim) {
            Some(color) if !color.is_empty() => color.to_owned(),
            _ => self.next_default_color().to_owned(),
        };
        self.color_index = (self.color_index + 1) % DEFAULT_COLORS.len();

        let id = PlayerId(self.next_id);
        self.next_id += 1;
        log::debug!("Added player {} {:?} ({})", id, name, color);
        self.players.push(Player::new(id, name.to_owned(), color));
        Ok(id)
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player> {
        let index = self
            .players
            .iter()
            .position(|player| player.id == id)
            .ok_or(GameError::UnknownPlayer(id))?;
        let player = self.players.remove(index);
        log::debug!("Removed player {} {:?}", id, player.name);
        Ok(player)
    }

    /// Adds `points` to the round score, returns the new round score.
    pub fn award(&mut self, id: PlayerId, points: u32) -> Result<u32> {
        let player = self.get_mut(id)?;
        player.round_score = player.round_score.saturating_add(points);
        Ok(player.round_score)
    }

    /// Deducts `points` from the round score without going below zero, returns the new round score.
    pub fn penalize(&mut self, id: PlayerId, points: u32) -> Result<u32> {
        let player = self.get_mut(id)?;
        player.round_score = player.round_score.saturating_sub(points);
        Ok(player.round_score)
    }

    /// Banks every round score into the totals and names the round winner.
    ///
    /// The winner is the first player in list order holding the highest round score. Round scores are kept
    /// until [`ScoreBoard::reset_round_scores`] so the finished round can still be displayed.
    pub fn end_round(&mut self) -> Option<RoundSummary> {
        for player in &mut self.players {
            player.total_score = player.total_score.saturating_add(player.round_score);
        }

        let winner = self
            .players
            .iter()
            .reduce(|winner, player| {
                if player.round_score > winner.round_score {
                    player
                } else {
                    winner
                }
            })?;
        log::debug!(
            "Round settled, winner {} {:?} with {}",
            winner.id,
            winner.name,
            winner.round_score
        );
        Some(RoundSummary {
            winner: winner.id,
            winner_name: winner.name.clone(),
            winner_points: winner.round_score,
        })
    }

    /// Players by total score, highest first; ties keep roster order.
    pub fn rank(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        ranked
    }

    pub fn reset_round_scores(&mut self) {
        for player in &mut self.players {
            player.round_score = 0;
        }
    }

    /// Clears both totals and round scores.
    pub fn reset_scores(&mut self) {
        for player in &mut self.players {
            player.total_score = 0;
            player.round_score = 0;
        }
    }

    fn get_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|player| player.id == id)
            .ok_or(GameError::UnknownPlayer(id))
    }
}
