use chrono::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Round score lost by a multiplayer turn that opens a mine.
pub const MINE_PENALTY: u32 = 10;

/// Players needed before a multiplayer game can start.
pub const MIN_PLAYERS: usize = 2;

/// Multiplier for a multiplayer reveal that starts on a cell with no adjacent mines.
pub const ZERO_CELL_MULTIPLIER: u32 = 2;

/// Valid transitions:
/// - Setup -> Playing (start game)
/// - Playing -> Over (mine hit in single mode, board cleared)
/// - Over -> Playing (new game, or new round in multi mode)
/// - Playing | Over -> Setup (reset)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Setup,
    Playing,
    Over,
}

/// Session-level state exposed for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub mode: Mode,
    pub phase: Phase,
    pub round: u32,
    pub flag_count: CellCount,
    /// Mines minus flags, negative when over-flagged
    pub mines_remaining: i32,
    pub cells_left: CellCount,
    pub current_player: Option<PlayerId>,
    /// Only tracked in single-player mode
    pub elapsed_secs: Option<u32>,
}

/// One player's (or one group's) game from mode selection until they leave.
///
/// All gameplay goes through `&mut Session`, one action at a time.
#[derive(Clone, Debug)]
pub struct Session {
    mode: Mode,
    difficulty: Difficulty,
    phase: Phase,
    round: u32,
    current_player: usize,
    flag_count: CellCount,
    grid: Grid,
    scoreboard: ScoreBoard,
    mines_placed: bool,
    timer: GameTimer,
    triggered_mine: Option<Coord2>,
    last_end: Option<GameEnd>,
    rng: SmallRng,
}

impl Session {
    pub fn new(mode: Mode, difficulty: Difficulty) -> Result<Self> {
        Self::with_rng(mode, difficulty, SmallRng::from_os_rng())
    }

    /// Same as [`Session::new`] but every board is reproducible from `seed`.
    pub fn seeded(mode: Mode, difficulty: Difficulty, seed: u64) -> Result<Self> {
        Self::with_rng(mode, difficulty, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(mode: Mode, difficulty: Difficulty, rng: SmallRng) -> Result<Self> {
        let difficulty = Difficulty::new(difficulty.rows, difficulty.cols, difficulty.mines)?;
        log::debug!("New {} session on {:?}", mode, difficulty);
        Ok(Self {
            mode,
            difficulty,
            phase: Phase::Setup,
            round: 1,
            current_player: 0,
            flag_count: 0,
            grid: Grid::new(difficulty),
            scoreboard: ScoreBoard::new(),
            mines_placed: false,
            timer: GameTimer::new(),
            triggered_mine: None,
            last_end: None,
            rng,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.scoreboard
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn timer(&self) -> &GameTimer {
        &self.timer
    }

    /// The mine that ended a single-player game.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// How the last game or round ended, cleared when a new board is dealt.
    pub fn last_end(&self) -> Option<&GameEnd> {
        self.last_end.as_ref()
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player
    }

    /// Whose turn it is, `None` in single-player mode.
    pub fn current_player(&self) -> Option<&Player> {
        match self.mode {
            Mode::Single => None,
            Mode::Multi => self.scoreboard.player_at(self.current_player),
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<()> {
        self.check_phase(Phase::Setup)?;
        self.difficulty = Difficulty::new(difficulty.rows, difficulty.cols, difficulty.mines)?;
        self.deal_board();
        Ok(())
    }

    pub fn add_player(&mut self, name: &str, color: Option<&str>) -> Result<PlayerId> {
        self.check_roster_editable()?;
        self.scoreboard.add_player(name, color)
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player> {
        self.check_roster_editable()?;
        self.scoreboard.remove_player(id)
    }

    /// Leaves setup and deals the first board. Multiplayer needs [`MIN_PLAYERS`] and starts from zero scores.
    pub fn start_game(&mut self) -> Result<()> {
        self.check_phase(Phase::Setup)?;
        if self.mode == Mode::Multi && self.scoreboard.len() < MIN_PLAYERS {
            return Err(GameError::InsufficientPlayers {
                required: MIN_PLAYERS,
                actual: self.scoreboard.len(),
            });
        }

        self.scoreboard.reset_scores();
        self.round = 1;
        self.deal_board();
        self.phase = Phase::Playing;
        log::debug!("Game started ({}, {} players)", self.mode, self.scoreboard.len());
        Ok(())
    }

    /// Deals a fresh board in the current round. Totals are kept, round scores are cleared.
    pub fn new_game(&mut self) -> Result<()> {
        self.check_started()?;
        self.scoreboard.reset_round_scores();
        self.deal_board();
        self.phase = Phase::Playing;
        log::debug!("New game dealt in round {}", self.round);
        Ok(())
    }

    /// Multiplayer only: moves to the next round on a fresh board.
    pub fn new_round(&mut self) -> Result<()> {
        if self.mode != Mode::Multi {
            return Err(GameError::WrongMode(self.mode));
        }
        self.check_started()?;
        self.round += 1;
        self.scoreboard.reset_round_scores();
        self.deal_board();
        self.phase = Phase::Playing;
        log::debug!("Round {} started", self.round);
        Ok(())
    }

    /// Returns to setup, scores are cleared and the roster is kept.
    pub fn back_to_setup(&mut self) {
        self.timer.stop(Utc::now());
        self.scoreboard.reset_scores();
        self.round = 1;
        self.deal_board();
        self.phase = Phase::Setup;
        log::debug!("Back to setup");
    }

    pub fn primary_action(&mut self, coords: Coord2) -> Result<ActionOutcome> {
        self.primary_action_at(coords, Utc::now())
    }

    /// Opens `coords` as the current player, `now` feeds the single-player timer.
    pub fn primary_action_at(&mut self, coords: Coord2, now: DateTime<Utc>) -> Result<ActionOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        if self.phase != Phase::Playing || !self.grid[coords].is_openable() {
            return Ok(ActionOutcome::NoChange);
        }
        // resolved before anything is mutated
        let player = match self.mode {
            Mode::Single => None,
            Mode::Multi => Some(self.current_player_id()?),
        };

        if !self.mines_placed {
            generate(&mut self.grid, self.difficulty.mines, coords, &mut self.rng)?;
            self.mines_placed = true;
            if self.mode == Mode::Single {
                self.timer.start(now);
            }
        }

        Ok(match player {
            None => self.open_single(coords, now),
            Some(player) => self.open_multi(coords, player),
        })
    }

    /// Toggles a flag on an unrevealed cell while playing.
    pub fn secondary_action(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        if self.phase != Phase::Playing || self.grid[coords].is_revealed {
            return Ok(MarkOutcome::NoChange);
        }

        let cell = &mut self.grid[coords];
        cell.is_flagged = !cell.is_flagged;
        if cell.is_flagged {
            self.flag_count += 1;
        } else {
            self.flag_count -= 1;
        }
        log::trace!("Flag at {:?} now {}", coords, cell.is_flagged);
        Ok(MarkOutcome::Changed)
    }

    /// Every safe cell is open, flags are not considered.
    pub fn is_board_cleared(&self) -> bool {
        self.grid.all_safe_revealed()
    }

    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let cell = self.grid.get(coords)?;
        let disclose_mine = cell.is_revealed || self.phase == Phase::Over;
        Ok(CellView {
            is_mine: disclose_mine.then_some(cell.is_mine),
            is_revealed: cell.is_revealed,
            is_flagged: cell.is_flagged,
            neighbor_mines: cell.neighbor_mines,
            revealed_by_color: cell
                .revealed_by
                .and_then(|id| self.scoreboard.get(id).ok())
                .map(|player| player.color.clone()),
        })
    }

    pub fn player_views(&self) -> Vec<PlayerView> {
        let current = self.current_player().map(|player| player.id);
        self.scoreboard
            .players()
            .iter()
            .map(|player| PlayerView {
                id: player.id,
                name: player.name.clone(),
                color: player.color.clone(),
                total_score: player.total_score,
                round_score: player.round_score,
                is_current_turn: self.phase == Phase::Playing && current == Some(player.id),
            })
            .collect()
    }

    pub fn ranking(&self) -> Vec<&Player> {
        self.scoreboard.rank()
    }

    pub fn status(&self) -> SessionStatus {
        self.status_at(Utc::now())
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> SessionStatus {
        SessionStatus {
            mode: self.mode,
            phase: self.phase,
            round: self.round,
            flag_count: self.flag_count,
            mines_remaining: i32::from(self.difficulty.mines) - i32::from(self.flag_count),
            cells_left: self.grid.cells_left(),
            current_player: self.current_player().map(|player| player.id),
            elapsed_secs: match self.mode {
                Mode::Single => Some(self.timer.elapsed_secs(now)),
                Mode::Multi => None,
            },
        }
    }

    fn open_single(&mut self, coords: Coord2, now: DateTime<Utc>) -> ActionOutcome {
        if self.grid[coords].is_mine {
            self.timer.stop(now);
            self.triggered_mine = Some(coords);
            reveal_all_mines(&mut self.grid);
            return self.finish(GameEnd {
                winner_name: None,
                reason: EndReason::MineHit,
                elapsed_secs: Some(self.timer.elapsed_secs(now)),
                points_awarded: None,
            });
        }

        let cells = reveal(&mut self.grid, coords, None);
        if self.grid.all_safe_revealed() {
            self.timer.stop(now);
            self.finish(GameEnd {
                winner_name: None,
                reason: EndReason::AllSafeRevealed,
                elapsed_secs: Some(self.timer.elapsed_secs(now)),
                points_awarded: None,
            })
        } else {
            ActionOutcome::Revealed { cells, points: 0 }
        }
    }

    fn open_multi(&mut self, coords: Coord2, player: PlayerId) -> ActionOutcome {
        if self.grid[coords].is_mine {
            reveal_single(&mut self.grid, coords, Some(player));
            let round_score = self.scoreboard.penalize(player, MINE_PENALTY).unwrap_or(0);
            log::debug!(
                "Player {} hit a mine at {:?}, round score now {}",
                player,
                coords,
                round_score
            );
            // a mine never ends the round, even on an otherwise cleared board
            self.advance_turn();
            return ActionOutcome::HitMine {
                player,
                penalty: MINE_PENALTY,
            };
        }

        let cells = reveal(&mut self.grid, coords, Some(player));
        let multiplier = if self.grid[coords].neighbor_mines == 0 {
            ZERO_CELL_MULTIPLIER
        } else {
            1
        };
        let points = u32::from(cells) * multiplier;
        if let Err(err) = self.scoreboard.award(player, points) {
            log::warn!("Could not award {} points: {}", points, err);
        }

        if self.grid.all_safe_revealed() {
            let summary = self.scoreboard.end_round();
            self.finish(GameEnd {
                winner_name: summary.as_ref().map(|s| s.winner_name.clone()),
                reason: EndReason::AllSafeRevealed,
                elapsed_secs: None,
                points_awarded: summary.map(|s| s.winner_points),
            })
        } else {
            self.advance_turn();
            ActionOutcome::Revealed { cells, points }
        }
    }

    fn finish(&mut self, end: GameEnd) -> ActionOutcome {
        log::debug!("{} game over in round {}: {:?}", self.mode, self.round, end);
        self.phase = Phase::Over;
        self.last_end = Some(end.clone());
        ActionOutcome::Ended(end)
    }

    fn advance_turn(&mut self) {
        let players = self.scoreboard.len();
        if players > 0 {
            self.current_player = (self.current_player + 1) % players;
        }
    }

    fn current_player_id(&self) -> Result<PlayerId> {
        self.scoreboard
            .player_at(self.current_player)
            .map(|player| player.id)
            .ok_or(GameError::InsufficientPlayers {
                required: MIN_PLAYERS,
                actual: self.scoreboard.len(),
            })
    }

    /// Fresh board with deferred mines, turn back to the first player.
    fn deal_board(&mut self) {
        self.grid = Grid::new(self.difficulty);
        self.mines_placed = false;
        self.flag_count = 0;
        self.current_player = 0;
        self.triggered_mine = None;
        self.last_end = None;
        self.timer.reset();
    }

    fn check_phase(&self, expected: Phase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase(self.phase))
        }
    }

    fn check_started(&self) -> Result<()> {
        if self.phase == Phase::Setup {
            Err(GameError::WrongPhase(self.phase))
        } else {
            Ok(())
        }
    }

    fn check_roster_editable(&self) -> Result<()> {
        if self.mode != Mode::Multi {
            return Err(GameError::WrongMode(self.mode));
        }
        self.check_phase(Phase::Setup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    /// Starts a game and swaps in a known board, as if the first click already happened.
    fn playing_with_layout(mut session: Session, size: Coord2, mines: &[Coord2]) -> Session {
        session.start_game().unwrap();
        let difficulty = Difficulty::new(size.0, size.1, mines.len() as CellCount).unwrap();
        session.difficulty = difficulty;
        session.grid = Grid::from_mine_coords(size, mines).unwrap();
        session.mines_placed = true;
        session
    }

    fn single(size: Coord2, mines: &[Coord2]) -> Session {
        let session = Session::seeded(Mode::Single, Level::Easy.into(), 1).unwrap();
        playing_with_layout(session, size, mines)
    }

    fn multi(names: &[&str], size: Coord2, mines: &[Coord2]) -> Session {
        let mut session = Session::seeded(Mode::Multi, Level::Easy.into(), 1).unwrap();
        for name in names {
            session.add_player(name, None).unwrap();
        }
        playing_with_layout(session, size, mines)
    }

    fn round_scores(session: &Session) -> Vec<u32> {
        session
            .scoreboard()
            .players()
            .iter()
            .map(|player| player.round_score)
            .collect()
    }

    #[test]
    fn first_click_is_safe_and_starts_timer() {
        for seed in 0..20 {
            let mut session = Session::seeded(Mode::Single, Level::Hard.into(), seed).unwrap();
            session.start_game().unwrap();
            assert!(!session.mines_placed());

            let outcome = session.primary_action_at((8, 15), at(0)).unwrap();

            assert!(session.mines_placed());
            assert!(!session.grid()[(8, 15)].is_mine);
            assert!(session.grid()[(8, 15)].is_revealed);
            assert_eq!(session.grid().mine_count(), 99);
            assert!(session.timer().is_running());
            assert!(!matches!(outcome, ActionOutcome::Ended(ref end) if !end.is_win()));
        }
    }

    #[test]
    fn multiplayer_first_click_does_not_start_timer() {
        let mut session = Session::seeded(Mode::Multi, Level::Easy.into(), 3).unwrap();
        session.add_player("A", None).unwrap();
        session.add_player("B", None).unwrap();
        session.start_game().unwrap();

        session.primary_action_at((4, 4), at(0)).unwrap();

        assert!(session.mines_placed());
        assert!(!session.timer().is_running());
        assert_eq!(session.status().elapsed_secs, None);
    }

    #[test]
    fn corner_click_cascades_through_zero_region() {
        // a walled-in pocket in the bottom right, everything else is reachable from the corner
        let walls = [(5, 5), (5, 6), (5, 7), (5, 8), (6, 5), (7, 5), (8, 5)];
        let mines: Vec<Coord2> = walls.into_iter().chain([(6, 8), (7, 7), (8, 6)]).collect();
        let mut session = single((9, 9), &mines);
        let before = session.status().cells_left;

        let outcome = session.primary_action_at((0, 0), at(0)).unwrap();

        let ActionOutcome::Revealed { cells, .. } = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert_eq!(cells, 81 - 16);
        assert_eq!(session.status().cells_left, before - cells);
        assert!(session.grid()[(4, 8)].is_revealed);
        assert!(session.grid()[(8, 4)].is_revealed);
        assert!(!session.grid()[(6, 6)].is_revealed);
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn single_player_mine_ends_game_and_shows_mines() {
        let mut session = single((3, 3), &[(0, 0), (2, 2)]);
        session.timer.start(at(0));

        let outcome = session.primary_action_at((2, 2), at(4)).unwrap();

        assert_eq!(
            outcome,
            ActionOutcome::Ended(GameEnd {
                winner_name: None,
                reason: EndReason::MineHit,
                elapsed_secs: Some(4),
                points_awarded: None,
            })
        );
        assert_eq!(session.phase(), Phase::Over);
        assert_eq!(session.triggered_mine(), Some((2, 2)));
        assert!(session.grid()[(0, 0)].is_revealed);
        assert_eq!(session.grid().revealed_safe_count(), 0);
        assert!(!session.timer().is_running());
    }

    #[test]
    fn single_player_win_records_elapsed_time() {
        let difficulty = Difficulty::new(4, 4, 2).unwrap();
        let mut session = Session::seeded(Mode::Single, difficulty, 11).unwrap();
        session.start_game().unwrap();

        let mut outcome = session.primary_action_at((0, 0), at(0)).unwrap();
        let safe: Vec<Coord2> = session
            .grid()
            .iter()
            .filter(|(_, cell)| !cell.is_mine)
            .map(|(coords, _)| coords)
            .collect();
        for coords in safe {
            if session.phase() == Phase::Playing {
                outcome = session.primary_action_at(coords, at(0) + TimeDelta::seconds(5)).unwrap();
            }
        }

        assert_eq!(session.phase(), Phase::Over);
        let ActionOutcome::Ended(end) = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert!(end.is_win());
        assert!(end.elapsed_secs.is_some());
        assert_eq!(session.last_end(), Some(&end));
        assert_eq!(session.flag_count(), 0);
    }

    #[test]
    fn flags_do_not_block_or_grant_the_win() {
        let mut session = single((1, 3), &[(0, 0)]);

        assert_eq!(session.secondary_action((0, 0)).unwrap(), MarkOutcome::Changed);
        assert_eq!(session.secondary_action((0, 2)).unwrap(), MarkOutcome::Changed);
        assert_eq!(session.flag_count(), 2);
        assert_eq!(session.status().mines_remaining, -1);
        assert!(!session.is_board_cleared());

        // flagged cells cannot be opened
        assert_eq!(session.primary_action((0, 2)).unwrap(), ActionOutcome::NoChange);
        session.secondary_action((0, 2)).unwrap();
        session.primary_action((0, 1)).unwrap();
        let outcome = session.primary_action((0, 2)).unwrap();

        assert!(matches!(outcome, ActionOutcome::Ended(ref end) if end.is_win()));
        assert!(session.grid()[(0, 0)].is_flagged);
    }

    #[test]
    fn flag_toggle_is_reversible_and_ignores_revealed_cells() {
        let mut session = single((3, 3), &[(2, 2)]);
        session.primary_action((1, 1)).unwrap();

        assert_eq!(session.secondary_action((1, 1)).unwrap(), MarkOutcome::NoChange);
        session.secondary_action((2, 2)).unwrap();
        session.secondary_action((2, 2)).unwrap();
        assert_eq!(session.flag_count(), 0);
        assert!(!session.grid()[(2, 2)].is_flagged);
    }

    #[test]
    fn mine_hit_is_clamped_and_passes_the_turn() {
        let mut session = multi(&["A", "B"], (3, 3), &[(2, 2)]);

        let outcome = session.primary_action((2, 2)).unwrap();

        let first = session.scoreboard().players()[0].id;
        assert_eq!(
            outcome,
            ActionOutcome::HitMine {
                player: first,
                penalty: MINE_PENALTY
            }
        );
        assert_eq!(round_scores(&session), vec![0, 0]);
        assert_eq!(session.current_player_index(), 1);
        assert_eq!(session.phase(), Phase::Playing);
        // only the mine itself was opened
        assert_eq!(session.grid().revealed_safe_count(), 0);
        assert_eq!(session.grid()[(2, 2)].revealed_by, Some(first));
    }

    #[test]
    fn mine_hit_deducts_from_positive_score() {
        let mut session = multi(&["A", "B"], (1, 30), &[(0, 0), (0, 28)]);
        // A: the zero run opens cells 1..=27, doubled
        assert_eq!(
            session.primary_action((0, 5)).unwrap(),
            ActionOutcome::Revealed {
                cells: 27,
                points: 54
            }
        );
        // B opens a mine
        session.primary_action((0, 0)).unwrap();
        // A opens the other mine
        session.primary_action((0, 28)).unwrap();

        assert_eq!(round_scores(&session), vec![44, 0]);
        assert_eq!(session.current_player_index(), 1);
    }

    #[test]
    fn numbered_cell_scores_single_points() {
        let mut session = multi(&["A", "B"], (3, 3), &[(0, 0)]);

        assert_eq!(
            session.primary_action((1, 1)).unwrap(),
            ActionOutcome::Revealed { cells: 1, points: 1 }
        );
        assert_eq!(round_scores(&session), vec![1, 0]);
        assert_eq!(session.current_player_index(), 1);
        let view = session.cell_view((1, 1)).unwrap();
        assert_eq!(view.revealed_by_color.as_deref(), Some(DEFAULT_COLORS[0]));
    }

    #[test]
    fn clearing_the_board_settles_the_round_with_first_max_winner() {
        // (0,0)-(0,1) and (0,3)-(0,4) are worth 2 cells x2 each
        let mut session = multi(&["A", "B"], (1, 5), &[(0, 2)]);

        session.primary_action((0, 0)).unwrap();
        let outcome = session.primary_action((0, 4)).unwrap();

        assert_eq!(
            outcome,
            ActionOutcome::Ended(GameEnd {
                winner_name: Some("A".into()),
                reason: EndReason::AllSafeRevealed,
                elapsed_secs: None,
                points_awarded: Some(4),
            })
        );
        assert_eq!(session.phase(), Phase::Over);
        let totals: Vec<u32> = session
            .scoreboard()
            .players()
            .iter()
            .map(|player| player.total_score)
            .collect();
        assert_eq!(totals, vec![4, 4]);
        // the finishing move does not pass the turn
        assert_eq!(session.current_player_index(), 1);
        assert!(session.player_views().iter().all(|view| !view.is_current_turn));
    }

    #[test]
    fn new_round_keeps_totals_and_clears_round_scores() {
        let mut session = multi(&["A", "B"], (1, 5), &[(0, 2)]);
        session.primary_action((0, 0)).unwrap();
        session.primary_action((0, 4)).unwrap();

        session.new_round().unwrap();

        assert_eq!(session.round(), 2);
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.current_player_index(), 0);
        assert!(!session.mines_placed());
        assert_eq!(session.last_end(), None);
        assert_eq!(round_scores(&session), vec![0, 0]);
        let ranked: Vec<u32> = session.ranking().iter().map(|p| p.total_score).collect();
        assert_eq!(ranked, vec![4, 4]);
    }

    #[test]
    fn new_round_is_multiplayer_only() {
        let mut session = single((3, 3), &[(0, 0)]);

        assert_eq!(session.new_round(), Err(GameError::WrongMode(Mode::Single)));
        assert_eq!(session.round(), 1);
    }

    #[test]
    fn new_game_resets_board_but_not_totals() {
        let mut session = multi(&["A", "B"], (1, 5), &[(0, 2)]);
        session.primary_action((0, 0)).unwrap();
        session.primary_action((0, 4)).unwrap();

        session.new_game().unwrap();

        assert_eq!(session.round(), 1);
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.flag_count(), 0);
        assert_eq!(session.grid().dimensions(), (1, 5));
        assert_eq!(session.grid().revealed_safe_count(), 0);
        assert_eq!(round_scores(&session), vec![0, 0]);
        assert_eq!(session.scoreboard().players()[0].total_score, 4);
    }

    #[test]
    fn multiplayer_needs_two_players() {
        let mut session = Session::seeded(Mode::Multi, Level::Easy.into(), 1).unwrap();
        session.add_player("Alice", None).unwrap();

        assert_eq!(
            session.start_game(),
            Err(GameError::InsufficientPlayers {
                required: 2,
                actual: 1
            })
        );
        assert_eq!(session.phase(), Phase::Setup);

        session.add_player("Bob", None).unwrap();
        assert_eq!(session.start_game(), Ok(()));
    }

    #[test]
    fn duplicate_player_is_rejected() {
        let mut session = Session::seeded(Mode::Multi, Level::Easy.into(), 1).unwrap();
        session.add_player("Alice", None).unwrap();

        assert!(matches!(
            session.add_player("Alice", None),
            Err(GameError::InvalidPlayerName {
                reason: NameIssue::Duplicate,
                ..
            })
        ));
        assert_eq!(session.scoreboard().len(), 1);
    }

    #[test]
    fn roster_is_locked_outside_multiplayer_setup() {
        let mut single = Session::seeded(Mode::Single, Level::Easy.into(), 1).unwrap();
        assert_eq!(
            single.add_player("Alice", None),
            Err(GameError::WrongMode(Mode::Single))
        );

        let mut session = multi(&["A", "B"], (3, 3), &[(0, 0)]);
        assert_eq!(
            session.add_player("C", None),
            Err(GameError::WrongPhase(Phase::Playing))
        );
        let id = session.scoreboard().players()[0].id;
        assert_eq!(
            session.remove_player(id),
            Err(GameError::WrongPhase(Phase::Playing))
        );
    }

    #[test]
    fn actions_outside_playing_do_nothing() {
        let mut session = Session::seeded(Mode::Single, Level::Easy.into(), 1).unwrap();

        assert_eq!(session.primary_action((0, 0)).unwrap(), ActionOutcome::NoChange);
        assert_eq!(session.secondary_action((0, 0)).unwrap(), MarkOutcome::NoChange);
        assert!(!session.mines_placed());

        let mut session = single((3, 3), &[(0, 0)]);
        session.primary_action((0, 0)).unwrap();
        assert_eq!(session.phase(), Phase::Over);
        assert_eq!(session.primary_action((2, 2)).unwrap(), ActionOutcome::NoChange);
        assert_eq!(session.secondary_action((2, 2)).unwrap(), MarkOutcome::NoChange);
    }

    #[test]
    fn out_of_bounds_actions_are_refused_without_change() {
        let mut session = single((3, 3), &[(0, 0)]);
        let before = session.grid().clone();

        assert_eq!(
            session.primary_action((3, 0)),
            Err(GameError::OutOfBounds((3, 0)))
        );
        assert_eq!(
            session.secondary_action((0, 3)),
            Err(GameError::OutOfBounds((0, 3)))
        );
        assert_eq!(session.grid(), &before);
        assert_eq!(session.flag_count(), 0);
    }

    #[test]
    fn cell_view_hides_mines_until_revealed_or_over() {
        let mut session = single((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(session.cell_view((2, 2)).unwrap().is_mine, None);
        session.primary_action((0, 0)).unwrap();

        assert_eq!(session.phase(), Phase::Over);
        assert_eq!(session.cell_view((2, 2)).unwrap().is_mine, Some(true));
        assert_eq!(session.cell_view((1, 1)).unwrap().is_mine, Some(false));
        assert!(session.cell_view((9, 9)).is_err());
    }

    #[test]
    fn back_to_setup_resets_scores_and_stops_timer() {
        let mut session = multi(&["A", "B"], (1, 5), &[(0, 2)]);
        session.primary_action((0, 0)).unwrap();

        session.back_to_setup();

        assert_eq!(session.phase(), Phase::Setup);
        assert_eq!(round_scores(&session), vec![0, 0]);
        assert_eq!(session.scoreboard().len(), 2);
        assert_eq!(session.new_game(), Err(GameError::WrongPhase(Phase::Setup)));
        session.back_to_setup();
        assert_eq!(session.phase(), Phase::Setup);
    }

    #[test]
    fn set_difficulty_only_in_setup() {
        let mut session = Session::seeded(Mode::Single, Level::Easy.into(), 1).unwrap();

        session.set_difficulty(Level::Hard.into()).unwrap();
        assert_eq!(session.grid().dimensions(), (16, 30));
        assert_eq!(
            session.set_difficulty(Difficulty::new_unchecked(2, 2, 4)),
            Err(GameError::TooManyMines { mines: 4, cells: 4 })
        );
        assert_eq!(session.difficulty(), Level::Hard.difficulty());

        session.start_game().unwrap();
        assert_eq!(
            session.set_difficulty(Level::Easy.into()),
            Err(GameError::WrongPhase(Phase::Playing))
        );
    }

    #[test]
    fn status_reports_counts_for_rendering() {
        let mut session = Session::seeded(Mode::Multi, Level::Medium.into(), 5).unwrap();
        session.add_player("A", Some("#ff0000")).unwrap();
        session.add_player("B", None).unwrap();
        session.start_game().unwrap();
        session.secondary_action((0, 0)).unwrap();

        let status = session.status();

        assert_eq!(status.phase, Phase::Playing);
        assert_eq!(status.round, 1);
        assert_eq!(status.flag_count, 1);
        assert_eq!(status.mines_remaining, 39);
        assert_eq!(status.current_player, Some(session.scoreboard().players()[0].id));
        let views = session.player_views();
        assert!(views[0].is_current_turn);
        assert!(!views[1].is_current_turn);
        assert_eq!(views[0].color, "#ff0000");
    }
}
