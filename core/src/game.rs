use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::*;

/// Valid transitions:
/// - Ready -> Active
/// - Ready -> Won
/// - Ready -> Lost
/// - Active -> Won
/// - Active -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// No move played yet
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// One game from the first move to a win or a detonation.
///
/// The clock runs from `started_at` to `ended_at` (or now), on top of `elapsed_before` carried over from a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "GameSnapshot", try_from = "GameSnapshot")]
pub struct Game {
    board: Board,
    flags: BTreeSet<Coord2>,
    turns: u32,
    state: GameState,
    triggered_mine: Option<Coord2>,
    elapsed_before: u32,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Game {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            flags: BTreeSet::new(),
            turns: 0,
            state: Default::default(),
            triggered_mine: None,
            elapsed_before: 0,
            started_at: None,
            ended_at: None,
        }
    }

    /// Resumes a stored game, checking it against its board.
    ///
    /// The clock restarts from the stored seconds, time spent saved is not counted.
    pub fn restore(snapshot: GameSnapshot) -> Result<Self> {
        let GameSnapshot {
            board,
            flags,
            turns,
            state,
            triggered_mine,
            elapsed_secs,
        } = snapshot;

        if !flags.iter().all(|&pos| board.can_reveal(pos)) {
            return Err(GameError::InvalidGameState);
        }
        let consistent = match (state, triggered_mine) {
            (GameState::Lost, Some(pos)) => board.get_cell(pos).is_some_and(Cell::has_mine),
            (GameState::Lost, None) => false,
            (_, Some(_)) => false,
            (GameState::Won, None) => !board.has_cells_remaining(),
            (GameState::Ready, None) => turns == 0 && elapsed_secs == 0,
            (GameState::Active, None) => true,
        };
        if !consistent {
            return Err(GameError::InvalidGameState);
        }

        let now = Utc::now();
        let started_at = (!state.is_ready()).then_some(now);
        let ended_at = state.is_finished().then_some(now);
        log::debug!("resumed {:?} game after {} turns, {}s", state, turns, elapsed_secs);

        Ok(Self {
            board,
            flags,
            turns,
            state,
            triggered_mine,
            elapsed_before: elapsed_secs,
            started_at,
            ended_at,
        })
    }

    pub fn from_config(config: &GameConfig, seed: u64) -> Result<Self> {
        Ok(Self::new(Board::from_config(config, seed)?))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Moves that changed the board, including the one that hit a mine.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.flags.contains(&coords)
    }

    pub fn flag_count(&self) -> usize {
        self.flags.len()
    }

    /// How many seconds have passed since the first move, 0 if there was none
    pub fn elapsed_secs(&self) -> u32 {
        if let Some(started_at) = self.started_at {
            let running = (self.ended_at.unwrap_or_else(Utc::now) - started_at)
                .num_seconds()
                .max(0) as u32;
            self.elapsed_before.saturating_add(running)
        } else {
            self.elapsed_before
        }
    }

    /// Elapsed seconds for a win, 0 for a loss, nothing while the game goes on.
    pub fn score(&self) -> Option<u32> {
        match self.state {
            GameState::Won => Some(self.elapsed_secs()),
            GameState::Lost => Some(0),
            GameState::Ready | GameState::Active => None,
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_not_finished()?;

        if self.board[coords].is_revealed() {
            return Ok(MarkOutcome::NoChange);
        }
        if !self.flags.remove(&coords) {
            self.flags.insert(coords);
        }
        Ok(MarkOutcome::Changed)
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_not_finished()?;

        if !self.board.can_reveal(coords) || self.is_flagged(coords) {
            return Ok(RevealOutcome::NoChange);
        }

        self.mark_started();
        self.turns += 1;

        if self.board.contains_mine(coords) {
            log::debug!("Mine hit at {:?} on turn {}", coords, self.turns);
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return Ok(RevealOutcome::HitMine);
        }

        self.board.reveal(coords)?;
        let board = &self.board;
        self.flags.retain(|&pos| !board[pos].is_revealed());

        if self.board.has_cells_remaining() {
            Ok(RevealOutcome::Revealed)
        } else {
            self.end_game(true);
            Ok(RevealOutcome::Won)
        }
    }

    fn mark_started(&mut self) {
        if self.state.is_ready() {
            let now = Utc::now();
            log::debug!("started at {}", now);
            self.started_at = Some(now);
            self.state = GameState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won { GameState::Won } else { GameState::Lost };
        let now = Utc::now();
        self.ended_at = Some(now);
        log::debug!("ended at {} after {} turns, {:?}", now, self.turns, self.state);
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

/// Every field needed to resume a [`Game`], used as its serde representation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub flags: BTreeSet<Coord2>,
    pub turns: u32,
    pub state: GameState,
    pub triggered_mine: Option<Coord2>,
    pub elapsed_secs: u32,
}

impl From<Game> for GameSnapshot {
    fn from(game: Game) -> Self {
        let elapsed_secs = game.elapsed_secs();
        Self {
            board: game.board,
            flags: game.flags,
            turns: game.turns,
            state: game.state,
            triggered_mine: game.triggered_mine,
            elapsed_secs,
        }
    }
}

impl TryFrom<GameSnapshot> for Game {
    type Error = GameError;

    fn try_from(snapshot: GameSnapshot) -> Result<Self> {
        Game::restore(snapshot)
    }
}
