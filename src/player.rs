//! Machine player: owns a board and a searcher for one color.
//!
//! Moves from outside are validated against the player's own board and
//! rejected with `false` instead of an error, so callers driving a game
//! never have to unwind on bad input.

use tracing::{debug, info};

use crate::board::Board;
use crate::config::SearchConfig;
use crate::moves::{Color, Move};
use crate::search::{GameTreeSearch, SearchResult};

pub struct MachinePlayer {
    color: Color,
    board: Board,
    search: GameTreeSearch,
    last_search: Option<SearchResult>,
}

impl MachinePlayer {
    pub fn new(color: Color) -> Self {
        Self::with_config(color, SearchConfig::default())
    }

    pub fn with_config(color: Color, config: SearchConfig) -> Self {
        Self {
            color,
            board: Board::new(),
            search: GameTreeSearch::new(color, config),
            last_search: None,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Result of the most recent [`choose_move`](Self::choose_move).
    pub fn last_search(&self) -> Option<&SearchResult> {
        self.last_search.as_ref()
    }

    /// Search for a move, play it on the internal board and return it.
    ///
    /// Returns `None` when the game is already decided or there is no
    /// legal move.
    pub fn choose_move(&mut self) -> Option<Move> {
        let result = self.search.search(&mut self.board);
        let mv = result.best_move;
        self.last_search = Some(result);
        let mv = mv?;
        if !self.board.apply_move(&mv) {
            debug!(%mv, "searched move was rejected by the board");
            return None;
        }
        info!(color = %self.color, %mv, "engine move");
        Some(mv)
    }

    /// Apply a move made by the opponent. The move's color is ignored.
    pub fn opponent_move(&mut self, mv: Move) -> bool {
        self.apply_as(mv.with_color(self.color.opponent()))
    }

    /// Apply a move for this player without searching.
    pub fn force_move(&mut self, mv: Move) -> bool {
        self.apply_as(mv.with_color(self.color))
    }

    fn apply_as(&mut self, mv: Move) -> bool {
        match self.board.check_move(&mv) {
            Ok(()) => self.board.apply_move(&mv),
            Err(reason) => {
                debug!(%mv, %reason, "rejected move");
                false
            }
        }
    }

    /// Take back the last move of either color.
    pub fn undo(&mut self) -> bool {
        self.board.undo_move()
    }

    /// Start a fresh game with the same color and configuration.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.last_search = None;
    }
}

/// Outcome of a self-play game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub moves: Vec<Move>,
    /// `None` if the move limit was reached or a side had no move
    pub winner: Option<Color>,
}

/// Winner of the position after `mover` played, if any.
///
/// A move that completes both networks loses for the mover.
pub fn winner_after(board: &Board, mover: Color) -> Option<Color> {
    match (board.has_network(mover), board.has_network(mover.opponent())) {
        (_, true) => Some(mover.opponent()),
        (true, false) => Some(mover),
        (false, false) => None,
    }
}

/// Play two engines against each other, Black first, for at most
/// `max_moves` moves.
pub fn play_game(black: &mut MachinePlayer, white: &mut MachinePlayer, max_moves: usize) -> GameRecord {
    let mut moves = Vec::new();
    let mut to_move = Color::Black;
    for _ in 0..max_moves {
        let (mover, other) = match to_move {
            Color::Black => (&mut *black, &mut *white),
            Color::White => (&mut *white, &mut *black),
        };
        let Some(mv) = mover.choose_move() else {
            info!(color = %to_move, "no move available");
            break;
        };
        if !other.opponent_move(mv) {
            debug!(%mv, "boards diverged");
            break;
        }
        moves.push(mv);
        if let Some(winner) = winner_after(mover.board(), to_move) {
            info!(%winner, moves = moves.len(), "game over");
            return GameRecord {
                moves,
                winner: Some(winner),
            };
        }
        to_move = to_move.opponent();
    }
    GameRecord { moves, winner: None }
}
