//! Static position evaluation.
//!
//! Scores are always from the engine's point of view: positive favors the
//! configured computer color, whoever is to move. A finished network scores
//! `win_score` minus the distance from the search root, so quicker wins and
//! slower losses are preferred. Otherwise the score is a small weighted sum
//! of connection counts and early goal-area presence.

use crate::board::Board;
use crate::constants::{CONNECTION_WEIGHT, GOAL_BONUS_CAP, GOAL_WEIGHT, WIN_SCORE};
use crate::moves::{Color, Move};

/// Tunable weights for [`Evaluator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalWeights {
    /// Magnitude of a won or lost position at the root
    pub win_score: f64,
    /// Value of each connection endpoint (mobility)
    pub connection: f64,
    /// Bonus for each goal area holding between 1 and `goal_bonus_cap` chips
    pub goal: f64,
    pub goal_bonus_cap: usize,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            win_score: WIN_SCORE,
            connection: CONNECTION_WEIGHT,
            goal: GOAL_WEIGHT,
            goal_bonus_cap: GOAL_BONUS_CAP,
        }
    }
}

/// Scores boards for one computer color.
#[derive(Debug, Clone)]
pub struct Evaluator {
    computer: Color,
    weights: EvalWeights,
}

impl Evaluator {
    pub fn new(computer: Color, weights: EvalWeights) -> Self {
        Self { computer, weights }
    }

    pub fn computer(&self) -> Color {
        self.computer
    }

    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    #[inline]
    fn sign(&self, color: Color) -> f64 {
        if color == self.computer { 1.0 } else { -1.0 }
    }

    /// Score of a finished game, or `None` if nobody has a network.
    ///
    /// When a move completes networks for both colors the player who made
    /// it loses, i.e. `to_move` wins.
    pub fn terminal_score(&self, board: &Board, to_move: Color, ply: u32) -> Option<f64> {
        let winner = match (
            board.has_network(self.computer),
            board.has_network(self.computer.opponent()),
        ) {
            (false, false) => return None,
            (true, false) => self.computer,
            (false, true) => self.computer.opponent(),
            (true, true) => to_move,
        };
        Some(self.sign(winner) * (self.weights.win_score - ply as f64))
    }

    /// Connection and goal-presence heuristic, ignoring networks.
    pub fn heuristic(&self, board: &Board) -> f64 {
        let w = &self.weights;
        let mut score = 0.0;
        for color in Color::ALL {
            let sign = self.sign(color);
            score += sign * w.connection * board.connection_count(color) as f64;
            let (first, second) = color.goals();
            for area in [first, second] {
                let n = board.goal_chips(area).len();
                if (1..=w.goal_bonus_cap).contains(&n) {
                    score += sign * w.goal;
                }
            }
        }
        score
    }

    /// Full evaluation of a position `ply` moves below the search root.
    pub fn score(&self, board: &Board, to_move: Color, ply: u32) -> f64 {
        self.terminal_score(board, to_move, ply)
            .unwrap_or_else(|| self.heuristic(board))
    }

    /// Score of the position after `mv`, used only to rank sibling moves.
    /// The board is restored before returning. `None` if `mv` is illegal.
    pub fn ordering_score(&self, board: &mut Board, mv: &Move, ply: u32) -> Option<f64> {
        let after = board.play(mv)?;
        Some(self.score(&after, mv.color().opponent(), ply + 1))
    }

    /// True for scores that can only come from a finished network.
    pub fn is_win_score(&self, score: f64, max_ply: u32) -> bool {
        score.abs() >= self.weights.win_score - max_ply as f64
    }
}
