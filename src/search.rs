//! Game-tree search: iterative-deepening minimax with alpha-beta pruning.
//!
//! The search works on the caller's board in place. Every move is applied
//! through a [`MoveGuard`](crate::board::MoveGuard), so the board is back
//! where it started whenever a call returns, cutoffs and timeouts
//! included.
//!
//! Within one [`GameTreeSearch::search`] call:
//! - depths 1..=max are searched in turn, each a full alpha-beta pass
//! - results are cached in a transposition table keyed by position hash
//! - sibling moves are ordered by the static evaluation of the resulting
//!   position, best first for the side to move
//! - the loop stops early once a forced network is found

use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::board::Board;
use crate::config::SearchConfig;
use crate::eval::Evaluator;
use crate::moves::{Color, Move};
use crate::tt::{fingerprint, Best, Bound, TranspositionTable, TtStats};

/// Search counters for diagnostics and tuning.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Nodes visited
    pub nodes: u64,
    /// Alpha-beta cutoffs
    pub cutoffs: u64,
    /// Transposition table usage
    pub table: TtStats,
    /// Entries in the table when the search finished
    pub table_entries: usize,
    /// An iteration ran out of time and was discarded
    pub aborted: bool,
    pub elapsed: Duration,
}

/// Outcome of a top-level search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Move to play, or `None` if there is nothing to search
    pub best_move: Option<Move>,
    /// Score of `best_move` from the engine's point of view
    pub score: f64,
    /// Deepest fully completed iteration
    pub depth: u32,
    pub stats: SearchStats,
}

impl SearchResult {
    fn none() -> Self {
        SearchResult {
            best_move: None,
            score: 0.0,
            depth: 0,
            stats: SearchStats::default(),
        }
    }
}

/// Alpha-beta searcher for one computer color.
pub struct GameTreeSearch {
    config: SearchConfig,
    evaluator: Evaluator,
    table: TranspositionTable,
    rng: fastrand::Rng,
    nodes: u64,
    cutoffs: u64,
    deadline: Option<Instant>,
    timed_out: bool,
    max_ply: u32,
}

impl GameTreeSearch {
    pub fn new(computer: Color, config: SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            evaluator: Evaluator::new(computer, config.weights),
            table: TranspositionTable::new(config.table_capacity, config.replace_policy),
            rng,
            nodes: 0,
            cutoffs: 0,
            deadline: None,
            timed_out: false,
            max_ply: 0,
            config,
        }
    }

    pub fn computer(&self) -> Color {
        self.evaluator.computer()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Choose a move for the computer color.
    ///
    /// The depth limit depends on whether the computer is still adding
    /// chips. Its very first chip is placed at random when
    /// `randomize_opening` is set. The board is left unchanged.
    pub fn search(&mut self, board: &mut Board) -> SearchResult {
        let computer = self.computer();
        if self.config.randomize_opening && board.chip_count(computer) == 0 {
            let moves = board.legal_moves(computer);
            if moves.is_empty() {
                return SearchResult::none();
            }
            let mv = moves[self.rng.usize(..moves.len())];
            info!(%mv, "random opening move");
            return SearchResult {
                best_move: Some(mv),
                ..SearchResult::none()
            };
        }
        let max_depth = self.config.max_depth(board.in_step_phase(computer));
        self.run(board, 1..=max_depth.max(1))
    }

    /// One alpha-beta pass at exactly `depth`, no opening randomness.
    pub fn search_fixed(&mut self, board: &mut Board, depth: u32) -> SearchResult {
        self.run(board, depth.max(1)..=depth.max(1))
    }

    fn run(&mut self, board: &mut Board, depths: RangeInclusive<u32>) -> SearchResult {
        let start = Instant::now();
        self.table.clear();
        self.nodes = 0;
        self.cutoffs = 0;
        self.timed_out = false;
        self.deadline = self.config.time_limit.map(|limit| start + limit);
        self.max_ply = *depths.end();

        let mut result = SearchResult::none();
        for depth in depths {
            let best = self.alpha_beta(board, self.computer(), depth, 0, f64::NEG_INFINITY, f64::INFINITY);
            if self.timed_out {
                warn!(depth, "search ran out of time, discarding iteration");
                if result.best_move.is_none() {
                    result.best_move = best.mv;
                    result.score = best.score;
                }
                break;
            }
            result.best_move = best.mv;
            result.score = best.score;
            result.depth = depth;
            debug!(
                depth,
                score = best.score,
                mv = ?best.mv,
                nodes = self.nodes,
                entries = self.table.len(),
                "iteration complete"
            );
            let won = best.score > 0.0 && self.evaluator.is_win_score(best.score, self.max_ply);
            if best.mv.is_none() || won {
                break;
            }
        }

        result.stats = SearchStats {
            nodes: self.nodes,
            cutoffs: self.cutoffs,
            table: self.table.stats(),
            table_entries: self.table.len(),
            aborted: self.timed_out,
            elapsed: start.elapsed(),
        };
        self.table.clear();
        info!(
            mv = ?result.best_move,
            score = result.score,
            depth = result.depth,
            nodes = result.stats.nodes,
            "search finished"
        );
        result
    }

    fn out_of_time(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Win scores are stored relative to the node so they stay valid when
    /// the same position is reached at a different ply.
    fn to_table(&self, score: f64, ply: u32) -> f64 {
        if !self.evaluator.is_win_score(score, self.max_ply) {
            score
        } else if score > 0.0 {
            score + ply as f64
        } else {
            score - ply as f64
        }
    }

    fn from_table(&self, score: f64, ply: u32) -> f64 {
        if !self.evaluator.is_win_score(score, self.max_ply) {
            score
        } else if score > 0.0 {
            score - ply as f64
        } else {
            score + ply as f64
        }
    }

    fn remember(&mut self, hash: u64, fp: u32, best: Best, ply: u32) {
        if self.config.use_table {
            let stored = Best {
                score: self.to_table(best.score, ply),
                ..best
            };
            self.table.store(hash, fp, stored);
        }
    }

    /// Legal moves for `side`, best first from `side`'s point of view.
    fn ordered_moves(&self, board: &mut Board, side: Color, ply: u32) -> Vec<Move> {
        let maximizing = side == self.computer();
        let mut scored: Vec<(Move, f64)> = board
            .legal_moves(side)
            .into_iter()
            .filter_map(|mv| {
                self.evaluator
                    .ordering_score(board, &mv, ply)
                    .map(|score| (mv, score))
            })
            .collect();
        if maximizing {
            scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        } else {
            scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        }
        scored.into_iter().map(|(mv, _)| mv).collect()
    }

    fn alpha_beta(
        &mut self,
        board: &mut Board,
        side: Color,
        depth: u32,
        ply: u32,
        mut alpha: f64,
        mut beta: f64,
    ) -> Best {
        self.nodes += 1;
        let hash = board.position_hash();
        let fp = fingerprint(board);

        if self.config.use_table {
            if let Some(hit) = self.table.probe(hash, fp, depth) {
                let hit = Best {
                    score: self.from_table(hit.score, ply),
                    ..hit
                };
                if hit.narrow(&mut alpha, &mut beta) {
                    return hit;
                }
            }
        }

        let terminal = self.evaluator.terminal_score(board, side, ply);
        if terminal.is_some() || depth == 0 {
            let score = terminal.unwrap_or_else(|| self.evaluator.heuristic(board));
            let best = Best::exact(None, score, depth);
            self.remember(hash, fp, best, ply);
            return best;
        }

        let maximizing = side == self.computer();
        let moves = self.ordered_moves(board, side, ply);
        if moves.is_empty() {
            let (score, bound) = if maximizing {
                (alpha, Bound::UpperBound)
            } else {
                (beta, Bound::LowerBound)
            };
            return Best {
                mv: None,
                score,
                bound,
                depth,
            };
        }

        let (window_alpha, window_beta) = (alpha, beta);
        let mut best = Best {
            mv: None,
            score: if maximizing { f64::NEG_INFINITY } else { f64::INFINITY },
            bound: Bound::Exact,
            depth,
        };
        for mv in moves {
            // At least one child is always searched so a move is available.
            if best.mv.is_some() && self.out_of_time() {
                self.timed_out = true;
                break;
            }
            let reply = {
                let Some(mut child) = board.play(&mv) else {
                    continue;
                };
                self.alpha_beta(&mut child, side.opponent(), depth - 1, ply + 1, alpha, beta)
            };
            if self.timed_out {
                if best.mv.is_none() {
                    best.mv = Some(mv);
                    best.score = reply.score;
                }
                break;
            }
            let improves = if maximizing {
                reply.score > best.score
            } else {
                reply.score < best.score
            };
            if best.mv.is_none() || improves {
                best.mv = Some(mv);
                best.score = reply.score;
            }
            if maximizing {
                alpha = alpha.max(best.score);
            } else {
                beta = beta.min(best.score);
            }
            if alpha >= beta {
                self.cutoffs += 1;
                break;
            }
        }

        if self.timed_out {
            return best;
        }
        best.bound = if best.score <= window_alpha {
            Bound::UpperBound
        } else if best.score >= window_beta {
            Bound::LowerBound
        } else {
            Bound::Exact
        };
        self.remember(hash, fp, best, ply);
        best
    }
}
