//! Search configuration parameters.

use std::time::Duration;

use crate::constants::{ADD_DEPTH, STEP_DEPTH};
use crate::eval::EvalWeights;
use crate::tt::ReplacePolicy;

/// Configuration for [`GameTreeSearch`](crate::search::GameTreeSearch).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum depth while the engine still has chips to add.
    pub add_depth: u32,

    /// Maximum depth once all the engine's chips are on the board.
    pub step_depth: u32,

    /// Evaluation weights, including the win score.
    pub weights: EvalWeights,

    /// Cache results by position hash within one search.
    pub use_table: bool,

    /// Replacement policy for the transposition table.
    pub replace_policy: ReplacePolicy,

    /// Initial transposition table capacity (entries).
    pub table_capacity: usize,

    /// Wall-clock budget for one search. An iteration that runs out of time
    /// is discarded and the previous iteration's move is used.
    pub time_limit: Option<Duration>,

    /// Pick the engine's first chip at random instead of searching.
    pub randomize_opening: bool,

    /// Seed for the opening RNG. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            add_depth: ADD_DEPTH,
            step_depth: STEP_DEPTH,
            weights: EvalWeights::default(),
            use_table: true,
            replace_policy: ReplacePolicy::FirstWrite,
            table_capacity: 1 << 14,
            time_limit: None,
            randomize_opening: true,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Config with explicit depths and defaults for everything else.
    pub fn with_depths(add_depth: u32, step_depth: u32) -> Self {
        Self {
            add_depth,
            step_depth,
            ..Self::default()
        }
    }

    /// Deterministic, shallow config for tests.
    pub fn for_testing() -> Self {
        Self {
            add_depth: 2,
            step_depth: 1,
            randomize_opening: false,
            seed: Some(1),
            table_capacity: 1024,
            ..Self::default()
        }
    }

    /// Depth limit for a player with `step_phase` chips.
    pub fn max_depth(&self, step_phase: bool) -> u32 {
        if step_phase { self.step_depth } else { self.add_depth }
    }
}
