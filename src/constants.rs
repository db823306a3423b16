//! Constants for board geometry, chip limits, and search defaults.
//!
//! The board is an 8x8 grid addressed by `(x, y)` with `x` the column and
//! `y` the row. Row 0 is the top edge. The four corner squares are dead.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const N: usize = 8;

/// Total number of squares, corners included.
pub const BOARDSIZE: usize = N * N;

/// Last valid coordinate on either axis.
pub const EDGE: i32 = N as i32 - 1;

// =============================================================================
// Game Rules
// =============================================================================

/// Chips each player places before the step phase begins.
pub const MAX_CHIPS: usize = 10;

/// Minimum number of chips in a winning network.
pub const MIN_NETWORK_LEN: usize = 6;

// =============================================================================
// Search Defaults
// =============================================================================

/// Default search depth while the engine is still adding chips.
pub const ADD_DEPTH: u32 = 3;

/// Default search depth once the engine is stepping chips.
pub const STEP_DEPTH: u32 = 2;

/// Score magnitude for a completed network.
pub const WIN_SCORE: f64 = 100.0;

/// Weight per live connection in the mobility term.
pub const CONNECTION_WEIGHT: f64 = 0.025;

/// Bonus per goal area occupied by a small number of chips.
pub const GOAL_WEIGHT: f64 = 0.05;

/// Goal areas holding more than this many chips earn no bonus.
pub const GOAL_BONUS_CAP: usize = 2;

/// Fixed seed for the Zobrist keys, so every board hashes identically.
pub const ZOBRIST_SEED: u64 = 0x4E45_5457_4F52_4B31;

// =============================================================================
// Direction Offsets
// =============================================================================

/// Unit steps `(dx, dy)` for the eight compass directions.
/// Order: Up, UpRight, Right, DownRight, Down, DownLeft, Left, UpLeft
pub const DELTA: [(i32, i32); 8] = [
    (0, -1),  // Up
    (1, -1),  // UpRight
    (1, 0),   // Right
    (1, 1),   // DownRight
    (0, 1),   // Down
    (-1, 1),  // DownLeft
    (-1, 0),  // Left
    (-1, -1), // UpLeft
];
