//! Zobrist keys for incremental position hashing.
//!
//! The position hash is the XOR of one key per occupied square and color.
//! Keys come from a fixed seed, so two boards with the same occupancy
//! always agree on their hash regardless of how they got there.

use std::sync::OnceLock;

use crate::board::Square;
use crate::constants::{BOARDSIZE, ZOBRIST_SEED};
use crate::moves::{Color, Pos};

/// One random 64-bit key per (square, color).
pub struct ZobristKeys {
    keys: [[u64; BOARDSIZE]; 2],
}

impl ZobristKeys {
    fn new(seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut keys = [[0u64; BOARDSIZE]; 2];
        for color in &mut keys {
            for key in color.iter_mut() {
                *key = rng.u64(..);
            }
        }
        Self { keys }
    }

    /// Process-wide keys shared by every board.
    pub fn shared() -> &'static ZobristKeys {
        static KEYS: OnceLock<ZobristKeys> = OnceLock::new();
        KEYS.get_or_init(|| ZobristKeys::new(ZOBRIST_SEED))
    }

    #[inline]
    pub fn key(&self, pos: Pos, color: Color) -> u64 {
        self.keys[color.index()][pos.index()]
    }

    /// Hash recomputed from scratch over a grid.
    pub fn full_hash(&self, grid: &[Square; BOARDSIZE]) -> u64 {
        grid.iter()
            .enumerate()
            .fold(0, |h, (i, sq)| match sq {
                Square::Chip(c) => h ^ self.keys[c.index()][i],
                _ => h,
            })
    }
}
