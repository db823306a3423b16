//! Transposition table for caching search results.
//!
//! Results are keyed by the board's Zobrist hash. Each entry remembers the
//! best move, its score, how that score relates to the search window it was
//! found in, and the remaining depth it was searched to.
//!
//! Distinct positions may share a hash. A small fingerprint (chip counts per
//! color) is stored alongside each entry to reject the most obvious
//! mis-hits; anything that survives it is accepted as-is.

use std::collections::HashMap;

use crate::board::Board;
use crate::moves::{Color, Move};

/// How a stored score relates to the true minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Settled strictly inside the window
    Exact,
    /// Search failed high: true value >= score
    LowerBound,
    /// Search failed low: true value <= score
    UpperBound,
}

/// Whether a later result for the same position may replace an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplacePolicy {
    /// Keep the first result stored for a position
    #[default]
    FirstWrite,
    /// Replace when the new result was searched at least as deep
    DepthPreferred,
}

/// Outcome of searching one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Best {
    pub mv: Option<Move>,
    pub score: f64,
    pub bound: Bound,
    pub depth: u32,
}

impl Best {
    pub fn exact(mv: Option<Move>, score: f64, depth: u32) -> Self {
        Best {
            mv,
            score,
            bound: Bound::Exact,
            depth,
        }
    }

    /// Tighten `[alpha, beta]` with this result. Returns true if the result
    /// answers the query outright: it is exact, or the window closed.
    pub fn narrow(&self, alpha: &mut f64, beta: &mut f64) -> bool {
        match self.bound {
            Bound::Exact => return true,
            Bound::LowerBound => *alpha = alpha.max(self.score),
            Bound::UpperBound => *beta = beta.min(self.score),
        }
        *alpha >= *beta
    }
}

/// Cheap secondary check stored with each entry.
pub fn fingerprint(board: &Board) -> u32 {
    ((board.chip_count(Color::Black) as u32) << 8) | board.chip_count(Color::White) as u32
}

/// Table usage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TtStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
    /// Entries whose hash matched but fingerprint did not
    pub mismatches: u64,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    best: Best,
    fingerprint: u32,
}

pub struct TranspositionTable {
    entries: HashMap<u64, Slot>,
    policy: ReplacePolicy,
    stats: TtStats,
}

impl TranspositionTable {
    pub fn new(capacity: usize, policy: ReplacePolicy) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            policy,
            stats: TtStats::default(),
        }
    }

    /// A stored result for this position searched at least `depth` deep.
    pub fn probe(&mut self, hash: u64, fingerprint: u32, depth: u32) -> Option<Best> {
        self.stats.probes += 1;
        let slot = self.entries.get(&hash)?;
        if slot.fingerprint != fingerprint {
            self.stats.mismatches += 1;
            return None;
        }
        if slot.best.depth < depth {
            return None;
        }
        self.stats.hits += 1;
        Some(slot.best)
    }

    /// Record a result, subject to the replacement policy.
    pub fn store(&mut self, hash: u64, fingerprint: u32, best: Best) {
        let slot = Slot { best, fingerprint };
        match self.policy {
            ReplacePolicy::FirstWrite => {
                if let std::collections::hash_map::Entry::Vacant(e) = self.entries.entry(hash) {
                    e.insert(slot);
                    self.stats.stores += 1;
                }
            }
            ReplacePolicy::DepthPreferred => {
                let replace = self
                    .entries
                    .get(&hash)
                    .is_none_or(|old| old.best.depth <= best.depth);
                if replace {
                    self.entries.insert(hash, slot);
                    self.stats.stores += 1;
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = TtStats::default();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> TtStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: f64, bound: Bound, depth: u32) -> Best {
        Best {
            mv: Some(Move::add(3, 3, Color::Black)),
            score,
            bound,
            depth,
        }
    }

    #[test]
    fn test_probe_respects_depth() {
        let mut tt = TranspositionTable::new(16, ReplacePolicy::FirstWrite);
        tt.store(42, 0, entry(1.0, Bound::Exact, 2));
        assert!(tt.probe(42, 0, 2).is_some());
        assert!(tt.probe(42, 0, 1).is_some());
        assert!(tt.probe(42, 0, 3).is_none());
        assert!(tt.probe(7, 0, 0).is_none());
        assert_eq!(tt.stats().probes, 4);
        assert_eq!(tt.stats().hits, 2);
    }

    #[test]
    fn test_fingerprint_mismatch_rejected() {
        let mut tt = TranspositionTable::new(16, ReplacePolicy::FirstWrite);
        tt.store(42, 5, entry(1.0, Bound::Exact, 2));
        assert!(tt.probe(42, 6, 1).is_none());
        assert_eq!(tt.stats().mismatches, 1);
    }

    #[test]
    fn test_first_write_wins() {
        let mut tt = TranspositionTable::new(16, ReplacePolicy::FirstWrite);
        tt.store(1, 0, entry(1.0, Bound::Exact, 1));
        tt.store(1, 0, entry(2.0, Bound::Exact, 4));
        assert_eq!(tt.probe(1, 0, 1).map(|b| b.score), Some(1.0));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_depth_preferred_replaces_deeper() {
        let mut tt = TranspositionTable::new(16, ReplacePolicy::DepthPreferred);
        tt.store(1, 0, entry(1.0, Bound::Exact, 1));
        tt.store(1, 0, entry(2.0, Bound::Exact, 4));
        tt.store(1, 0, entry(3.0, Bound::Exact, 2));
        assert_eq!(tt.probe(1, 0, 1).map(|b| b.score), Some(2.0));
    }

    #[test]
    fn test_narrow_window() {
        let (mut alpha, mut beta) = (-10.0, 10.0);
        assert!(!entry(2.0, Bound::LowerBound, 1).narrow(&mut alpha, &mut beta));
        assert_eq!(alpha, 2.0);
        assert!(!entry(5.0, Bound::UpperBound, 1).narrow(&mut alpha, &mut beta));
        assert_eq!(beta, 5.0);
        assert!(entry(6.0, Bound::LowerBound, 1).narrow(&mut alpha, &mut beta));
        assert!(entry(0.0, Bound::Exact, 1).narrow(&mut -1.0, &mut 1.0));
    }

    #[test]
    fn test_clear() {
        let mut tt = TranspositionTable::new(16, ReplacePolicy::FirstWrite);
        tt.store(1, 0, entry(1.0, Bound::Exact, 1));
        tt.clear();
        assert!(tt.is_empty());
        assert_eq!(tt.stats(), TtStats::default());
    }
}
