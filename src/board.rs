//! Board state for Network.
//!
//! The board keeps the 8x8 grid together with several indexes derived from
//! it: per-color chip lists, per-goal-area chip lists, the connection graph
//! between same-colored chips, and an incremental Zobrist hash. All of them
//! are written only by [`Board::apply_move`] and [`Board::undo_move`].
//!
//! Every applied move pushes an undo entry holding exactly what is needed to
//! reverse it, so the search can mutate one board in place and restore it on
//! the way back out. [`MoveGuard`] ties that restore to scope exit.

use std::fmt;
use std::ops::{Deref, DerefMut};

use thiserror::Error;

use crate::constants::{BOARDSIZE, MAX_CHIPS, N};
use crate::moves::{Color, Direction, GoalArea, Move, Pos};
use crate::network;
use crate::zobrist::ZobristKeys;

/// Contents of one square.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Square {
    Empty,
    Chip(Color),
    Corner,
}

/// Why a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("square {0:?} is off the board")]
    OutOfBounds(Pos),
    #[error("square {0} is a corner")]
    Corner(Pos),
    #[error("square {0} is in the opponent's goal")]
    OpponentGoal(Pos),
    #[error("square {0} is occupied")]
    Occupied(Pos),
    #[error("square {0} does not hold one of the mover's chips")]
    NotOwnChip(Pos),
    #[error("step move must change squares")]
    SameSquare,
    #[error("chip at {0} would form a cluster of three")]
    Cluster(Pos),
    #[error("all chips are on the board, only step moves are allowed")]
    AddPhaseOver,
    #[error("step moves are only allowed once all chips are on the board")]
    StepPhaseNotReached,
}

/// A connection slot that changed while applying a move.
#[derive(Clone, Debug)]
struct LinkChange {
    at: Pos,
    dir: Direction,
    before: Option<Pos>,
}

/// Where a stepped chip sat in the index lists before it moved.
#[derive(Clone, Debug)]
struct Vacated {
    pos: Pos,
    chip_slot: usize,
    goal_slot: Option<usize>,
}

#[derive(Clone, Debug)]
struct UndoEntry {
    mv: Move,
    vacated: Option<Vacated>,
    links: Vec<LinkChange>,
    hash_delta: u64,
}

/// The Network board with its derived indexes and undo log.
#[derive(Clone)]
pub struct Board {
    grid: [Square; BOARDSIZE],
    /// Chips per color, in placement order
    chips: [Vec<Pos>; 2],
    /// Chips per goal area, in placement order
    goals: [Vec<Pos>; 4],
    /// For each square and direction, the chip it is connected to that way
    links: [[Option<Pos>; 8]; BOARDSIZE],
    hash: u64,
    history: Vec<UndoEntry>,
    keys: &'static ZobristKeys,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board with the four corners marked dead.
    pub fn new() -> Self {
        let mut grid = [Square::Empty; BOARDSIZE];
        for (i, sq) in grid.iter_mut().enumerate() {
            if Pos::from_index(i).is_corner() {
                *sq = Square::Corner;
            }
        }
        Board {
            grid,
            chips: [Vec::with_capacity(MAX_CHIPS), Vec::with_capacity(MAX_CHIPS)],
            goals: Default::default(),
            links: [[None; 8]; BOARDSIZE],
            hash: 0,
            history: Vec::new(),
            keys: ZobristKeys::shared(),
        }
    }

    /// Square contents, or `None` off the board.
    #[inline]
    pub fn square(&self, pos: Pos) -> Option<Square> {
        pos.in_bounds().then(|| self.grid[pos.index()])
    }

    #[inline]
    pub fn chip_count(&self, color: Color) -> usize {
        self.chips[color.index()].len()
    }

    /// Chips of one color in placement order.
    #[inline]
    pub fn chips(&self, color: Color) -> &[Pos] {
        &self.chips[color.index()]
    }

    /// Chips inside one goal area.
    #[inline]
    pub fn goal_chips(&self, area: GoalArea) -> &[Pos] {
        &self.goals[area.index()]
    }

    /// True once `color` has all its chips down and may only step.
    #[inline]
    pub fn in_step_phase(&self, color: Color) -> bool {
        self.chip_count(color) >= MAX_CHIPS
    }

    #[inline]
    pub fn position_hash(&self) -> u64 {
        self.hash
    }

    /// Number of moves that can still be undone.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The most recently applied move.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|e| e.mv)
    }

    /// Check a move against every placement rule without touching the board.
    pub fn check_move(&self, mv: &Move) -> Result<(), IllegalMove> {
        let color = mv.color();
        let to = mv.to();
        if !to.in_bounds() {
            return Err(IllegalMove::OutOfBounds(to));
        }
        if to.is_corner() {
            return Err(IllegalMove::Corner(to));
        }
        if let Some(area) = to.goal_area() {
            if area.owner() != color {
                return Err(IllegalMove::OpponentGoal(to));
            }
        }
        let vacated = match *mv {
            Move::Add { .. } => {
                if self.in_step_phase(color) {
                    return Err(IllegalMove::AddPhaseOver);
                }
                None
            }
            Move::Step { from, .. } => {
                if !self.in_step_phase(color) {
                    return Err(IllegalMove::StepPhaseNotReached);
                }
                if !from.in_bounds() {
                    return Err(IllegalMove::OutOfBounds(from));
                }
                if from == to {
                    return Err(IllegalMove::SameSquare);
                }
                if self.grid[from.index()] != Square::Chip(color) {
                    return Err(IllegalMove::NotOwnChip(from));
                }
                Some(from)
            }
        };
        if self.grid[to.index()] != Square::Empty {
            return Err(IllegalMove::Occupied(to));
        }
        if self.forms_cluster(to, color, vacated) {
            return Err(IllegalMove::Cluster(to));
        }
        Ok(())
    }

    #[inline]
    pub fn is_legal(&self, mv: &Move) -> bool {
        self.check_move(mv).is_ok()
    }

    /// Would a `color` chip at `to` end up with two same-colored chips in
    /// its 3x3 block, or next to a chip that already has a neighbor?
    /// `skip` is the square a stepping chip leaves.
    fn forms_cluster(&self, to: Pos, color: Color, skip: Option<Pos>) -> bool {
        let own = |p: Pos| Some(p) != skip && self.grid[p.index()] == Square::Chip(color);
        let mut adjacent = to.neighbors().filter(|&p| own(p));
        match (adjacent.next(), adjacent.next()) {
            (None, _) => false,
            (Some(_), Some(_)) => true,
            (Some(n), None) => n.neighbors().any(|p| p != to && own(p)),
        }
    }

    /// Apply a legal move. Returns false and leaves the board untouched if
    /// the move is illegal.
    pub fn apply_move(&mut self, mv: &Move) -> bool {
        if self.check_move(mv).is_err() {
            return false;
        }
        let color = mv.color();
        let ci = color.index();

        // Locate the stepping chip in the index lists before mutating anything.
        let vacated = match *mv {
            Move::Add { .. } => None,
            Move::Step { from, .. } => {
                let Some(chip_slot) = self.chips[ci].iter().position(|&p| p == from) else {
                    return false;
                };
                let goal_slot = match from.goal_area() {
                    Some(area) => match self.goals[area.index()].iter().position(|&p| p == from) {
                        Some(slot) => Some(slot),
                        None => return false,
                    },
                    None => None,
                };
                Some(Vacated {
                    pos: from,
                    chip_slot,
                    goal_slot,
                })
            }
        };

        let mut links = Vec::new();
        let mut hash_delta = 0;

        if let Some(v) = &vacated {
            self.chips[ci].remove(v.chip_slot);
            if let (Some(area), Some(slot)) = (v.pos.goal_area(), v.goal_slot) {
                self.goals[area.index()].remove(slot);
            }
            self.grid[v.pos.index()] = Square::Empty;
            hash_delta ^= self.keys.key(v.pos, color);
            self.refresh_links(v.pos, &mut links);
        }

        let to = mv.to();
        self.grid[to.index()] = Square::Chip(color);
        self.chips[ci].push(to);
        if let Some(area) = to.goal_area() {
            self.goals[area.index()].push(to);
        }
        hash_delta ^= self.keys.key(to, color);
        self.refresh_links(to, &mut links);

        self.hash ^= hash_delta;
        self.history.push(UndoEntry {
            mv: *mv,
            vacated,
            links,
            hash_delta,
        });
        true
    }

    /// Reverse the most recent [`apply_move`](Self::apply_move).
    /// Returns false if there is nothing to undo.
    pub fn undo_move(&mut self) -> bool {
        let Some(entry) = self.history.pop() else {
            return false;
        };
        for change in entry.links.iter().rev() {
            self.links[change.at.index()][change.dir.index()] = change.before;
        }

        let color = entry.mv.color();
        let ci = color.index();
        let to = entry.mv.to();
        self.grid[to.index()] = Square::Empty;
        self.chips[ci].pop();
        if let Some(area) = to.goal_area() {
            self.goals[area.index()].pop();
        }

        if let Some(v) = entry.vacated {
            self.grid[v.pos.index()] = Square::Chip(color);
            self.chips[ci].insert(v.chip_slot, v.pos);
            if let (Some(area), Some(slot)) = (v.pos.goal_area(), v.goal_slot) {
                self.goals[area.index()].insert(slot, v.pos);
            }
        }

        self.hash ^= entry.hash_delta;
        true
    }

    /// Apply a move and get a guard that undoes it when dropped.
    pub fn play(&mut self, mv: &Move) -> Option<MoveGuard<'_>> {
        if self.apply_move(mv) {
            Some(MoveGuard { board: self })
        } else {
            None
        }
    }

    /// First square along `dir` that holds a chip, stopping at corners and edges.
    fn nearest_chip(&self, from: Pos, dir: Direction) -> Option<Pos> {
        let mut p = from.step(dir);
        while p.in_bounds() {
            match self.grid[p.index()] {
                Square::Empty => p = p.step(dir),
                Square::Chip(_) => return Some(p),
                Square::Corner => return None,
            }
        }
        None
    }

    /// The chip that the chip at `from` connects to along `dir`, if any.
    fn link_target(&self, from: Pos, dir: Direction) -> Option<Pos> {
        let Square::Chip(color) = self.grid[from.index()] else {
            return None;
        };
        let other = self.nearest_chip(from, dir)?;
        if self.grid[other.index()] != Square::Chip(color) {
            return None;
        }
        // Chips sharing a goal area never connect.
        if from.goal_area().is_some() && from.goal_area() == other.goal_area() {
            return None;
        }
        Some(other)
    }

    fn set_link(&mut self, at: Pos, dir: Direction, target: Option<Pos>, log: &mut Vec<LinkChange>) {
        let slot = &mut self.links[at.index()][dir.index()];
        if *slot != target {
            log.push(LinkChange {
                at,
                dir,
                before: *slot,
            });
            *slot = target;
        }
    }

    /// Recompute every connection that can pass through `center` after its
    /// contents changed: its own eight slots and the facing slot of the
    /// nearest chip on each ray.
    fn refresh_links(&mut self, center: Pos, log: &mut Vec<LinkChange>) {
        for dir in Direction::ALL {
            let target = self.link_target(center, dir);
            self.set_link(center, dir, target, log);
            if let Some(other) = self.nearest_chip(center, dir) {
                let back = dir.opposite();
                let target = self.link_target(other, back);
                self.set_link(other, back, target, log);
            }
        }
    }

    /// Raw connection slots of a square, indexed by direction.
    #[inline]
    pub(crate) fn links_of(&self, pos: Pos) -> &[Option<Pos>; 8] {
        &self.links[pos.index()]
    }

    /// Live connections of the `color` chip at `pos`, in direction order.
    /// Empty if the square does not hold a chip of that color.
    pub fn connections_of(&self, color: Color, pos: Pos) -> Vec<(Pos, Direction)> {
        if self.square(pos) != Some(Square::Chip(color)) {
            return Vec::new();
        }
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.links[pos.index()][d.index()].map(|p| (p, d)))
            .collect()
    }

    /// Total connection endpoints over all chips of a color.
    pub fn connection_count(&self, color: Color) -> usize {
        self.chips[color.index()]
            .iter()
            .map(|p| self.links[p.index()].iter().flatten().count())
            .sum()
    }

    pub fn has_network(&self, color: Color) -> bool {
        network::has_network(self, color)
    }

    /// All legal moves for `color`: adds in row-major order while chips
    /// remain, otherwise every step of every chip.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        if !self.in_step_phase(color) {
            for i in 0..BOARDSIZE {
                let mv = Move::Add {
                    to: Pos::from_index(i),
                    color,
                };
                if self.is_legal(&mv) {
                    moves.push(mv);
                }
            }
        } else {
            for &from in self.chips(color) {
                for i in 0..BOARDSIZE {
                    let mv = Move::Step {
                        from,
                        to: Pos::from_index(i),
                        color,
                    };
                    if self.is_legal(&mv) {
                        moves.push(mv);
                    }
                }
            }
        }
        moves
    }

    /// Cross-check every derived index against the grid. Returns one message
    /// per inconsistency; empty means the board is sound.
    pub fn consistency_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = 0;
        for i in 0..BOARDSIZE {
            let p = Pos::from_index(i);
            match self.grid[i] {
                Square::Corner if !p.is_corner() => errors.push(format!("stray corner at {p}")),
                Square::Chip(c) => {
                    seen += 1;
                    if !self.chips(c).contains(&p) {
                        errors.push(format!("{c} chip at {p} missing from chip list"));
                    }
                    if let Some(area) = p.goal_area() {
                        if !self.goal_chips(area).contains(&p) {
                            errors.push(format!("chip at {p} missing from {area:?} goal list"));
                        }
                    }
                    if p.neighbors().filter(|&n| self.grid[n.index()] == Square::Chip(c)).count() >= 2 {
                        errors.push(format!("cluster around {p}"));
                    }
                }
                _ => {}
            }
            for dir in Direction::ALL {
                let expected = self.link_target(p, dir);
                if self.links[i][dir.index()] != expected {
                    errors.push(format!("stale connection at {p} towards {dir:?}"));
                }
            }
        }
        if seen != self.chips[0].len() + self.chips[1].len() {
            errors.push("chip lists hold squares not on the grid".to_string());
        }
        for area in GoalArea::ALL {
            for &p in self.goal_chips(area) {
                if p.goal_area() != Some(area) || !matches!(self.grid[p.index()], Square::Chip(_)) {
                    errors.push(format!("{area:?} goal list holds {p}"));
                }
            }
        }
        if self.hash != self.keys.full_hash(&self.grid) {
            errors.push("incremental hash drifted from full hash".to_string());
        }
        errors
    }
}

/// Undoes the move it was created for when it goes out of scope.
pub struct MoveGuard<'a> {
    board: &'a mut Board,
}

impl Deref for MoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.board.undo_move();
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for x in 0..N {
            write!(f, "{x} ")?;
        }
        writeln!(f)?;
        for y in 0..N {
            write!(f, "{y} ")?;
            for x in 0..N {
                let ch = match self.grid[y * N + x] {
                    Square::Chip(Color::Black) => 'B',
                    Square::Chip(Color::White) => 'W',
                    Square::Corner => '#',
                    Square::Empty => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
