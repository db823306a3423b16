//! Value types shared by the board and the search: colors, squares,
//! goal areas, compass directions, and moves.
//!
//! Moves have a compact text form used by the command loop:
//! an add move is the two digits `xy` of its target (`"34"`), a step move
//! is `from-to` (`"12-34"`).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{DELTA, EDGE, N};

/// Chip color. Black targets the top and bottom edges, White the left and right.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }

    /// The two goal areas a network of this color must join, in search order.
    #[inline]
    pub fn goals(self) -> (GoalArea, GoalArea) {
        match self {
            Color::Black => (GoalArea::Top, GoalArea::Bottom),
            Color::White => (GoalArea::Left, GoalArea::Right),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

impl FromStr for Color {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            _ => Err(ParseMoveError::Color(s.to_string())),
        }
    }
}

/// One of the four edge regions, corners excluded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GoalArea {
    Top,
    Bottom,
    Left,
    Right,
}

impl GoalArea {
    pub const ALL: [GoalArea; 4] = [
        GoalArea::Top,
        GoalArea::Bottom,
        GoalArea::Left,
        GoalArea::Right,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            GoalArea::Top => 0,
            GoalArea::Bottom => 1,
            GoalArea::Left => 2,
            GoalArea::Right => 3,
        }
    }

    /// The color allowed to place chips here.
    #[inline]
    pub fn owner(self) -> Color {
        match self {
            GoalArea::Top | GoalArea::Bottom => Color::Black,
            GoalArea::Left | GoalArea::Right => Color::White,
        }
    }
}

/// A board coordinate. Out-of-range values are representable so that
/// illegal input can be rejected instead of panicking.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }

    #[inline]
    pub fn in_bounds(self) -> bool {
        (0..=EDGE).contains(&self.x) && (0..=EDGE).contains(&self.y)
    }

    #[inline]
    pub fn is_corner(self) -> bool {
        (self.x == 0 || self.x == EDGE) && (self.y == 0 || self.y == EDGE)
    }

    /// Square index for grid lookups. Only meaningful when `in_bounds()`.
    #[inline]
    pub fn index(self) -> usize {
        self.y as usize * N + self.x as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Self {
        Pos::new((i % N) as i32, (i / N) as i32)
    }

    #[inline]
    pub fn step(self, dir: Direction) -> Pos {
        let (dx, dy) = DELTA[dir.index()];
        Pos::new(self.x + dx, self.y + dy)
    }

    /// The goal area containing this square, if any.
    pub fn goal_area(self) -> Option<GoalArea> {
        if !self.in_bounds() || self.is_corner() {
            return None;
        }
        if self.y == 0 {
            Some(GoalArea::Top)
        } else if self.y == EDGE {
            Some(GoalArea::Bottom)
        } else if self.x == 0 {
            Some(GoalArea::Left)
        } else if self.x == EDGE {
            Some(GoalArea::Right)
        } else {
            None
        }
    }

    /// In-bounds squares of the 3x3 block around this one, excluding itself.
    pub fn neighbors(self) -> impl Iterator<Item = Pos> {
        Direction::ALL
            .into_iter()
            .map(move |d| self.step(d))
            .filter(|p| p.in_bounds())
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.x, self.y)
    }
}

/// The eight compass directions a connection can run in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    /// Same order as `constants::DELTA`.
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        Direction::ALL[(self.index() + 4) % 8]
    }
}

/// A move for one player: place a new chip, or relocate an existing one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Add { to: Pos, color: Color },
    Step { from: Pos, to: Pos, color: Color },
}

impl Move {
    pub fn add(x: i32, y: i32, color: Color) -> Self {
        Move::Add {
            to: Pos::new(x, y),
            color,
        }
    }

    pub fn step(from_x: i32, from_y: i32, to_x: i32, to_y: i32, color: Color) -> Self {
        Move::Step {
            from: Pos::new(from_x, from_y),
            to: Pos::new(to_x, to_y),
            color,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        match *self {
            Move::Add { color, .. } | Move::Step { color, .. } => color,
        }
    }

    /// Destination square of the chip.
    #[inline]
    pub fn to(&self) -> Pos {
        match *self {
            Move::Add { to, .. } | Move::Step { to, .. } => to,
        }
    }

    /// The same move attributed to another player.
    pub fn with_color(self, color: Color) -> Self {
        match self {
            Move::Add { to, .. } => Move::Add { to, color },
            Move::Step { from, to, .. } => Move::Step { from, to, color },
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Add { to, color } => write!(f, "[add to {to} {color}]"),
            Move::Step { from, to, color } => write!(f, "[step from {from} to {to} {color}]"),
        }
    }
}

/// Errors from parsing the text form of a move or color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoveError {
    #[error("invalid coordinate '{0}', expected two digits xy")]
    Coord(String),
    #[error("invalid move '{0}', expected xy or xy-xy")]
    Shape(String),
    #[error("invalid color '{0}'")]
    Color(String),
}

fn parse_pos(s: &str) -> Result<Pos, ParseMoveError> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(ParseMoveError::Coord(s.to_string()));
    }
    Ok(Pos::new((bytes[0] - b'0') as i32, (bytes[1] - b'0') as i32))
}

/// Parse `"xy"` (add) or `"xy-xy"` (step from-to) for the given color.
///
/// Only the shape is checked here; legality is the board's business.
pub fn parse_move(s: &str, color: Color) -> Result<Move, ParseMoveError> {
    let s = s.trim();
    match s.split_once('-') {
        None => Ok(Move::Add {
            to: parse_pos(s)?,
            color,
        }),
        Some((from, to)) if !to.contains('-') => Ok(Move::Step {
            from: parse_pos(from)?,
            to: parse_pos(to)?,
            color,
        }),
        Some(_) => Err(ParseMoveError::Shape(s.to_string())),
    }
}

/// Text form of a move, inverse of [`parse_move`].
pub fn str_move(mv: &Move) -> String {
    match mv {
        Move::Add { to, .. } => to.to_string(),
        Move::Step { from, to, .. } => format!("{from}-{to}"),
    }
}
